//! 세션 서비스 - 회원가입, 로그인, 관리자 확인, 토큰 갱신
//!
//! 각 연산은 독립적으로 완결되며 프로세스 내부에 가변 상태를 두지 않습니다.
//! 저장소 에러는 즉시 실패로 처리하고(재시도 없음), 토큰 캐시 저장 실패만 예외적으로 무시합니다.
//!
//! Register checks the email before inserting. Two concurrent registrations can
//! both pass that check; the `UNIQUE (email)` constraint is what finally rejects
//! the second one, surfacing as `UserAlreadyExists`.

use shared::config::AdminSeed;
use shared::model::NewUser;
use shared::security::{PasswordHasher, SecurityError, TokenCodec, TokenKind, TokenPair};
use shared::tool::error::{helpers, AppError};
use shared::traits::{TokenSaver, UserProvider, UserSaver};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Hashed once at construction and verified against when the email is unknown,
/// so both login failures cost exactly one bcrypt verify.
const TIMING_EQUALIZER_PASSWORD: &str = "timing-equalizer-password";

pub struct SessionService {
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    token_saver: Arc<dyn TokenSaver>,
    dummy_digest: Arc<str>,
}

impl SessionService {
    /// Hashes the timing-equalizer digest up front; blocks for one bcrypt hash.
    pub fn new(
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        token_saver: Arc<dyn TokenSaver>,
    ) -> Result<Self, SecurityError> {
        let dummy_digest = Arc::from(hasher.hash(TIMING_EQUALIZER_PASSWORD)?);
        Ok(Self {
            hasher,
            codec,
            user_saver,
            user_provider,
            token_saver,
            dummy_digest,
        })
    }

    /// 회원가입 후 토큰 쌍을 발급합니다.
    ///
    /// If issuance fails after the row is committed the user exists without a
    /// session; there is no rollback and the caller can simply log in.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<TokenPair, AppError> {
        helpers::require_field(&email, "email")?;
        helpers::require_field(&password, "password")?;

        if self.user_provider.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::UserAlreadyExists(email));
        }

        let password_hash = self.hash_password(password).await?;
        let user_id = self
            .user_saver
            .save_user(NewUser {
                username,
                email,
                password_hash,
                is_admin: false,
            })
            .await?;

        let pair = self.codec.issue_pair(user_id)?;
        self.cache_token_pair(user_id, &pair).await;

        info!(user_id, "✅ 회원가입 완료");
        Ok(pair)
    }

    /// 로그인
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`.
    pub async fn login(&self, email: String, password: String) -> Result<TokenPair, AppError> {
        helpers::require_field(&email, "email")?;
        helpers::require_field(&password, "password")?;

        let user = match self.user_provider.find_user_by_email(&email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let Some(user) = user else {
            self.burn_verify(password).await?;
            debug!("login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(user.password_hash, password).await? {
            debug!(user_id = user.id, "login password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let pair = self.codec.issue_pair(user.id)?;
        self.cache_token_pair(user.id, &pair).await;

        info!(user_id = user.id, "✅ 로그인 성공");
        Ok(pair)
    }

    /// 관리자 여부 확인. 존재하지 않는 사용자는 관리자가 아닙니다.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AppError> {
        if user_id == 0 {
            return Err(AppError::MissingField("user_id".to_string()));
        }

        let is_admin = match self.user_provider.find_user_by_id(user_id).await {
            Ok(user) => user.map(|u| u.is_admin).unwrap_or(false),
            Err(AppError::NotFound(_)) => false,
            Err(e) => return Err(e),
        };

        debug!(user_id, is_admin, "관리자 여부 조회");
        Ok(is_admin)
    }

    /// Refresh 토큰으로 새 토큰 쌍을 발급합니다.
    ///
    /// The presented refresh token stays valid until its own `exp`.
    pub async fn refresh(&self, refresh_token: String) -> Result<TokenPair, AppError> {
        helpers::require_field(&refresh_token, "refresh_token")?;

        let pair = self.codec.refresh(&refresh_token)?;
        self.cache_token_pair(pair.subject, &pair).await;

        info!(user_id = pair.subject, "🔄 토큰 갱신 완료");
        Ok(pair)
    }

    /// Creates the configured admin account unless its email is already registered.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<i64, AppError> {
        if let Some(existing) = self.user_provider.find_user_by_email(&seed.email).await? {
            if !existing.is_admin {
                warn!(user_id = existing.id, "⚠️ 관리자 이메일이 일반 사용자로 등록되어 있습니다");
            }
            return Ok(existing.id);
        }

        let password_hash = self.hash_password(seed.password.clone()).await?;
        let user_id = self
            .user_saver
            .save_user(NewUser {
                username: seed.username.clone(),
                email: seed.email.clone(),
                password_hash,
                is_admin: true,
            })
            .await?;

        info!(user_id, "👑 관리자 계정 생성");
        Ok(user_id)
    }

    // 토큰 캐시는 best-effort: 실패해도 발급된 토큰은 그대로 반환합니다.
    async fn cache_token_pair(&self, user_id: i64, pair: &TokenPair) {
        if let Err(e) = self
            .token_saver
            .save_token_pair(
                user_id,
                pair,
                self.codec.lifetime(TokenKind::Access),
                self.codec.lifetime(TokenKind::Refresh),
            )
            .await
        {
            warn!(user_id, error = %e, "⚠️ 토큰 캐시 저장 실패 (무시)");
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        run_blocking(move || hasher.hash(&password)).await
    }

    async fn verify_password(&self, digest: String, password: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        run_blocking(move || hasher.verify(&digest, &password)).await
    }

    async fn burn_verify(&self, password: String) -> Result<(), AppError> {
        let hasher = self.hasher.clone();
        let digest = Arc::clone(&self.dummy_digest);
        run_blocking(move || hasher.verify(&digest, &password).map(|_| ())).await
    }
}

/// bcrypt는 CPU를 오래 점유하므로 blocking 풀에서 실행합니다.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, SecurityError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalError(format!("blocking task failed: {e}")))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::model::UserRecord;
    use shared::security::{SecurityConfig, MIN_BCRYPT_COST};
    use std::time::Duration;

    struct NoUsers;

    #[async_trait]
    impl UserSaver for NoUsers {
        async fn save_user(&self, _user: NewUser) -> Result<i64, AppError> {
            Ok(1)
        }
    }

    #[async_trait]
    impl UserProvider for NoUsers {
        async fn find_user_by_email(&self, _email: &str) -> Result<Option<UserRecord>, AppError> {
            Ok(None)
        }

        async fn find_user_by_id(&self, _user_id: i64) -> Result<Option<UserRecord>, AppError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl TokenSaver for NoUsers {
        async fn save_token_pair(
            &self,
            _user_id: i64,
            _pair: &TokenPair,
            _access_ttl: Duration,
            _refresh_ttl: Duration,
        ) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn service() -> SessionService {
        let config = SecurityConfig {
            jwt_secret: "5e8a2c4f6b1d3e7a9c0b2d4f6a8e1c3b".to_string(),
            jwt_algorithm: "HS256".to_string(),
            access_token_ttl: Duration::from_secs(900),
            refresh_token_ttl: Duration::from_secs(604_800),
            bcrypt_rounds: 10,
        };
        let stub = Arc::new(NoUsers);
        SessionService::new(
            PasswordHasher::new(MIN_BCRYPT_COST).unwrap(),
            Arc::new(TokenCodec::new(&config).unwrap()),
            stub.clone(),
            stub.clone(),
            stub,
        )
        .unwrap()
    }

    #[test]
    fn test_timing_digest_ready_after_construction() {
        let svc = service();

        assert!(svc.dummy_digest.starts_with("$2"));
        assert!(svc
            .hasher
            .verify(&svc.dummy_digest, TIMING_EQUALIZER_PASSWORD)
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_email_reuses_prepared_digest() {
        let svc = service();
        let before = Arc::clone(&svc.dummy_digest);

        let err = svc
            .login("ghost@b.com".to_string(), "pw".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
        assert!(Arc::ptr_eq(&before, &svc.dummy_digest));
    }
}
