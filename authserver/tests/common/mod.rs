//! 테스트용 인메모리 저장소와 스파이
#![allow(dead_code)]

use async_trait::async_trait;
use authserver::SessionService;
use chrono::Utc;
use shared::model::{NewUser, UserRecord};
use shared::security::{PasswordHasher, SecurityConfig, TokenCodec, TokenPair, MIN_BCRYPT_COST};
use shared::tool::error::AppError;
use shared::traits::{TokenSaver, UserProvider, UserSaver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn test_security_config() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: "9c4e1a7b3f0d6e2a8c5b1f7d3e9a0c6b".to_string(),
        jwt_algorithm: "HS256".to_string(),
        access_token_ttl: Duration::from_secs(15 * 60),
        refresh_token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        bcrypt_rounds: 10,
    }
}

pub fn test_codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&test_security_config()).unwrap())
}

/// Users kept in a vector; the email uniqueness check mirrors the database constraint.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<UserRecord>>,
    pub saves: AtomicUsize,
    pub lookups: AtomicUsize,
    /// When set, every call fails with this error.
    pub fail_with: Mutex<Option<AppError>>,
}

impl InMemoryUserStore {
    pub fn failing(err: AppError) -> Self {
        let store = Self::default();
        *store.fail_with.lock().unwrap() = Some(err);
        store
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().iter().find(|u| u.email == email).cloned()
    }

    fn check_failure(&self) -> Result<(), AppError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserSaver for InMemoryUserStore {
    async fn save_user(&self, user: NewUser) -> Result<i64, AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::UserAlreadyExists(user.email));
        }
        let id = users.len() as i64 + 1;
        users.push(UserRecord {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryUserStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.user_by_email(email))
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }
}

/// Records every pair written to the token cache; can be told to fail.
#[derive(Default)]
pub struct SpyTokenStore {
    pub saved: Mutex<Vec<(i64, TokenPair, Duration, Duration)>>,
    pub fail: bool,
}

impl SpyTokenStore {
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenSaver for SpyTokenStore {
    async fn save_token_pair(
        &self,
        user_id: i64,
        pair: &TokenPair,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::RedisConnection("connection refused".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((user_id, pair.clone(), access_ttl, refresh_ttl));
        Ok(())
    }
}

pub fn session_service(
    users: Arc<InMemoryUserStore>,
    tokens: Arc<SpyTokenStore>,
) -> SessionService {
    let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();
    SessionService::new(hasher, test_codec(), users.clone(), users, tokens).unwrap()
}

pub struct Harness {
    pub users: Arc<InMemoryUserStore>,
    pub tokens: Arc<SpyTokenStore>,
    pub svc: Arc<SessionService>,
}

pub fn harness() -> Harness {
    harness_with(InMemoryUserStore::default(), SpyTokenStore::default())
}

pub fn harness_with(users: InMemoryUserStore, tokens: SpyTokenStore) -> Harness {
    let users = Arc::new(users);
    let tokens = Arc::new(tokens);
    let svc = Arc::new(session_service(users.clone(), tokens.clone()));
    Harness { users, tokens, svc }
}
