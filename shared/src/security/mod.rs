//! 보안 모듈 - 비밀번호 해싱, 토큰 발급/검증, gRPC 인증 인터셉터
//!
//! 모든 서비스에서 사용할 수 있는 보안 기능을 제공합니다.

pub mod interceptor;
pub mod password;
pub mod token;

pub use interceptor::*;
pub use password::*;
pub use token::*;

use crate::config::app_config::{parse_var, EnvLookup};
use crate::tool::error::AppError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 보안 관련 에러
///
/// Token validation failures are kept distinct so callers can branch:
/// an expired refresh token means "log in again", the others mean "reject".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongTokenKind { expected: TokenKind, actual: TokenKind },
}

/// 보안 설정
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT 비밀키
    pub jwt_secret: String,
    /// JWT 알고리즘 (HS256 / HS384 / HS512)
    pub jwt_algorithm: String,
    /// Access 토큰 만료시간
    pub access_token_ttl: Duration,
    /// Refresh 토큰 만료시간
    pub refresh_token_ttl: Duration,
    /// bcrypt 라운드
    pub bcrypt_rounds: u32,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret_len", &self.jwt_secret.len())
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("bcrypt_rounds", &self.bcrypt_rounds)
            .finish()
    }
}

const WEAK_SECRET_MARKERS: &[&str] = &[
    "default", "secret", "change", "your_", "please", "example", "insecure",
];

impl SecurityConfig {
    /// 환경변수에서 보안 설정 로드
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        let jwt_secret = lookup("JWT_SECRET_KEY").ok_or_else(|| {
            AppError::Configuration("JWT_SECRET_KEY environment variable is required".to_string())
        })?;

        // 보안 강화: 최소 길이 검증
        if jwt_secret.len() < 32 {
            return Err(AppError::Configuration(format!(
                "JWT_SECRET_KEY must be at least 32 characters. Current: {}",
                jwt_secret.len()
            )));
        }

        // 보안 강화: 약한 기본값 방지
        let lower_secret = jwt_secret.to_lowercase();
        if WEAK_SECRET_MARKERS.iter().any(|m| lower_secret.contains(m)) {
            return Err(AppError::Configuration(
                "JWT_SECRET_KEY contains weak/default values. Use a cryptographically secure random key"
                    .to_string(),
            ));
        }

        let jwt_algorithm = lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());
        if !matches!(jwt_algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(AppError::Configuration(format!(
                "Unsupported JWT algorithm '{jwt_algorithm}'. Supported: HS256, HS384, HS512"
            )));
        }

        let access_minutes: u64 = parse_var(
            lookup,
            "ACCESS_TOKEN_TTL_MINUTES",
            DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        )?;
        let refresh_days: u64 =
            parse_var(lookup, "REFRESH_TOKEN_TTL_DAYS", DEFAULT_REFRESH_TOKEN_TTL_DAYS)?;
        if access_minutes == 0 || refresh_days == 0 {
            return Err(AppError::Configuration(
                "token lifetimes must be greater than zero".to_string(),
            ));
        }

        let bcrypt_rounds: u32 = parse_var(lookup, "BCRYPT_ROUNDS", 12)?;
        // bcrypt 라운드 보안 검증
        if !(10..=15).contains(&bcrypt_rounds) {
            return Err(AppError::Configuration(
                "BCRYPT_ROUNDS must be between 10 and 15 for security".to_string(),
            ));
        }

        let config = Self {
            jwt_secret,
            jwt_algorithm,
            access_token_ttl: Duration::from_secs(access_minutes * 60),
            refresh_token_ttl: Duration::from_secs(refresh_days * 24 * 60 * 60),
            bcrypt_rounds,
        };

        tracing::info!("🔐 Security Configuration Loaded:");
        tracing::info!("  └─ Algorithm: {}", config.jwt_algorithm);
        tracing::info!("  └─ Secret Key Length: {} characters", config.jwt_secret.len());
        tracing::info!("  └─ Access Token TTL: {} minutes", access_minutes);
        tracing::info!("  └─ Refresh Token TTL: {} days", refresh_days);
        tracing::info!("  └─ BCrypt Rounds: {}", config.bcrypt_rounds);

        Ok(config)
    }
}
