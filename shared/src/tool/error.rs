//! gRPC Error Management System
//!
//! 서비스 에러를 체계적으로 관리합니다.
//! 비즈니스 로직 에러를 gRPC Status로 변환하고, 심각도에 따라 로깅합니다.
//! Infrastructure failures are logged with their detail but reach the caller as a bare `internal`.

use crate::security::SecurityError;
use thiserror::Error;
use tonic::Status;
use tracing::{error, info, warn};

/// 공통 애플리케이션 에러 정의
#[derive(Error, Debug, Clone)]
pub enum AppError {
    // 입력값 검증 에러
    #[error("필수 필드 누락: {0}")]
    MissingField(String),

    #[error("입력값 오류: {0}")]
    InvalidInput(String),

    // 인증 관련 에러
    /// Same variant for "unknown user" and "wrong password".
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Security(#[from] SecurityError),

    // 사용자 관련 에러
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    // 데이터베이스 관련 에러
    #[error("데이터베이스 연결 실패: {0}")]
    DatabaseConnection(String),

    #[error("데이터베이스 쿼리 실패: {0}")]
    DatabaseQuery(String),

    // 외부 서비스 에러
    #[error("외부 API 호출 실패: {0}")]
    ExternalApiError(String),

    #[error("Redis 연결 실패: {0}")]
    RedisConnection(String),

    // 시스템 에러
    #[error("내부 서버 에러: {0}")]
    InternalError(String),

    #[error("타임아웃: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// 에러의 심각도를 반환합니다.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::DatabaseConnection(_)
            | AppError::RedisConnection(_)
            | AppError::Configuration(_)
            | AppError::Security(SecurityError::HashingFailure(_))
            | AppError::Security(SecurityError::SigningFailure(_)) => ErrorSeverity::Critical,

            // High: 인프라 실패
            AppError::DatabaseQuery(_)
            | AppError::ExternalApiError(_)
            | AppError::InternalError(_)
            | AppError::Timeout(_) => ErrorSeverity::High,

            // Medium: 인증 실패
            AppError::InvalidCredentials
            | AppError::Unauthorized(_)
            | AppError::Security(_) => ErrorSeverity::Medium,

            // Low: 사용자 입력 오류
            AppError::MissingField(_)
            | AppError::InvalidInput(_)
            | AppError::UserAlreadyExists(_)
            | AppError::NotFound(_) => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let error_msg = self.to_string();

        match self.severity() {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {} - {}", context, error_msg);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {} - {}", context, error_msg);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {} - {}", context, error_msg);
            }
            ErrorSeverity::Low => {
                info!("[LOW] {} - {}", context, error_msg);
            }
        }
    }

    /// 에러를 gRPC Status로 변환합니다.
    pub fn to_status(&self) -> Status {
        self.log("gRPC Status 변환");
        self.clone().into()
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 인프라 실패
    Medium,   // 인증 실패
    Low,      // 사용자 입력 오류
}

impl From<AppError> for Status {
    fn from(e: AppError) -> Self {
        match e {
            // 입력값 오류
            AppError::MissingField(msg) => {
                Status::invalid_argument(format!("Missing field: {msg}"))
            }
            AppError::InvalidInput(msg) => Status::invalid_argument(msg),

            // 인증 관련
            AppError::InvalidCredentials => Status::unauthenticated("invalid credentials"),
            AppError::Unauthorized(msg) => Status::unauthenticated(msg),
            AppError::Security(err) => match err {
                SecurityError::Expired => Status::unauthenticated("token expired"),
                SecurityError::MalformedToken | SecurityError::InvalidSignature => {
                    Status::unauthenticated("invalid token")
                }
                SecurityError::WrongTokenKind { expected, .. } => {
                    Status::invalid_argument(format!("{expected} token required"))
                }
                SecurityError::HashingFailure(_) | SecurityError::SigningFailure(_) => {
                    Status::internal("internal error")
                }
            },

            // 리소스
            AppError::UserAlreadyExists(_) => Status::already_exists("user already exists"),
            AppError::NotFound(msg) => Status::not_found(msg),

            // 원격 저장소 거부 (사진 업로드)
            AppError::ExternalApiError(_) => Status::unavailable("service unavailable"),

            // 시스템 오류: 상세 내용은 로그에만 남김
            AppError::DatabaseConnection(_)
            | AppError::DatabaseQuery(_)
            | AppError::RedisConnection(_)
            | AppError::Timeout(_)
            | AppError::InternalError(_)
            | AppError::Configuration(_) => Status::internal("internal error"),
        }
    }
}

// SqlxError conversion
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::Database(db_err) => AppError::DatabaseQuery(db_err.to_string()),
            sqlx::Error::Io(io_err) => AppError::DatabaseConnection(io_err.to_string()),
            sqlx::Error::PoolTimedOut => {
                AppError::Timeout("Database connection pool timeout".to_string())
            }
            sqlx::Error::PoolClosed => {
                AppError::DatabaseConnection("Database pool is closed".to_string())
            }
            sqlx::Error::Configuration(_) => {
                AppError::Configuration("Database configuration error".to_string())
            }
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisConnection(err.to_string())
    }
}

/// 에러 처리 헬퍼 함수들
pub mod helpers {
    use super::*;

    /// 필수 문자열 필드 검증
    pub fn require_field(value: &str, field_name: &str) -> Result<(), AppError> {
        if value.is_empty() {
            return Err(AppError::MissingField(field_name.to_string()));
        }
        Ok(())
    }

    /// 문자열 검증 헬퍼 함수
    pub fn validate_string(value: &str, field_name: &str, max_length: usize) -> Result<(), AppError> {
        require_field(value, field_name)?;

        if value.len() > max_length {
            return Err(AppError::InvalidInput(format!(
                "{field_name} too long (max: {max_length})"
            )));
        }

        Ok(())
    }
}
