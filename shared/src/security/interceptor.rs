//! gRPC Interceptor Module
//!
//! Bearer access-token check for services that sit behind the auth service.
//! The verified user id is placed in the request extensions as [`AuthenticatedUser`].

use crate::security::{SecurityError, TokenCodec};
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};

/// User id recovered from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i64);

impl AuthenticatedUser {
    /// Reads the user placed by [`AccessTokenInterceptor`]; missing means the interceptor was not installed.
    #[allow(clippy::result_large_err)]
    pub fn from_request<T>(req: &Request<T>) -> Result<Self, Status> {
        req.extensions()
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| Status::unauthenticated("Missing authenticated user"))
    }
}

/// JWT access-token interceptor
#[derive(Debug, Clone)]
pub struct AccessTokenInterceptor {
    codec: Arc<TokenCodec>,
}

impl AccessTokenInterceptor {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl Interceptor for AccessTokenInterceptor {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        let token = extract_bearer_token(req.metadata())?;

        match self.codec.parse_access(&token) {
            Ok(parsed) => {
                debug!(user_id = parsed.subject, "✅ access token accepted");
                req.extensions_mut().insert(AuthenticatedUser(parsed.subject));
                Ok(req)
            }
            Err(e) => {
                warn!(
                    target: "security::auth_failure",
                    error = %e,
                    token_length = token.len(),
                    "❌ access token rejected"
                );
                Err(rejection_status(&e))
            }
        }
    }
}

/// 인터셉터 거부는 모두 `Unauthenticated`입니다. 만료만 메시지로 구분합니다.
fn rejection_status(err: &SecurityError) -> Status {
    match err {
        SecurityError::Expired => Status::unauthenticated("token expired"),
        SecurityError::WrongTokenKind { .. } => Status::unauthenticated("access token required"),
        _ => Status::unauthenticated("invalid token"),
    }
}

/// 요청 헤더에서 Bearer 토큰을 추출합니다.
#[allow(clippy::result_large_err)]
pub fn extract_bearer_token(metadata: &MetadataMap) -> Result<String, Status> {
    let auth_header = metadata
        .get("authorization")
        .ok_or_else(|| Status::unauthenticated("Missing authorization header"))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| Status::unauthenticated("Invalid authorization header"))?;

    let token = auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        Status::unauthenticated("Invalid authorization format. Expected 'Bearer <token>'")
    })?;

    if token.is_empty() {
        return Err(Status::unauthenticated("Empty token"));
    }

    Ok(token.to_string())
}
