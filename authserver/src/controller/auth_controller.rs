//! Auth Service gRPC Controller
//!
//! 요청 형식을 검증하고 요청 카운터를 올린 뒤 세션 서비스에 위임합니다.
//! 서비스 에러는 `AppError::to_status`로 변환됩니다.

use crate::auth::{
    auth_service_server::AuthService, IsAdminRequest, IsAdminResponse, LoginRequest,
    LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse,
};
use crate::service::SessionService;
use shared::monitoring::record_request;
use shared::tool::error::{helpers, AppError};
use std::sync::Arc;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::{Request, Response, Status};
use tracing::info;

// bcrypt는 72바이트 이후를 무시합니다.
const MAX_PASSWORD_BYTES: usize = 72;
const MAX_EMAIL_LEN: usize = 254;
const MAX_USERNAME_LEN: usize = 64;
const MAX_TOKEN_LEN: usize = 4096;

pub struct AuthController {
    svc: Arc<SessionService>,
}

impl AuthController {
    pub fn new(svc: Arc<SessionService>) -> Self {
        Self { svc }
    }

    fn validate_register_request(req: &RegisterRequest) -> Result<(), AppError> {
        helpers::validate_string(&req.email, "email", MAX_EMAIL_LEN)?;
        helpers::validate_string(&req.password, "password", MAX_PASSWORD_BYTES)?;
        if req.username.len() > MAX_USERNAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "username too long (max: {MAX_USERNAME_LEN})"
            )));
        }
        Ok(())
    }

    fn validate_login_request(req: &LoginRequest) -> Result<(), AppError> {
        helpers::validate_string(&req.email, "email", MAX_EMAIL_LEN)?;
        helpers::validate_string(&req.password, "password", MAX_PASSWORD_BYTES)?;
        Ok(())
    }
}

#[tonic::async_trait]
impl AuthService for AuthController {
    async fn register(
        &self,
        req: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        record_request("Register");
        let r = req.into_inner();
        Self::validate_register_request(&r).map_err(|e| e.to_status())?;

        let pair = self
            .svc
            .register(r.username, r.email, r.password)
            .await
            .map_err(|e| e.to_status())?;

        let bearer: MetadataValue<Ascii> = format!("Bearer {}", pair.access_token)
            .parse()
            .map_err(|_| {
                AppError::InternalError("access token is not valid metadata".into()).to_status()
            })?;

        let mut response = Response::new(RegisterResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        });
        response.metadata_mut().insert("authorization", bearer);

        info!(user_id = pair.subject, "Register 응답");
        Ok(response)
    }

    async fn login(&self, req: Request<LoginRequest>) -> Result<Response<LoginResponse>, Status> {
        record_request("Login");
        let r = req.into_inner();
        Self::validate_login_request(&r).map_err(|e| e.to_status())?;

        let pair = self
            .svc
            .login(r.email, r.password)
            .await
            .map_err(|e| e.to_status())?;

        Ok(Response::new(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }))
    }

    async fn is_admin(
        &self,
        req: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        record_request("IsAdmin");
        let r = req.into_inner();
        if r.user_id == 0 {
            return Err(AppError::MissingField("user_id".to_string()).to_status());
        }

        let is_admin = self.svc.is_admin(r.user_id).await.map_err(|e| e.to_status())?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }

    async fn refresh(
        &self,
        req: Request<RefreshRequest>,
    ) -> Result<Response<RefreshResponse>, Status> {
        record_request("Refresh");
        let r = req.into_inner();
        helpers::validate_string(&r.refresh_token, "refresh_token", MAX_TOKEN_LEN)
            .map_err(|e| e.to_status())?;

        let pair = self
            .svc
            .refresh(r.refresh_token)
            .await
            .map_err(|e| e.to_status())?;

        Ok(Response::new(RefreshResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }))
    }
}
