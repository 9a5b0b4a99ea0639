//! gRPC Server Configuration
//!
//! 저장소 연결, 세션 서비스 조립, 관리자 시드, 서버 실행까지 담당합니다.
//! Ctrl+C 또는 SIGTERM을 받으면 진행 중인 요청을 마친 뒤 종료합니다.

use crate::auth::auth_service_server::AuthServiceServer;
use crate::controller::AuthController;
use crate::service::SessionService;
use shared::config::db::DbConfig;
use shared::config::redis_config::RedisConfig;
use shared::config::AppConfig;
use shared::security::{PasswordHasher, TokenCodec};
use shared::service::{TokenRedisService, UserDbService};
use shared::tool::shutdown_signal;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::info;

/// 인증 gRPC 서버를 시작합니다.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.grpc.addr()?;

    // 서명 키가 없으면 여기서 시작 실패
    let codec = Arc::new(TokenCodec::new(&config.security)?);
    let hasher = PasswordHasher::new(config.security.bcrypt_rounds)?;

    let db = DbConfig::connect(&config.database).await?;
    db.health_check().await?;
    let redis = RedisConfig::connect(&config.redis).await?;

    let users = Arc::new(UserDbService::new(db.clone()));
    let tokens = Arc::new(TokenRedisService::new(redis));
    let svc = Arc::new(SessionService::new(
        hasher,
        codec,
        users.clone(),
        users,
        tokens,
    )?);

    if let Some(seed) = &config.admin {
        svc.ensure_admin(seed).await?;
    }

    info!("▶ Auth gRPC 서버 실행: {}", addr);

    Server::builder()
        .add_service(AuthServiceServer::new(AuthController::new(svc)))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    db.close().await;
    info!("✅ Auth gRPC 서버 종료 완료");
    Ok(())
}
