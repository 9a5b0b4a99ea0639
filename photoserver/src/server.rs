//! gRPC Server Configuration
//!
//! 사진 서비스를 access 토큰 인터셉터 뒤에 등록하고 실행합니다.

use crate::config::PhotoConfig;
use crate::controller::PhotoController;
use crate::photo::photo_service_server::PhotoServiceServer;
use crate::service::PhotoService;
use crate::storage::YandexDiskStorage;
use shared::config::db::DbConfig;
use shared::config::AppConfig;
use shared::security::{AccessTokenInterceptor, TokenCodec};
use shared::service::PhotoDbService;
use shared::tool::shutdown_signal;
use std::sync::Arc;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Server;
use tracing::info;

// protobuf 필드/프레이밍 여유분
const MESSAGE_OVERHEAD_BYTES: usize = 64 * 1024;

pub async fn start_server(config: AppConfig, photo: PhotoConfig) -> anyhow::Result<()> {
    let mut grpc = config.grpc.clone();
    if let Some(port) = photo.grpc_port {
        grpc.port = port;
    }
    let addr = grpc.addr()?;

    let codec = Arc::new(TokenCodec::new(&config.security)?);

    let db = DbConfig::connect(&config.database).await?;
    db.health_check().await?;

    let storage = Arc::new(YandexDiskStorage::new(
        photo.disk_token.clone(),
        photo.upload_endpoint.clone(),
        photo.public_base_url.clone(),
        photo.upload_timeout,
    )?);
    let store = Arc::new(PhotoDbService::new(db.clone()));
    let svc = Arc::new(PhotoService::new(store, storage, photo.max_photo_bytes));

    let server = PhotoServiceServer::new(PhotoController::new(svc))
        .max_decoding_message_size(photo.max_photo_bytes + MESSAGE_OVERHEAD_BYTES);

    info!("▶ Photo gRPC 서버 실행: {}", addr);

    Server::builder()
        .add_service(InterceptedService::new(
            server,
            AccessTokenInterceptor::new(codec),
        ))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    db.close().await;
    info!("✅ Photo gRPC 서버 종료 완료");
    Ok(())
}
