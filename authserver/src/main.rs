use anyhow::Result;
use authserver::server::start_server;
use shared::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // .env 로드 → 로깅 초기화 → 설정 로드 (잘못된 값이면 시작 실패)
    let config = AppConfig::bootstrap()?;

    info!(env = ?config.env, "🚀 Auth 서버 시작");
    info!("📋 보안 설정: {:?}", config.security);

    start_server(config).await
}
