use anyhow::Result;
use photoserver::config::PhotoConfig;
use photoserver::server::start_server;
use shared::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::bootstrap()?;
    let photo = PhotoConfig::from_env()?;

    info!(env = ?config.env, "🚀 Photo 서버 시작");
    info!("📋 사진 설정: {:?}", photo);

    start_server(config, photo).await
}
