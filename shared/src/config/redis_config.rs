use crate::config::app_config::RedisSettings;
use redis::{aio::ConnectionManager, Client, RedisError};
use tracing::info;

pub type RedisConnection = ConnectionManager;

#[derive(Clone)]
pub struct RedisConfig {
    pub conn: RedisConnection,
    pub host: String,
    pub port: u16,
}

impl RedisConfig {
    pub async fn connect(settings: &RedisSettings) -> Result<Self, RedisError> {
        let client = Client::open(settings.url())?;
        let manager = ConnectionManager::new(client).await?;
        info!("Redis 연결 완료: {}:{}", settings.host, settings.port);
        Ok(Self {
            conn: manager,
            host: settings.host.clone(),
            port: settings.port,
        })
    }

    pub fn get_connection(&self) -> RedisConnection {
        self.conn.clone()
    }
}
