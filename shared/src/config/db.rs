//! PostgreSQL Database Configuration
//!
//! 데이터베이스 연결 풀을 생성하고 관리합니다.

use crate::config::app_config::DatabaseSettings;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error as SqlxError, PgPool};
use std::time::Duration;
use tracing::{error, info};

/// PostgreSQL 연결 풀 타입 별칭
pub type DbConnection = PgPool;

/// PostgreSQL 데이터베이스 설정 구조체
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub pool: DbConnection,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DbConfig {
    /// 새로운 데이터베이스 연결 풀을 생성합니다.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, SqlxError> {
        info!(
            "데이터베이스 연결 시도: {}:{}@{}/{}",
            settings.user, "***", settings.host, settings.database
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&settings.url())
            .await?;

        info!("PostgreSQL 연결 풀 생성 완료: {}:{}", settings.host, settings.port);

        Ok(Self {
            pool,
            host: settings.host.clone(),
            port: settings.port,
            database: settings.database.clone(),
        })
    }

    /// 연결 풀에서 연결을 가져옵니다.
    pub fn get_pool(&self) -> &DbConnection {
        &self.pool
    }

    /// 데이터베이스 연결 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool, SqlxError> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                info!("데이터베이스 연결 상태 양호");
                Ok(true)
            }
            Err(e) => {
                error!("데이터베이스 연결 실패: {}", e);
                Err(e)
            }
        }
    }

    /// 데이터베이스 연결을 닫습니다.
    pub async fn close(&self) {
        info!("데이터베이스 연결 풀을 닫는 중...");
        self.pool.close().await;
        info!("데이터베이스 연결 풀 종료 완료");
    }
}
