//! 사진 서버 전용 설정

use shared::config::{parse_var, var_or, EnvLookup};
use shared::tool::error::AppError;
use std::time::Duration;

pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://cloud-api.yandex.net/v1/disk/resources/upload";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://disk.yandex.ru/client/disk";
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct PhotoConfig {
    pub disk_token: String,
    pub upload_endpoint: String,
    pub public_base_url: String,
    pub max_photo_bytes: usize,
    pub upload_timeout: Duration,
    /// `photo_grpc_port`; falls back to the shared `grpc_port`.
    pub grpc_port: Option<u16>,
}

impl std::fmt::Debug for PhotoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoConfig")
            .field("disk_token_length", &self.disk_token.len())
            .field("upload_endpoint", &self.upload_endpoint)
            .field("public_base_url", &self.public_base_url)
            .field("max_photo_bytes", &self.max_photo_bytes)
            .field("upload_timeout", &self.upload_timeout)
            .field("grpc_port", &self.grpc_port)
            .finish()
    }
}

impl PhotoConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        let disk_token = lookup("YANDEX_DISK_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Configuration("YANDEX_DISK_TOKEN 환경변수가 필요합니다.".to_string())
            })?;

        let max_photo_bytes = parse_var(lookup, "max_photo_bytes", DEFAULT_MAX_PHOTO_BYTES)?;
        if max_photo_bytes == 0 {
            return Err(AppError::Configuration(
                "max_photo_bytes must be greater than 0".to_string(),
            ));
        }

        let grpc_port = match lookup("photo_grpc_port") {
            Some(_) => Some(parse_var(lookup, "photo_grpc_port", 0u16)?),
            None => None,
        };

        Ok(Self {
            disk_token,
            upload_endpoint: var_or(lookup, "upload_endpoint", DEFAULT_UPLOAD_ENDPOINT),
            public_base_url: var_or(lookup, "public_base_url", DEFAULT_PUBLIC_BASE_URL),
            max_photo_bytes,
            upload_timeout: Duration::from_secs(parse_var(lookup, "upload_timeout_secs", 30)?),
            grpc_port,
        })
    }
}
