//! Yandex Disk 업로드 클라이언트
//!
//! 바이트를 `PUT {upload_endpoint}?path={filename}`로 보내고 200/201만 성공으로 봅니다.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use shared::tool::error::AppError;
use shared::traits::ObjectStorage;
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub struct YandexDiskStorage {
    client: Client,
    token: String,
    upload_endpoint: String,
    public_base_url: String,
}

impl YandexDiskStorage {
    pub fn new(
        token: String,
        upload_endpoint: String,
        public_base_url: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP 클라이언트 생성 실패: {e}")))?;

        Ok(Self {
            client,
            token,
            upload_endpoint,
            public_base_url,
        })
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), filename)
    }
}

fn is_upload_success(status: StatusCode) -> bool {
    matches!(status, StatusCode::OK | StatusCode::CREATED)
}

#[async_trait]
impl ObjectStorage for YandexDiskStorage {
    async fn put_object(&self, filename: &str, data: Vec<u8>) -> Result<String, AppError> {
        let size = data.len();
        let resp = self
            .client
            .put(&self.upload_endpoint)
            .query(&[("path", filename)])
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("Yandex Disk 업로드 타임아웃: {e}"))
                } else {
                    AppError::ExternalApiError(format!("Yandex Disk 요청 실패: {e}"))
                }
            })?;

        let status = resp.status();
        if !is_upload_success(status) {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, body = %body, "❌ Yandex Disk 업로드 거부");
            return Err(AppError::ExternalApiError(format!(
                "upload rejected ({status}): {body}"
            )));
        }

        info!(size, %status, "☁️ Yandex Disk 업로드 완료");
        Ok(self.public_url(filename))
    }
}
