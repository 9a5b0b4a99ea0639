//! 사진 서비스 - 업로드, 단건 조회, 사용자별 목록
//!
//! 업로드는 원격 저장소에 먼저 올린 뒤 돌려받은 URL을 DB에 기록합니다.
//! DB 저장이 실패하면 원격 파일은 남습니다.

use shared::model::{NewPhoto, PhotoRecord};
use shared::tool::error::{helpers, AppError};
use shared::traits::{ObjectStorage, PhotoStore};
use std::sync::Arc;
use tracing::info;

const MAX_FILENAME_LEN: usize = 255;

pub struct PhotoService {
    store: Arc<dyn PhotoStore>,
    storage: Arc<dyn ObjectStorage>,
    max_photo_bytes: usize,
}

impl PhotoService {
    pub fn new(
        store: Arc<dyn PhotoStore>,
        storage: Arc<dyn ObjectStorage>,
        max_photo_bytes: usize,
    ) -> Self {
        Self {
            store,
            storage,
            max_photo_bytes,
        }
    }

    pub fn max_photo_bytes(&self) -> usize {
        self.max_photo_bytes
    }

    /// 업로드 후 (photo_id, image_url)을 반환합니다.
    pub async fn upload_photo(
        &self,
        user_id: i64,
        photo_data: Vec<u8>,
        filename: String,
    ) -> Result<(i64, String), AppError> {
        validate_filename(&filename)?;
        if photo_data.is_empty() {
            return Err(AppError::MissingField("photo_data".to_string()));
        }
        if photo_data.len() > self.max_photo_bytes {
            return Err(AppError::InvalidInput(format!(
                "photo too large: {} bytes (max: {})",
                photo_data.len(),
                self.max_photo_bytes
            )));
        }

        let image_url = self.storage.put_object(&filename, photo_data).await?;
        let photo_id = self
            .store
            .save_photo(NewPhoto {
                user_id,
                image_url: image_url.clone(),
            })
            .await?;

        info!(photo_id, user_id, "📷 사진 업로드 완료");
        Ok((photo_id, image_url))
    }

    pub async fn get_photo(&self, photo_id: i64) -> Result<PhotoRecord, AppError> {
        if photo_id == 0 {
            return Err(AppError::MissingField("photo_id".to_string()));
        }

        self.store
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("photo {photo_id}")))
    }

    pub async fn get_user_photos(&self, user_id: i64) -> Result<Vec<PhotoRecord>, AppError> {
        if user_id == 0 {
            return Err(AppError::MissingField("user_id".to_string()));
        }
        self.store.get_user_photos(user_id).await
    }
}

/// 원격 경로로 그대로 쓰이므로 디렉터리 구분자와 상위 경로를 막습니다.
fn validate_filename(filename: &str) -> Result<(), AppError> {
    helpers::validate_string(filename, "filename", MAX_FILENAME_LEN)?;
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::InvalidInput(format!("invalid filename: {filename}")));
    }
    Ok(())
}
