//! 사진 데이터베이스 서비스

use crate::config::db::DbConfig;
use crate::model::{NewPhoto, PhotoRecord};
use crate::tool::error::AppError;
use crate::traits::PhotoStore;
use async_trait::async_trait;
use tracing::{debug, info};

const PHOTO_COLUMNS: &str =
    "id, user_id, image_url, likes_count, comments_count, created_at, updated_at";

#[derive(Clone)]
pub struct PhotoDbService {
    db: DbConfig,
}

impl PhotoDbService {
    pub fn new(db: DbConfig) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotoStore for PhotoDbService {
    async fn save_photo(&self, photo: NewPhoto) -> Result<i64, AppError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO photos (user_id, image_url) VALUES ($1, $2) RETURNING id")
                .bind(photo.user_id)
                .bind(&photo.image_url)
                .fetch_one(self.db.get_pool())
                .await?;

        info!(photo_id = id, user_id = photo.user_id, "📷 사진 저장 완료");
        Ok(id)
    }

    async fn get_photo(&self, photo_id: i64) -> Result<Option<PhotoRecord>, AppError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        let photo = sqlx::query_as::<_, PhotoRecord>(&sql)
            .bind(photo_id)
            .fetch_optional(self.db.get_pool())
            .await?;

        Ok(photo)
    }

    /// 최신 사진이 먼저 오도록 정렬합니다.
    async fn get_user_photos(&self, user_id: i64) -> Result<Vec<PhotoRecord>, AppError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let photos = sqlx::query_as::<_, PhotoRecord>(&sql)
            .bind(user_id)
            .fetch_all(self.db.get_pool())
            .await?;

        debug!(user_id, count = photos.len(), "사용자 사진 목록 조회");
        Ok(photos)
    }
}
