use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PhotoRecord {
    pub id: i64,
    pub user_id: i64,
    pub image_url: String,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub user_id: i64,
    pub image_url: String,
}
