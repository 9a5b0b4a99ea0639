//! 사용자 데이터베이스 서비스
//!
//! `users` 테이블에 대한 저장/조회를 담당합니다.

use crate::config::db::DbConfig;
use crate::model::{NewUser, UserRecord};
use crate::tool::error::AppError;
use crate::traits::{UserProvider, UserSaver};
use async_trait::async_trait;
use tracing::{debug, info};

const USER_COLUMNS: &str = "id, username, email, password_hash, is_admin, created_at";

#[derive(Clone)]
pub struct UserDbService {
    db: DbConfig,
}

impl UserDbService {
    pub fn new(db: DbConfig) -> Self {
        Self { db }
    }
}

/// Unique-constraint rejections become `UserAlreadyExists`; everything else keeps the sqlx mapping.
fn map_insert_error(err: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::UserAlreadyExists(email.to_string());
        }
    }
    AppError::from(err)
}

#[async_trait]
impl UserSaver for UserDbService {
    async fn save_user(&self, user: NewUser) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(self.db.get_pool())
        .await
        .map_err(|e| map_insert_error(e, &user.email))?;

        info!(user_id = id, is_admin = user.is_admin, "👤 사용자 저장 완료");
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for UserDbService {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(self.db.get_pool())
            .await?;

        debug!(found = user.is_some(), "사용자 이메일 조회");
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_optional(self.db.get_pool())
            .await?;

        Ok(user)
    }
}
