//! Capability traits for dependency injection
//!
//! Services receive these as `Arc<dyn Trait>` so tests can swap in in-memory
//! implementations without a database or cache.

use crate::model::{NewPhoto, NewUser, PhotoRecord, UserRecord};
use crate::security::TokenPair;
use crate::tool::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

// ============================================================================
// USER STORE
// ============================================================================

#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Persists a user and returns its id.
    ///
    /// # Errors
    /// `AppError::UserAlreadyExists` when the store rejects the email as a duplicate.
    async fn save_user(&self, user: NewUser) -> Result<i64, AppError>;
}

#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, AppError>;
}

// ============================================================================
// TOKEN STORE
// ============================================================================

/// Cache of the most recently issued pair per user.
#[async_trait]
pub trait TokenSaver: Send + Sync {
    async fn save_token_pair(
        &self,
        user_id: i64,
        pair: &TokenPair,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<(), AppError>;
}

// ============================================================================
// PHOTO STORE
// ============================================================================

#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn save_photo(&self, photo: NewPhoto) -> Result<i64, AppError>;
    async fn get_photo(&self, photo_id: i64) -> Result<Option<PhotoRecord>, AppError>;
    async fn get_user_photos(&self, user_id: i64) -> Result<Vec<PhotoRecord>, AppError>;
}

/// Remote object storage that accepts raw bytes and hands back a public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(&self, filename: &str, data: Vec<u8>) -> Result<String, AppError>;
}
