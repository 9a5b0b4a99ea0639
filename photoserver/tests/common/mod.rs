//! 테스트용 인메모리 사진 저장소와 가짜 원격 저장소
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use photoserver::PhotoService;
use shared::model::{NewPhoto, PhotoRecord};
use shared::tool::error::AppError;
use shared::traits::{ObjectStorage, PhotoStore};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct InMemoryPhotoStore {
    pub photos: Mutex<Vec<PhotoRecord>>,
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn save_photo(&self, photo: NewPhoto) -> Result<i64, AppError> {
        let mut photos = self.photos.lock().unwrap();
        let id = photos.len() as i64 + 1;
        let now = Utc::now();
        photos.push(PhotoRecord {
            id,
            user_id: photo.user_id,
            image_url: photo.image_url,
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get_photo(&self, photo_id: i64) -> Result<Option<PhotoRecord>, AppError> {
        Ok(self
            .photos
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == photo_id)
            .cloned())
    }

    async fn get_user_photos(&self, user_id: i64) -> Result<Vec<PhotoRecord>, AppError> {
        Ok(self
            .photos
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Remembers uploads and returns `https://cdn.test/{filename}`.
#[derive(Default)]
pub struct FakeObjectStorage {
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub reject: bool,
}

impl FakeObjectStorage {
    pub fn rejecting() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    async fn put_object(&self, filename: &str, data: Vec<u8>) -> Result<String, AppError> {
        if self.reject {
            return Err(AppError::ExternalApiError("upload rejected (507)".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((filename.to_string(), data));
        Ok(format!("https://cdn.test/{filename}"))
    }
}

pub struct Harness {
    pub store: Arc<InMemoryPhotoStore>,
    pub storage: Arc<FakeObjectStorage>,
    pub svc: Arc<PhotoService>,
}

pub const TEST_MAX_PHOTO_BYTES: usize = 1024;

pub fn harness() -> Harness {
    harness_with(FakeObjectStorage::default())
}

pub fn harness_with(storage: FakeObjectStorage) -> Harness {
    let store = Arc::new(InMemoryPhotoStore::default());
    let storage = Arc::new(storage);
    let svc = Arc::new(PhotoService::new(
        store.clone(),
        storage.clone(),
        TEST_MAX_PHOTO_BYTES,
    ));
    Harness {
        store,
        storage,
        svc,
    }
}
