//! Photo Service gRPC Controller
//!
//! 인터셉터가 넣어 둔 [`AuthenticatedUser`]를 업로드 소유자로 사용합니다.

use crate::photo::{
    photo_service_server::PhotoService as PhotoServiceRpc, GetPhotoRequest, GetPhotoResponse,
    GetUserPhotosRequest, GetUserPhotosResponse, Photo, UploadPhotoRequest, UploadPhotoResponse,
};
use crate::service::PhotoService;
use shared::model::PhotoRecord;
use shared::monitoring::record_request;
use shared::security::AuthenticatedUser;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::debug;

pub struct PhotoController {
    svc: Arc<PhotoService>,
}

impl PhotoController {
    pub fn new(svc: Arc<PhotoService>) -> Self {
        Self { svc }
    }
}

impl From<PhotoRecord> for Photo {
    fn from(p: PhotoRecord) -> Self {
        Photo {
            id: p.id,
            user_id: p.user_id,
            image_url: p.image_url,
            likes_count: p.likes_count,
            comments_count: p.comments_count,
            created_at: p.created_at.timestamp(),
            updated_at: p.updated_at.timestamp(),
        }
    }
}

#[tonic::async_trait]
impl PhotoServiceRpc for PhotoController {
    async fn upload_photo(
        &self,
        req: Request<UploadPhotoRequest>,
    ) -> Result<Response<UploadPhotoResponse>, Status> {
        record_request("UploadPhoto");
        let AuthenticatedUser(user_id) = AuthenticatedUser::from_request(&req)?;
        let r = req.into_inner();

        let (photo_id, image_url) = self
            .svc
            .upload_photo(user_id, r.photo_data, r.filename)
            .await
            .map_err(|e| e.to_status())?;

        Ok(Response::new(UploadPhotoResponse {
            photo_id,
            image_url,
        }))
    }

    async fn get_photo(
        &self,
        req: Request<GetPhotoRequest>,
    ) -> Result<Response<GetPhotoResponse>, Status> {
        record_request("GetPhoto");
        AuthenticatedUser::from_request(&req)?;
        let r = req.into_inner();

        let photo = self
            .svc
            .get_photo(r.photo_id)
            .await
            .map_err(|e| e.to_status())?;

        Ok(Response::new(GetPhotoResponse {
            photo: Some(photo.into()),
        }))
    }

    async fn get_user_photos(
        &self,
        req: Request<GetUserPhotosRequest>,
    ) -> Result<Response<GetUserPhotosResponse>, Status> {
        record_request("GetUserPhotos");
        let AuthenticatedUser(caller) = AuthenticatedUser::from_request(&req)?;
        let r = req.into_inner();
        let user_id = if r.user_id == 0 { caller } else { r.user_id };

        let photos = self
            .svc
            .get_user_photos(user_id)
            .await
            .map_err(|e| e.to_status())?;
        debug!(user_id, count = photos.len(), "GetUserPhotos 응답");

        Ok(Response::new(GetUserPhotosResponse {
            photos: photos.into_iter().map(Photo::from).collect(),
        }))
    }
}
