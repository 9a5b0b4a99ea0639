//! Photo gRPC Server Library
//!
//! 사진 바이트를 원격 저장소(Yandex Disk)에 올리고 메타데이터를 PostgreSQL에 기록합니다.
//! 모든 RPC는 auth 서버가 발급한 access 토큰이 필요합니다.

/// Photo Service Protocol Buffer 정의
pub mod photo {
    tonic::include_proto!("photo");
}

pub mod config;
pub mod controller;
pub mod server;
pub mod service;
pub mod storage;

pub use controller::PhotoController;
pub use service::PhotoService;
