//! 데이터베이스 서비스 모듈
//!
//! PostgreSQL 위에서 저장소 trait들을 구현합니다.

pub mod photo_db_service;
pub mod user_db_service;

pub use photo_db_service::PhotoDbService;
pub use user_db_service::UserDbService;
