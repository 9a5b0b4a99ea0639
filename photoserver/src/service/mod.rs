pub mod photo_service;

pub use photo_service::PhotoService;
