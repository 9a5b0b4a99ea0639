pub mod photo_controller;

pub use photo_controller::PhotoController;
