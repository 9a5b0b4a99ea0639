pub mod photo_model;
pub mod user_model;

pub use photo_model::*;
pub use user_model::*;
