pub mod app_config;
pub mod db;
pub mod redis_config;

pub use app_config::*;
