pub mod db;
pub mod redis;

pub use self::db::*;
pub use self::redis::*;
