pub mod core;
pub mod token_redis_service;

pub use token_redis_service::TokenRedisService;
