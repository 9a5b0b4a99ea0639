pub mod redis_get_key;
