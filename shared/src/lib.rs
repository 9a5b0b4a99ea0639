//! Shared building blocks for the auth and photo gRPC services.
//!
//! - `security`: password hashing, signed token issuance/parsing, bearer-token interceptor
//! - `config`: `.env` + environment configuration, Postgres pool, Redis connection
//! - `service`: Postgres and Redis implementations of the storage traits
//! - `tool::error`: the `AppError` taxonomy and its gRPC `Status` mapping

pub mod config;
pub mod logging;
pub mod model;
pub mod monitoring;
pub mod security;
pub mod service;
pub mod tool;
pub mod traits;

pub use tool::error::AppError;
