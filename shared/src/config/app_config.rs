//! Process configuration: `.env` file layered under the real environment.
//!
//! Every value has an environment key; the `.env` file only fills keys the
//! environment does not already define. Invalid values fail startup.

use crate::logging::init_tracing;
use crate::security::SecurityConfig;
use crate::tool::error::AppError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Key lookup used by the config loaders. Production passes `std::env::var`.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// `.env` 로드 결과. 로깅 초기화 전에 로드하므로 결과는 나중에 `log()`로 남깁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(&'static str),
    Failed(&'static str, String),
    Missing,
}

impl EnvFile {
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => info!("환경 파일 로드: {}", path),
            EnvFile::Failed(path, e) => warn!("환경 파일 로드 실패 {}: {}", path, e),
            EnvFile::Missing => warn!(".env 파일을 찾을 수 없어서 환경 변수를 직접 사용합니다."),
        }
    }
}

/// .env 파일 로드 - 현재 디렉토리, 상위 디렉토리 순서로 찾기
pub fn load_env_file() -> EnvFile {
    for path in [".env", "../.env"] {
        if Path::new(path).exists() {
            return match dotenv::from_filename(path) {
                Ok(_) => EnvFile::Loaded(path),
                Err(e) => EnvFile::Failed(path, e.to_string()),
            };
        }
    }
    EnvFile::Missing
}

pub fn var_or(lookup: EnvLookup<'_>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        warn!("{} 환경변수가 없어서 {}를 사용합니다.", key, default);
        default.to_string()
    })
}

pub fn parse_var<T>(lookup: EnvLookup<'_>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

/// Deployment environment; selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Dev,
    Prod,
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(AppEnv::Local),
            "dev" => Ok(AppEnv::Dev),
            "prod" => Ok(AppEnv::Prod),
            other => Err(format!("unknown environment '{other}' (local|dev|prod)")),
        }
    }
}

impl AppEnv {
    /// `app_env` 키, 기본값 local
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        parse_var(lookup, "app_env", AppEnv::Local)
    }
}

#[derive(Debug, Clone)]
pub struct GrpcSettings {
    pub host: String,
    pub port: u16,
}

impl GrpcSettings {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        Ok(Self {
            host: var_or(lookup, "grpc_host", "0.0.0.0"),
            port: parse_var(lookup, "grpc_port", 50051)?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                AppError::Configuration(format!(
                    "잘못된 주소 형식 '{}:{}': {e}",
                    self.host, self.port
                ))
            })
    }
}

#[derive(Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        let password = lookup("db_password").ok_or_else(|| {
            AppError::Configuration("db_password 환경변수가 필요합니다.".to_string())
        })?;

        Ok(Self {
            host: var_or(lookup, "db_host", "localhost"),
            port: parse_var(lookup, "db_port", 5432)?,
            user: var_or(lookup, "db_id", "postgres"),
            password,
            database: var_or(lookup, "db_name", "social"),
            max_connections: parse_var(lookup, "db_max_connections", 10)?,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
}

impl RedisSettings {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        Ok(Self {
            host: var_or(lookup, "redis_host", "localhost"),
            port: parse_var(lookup, "redis_port", 6379)?,
        })
    }

    pub fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

/// Admin account created at startup when its email is not registered yet.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminSeed {
    /// `None` unless both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Option<Self> {
        let email = lookup("ADMIN_EMAIL").filter(|v| !v.is_empty())?;
        let password = lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty())?;
        Some(Self {
            username: lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            email,
            password,
        })
    }
}

/// Settings common to every service binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub grpc: GrpcSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub security: SecurityConfig,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    /// 바이너리 시작 순서: `.env` 로드, 로깅 초기화, 설정 로드.
    ///
    /// Tracing is installed before any section is read, so the config loaders'
    /// own log lines reach the subscriber.
    pub fn bootstrap() -> anyhow::Result<Self> {
        let env_file = load_env_file();
        let env = AppEnv::from_lookup(&|key| std::env::var(key).ok())?;
        init_tracing(env)?;
        env_file.log();

        Ok(Self::from_env()?)
    }

    /// Reads the process environment. `.env` must already be loaded (see [`AppConfig::bootstrap`]).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        let env = AppEnv::from_lookup(lookup)?;

        Ok(Self {
            env,
            grpc: GrpcSettings::from_lookup(lookup)?,
            database: DatabaseSettings::from_lookup(lookup)?,
            redis: RedisSettings::from_lookup(lookup)?,
            security: SecurityConfig::from_lookup(lookup)?,
            admin: AdminSeed::from_lookup(lookup),
        })
    }
}
