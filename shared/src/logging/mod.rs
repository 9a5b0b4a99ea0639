//! 로깅 초기화
//!
//! 바이너리마다 한 번 호출합니다. 환경에 따라 출력 형식과 기본 레벨이 달라지고
//! `RUST_LOG`가 설정되어 있으면 그것이 우선합니다.
//!
//! | env   | format  | default level |
//! |-------|---------|---------------|
//! | local | pretty  | debug         |
//! | dev   | compact | debug         |
//! | prod  | json    | info          |

use crate::config::AppEnv;
use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

pub fn default_level(env: AppEnv) -> &'static str {
    match env {
        AppEnv::Local | AppEnv::Dev => "debug",
        AppEnv::Prod => "info",
    }
}

fn env_filter(env: AppEnv) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(env)))
}

/// 전역 subscriber를 설치합니다. 두 번째 호출은 에러를 반환합니다.
pub fn init_tracing(env: AppEnv) -> Result<()> {
    let builder = fmt().with_env_filter(env_filter(env)).with_target(true);

    let installed = match env {
        AppEnv::Local => builder.pretty().try_init(),
        AppEnv::Dev => builder.compact().try_init(),
        AppEnv::Prod => builder.json().with_current_span(false).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))
}
