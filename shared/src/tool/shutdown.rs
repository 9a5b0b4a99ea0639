//! 종료 신호 대기 (Ctrl+C / SIGTERM)

use tokio::signal;
use tracing::{error, info};

/// 종료 신호가 올 때까지 대기합니다. tonic `serve_with_shutdown`에 넘겨 사용합니다.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Ctrl+C 핸들러 설치 실패: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("SIGTERM 핸들러 설치 실패: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 종료 신호 수신 - 서버를 정리합니다");
}
