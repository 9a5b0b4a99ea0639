//! 모니터링 모듈 - Prometheus 메트릭
//!
//! 카운터는 기본 레지스트리에 등록됩니다. 노출(HTTP)은 이 크레이트에서 하지 않습니다.

pub mod metrics;

pub use metrics::{record_request, GRPC_REQUESTS_TOTAL};
