//! Prometheus 메트릭 정의

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    // gRPC 메트릭
    pub static ref GRPC_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "grpc_requests_total",
        "Total gRPC requests by method",
        &["method"]
    )
    .expect("Failed to register gRPC requests counter");
}

/// RPC 진입 시 호출합니다.
pub fn record_request(method: &str) {
    GRPC_REQUESTS_TOTAL.with_label_values(&[method]).inc();
}
