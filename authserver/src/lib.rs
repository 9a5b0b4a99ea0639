//! Auth gRPC Server Library
//!
//! 회원가입, 로그인, 관리자 확인, 토큰 갱신을 제공하는 인증 서버입니다.
//!
//! - `controller`: gRPC 요청 검증과 `Status` 변환
//! - `service`: 세션 서비스 (비밀번호 해싱, 토큰 발급, 저장소 호출)
//! - `server`: 설정 로드부터 종료까지의 서버 구성

/// Auth Service Protocol Buffer 정의
pub mod auth {
    tonic::include_proto!("auth");
}

pub mod controller;
pub mod server;
pub mod service;

pub use controller::AuthController;
pub use service::SessionService;
