//! yeondam-server 라이브러리 크레이트
//!
//! 라우터가 여기서 조립되므로 통합 테스트가 Mock 생성 클라이언트로 전체
//! HTTP 스택을 띄울 수 있습니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod shutdown;

pub use domain::ai::client::{AiClient, GenerationClient, OpenAiClient};
pub use domain::ai::policy::AdvicePolicy;
pub use domain::ai::service::AiService;

/// 요청 전체에 대한 외곽 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 애플리케이션 공유 상태
///
/// 요청 간 가변 상태는 없습니다. 서비스는 불변 구성만 들고 있습니다.
#[derive(Clone)]
pub struct AppState {
    pub ai_service: Arc<AiService>,
}

/// 라우터 생성
///
/// 두 생성 엔드포인트는 POST와 OPTIONS(preflight)만 허용하고 나머지
/// 메서드는 405 `{error}`로 응답합니다.
pub fn create_router(state: AppState) -> Router {
    use domain::ai::handler;

    Router::new()
        .route(
            "/advice",
            post(handler::generate_advice)
                .options(handler::preflight)
                .fallback(handler::method_not_allowed),
        )
        .route(
            "/compatibility",
            post(handler::generate_compatibility)
                .options(handler::preflight)
                .fallback(handler::method_not_allowed),
        )
        .route("/health", get(domain::health::handler::check_health))
        .layer(axum::middleware::from_fn(global::middleware::request_tracing))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

/// 테스트용: Mock 생성 클라이언트로 라우터 구성
pub fn create_test_router_with_mock<C>(client: C) -> Router
where
    C: GenerationClient + 'static,
{
    let state = AppState {
        ai_service: Arc::new(AiService::new(
            Some(Arc::new(client)),
            AdvicePolicy::default(),
        )),
    };
    create_router(state)
}

/// 테스트용: 자격 증명이 없는 상태(모든 생성 요청이 폴백)로 라우터 구성
pub fn create_test_router_unconfigured() -> Router {
    let state = AppState {
        ai_service: Arc::new(AiService::new(None, AdvicePolicy::default())),
    };
    create_router(state)
}
