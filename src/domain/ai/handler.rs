use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::{AppError, ErrorBody};
use crate::AppState;

use super::dto::{AdviceRequest, AdviceResponse, CompatibilityRequest, CompatibilityResponse};

/// 연애 조언 생성
///
/// 필수 필드가 빠진 요청만 400으로 거절하고, 생성 실패는 모두 폴백 본문과
/// 함께 200으로 응답합니다.
#[utoipa::path(
    post,
    path = "/advice",
    tag = "AI",
    request_body = AdviceRequest,
    responses(
        (status = 200, description = "조언 생성 성공 (폴백 포함)", body = AdviceResponse),
        (status = 400, description = "필수 필드 누락", body = ErrorBody),
        (status = 405, description = "허용되지 않은 메서드", body = ErrorBody)
    )
)]
pub async fn generate_advice(
    State(state): State<AppState>,
    request: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, AppError> {
    // JSON 파싱 에러 처리
    let Json(request) = request.map_err(AppError::from)?;

    tracing::info!(
        situation_length = request.situation.chars().count(),
        "Advice request received"
    );

    // 입력 검증 — 여기서의 실패만 호출자에게 에러로 노출됩니다.
    request.validate()?;

    // 생성 호출. 이 지점 이후에는 실패가 없습니다.
    let response = state.ai_service.generate_advice(&request).await;

    Ok(Json(response))
}

/// 궁합 생성
#[utoipa::path(
    post,
    path = "/compatibility",
    tag = "AI",
    request_body = CompatibilityRequest,
    responses(
        (status = 200, description = "궁합 생성 성공 (폴백 포함)", body = CompatibilityResponse),
        (status = 400, description = "필수 필드 누락", body = ErrorBody),
        (status = 405, description = "허용되지 않은 메서드", body = ErrorBody)
    )
)]
pub async fn generate_compatibility(
    State(state): State<AppState>,
    request: Result<Json<CompatibilityRequest>, JsonRejection>,
) -> Result<Json<CompatibilityResponse>, AppError> {
    let Json(request) = request.map_err(AppError::from)?;

    tracing::info!("Compatibility request received");

    request.validate()?;

    let response = state.ai_service.generate_compatibility(&request).await;

    Ok(Json(response))
}

/// CORS preflight 응답
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// POST/OPTIONS 이외의 메서드에 대한 405 응답
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
