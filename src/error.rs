use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 에러 응답 형식
///
/// 모바일 클라이언트는 `error` 필드 하나만 읽습니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// 에러 메시지
    #[schema(example = "상황 설명은 필수입니다.")]
    pub error: String,
}

/// 애플리케이션 전역 에러 타입
///
/// 입력 에러만 호출자에게 그대로 노출되고, 생성 파이프라인의 실패는 전부
/// 서비스 계층에서 폴백으로 흡수됩니다. 폴백 분기가 눈에 보이는 match가
/// 되도록 실패 원인을 변형별로 구분합니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("허용되지 않은 메서드입니다. POST를 사용해주세요.")]
    MethodNotAllowed,

    /// 생성 서비스 자격 증명(API 키) 미설정
    #[error("생성 서비스 자격 증명이 설정되지 않았습니다.")]
    MissingCredential,

    /// 생성 서비스 호출 제한 시간 초과
    #[error("생성 서비스 호출이 제한 시간을 초과했습니다.")]
    GenerationTimeout,

    /// 생성 서비스까지 도달하지 못한 전송 계층 실패
    #[error("생성 서비스 호출에 실패했습니다: {0}")]
    GenerationTransport(String),

    /// 생성 서비스가 반환한 API 에러
    #[error("생성 서비스 API 에러: {0}")]
    GenerationApi(String),

    /// 생성 서비스가 빈 본문을 반환
    #[error("생성 결과가 비어 있습니다.")]
    EmptyCompletion,

    /// 생성 결과를 JSON으로 해석할 수 없음
    #[error("생성 결과를 해석할 수 없습니다: {0}")]
    MalformedCompletion(String),

    /// 생성 결과가 출력 계약(스키마 또는 형식 규칙)을 위반
    #[error("생성 결과가 출력 계약을 위반했습니다: {0}")]
    ContractViolation(String),

    #[error("내부 에러: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP 상태 코드 반환
    ///
    /// 생성 계열 변형은 실제로는 응답 전에 폴백으로 흡수되므로 여기 매핑은
    /// 도달하지 않는 방어선입니다.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::JsonParseFailed(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 폴백으로 흡수되어야 하는 실패인지 여부
    pub fn is_generation_failure(&self) -> bool {
        !matches!(
            self,
            AppError::JsonParseFailed(_)
                | AppError::ValidationError(_)
                | AppError::MethodNotAllowed
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// axum JSON 본문 거부를 400으로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

/// validator 검증 실패를 400으로 변환
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join(" ");

        if message.is_empty() {
            AppError::ValidationError("잘못된 요청입니다.".to_string())
        } else {
            AppError::ValidationError(message)
        }
    }
}
