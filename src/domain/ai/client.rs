use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};

use super::schema::OutputContract;
use crate::error::AppError;

/// 생성 호출 타임아웃. 초과는 전송 실패와 동일하게 폴백으로 처리됩니다.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(12);

/// 고정 디코딩 온도
///
/// 이 도메인은 창의적 변주보다 지시 준수가 중요합니다. 범용/환각 출력의
/// 비용이 새로움의 이득보다 크므로 낮은 무작위성으로 고정합니다.
const GENERATION_TEMPERATURE: f32 = 0.2;

/// 생성 클라이언트 인터페이스
///
/// 외부 생성 서비스 호출을 추상화해 테스트에서 Mock으로 대체합니다.
/// 재시도는 하지 않습니다. 폴백 품질이 수용 가능한 수준이므로 재시도의
/// 지연/비용 대신 폴백률 상승을 받아들입니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// 출력 스키마 제약이 걸린 생성 요청
    async fn complete_structured(
        &self,
        instruction: &str,
        payload: &str,
        contract: &OutputContract,
    ) -> Result<String, AppError>;

    /// 자유 텍스트 생성 요청
    async fn complete_text(&self, instruction: &str, payload: &str) -> Result<String, AppError>;
}

/// Arc로 래핑된 생성 클라이언트 (Clone 지원)
pub type AiClient = Arc<dyn GenerationClient>;

/// OpenAI 에러 분류
///
/// 서비스가 돌려준 API 에러와 거기까지 가지 못한 전송 실패만 구분합니다.
/// 어느 쪽이든 재시도 없이 폴백으로 갑니다.
fn classify_openai_error(error: OpenAIError) -> AppError {
    match error {
        OpenAIError::ApiError(api_error) => AppError::GenerationApi(api_error.message),
        other => AppError::GenerationTransport(other.to_string()),
    }
}

/// OpenAI API 클라이언트 구현체
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    async fn send(
        &self,
        request: async_openai::types::CreateChatCompletionRequest,
    ) -> Result<String, AppError> {
        let response = tokio::time::timeout(GENERATION_TIMEOUT, self.client.chat().create(request))
            .await
            .map_err(|_| AppError::GenerationTimeout)?
            .map_err(classify_openai_error)?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or(AppError::EmptyCompletion)
    }
}

#[async_trait::async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete_structured(
        &self,
        instruction: &str,
        payload: &str,
        contract: &OutputContract,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                build_system_message(instruction)?,
                build_user_message(payload)?,
            ])
            .temperature(GENERATION_TEMPERATURE)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: contract.name.to_string(),
                    description: Some(contract.description.to_string()),
                    schema: Some(contract.schema.clone()),
                    // strict 모드는 모든 속성을 required로 요구해 선택
                    // 필드와 충돌하므로, 계약 강제는 로컬 스키마 검증이
                    // 맡습니다.
                    strict: Some(false),
                },
            })
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.send(request).await
    }

    async fn complete_text(&self, instruction: &str, payload: &str) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                build_system_message(instruction)?,
                build_user_message(payload)?,
            ])
            .temperature(GENERATION_TEMPERATURE)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.send(request).await
    }
}

/// 메시지 빌더 헬퍼 (crate 내부용)
pub(crate) fn build_system_message(
    content: &str,
) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

pub(crate) fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}
