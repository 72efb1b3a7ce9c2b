//! 생성 파이프라인 오케스트레이션
//!
//! 입력 검증 이후의 모든 실패는 여기서 잡혀 결정적 폴백으로 바뀝니다.
//! 실패는 클라이언트에 보이지 않으므로 반드시 서버 로그와 지표에
//! 남깁니다.

use rand::thread_rng;

use super::client::AiClient;
use super::dto::{AdviceRequest, AdviceResponse, CompatibilityRequest, CompatibilityResponse};
use super::fallback::{fallback_advice, pick_compatibility_fallback};
use super::grounding::ensure_grounded;
use super::policy::AdvicePolicy;
use super::prompt;
use super::render::render_advice;
use super::schema::{advice_contract, parse_advice_document, parse_compatibility_result};
use super::tone::score_to_tone;
use crate::error::AppError;

/// AI 생성 서비스
///
/// 요청 간 공유 상태가 없습니다. 클라이언트가 없으면(자격 증명 미설정)
/// 모든 요청이 폴백으로 응답됩니다.
pub struct AiService {
    client: Option<AiClient>,
    policy: AdvicePolicy,
}

impl AiService {
    pub fn new(client: Option<AiClient>, policy: AdvicePolicy) -> Self {
        Self { client, policy }
    }

    /// 생성 자격 증명이 설정되어 있는지
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&AiClient, AppError> {
        self.client.as_ref().ok_or(AppError::MissingCredential)
    }

    /// 조언 생성. 항상 성공 응답을 반환합니다.
    pub async fn generate_advice(&self, request: &AdviceRequest) -> AdviceResponse {
        match self.try_generate_advice(request).await {
            Ok((advice, raw)) => {
                tracing::info!(advice_length = advice.chars().count(), "advice generated");
                AdviceResponse::generated(advice, raw)
            }
            Err(error) => {
                tracing::warn!(error = %error, "advice generation failed, serving fallback");
                metrics::counter!("generation_fallback_total", "handler" => "advice").increment(1);
                AdviceResponse::fallback(fallback_advice(&request.partner_name, &request.situation))
            }
        }
    }

    async fn try_generate_advice(
        &self,
        request: &AdviceRequest,
    ) -> Result<(String, serde_json::Value), AppError> {
        let client = self.client()?;

        // 1. 점수 → 말투
        let tone = score_to_tone(request.score());
        tracing::debug!(tone = tone.tag.as_str(), score = request.score(), "tone selected");

        // 2. 프롬프트 조립 (지시문 + 제약 플래그 페이로드)
        let instruction = prompt::advice::system_instruction(&self.policy, &tone);
        let payload = prompt::advice::user_payload(request, &self.policy);

        // 3. 스키마 제약 생성 호출
        let completion = client
            .complete_structured(&instruction, &payload.to_string(), &advice_contract())
            .await?;

        // 4. 파싱 + 계약 검증, 근거 확인 및 수선
        let document = parse_advice_document(&completion)?;
        let document = ensure_grounded(document, &request.situation);

        // 5. 렌더링
        let advice = render_advice(request, &document);
        let raw = serde_json::to_value(&document).map_err(|e| AppError::Internal(e.to_string()))?;

        Ok((advice, raw))
    }

    /// 궁합 생성. 항상 성공 응답을 반환합니다.
    pub async fn generate_compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> CompatibilityResponse {
        match self.try_generate_compatibility(request).await {
            Ok(result) => {
                tracing::info!("compatibility generated");
                CompatibilityResponse::new(result)
            }
            Err(error) => {
                tracing::warn!(error = %error, "compatibility generation failed, serving fallback");
                metrics::counter!("generation_fallback_total", "handler" => "compatibility")
                    .increment(1);
                CompatibilityResponse::new(
                    pick_compatibility_fallback(&mut thread_rng()).to_string(),
                )
            }
        }
    }

    async fn try_generate_compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> Result<String, AppError> {
        let client = self.client()?;

        let payload = prompt::compatibility::user_payload(request);
        let completion = client
            .complete_text(
                prompt::compatibility::SYSTEM_INSTRUCTION,
                &payload.to_string(),
            )
            .await?;

        parse_compatibility_result(&completion)
    }
}
