//! 조언 생성 프롬프트

use serde_json::{json, Value};

use super::super::dto::AdviceRequest;
use super::super::policy::AdvicePolicy;
use super::super::tone::ToneProfile;

/// 조언 지시 블록 생성
///
/// 문서 구조, 상황 인용 요구, 금지 표현, 산문 길이, 말투, 스키마 준수를
/// 정책 값으로부터 조립합니다.
pub fn system_instruction(policy: &AdvicePolicy, tone: &ToneProfile) -> String {
    let banned_list = policy
        .banned_phrases
        .iter()
        .map(|phrase| format!("- {phrase}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"당신은 연애 고민 상담 전문가입니다. 사용자가 보낸 상황에 대한 조언 문서를 작성합니다.

문서 구조 (반드시 이 순서, 이 구성):
1. empathy: 공감 문단. 첫 문단 안에서 사용자가 쓴 상황 문장을 한 번 그대로 따옴표로 인용하세요.
2. partner_view: 상대방 입장에서 이 상황이 어떻게 보일지에 대한 해석.
3. actions: 오늘 바로 실행할 수 있는 구체적인 행동 {min_actions}~{max_actions}개.
4. dialogues: 실제로 건넬 수 있는 대사 예시 {min_dialogues}~{max_dialogues}개. 각 대사는 따옴표로 감싸세요.

말투: {tone}

금지 표현 — 아래 문구와 그 비슷한 표현을 쓰지 마세요:
{banned_list}

목록을 제외한 산문 전체는 {min_sentences}~{max_sentences}문장으로 작성하세요.
출력은 지정된 JSON 스키마를 정확히 따라야 하며, 스키마 밖의 텍스트를 추가하지 마세요."#,
        min_actions = policy.min_action_items,
        max_actions = policy.max_action_items,
        min_dialogues = policy.min_dialogue_examples,
        max_dialogues = policy.max_dialogue_examples,
        tone = tone.descriptor,
        min_sentences = policy.min_prose_sentences,
        max_sentences = policy.max_prose_sentences,
    )
}

/// 조언 요청의 구조화 페이로드 생성
///
/// 요청 필드에 제약 플래그를 더해 지시문과 같은 제약을 한 번 더
/// 명시합니다.
pub fn user_payload(request: &AdviceRequest, policy: &AdvicePolicy) -> Value {
    json!({
        "partnerName": request.partner_name,
        "situation": request.situation,
        "compatibilityScore": request.score(),
        "mustQuoteSituation": policy.must_quote_situation,
        "minActionItems": policy.min_action_items,
        "maxActionItems": policy.max_action_items,
        "includeDialogueExamples": policy.min_dialogue_examples > 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::tone::score_to_tone;

    fn request() -> AdviceRequest {
        AdviceRequest {
            partner_name: "민수".to_string(),
            situation: "어제 연락이 안 됐어요".to_string(),
            compatibility_score: Some(serde_json::json!(80)),
        }
    }

    #[test]
    fn instruction_should_contain_every_banned_phrase() {
        // Arrange
        let policy = AdvicePolicy::default();
        let tone = score_to_tone(80.0);

        // Act
        let instruction = system_instruction(&policy, &tone);

        // Assert
        for phrase in &policy.banned_phrases {
            assert!(instruction.contains(phrase), "{phrase} missing");
        }
    }

    #[test]
    fn instruction_should_contain_tone_descriptor() {
        // Arrange
        let policy = AdvicePolicy::default();
        let tone = score_to_tone(30.0);

        // Act
        let instruction = system_instruction(&policy, &tone);

        // Assert
        assert!(instruction.contains(tone.descriptor));
    }

    #[test]
    fn instruction_should_reflect_policy_bounds() {
        // Arrange: 기본값과 다른 정책 주입
        let policy = AdvicePolicy {
            min_action_items: 4,
            max_action_items: 6,
            ..AdvicePolicy::default()
        };
        let tone = score_to_tone(50.0);

        // Act
        let instruction = system_instruction(&policy, &tone);

        // Assert
        assert!(instruction.contains("4~6개"));
    }

    #[test]
    fn instruction_should_require_schema_conformance_and_quoting() {
        let instruction = system_instruction(&AdvicePolicy::default(), &score_to_tone(50.0));

        assert!(instruction.contains("JSON 스키마"));
        assert!(instruction.contains("그대로 따옴표로 인용"));
    }

    #[test]
    fn payload_should_carry_request_fields_and_constraint_flags() {
        // Act
        let payload = user_payload(&request(), &AdvicePolicy::default());

        // Assert
        assert_eq!(payload["partnerName"], "민수");
        assert_eq!(payload["situation"], "어제 연락이 안 됐어요");
        assert_eq!(payload["compatibilityScore"], 80.0);
        assert_eq!(payload["mustQuoteSituation"], true);
        assert_eq!(payload["minActionItems"], 2);
        assert_eq!(payload["maxActionItems"], 3);
        assert_eq!(payload["includeDialogueExamples"], true);
    }

    #[test]
    fn payload_should_use_default_score_when_missing() {
        // Arrange
        let request = AdviceRequest {
            partner_name: "민수".to_string(),
            situation: "고민이에요".to_string(),
            compatibility_score: None,
        };

        // Act
        let payload = user_payload(&request, &AdvicePolicy::default());

        // Assert
        assert_eq!(payload["compatibilityScore"], AdviceRequest::DEFAULT_SCORE);
    }
}
