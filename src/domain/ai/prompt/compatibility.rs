//! 궁합 생성 프롬프트

use serde_json::{json, Value};

use super::super::dto::CompatibilityRequest;

/// 궁합 System Prompt
///
/// 출력 형식이 자유 텍스트 규칙 하나뿐이므로 형식 지시를 반복해서
/// 강조합니다.
pub const SYSTEM_INSTRUCTION: &str = r#"당신은 재미로 보는 궁합 풀이 전문가입니다.
두 사람의 이름, 생년월일, 성별을 보고 궁합을 풀이합니다.

규칙:
1. 출력은 정확히 한 줄, `궁합 {0-100 정수}% - {한 줄 메시지}` 형식이어야 합니다.
2. 백분율은 0 이상 100 이하의 정수만 사용하세요.
3. 메시지는 두 사람의 관계에 대한 한 문장으로, 단정적이되 가볍게 쓰세요.
4. 다른 설명, 인사, 줄바꿈을 추가하지 마세요.

예: 궁합 78% - 티격태격해도 결국 서로를 찾게 되는 조합이에요."#;

/// 궁합 요청의 구조화 페이로드 생성
pub fn user_payload(request: &CompatibilityRequest) -> Value {
    json!({
        "myName": request.my_name,
        "myBirthDate": request.my_birth_date,
        "myGender": request.my_gender,
        "partnerName": request.partner_name,
        "partnerBirthDate": request.partner_birth_date,
        "partnerGender": request.partner_gender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_should_state_result_convention() {
        assert!(SYSTEM_INSTRUCTION.contains("궁합 {0-100 정수}% - {한 줄 메시지}"));
        assert!(SYSTEM_INSTRUCTION.contains("정수만"));
    }

    #[test]
    fn payload_should_carry_all_fields() {
        // Arrange
        let request = CompatibilityRequest {
            my_name: "지은".to_string(),
            my_birth_date: "1998-04-12".to_string(),
            my_gender: "여성".to_string(),
            partner_name: "민수".to_string(),
            partner_birth_date: None,
            partner_gender: Some("남성".to_string()),
        };

        // Act
        let payload = user_payload(&request);

        // Assert
        assert_eq!(payload["myName"], "지은");
        assert_eq!(payload["partnerName"], "민수");
        assert!(payload["partnerBirthDate"].is_null());
        assert_eq!(payload["partnerGender"], "남성");
    }
}
