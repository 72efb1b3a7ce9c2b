use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 조언 요청 DTO
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// 상대방 이름
    #[validate(length(min = 1, message = "상대방 이름은 필수입니다."))]
    #[schema(example = "민수")]
    pub partner_name: String,

    /// 고민 상황 설명
    #[validate(length(min = 1, message = "상황 설명은 필수입니다."))]
    #[schema(example = "어제 연락이 안 됐어요")]
    pub situation: String,

    /// 0~100 궁합 점수. 없거나 숫자가 아니면 50으로 처리됩니다.
    /// 0은 "매우 나쁜 궁합"이라는 유효한 값이므로 falsy 판정이 아니라
    /// 명시적인 숫자 타입 확인으로 기본값을 결정합니다.
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 80)]
    pub compatibility_score: Option<serde_json::Value>,
}

impl AdviceRequest {
    /// 점수가 없거나 숫자가 아닐 때 쓰는 기본값
    pub const DEFAULT_SCORE: f64 = 50.0;

    pub fn score(&self) -> f64 {
        self.compatibility_score
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(Self::DEFAULT_SCORE)
    }
}

/// 조언 응답 DTO
///
/// 생성 실패도 폴백 본문과 함께 `success: true`로 나갑니다. 클라이언트에는
/// 이 엔드포인트의 실패 상태가 존재하지 않습니다.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdviceResponse {
    #[schema(example = true)]
    pub success: bool,

    /// 최종 표시용 조언 문자열
    pub advice: String,

    /// 모델이 생성한 구조화 문서(폴백 응답에는 없음)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub raw: Option<serde_json::Value>,
}

impl AdviceResponse {
    pub fn generated(advice: String, raw: serde_json::Value) -> Self {
        Self {
            success: true,
            advice,
            raw: Some(raw),
        }
    }

    pub fn fallback(advice: String) -> Self {
        Self {
            success: true,
            advice,
            raw: None,
        }
    }
}

/// 궁합 요청 DTO
///
/// 앞의 네 필드는 필수, 상대방 생년월일/성별은 선택입니다.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    #[validate(length(min = 1, message = "내 이름은 필수입니다."))]
    #[schema(example = "지은")]
    pub my_name: String,

    #[validate(length(min = 1, message = "내 생년월일은 필수입니다."))]
    #[schema(example = "1998-04-12")]
    pub my_birth_date: String,

    #[validate(length(min = 1, message = "내 성별은 필수입니다."))]
    #[schema(example = "여성")]
    pub my_gender: String,

    #[validate(length(min = 1, message = "상대방 이름은 필수입니다."))]
    #[schema(example = "민수")]
    pub partner_name: String,

    #[serde(default)]
    #[schema(example = "1997-11-02")]
    pub partner_birth_date: Option<String>,

    #[serde(default)]
    #[schema(example = "남성")]
    pub partner_gender: Option<String>,
}

/// 궁합 응답 DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct CompatibilityResponse {
    #[schema(example = true)]
    pub success: bool,

    /// `궁합 {0-100}% - {메시지}` 형식의 결과 문자열
    #[schema(example = "궁합 83% - 서로에게 배울 점이 많은 인연이에요.")]
    pub result: String,
}

impl CompatibilityResponse {
    pub fn new(result: String) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_advice_request_with_camel_case() {
        // Arrange
        let json = r#"{
            "partnerName": "민수",
            "situation": "어제 연락이 안 됐어요",
            "compatibilityScore": 80
        }"#;

        // Act
        let request: AdviceRequest = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(request.partner_name, "민수");
        assert_eq!(request.situation, "어제 연락이 안 됐어요");
        assert_eq!(request.score(), 80.0);
    }

    #[test]
    fn score_should_default_when_absent() {
        // Arrange
        let json = r#"{"partnerName": "민수", "situation": "고민이에요"}"#;

        // Act
        let request: AdviceRequest = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(request.score(), AdviceRequest::DEFAULT_SCORE);
    }

    #[test]
    fn score_should_default_when_not_numeric() {
        // Arrange
        let json = r#"{
            "partnerName": "민수",
            "situation": "고민이에요",
            "compatibilityScore": "아주 높음"
        }"#;

        // Act
        let request: AdviceRequest = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(request.score(), AdviceRequest::DEFAULT_SCORE);
    }

    #[test]
    fn score_zero_should_stay_zero() {
        // 0은 "매우 나쁜 궁합"이지 기본값 대상이 아님
        let json = r#"{
            "partnerName": "민수",
            "situation": "고민이에요",
            "compatibilityScore": 0
        }"#;

        let request: AdviceRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.score(), 0.0);
    }

    #[test]
    fn empty_situation_should_fail_validation() {
        // Arrange
        let request = AdviceRequest {
            partner_name: "민수".to_string(),
            situation: String::new(),
            compatibility_score: None,
        };

        // Act
        let result = validator::Validate::validate(&request);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn advice_response_fallback_should_omit_raw() {
        // Arrange
        let response = AdviceResponse::fallback("조언".to_string());

        // Act
        let json = serde_json::to_value(&response).unwrap();

        // Assert
        assert_eq!(json["success"], true);
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn compatibility_request_optional_fields_may_be_absent() {
        // Arrange
        let json = r#"{
            "myName": "지은",
            "myBirthDate": "1998-04-12",
            "myGender": "여성",
            "partnerName": "민수"
        }"#;

        // Act
        let request: CompatibilityRequest = serde_json::from_str(json).unwrap();

        // Assert
        assert!(validator::Validate::validate(&request).is_ok());
        assert!(request.partner_birth_date.is_none());
        assert!(request.partner_gender.is_none());
    }

    #[test]
    fn compatibility_request_missing_required_field_should_fail() {
        // partnerName 누락은 역직렬화 단계에서 거부됨
        let json = r#"{
            "myName": "지은",
            "myBirthDate": "1998-04-12",
            "myGender": "여성"
        }"#;

        let result: Result<CompatibilityRequest, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }
}
