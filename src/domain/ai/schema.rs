//! 생성 결과 출력 계약
//!
//! 조언 문서는 JSON 스키마로, 궁합 결과는 `궁합 {0-100}% - {메시지}` 한 줄
//! 규칙으로 검사합니다. 조언 스키마 문서는 생성 서비스에 제약으로 전달되는
//! 것과 로컬 검증에 쓰는 것이 같은 값입니다.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;

/// 생성 서비스에 전달하는 출력 계약
#[derive(Debug, Clone)]
pub struct OutputContract {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Value,
}

/// 조언 문서 구조
///
/// `risk_flags`만 선택 필드이고 나머지는 필수입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceDocument {
    /// 공감 문단 (상황 인용 포함)
    pub empathy: String,
    /// 상대방 입장 해석
    pub partner_view: String,
    /// 오늘 실행 가능한 행동 2~3개
    pub actions: Vec<String>,
    /// 대사 예시 1~2개
    pub dialogues: Vec<String>,
    /// 주의 신호 (선택)
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

/// 조언 문서 JSON 스키마
pub fn advice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "empathy": { "type": "string", "minLength": 10 },
            "partner_view": { "type": "string", "minLength": 10 },
            "actions": {
                "type": "array",
                "items": { "type": "string", "minLength": 5 },
                "minItems": 2,
                "maxItems": 3
            },
            "dialogues": {
                "type": "array",
                "items": { "type": "string", "minLength": 8 },
                "minItems": 1,
                "maxItems": 2
            },
            "risk_flags": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["empathy", "partner_view", "actions", "dialogues"],
        "additionalProperties": false
    })
}

/// 조언 출력 계약
pub fn advice_contract() -> OutputContract {
    OutputContract {
        name: "relationship_advice",
        description: "구조화된 연애 조언 문서",
        schema: advice_schema(),
    }
}

static ADVICE_VALIDATOR: LazyLock<jsonschema::Validator> = LazyLock::new(|| {
    jsonschema::validator_for(&advice_schema()).expect("advice schema is a valid JSON Schema")
});

/// 모델 응답 본문을 조언 문서로 파싱
///
/// 코드 펜스에 싸인 JSON도 허용하지만, 스키마 위반은 수선하지 않고
/// 에러로 돌려 폴백 경로로 보냅니다.
pub fn parse_advice_document(raw: &str) -> Result<AdviceDocument, AppError> {
    let body = strip_code_fence(raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::MalformedCompletion(e.to_string()))?;

    if let Err(error) = ADVICE_VALIDATOR.validate(&value) {
        return Err(AppError::ContractViolation(error.to_string()));
    }

    serde_json::from_value(value).map_err(|e| AppError::MalformedCompletion(e.to_string()))
}

/// ```json ... ``` 펜스 제거
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// 궁합 결과 형식: `궁합 {0-100}% - {한 줄 메시지}`
static COMPATIBILITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^궁합\s*(\d{1,3})\s*%\s*-\s*(.+)$").expect("compatibility pattern is valid")
});

/// 모델 응답에서 궁합 결과 한 줄을 추출해 정규화
///
/// 첫 번째로 형식에 맞는 줄을 채택합니다. 형식에 맞는 줄이 없거나
/// 백분율이 100을 넘으면 계약 위반입니다.
pub fn parse_compatibility_result(raw: &str) -> Result<String, AppError> {
    for line in raw.lines() {
        let line = line.trim();
        if let Some(captures) = COMPATIBILITY_PATTERN.captures(line) {
            let percentage: u32 = captures[1]
                .parse()
                .map_err(|_| AppError::ContractViolation("백분율 해석 실패".to_string()))?;
            if percentage > 100 {
                return Err(AppError::ContractViolation(format!(
                    "백분율이 범위를 벗어남: {percentage}"
                )));
            }
            let message = captures[2].trim();
            return Ok(format!("궁합 {percentage}% - {message}"));
        }
    }

    Err(AppError::ContractViolation(
        "궁합 결과 형식에 맞는 줄이 없음".to_string(),
    ))
}
