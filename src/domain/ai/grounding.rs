//! 생성 결과 근거 확인
//!
//! 모델 출력이 사용자의 실제 상황을 반영하는지 핵심 토큰 부분 문자열
//! 일치로 확인합니다. 의미 기반 검증 대신 싼 휴리스틱을 쓰는 이유는
//! 흔한 실패 형태(상황과 무관한 범용 조언)를 잡는 데는 이것으로 충분하기
//! 때문입니다. 약한 결과는 거부하지 않고 공감 문단에 상황 인용을 덧붙여
//! 수선합니다.

use super::schema::AdviceDocument;

/// 추출할 핵심 토큰 최대 개수
pub const MAX_KEY_TOKENS: usize = 5;

/// 일치 요구 하한: min(2, 토큰 수)
const MIN_MATCHES: usize = 2;

/// 핵심 토큰에서 제외하는 불용어
///
/// 접속사, 대명사, 강조 부사처럼 상황 식별력이 없는 단어들.
pub const STOP_WORDS: &[&str] = &[
    "그리고",
    "그런데",
    "하지만",
    "그래서",
    "저는",
    "제가",
    "저를",
    "너무",
    "정말",
    "진짜",
    "그냥",
    "요즘",
    "the",
    "and",
    "was",
    "is",
];

/// 상황 문장에서 핵심 토큰을 추출
///
/// 구두점을 제거하고 공백으로 나눈 뒤, 2자 미만 토큰과 불용어를 버리고
/// 처음 등장한 순서대로 최대 5개를 취합니다. 중복 토큰은 첫 등장만
/// 남깁니다.
pub fn extract_key_tokens(situation: &str) -> Vec<String> {
    let cleaned: String = situation
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() < 2 {
            continue;
        }
        if STOP_WORDS.contains(&word) {
            continue;
        }
        if tokens.iter().any(|t| t == word) {
            continue;
        }
        tokens.push(word.to_string());
        if tokens.len() == MAX_KEY_TOKENS {
            break;
        }
    }
    tokens
}

/// 문서의 모든 텍스트 필드를 하나로 이어 붙임
fn collect_text(document: &AdviceDocument) -> String {
    let mut corpus = String::new();
    corpus.push_str(&document.empathy);
    corpus.push(' ');
    corpus.push_str(&document.partner_view);
    for action in &document.actions {
        corpus.push(' ');
        corpus.push_str(action);
    }
    for dialogue in &document.dialogues {
        corpus.push(' ');
        corpus.push_str(dialogue);
    }
    for flag in &document.risk_flags {
        corpus.push(' ');
        corpus.push_str(flag);
    }
    corpus
}

/// 핵심 토큰 중 문서에 부분 문자열로 등장하는 개수
pub fn matched_token_count(document: &AdviceDocument, tokens: &[String]) -> usize {
    let corpus = collect_text(document);
    tokens
        .iter()
        .filter(|token| corpus.contains(token.as_str()))
        .count()
}

/// 근거 확인을 통과하지 못한 문서를 수선
///
/// 일치 수가 min(2, 토큰 수) 미만이면 공감 문단 앞에 상황 인용을
/// 덧붙입니다. 통과한 문서는 그대로 반환합니다.
pub fn ensure_grounded(mut document: AdviceDocument, situation: &str) -> AdviceDocument {
    let tokens = extract_key_tokens(situation);
    let matched = matched_token_count(&document, &tokens);
    let required = tokens.len().min(MIN_MATCHES);

    if matched < required {
        tracing::warn!(
            matched,
            required,
            token_count = tokens.len(),
            "generated advice weakly grounded in situation, patching empathy"
        );
        document.empathy = format!("\"{}\"라고 하셨죠. {}", situation.trim(), document.empathy);
    }

    document
}
