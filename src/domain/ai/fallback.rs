//! 결정적 폴백 생성
//!
//! 생성 파이프라인이 어디서 실패하든 핸들러는 성공 응답을 돌려줘야
//! 합니다. 조언 폴백은 요청에 있는 데이터만으로 렌더러와 같은 절 구조를
//! 재현하고, 궁합 폴백은 미리 써둔 결과 중 하나를 무작위로 고릅니다.

use rand::Rng;

use super::render::{ACTION_LABEL, DIALOGUE_LABEL};

/// 상대방 이름이 비어 있을 때 쓰는 대체 표기
pub const GENERIC_PARTNER_LABEL: &str = "상대방";

/// 폴백 본문에 인용하는 상황 문장의 최대 길이 (문자 수)
pub const SITUATION_PREVIEW_CHARS: usize = 60;

/// 문자 단위 안전 잘라내기. 잘렸으면 말줄임표를 붙입니다.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.trim().chars().take(max_chars).collect();
    if text.trim().chars().count() > max_chars {
        preview.push('…');
    }
    preview
}

/// 조언 폴백 본문 생성
///
/// 렌더러 출력과 같은 모양(상황 인용, 공감 한 문장, 행동 두 개, 대사 한
/// 개)을 유지해 클라이언트 쪽 계약이 깨지지 않게 합니다.
pub fn fallback_advice(partner_name: &str, situation: &str) -> String {
    let name = if partner_name.trim().is_empty() {
        GENERIC_PARTNER_LABEL
    } else {
        partner_name.trim()
    };
    let preview = truncate_chars(situation, SITUATION_PREVIEW_CHARS);

    format!(
        "\"{preview}\"\n\n\
         {name}님과의 일로 마음이 많이 복잡하셨겠어요. 상황을 정리해서 말해주신 것만으로도 이미 한 걸음 내디딘 거예요.\n\n\
         {ACTION_LABEL}:\n\
         - \"{preview}\" 상황에서 내가 가장 속상했던 순간 하나를 적어보기\n\
         - 그 순간에 {name}님에게 바랐던 것을 한 문장으로 정리해보기\n\n\
         {DIALOGUE_LABEL}:\n\
         \"{name}아(야), 요즘 일로 내 마음이 어땠는지 이야기하고 싶어.\"\n"
    )
}

/// 미리 써둔 궁합 폴백 결과
pub const COMPATIBILITY_FALLBACKS: &[&str] = &[
    "궁합 82% - 서로의 차이가 오히려 대화거리가 되는 인연이에요.",
    "궁합 74% - 속도만 맞추면 꽤 오래 갈 수 있는 조합이에요.",
    "궁합 68% - 표현 방식이 달라 오해가 잦지만, 풀고 나면 더 단단해져요.",
    "궁합 57% - 노력이 필요한 궁합이에요. 먼저 묻는 쪽이 이깁니다.",
    "궁합 45% - 쉽지 않은 조합이지만, 서로를 배우려는 마음이 있다면 달라져요.",
];

/// 궁합 폴백을 균등 무작위로 선택
///
/// 난수원을 주입받으므로 테스트에서는 시드 고정 RNG로 결정적으로 검증할
/// 수 있습니다.
pub fn pick_compatibility_fallback<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    COMPATIBILITY_FALLBACKS[rng.gen_range(0..COMPATIBILITY_FALLBACKS.len())]
}
