//! 조언 문서 렌더러
//!
//! 검증(또는 수선)된 문서와 원래 요청을 고정된 절 순서의 표시용 문자열로
//! 바꾸는 순수 함수입니다. 절 순서: 상황 인용, 공감, 상대방 입장, 행동
//! 목록, 대사 예시, (비어 있지 않을 때만) 주의 신호.

use super::dto::AdviceRequest;
use super::schema::AdviceDocument;

/// 행동 목록 절 제목
pub const ACTION_LABEL: &str = "오늘 해볼 수 있는 행동";
/// 대사 예시 절 제목
pub const DIALOGUE_LABEL: &str = "이렇게 말을 꺼내보세요";
/// 주의 신호 절 제목
pub const RISK_LABEL: &str = "주의할 점";

/// 조언 문서를 최종 표시 문자열로 렌더링
///
/// 전함수입니다. 목록 필드가 비어 있어도 패닉하지 않고, 채워진 필드는
/// 모두 정해진 자리에 나타납니다.
pub fn render_advice(request: &AdviceRequest, document: &AdviceDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("\"{}\"\n\n", request.situation.trim()));
    out.push_str(document.empathy.trim());
    out.push_str("\n\n");
    out.push_str(document.partner_view.trim());
    out.push_str("\n\n");

    out.push_str(ACTION_LABEL);
    out.push_str(":\n");
    for action in &document.actions {
        out.push_str(&format!("- {}\n", action.trim()));
    }

    out.push('\n');
    out.push_str(DIALOGUE_LABEL);
    out.push_str(":\n");
    for dialogue in &document.dialogues {
        let line = dialogue.trim().trim_matches('"');
        out.push_str(&format!("\"{line}\"\n"));
    }

    if !document.risk_flags.is_empty() {
        out.push('\n');
        out.push_str(RISK_LABEL);
        out.push_str(": ");
        out.push_str(&document.risk_flags.join(", "));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AdviceRequest {
        AdviceRequest {
            partner_name: "민수".to_string(),
            situation: "어제 연락이 안 됐어요".to_string(),
            compatibility_score: None,
        }
    }

    fn document() -> AdviceDocument {
        AdviceDocument {
            empathy: "어제 연락이 닿지 않아 많이 불안하셨겠어요.".to_string(),
            partner_view: "민수님에게도 나름의 사정이 있었을 수 있어요.".to_string(),
            actions: vec![
                "오늘 저녁에 어제 상황을 한 문장으로 물어보기".to_string(),
                "연락 공백이 생길 때 미리 알려달라고 부탁하기".to_string(),
            ],
            dialogues: vec!["어제 연락이 안 돼서 걱정했어.".to_string()],
            risk_flags: vec![],
        }
    }

    #[test]
    fn should_render_sections_in_fixed_order() {
        // Act
        let rendered = render_advice(&request(), &document());

        // Assert
        let quote = rendered.find("\"어제 연락이 안 됐어요\"").unwrap();
        let empathy = rendered.find("불안하셨겠어요").unwrap();
        let partner = rendered.find("나름의 사정").unwrap();
        let actions = rendered.find(ACTION_LABEL).unwrap();
        let dialogues = rendered.find(DIALOGUE_LABEL).unwrap();

        assert!(quote < empathy);
        assert!(empathy < partner);
        assert!(partner < actions);
        assert!(actions < dialogues);
    }

    #[test]
    fn should_bullet_actions_and_quote_dialogues() {
        // Act
        let rendered = render_advice(&request(), &document());

        // Assert
        assert_eq!(rendered.matches("\n- ").count(), 2);
        assert!(rendered.contains("\"어제 연락이 안 돼서 걱정했어.\""));
    }

    #[test]
    fn should_not_double_quote_dialogues() {
        // Arrange: 모델이 이미 따옴표를 붙여 보낸 경우
        let mut doc = document();
        doc.dialogues = vec!["\"어제 무슨 일 있었어?\"".to_string()];

        // Act
        let rendered = render_advice(&request(), &doc);

        // Assert
        assert!(rendered.contains("\"어제 무슨 일 있었어?\""));
        assert!(!rendered.contains("\"\"어제 무슨 일 있었어?\"\""));
    }

    #[test]
    fn risk_flags_should_appear_only_when_present() {
        // Arrange
        let mut doc = document();

        // Act / Assert: 없으면 절 자체가 없음
        let rendered = render_advice(&request(), &doc);
        assert!(!rendered.contains(RISK_LABEL));

        // Act / Assert: 있으면 맨 끝에 붙음
        doc.risk_flags = vec!["반복되는 연락 두절".to_string()];
        let rendered = render_advice(&request(), &doc);
        assert!(rendered.contains("주의할 점: 반복되는 연락 두절"));
    }

    #[test]
    fn should_be_total_over_empty_lists() {
        // Arrange
        let doc = AdviceDocument {
            empathy: "마음이 복잡하셨겠어요.".to_string(),
            partner_view: "상대방 입장도 있었을 거예요.".to_string(),
            actions: vec![],
            dialogues: vec![],
            risk_flags: vec![],
        };

        // Act
        let rendered = render_advice(&request(), &doc);

        // Assert
        assert!(rendered.contains(ACTION_LABEL));
        assert!(rendered.contains(DIALOGUE_LABEL));
    }
}
