//! Renders a program to the text that gets embedded. Preferred form: the
//! chat model rewrites the structured fields into a few natural Korean
//! sentences; the labeled-line fallback keeps ingestion working without it.

use tracing::warn;

use crate::llm_client::{strip_json_fences, ChatCompleter};
use crate::models::program::ProgramItem;

const NATURALIZE_SYSTEM: &str = "\
당신은 프로그램 정보를 자연스러운 문장으로 변환하는 전문가입니다.
주어진 구조화된 정보를 읽기 쉬운 2-4개의 자연스러운 문장으로 작성하세요.
모든 정보를 빠짐없이 포함하되, 자연스럽게 연결하세요.
출력은 JSON으로: {\"text\": \"변환된 문장\"}";

#[derive(Debug, serde::Deserialize)]
struct NaturalizedText {
    text: String,
}

/// Labeled `key: value` lines covering every present field.
pub fn structured_lines(program: &ProgramItem) -> String {
    let mut lines = vec![
        format!("제목: {}", program.title),
        format!("유형: {}", program.program_type.label_ko()),
        format!("지역: {}", program.region),
    ];

    let optional = [
        ("설명", &program.description),
        ("대상연령", &program.target_age),
        ("혜택", &program.benefits),
        ("요건", &program.requirements),
        ("기간", &program.duration),
        ("비용", &program.cost),
        ("제공기관", &program.provider),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    if !program.tags.is_empty() {
        lines.push(format!("태그: {}", program.tags.join(", ")));
    }

    lines.join("\n")
}

/// Text content for one program. Any naturalization failure falls back to
/// the structured lines — ingestion must not depend on the chat model.
pub async fn program_text(program: &ProgramItem, llm: Option<&dyn ChatCompleter>) -> String {
    let lines = structured_lines(program);
    let Some(llm) = llm else {
        return lines;
    };

    let user = format!("다음 정보를 자연스러운 문장으로 변환해주세요:\n\n{lines}");
    let raw = match llm.complete(NATURALIZE_SYSTEM, &user).await {
        Ok(raw) => raw,
        Err(error) => {
            warn!("program text naturalization failed, using structured lines: {error}");
            return lines;
        }
    };
    match serde_json::from_str::<NaturalizedText>(strip_json_fences(&raw)) {
        Ok(naturalized) if !naturalized.text.trim().is_empty() => naturalized.text,
        Ok(_) => lines,
        Err(error) => {
            warn!("naturalization output was not the expected JSON, using structured lines: {error}");
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::program::ProgramType;
    use async_trait::async_trait;

    fn program() -> ProgramItem {
        ProgramItem {
            id: "edu_001".to_string(),
            title: "요양보호사 양성과정".to_string(),
            program_type: ProgramType::Education,
            region: "부산 사하구".to_string(),
            description: Some("요양보호사 자격 취득 과정".to_string()),
            target_age: None,
            benefits: None,
            requirements: Some("디지털: 불필요".to_string()),
            duration: Some("8주".to_string()),
            cost: None,
            start_date: None,
            deadline: None,
            link: None,
            provider: Some("부산인재개발원".to_string()),
            tags: vec!["돌봄".to_string(), "자격증".to_string()],
            original_id: None,
        }
    }

    struct CannedChat(&'static str);

    #[async_trait]
    impl ChatCompleter for CannedChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatCompleter for FailingChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_structured_lines_include_present_fields_only() {
        let text = structured_lines(&program());
        assert!(text.contains("제목: 요양보호사 양성과정"));
        assert!(text.contains("유형: 교육"));
        assert!(text.contains("태그: 돌봄, 자격증"));
        assert!(!text.contains("비용"));
        assert!(!text.contains("대상연령"));
    }

    #[tokio::test]
    async fn test_program_text_without_llm_uses_structured_lines() {
        let text = program_text(&program(), None).await;
        assert_eq!(text, structured_lines(&program()));
    }

    #[tokio::test]
    async fn test_program_text_uses_naturalized_sentences() {
        let chat = CannedChat(r#"{"text": "부산 사하구에서 8주간 열리는 요양보호사 양성과정입니다."}"#);
        let text = program_text(&program(), Some(&chat)).await;
        assert_eq!(text, "부산 사하구에서 8주간 열리는 요양보호사 양성과정입니다.");
    }

    #[tokio::test]
    async fn test_program_text_falls_back_on_chat_error() {
        let text = program_text(&program(), Some(&FailingChat)).await;
        assert_eq!(text, structured_lines(&program()));
    }

    #[tokio::test]
    async fn test_program_text_falls_back_on_malformed_output() {
        let chat = CannedChat("자연스러운 문장이지만 JSON이 아님");
        let text = program_text(&program(), Some(&chat)).await;
        assert_eq!(text, structured_lines(&program()));
    }

    #[tokio::test]
    async fn test_program_text_falls_back_on_blank_text_field() {
        let chat = CannedChat(r#"{"text": "   "}"#);
        let text = program_text(&program(), Some(&chat)).await;
        assert_eq!(text, structured_lines(&program()));
    }
}
