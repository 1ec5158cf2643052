use serde::{Deserialize, Serialize};

/// A previously asked question as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// A retrieved document snippet cited by an answer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Source {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "chunk")]
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// One pipeline stage reported by `/ask`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StepReport {
    pub step: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub steps: Vec<StepReport>,
}

impl AskResponse {
    /// Splits the response into the answer to display and the steps to animate.
    pub fn into_parts(self) -> (Answer, Vec<StepReport>) {
        (
            Answer {
                answer: self.answer,
                sources: self.sources,
            },
            self.steps,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    #[serde(default)]
    pub chunks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_response_accepts_backend_chunk_shape() {
        let raw = r#"{
            "question": "What is tokenization?",
            "answer": "Tokenization splits text...",
            "sources": [{"chunk": "Tokens are units", "source": "notes.pdf"}],
            "steps": [{"step": "User Question", "value": "What is tokenization?"}]
        }"#;

        let response: AskResponse = serde_json::from_str(raw).unwrap();
        let (answer, steps) = response.into_parts();

        assert_eq!(answer.answer, "Tokenization splits text...");
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].content, "Tokens are units");
        assert_eq!(answer.sources[0].source, "notes.pdf");
        assert_eq!(answer.sources[0].title, "");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step, "User Question");
    }

    #[test]
    fn test_ask_response_without_steps_or_sources() {
        let response: AskResponse = serde_json::from_str(r#"{"answer": "ok"}"#).unwrap();
        assert!(response.sources.is_empty());
        assert!(response.steps.is_empty());
    }

    #[test]
    fn test_question_tolerates_answer_field() {
        let raw = r#"[{"id": "1", "question": "q", "answer": "a", "timestamp": "2024-05-01T10:00:00"}]"#;
        let questions: Vec<Question> = serde_json::from_str(raw).unwrap();
        assert_eq!(questions[0].answer.as_deref(), Some("a"));
    }
}
