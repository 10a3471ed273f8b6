//! Wire format of an OpenAI-compatible `chat/completions` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
}

impl<'a> ChatRequest<'a> {
    /// A single user message, no history.
    pub fn one_shot(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Trimmed content of the first choice, if it is not blank.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_a_single_user_message() {
        let request = ChatRequest::one_shot("gpt-4o-mini", "hello");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "hello" }]
            })
        );
    }

    #[test]
    fn first_choice_is_trimmed() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Great pick.\n"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();

        assert_eq!(response.into_first_content().as_deref(), Some("Great pick."));
    }

    #[test]
    fn blank_or_missing_content_is_none() {
        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();

        assert_eq!(blank.into_first_content(), None);
        assert_eq!(empty.into_first_content(), None);
    }
}
