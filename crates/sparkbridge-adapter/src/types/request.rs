use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::message::ChatMessage;

/// OpenAI-style chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Requested model (informational, Spark is selected by configuration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Conversation messages in order
    pub messages: Vec<ChatMessage>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, alias = "max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Any other fields, forwarded to Spark as parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// OpenAI-style text completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Requested model (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prompts, accepted as a single string or an array
    #[serde(deserialize_with = "deserialize_prompt")]
    pub prompt: Vec<String>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Any other fields, forwarded to Spark as parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_prompt<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Prompt {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Prompt::deserialize(deserializer)? {
        Prompt::One(prompt) => vec![prompt],
        Prompt::Many(prompts) => prompts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn chat_request_collects_unknown_fields() {
        let request: ChatCompletionRequest = serde_json::from_value(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "system", "content": "be terse"}, {"role": "user", "content": "hi"}],
            "temperature": 1.0,
            "max_tokens": 64,
            "top_k": 3
        }))
        .unwrap();

        assert!(!request.stream);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.max_length, Some(64));
        assert_eq!(request.extra.get("top_k"), Some(&Value::from(3)));
        assert!(!request.extra.contains_key("model"));
    }

    #[test]
    fn function_role_deserializes() {
        let request: ChatCompletionRequest = serde_json::from_value(serde_json::json!({
            "messages": [{"role": "function", "content": "{}"}]
        }))
        .unwrap();

        assert_eq!(request.messages[0].role, Role::Function);
    }

    #[test]
    fn prompt_accepts_string_or_array() {
        let single: CompletionRequest = serde_json::from_value(serde_json::json!({"prompt": "once"})).unwrap();
        assert_eq!(single.prompt, vec!["once".to_owned()]);

        let many: CompletionRequest =
            serde_json::from_value(serde_json::json!({"prompt": ["a", "b"], "stream": true})).unwrap();
        assert_eq!(many.prompt, vec!["a".to_owned(), "b".to_owned()]);
        assert!(many.stream);
    }
}
