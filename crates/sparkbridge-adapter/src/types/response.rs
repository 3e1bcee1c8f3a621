use serde::{Deserialize, Serialize};

use super::message::Role;

/// `object` field of a canonical response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    #[serde(rename = "chat.completion")]
    ChatCompletion,
    #[serde(rename = "chat.completion.chunk")]
    ChatCompletionChunk,
    #[serde(rename = "text_completion")]
    TextCompletion,
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    pub total_tokens: u32,
}

impl Usage {
    pub const fn is_zero(&self) -> bool {
        self.prompt_tokens == 0 && self.completion_tokens == 0 && self.total_tokens == 0
    }
}

/// Aggregated chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Spark session id, absent when the vendor sent nothing
    pub id: Option<String>,
    /// Always `chat.completion`
    pub object: ObjectKind,
    /// Unix timestamp of creation
    pub created: u64,
    /// Model reported to the caller
    pub model: String,
    /// Token usage statistics
    pub usage: Usage,
    /// Generated choices (always exactly one)
    pub choices: Vec<ChatChoice>,
}

/// A single chat completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: Option<FinishReason>,
}

/// Message generated by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: Role,
    pub content: String,
}

impl AssistantMessage {
    pub fn text(content: String) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }
}

/// Text completion response, also used for each streamed fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Spark session id, absent when the vendor sent nothing
    pub id: Option<String>,
    /// Always `text_completion`
    pub object: ObjectKind,
    /// Unix timestamp of creation
    pub created: u64,
    /// Model reported to the caller
    pub model: String,
    /// Token usage statistics
    pub usage: Usage,
    /// Generated choices (always exactly one)
    pub choices: Vec<CompletionChoice>,
}

/// A single text completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    pub finish_reason: Option<FinishReason>,
}

/// `GET /v1/models` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    /// Always "list"
    pub object: String,
    pub data: Vec<ModelCard>,
}

/// Model entry within a [`ModelList`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCard {
    pub id: String,
    /// Always "model"
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}
