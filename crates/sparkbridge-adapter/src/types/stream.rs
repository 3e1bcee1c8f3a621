use serde::{Deserialize, Serialize};

use super::message::Role;
use super::response::{FinishReason, ObjectKind, Usage};

/// One streamed chat completion fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Spark session id of the record this fragment came from
    pub id: String,
    /// Always `chat.completion.chunk`
    pub object: ObjectKind,
    pub created: u64,
    pub model: String,
    /// Zero on every fragment except the last
    pub usage: Usage,
    pub choices: Vec<ChunkChoice>,
}

/// Choice within a streamed fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    /// Set only on the last fragment
    pub finish_reason: Option<FinishReason>,
}

/// Incremental content within a streamed choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
