//! iFlytek Spark chat websocket frame types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `status` value marking the final frame of a response
pub const STATUS_LAST_FRAME: u8 = 2;

// -- Request frame --

/// Request frame sent once per connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkRequest {
    pub header: SparkRequestHeader,
    pub parameter: SparkParameter,
    pub payload: SparkRequestPayload,
}

/// Request header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkRequestHeader {
    /// Application ID
    pub app_id: String,
    /// End-user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkParameter {
    /// Chat parameters (`domain`, `temperature`, `max_tokens`, ...)
    pub chat: Map<String, Value>,
}

/// Request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkRequestPayload {
    pub message: SparkMessageList,
}

/// Conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkMessageList {
    pub text: Vec<SparkMessage>,
}

/// Single conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkMessage {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

// -- Response frames --

/// Response frame; error frames carry only a header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkResponse {
    pub header: SparkResponseHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SparkResponsePayload>,
}

/// Response header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkResponseHeader {
    /// 0 on success
    pub code: i64,
    /// Human-readable status ("Success" or an error description)
    #[serde(default)]
    pub message: String,
    /// Session id
    #[serde(default)]
    pub sid: String,
    /// Session status, [`STATUS_LAST_FRAME`] on the last frame
    #[serde(default)]
    pub status: u8,
}

/// Response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkResponsePayload {
    pub choices: SparkChoices,
    /// Present on the last frame only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<SparkUsage>,
}

/// Generated text for this frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkChoices {
    /// Text status, [`STATUS_LAST_FRAME`] on the last frame
    pub status: u8,
    /// Frame sequence number
    #[serde(default)]
    pub seq: u32,
    #[serde(default)]
    pub text: Vec<SparkText>,
}

/// Text fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkText {
    pub content: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub index: u32,
}

/// Token usage wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkUsage {
    pub text: SparkUsageText,
}

/// Token usage totals for the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkUsageText {
    /// Tokens of the latest question only
    #[serde(default)]
    pub question_tokens: u32,
    /// Tokens of the full prompt including history
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
