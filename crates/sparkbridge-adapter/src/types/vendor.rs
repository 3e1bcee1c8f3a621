use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::response::Usage;

/// Per-call Spark parameters (`parameter.chat` in the request frame)
pub type VendorParams = Map<String, Value>;

/// Roles the vendor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorRole {
    User,
    Assistant,
}

/// Message in the vendor's conversation format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorMessage {
    pub role: VendorRole,
    pub content: String,
}

impl VendorMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: VendorRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: VendorRole::Assistant,
            content: content.into(),
        }
    }
}

/// Progress marker carried by every vendor record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    InProgress,
    Done,
}

/// One unit of vendor output
///
/// `usage` is only populated on the record whose status is
/// [`CompletionStatus::Done`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    /// 0 on success, a vendor error code otherwise
    pub status_code: i64,
    /// Vendor diagnostic message accompanying the status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub session_id: String,
    pub content_fragment: String,
    pub completion_status: CompletionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl VendorRecord {
    pub const fn is_ok(&self) -> bool {
        self.status_code == 0
    }

    pub const fn is_done(&self) -> bool {
        matches!(self.completion_status, CompletionStatus::Done)
    }
}
