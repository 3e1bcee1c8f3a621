//! Canonical (OpenAI-style) request/response types and the vendor-neutral
//! record types exchanged with a [`Transport`](crate::transport::Transport)

pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod vendor;

pub use message::{ChatMessage, Role};
pub use request::{ChatCompletionRequest, CompletionRequest};
pub use response::{
    AssistantMessage, ChatChoice, ChatCompletionResponse, CompletionChoice, CompletionResponse, FinishReason,
    ModelCard, ModelList, ObjectKind, Usage,
};
pub use stream::{ChatCompletionChunk, ChunkChoice, ChunkDelta};
pub use vendor::{CompletionStatus, VendorMessage, VendorParams, VendorRecord, VendorRole};
