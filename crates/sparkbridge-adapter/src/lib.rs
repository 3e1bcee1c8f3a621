//! OpenAI-compatible adapter for the iFlytek Spark chat API
//!
//! Translates OpenAI-style chat and text completion requests into Spark
//! message lists, drives a [`Transport`] for the vendor call, and assembles
//! the vendor's record stream back into OpenAI-style responses, either as a
//! stream of fragments or as one aggregated response.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod assembler;
pub mod convert;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod protocol;
pub mod transport;
pub mod types;

pub use adapter::{AdapterOutput, ChatOutput, CompletionOutput, SparkAdapter};
pub use assembler::FragmentStream;
pub use error::{AdapterError, VendorFailure};
#[cfg(feature = "http")]
pub use handler::adapter_router;
pub use transport::{RecordStream, Transport, spark::SparkTransport};
pub use types::{ChatCompletionRequest, CompletionRequest, VendorMessage, VendorRecord};
