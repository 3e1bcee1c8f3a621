//! Adapter facade composing translation, transport and assembly

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sparkbridge_config::AdapterConfig;

use crate::assembler::{self, FragmentStream, ResponseMeta};
use crate::convert::request::{chat_params, completion_params, translate_chat, translate_completion};
use crate::error::AdapterError;
use crate::transport::Transport;
use crate::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, CompletionRequest, CompletionResponse,
};

/// Result of one adapter call: a single response or a fragment stream
pub enum AdapterOutput<R, F> {
    /// Aggregated response of a non-streaming call
    Single(R),
    /// Fragments of a streaming call, one per vendor record
    Stream(FragmentStream<F>),
}

pub type ChatOutput = AdapterOutput<ChatCompletionResponse, ChatCompletionChunk>;
pub type CompletionOutput = AdapterOutput<CompletionResponse, CompletionResponse>;

impl<R, F> AdapterOutput<R, F> {
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    pub fn into_single(self) -> Option<R> {
        match self {
            Self::Single(response) => Some(response),
            Self::Stream(_) => None,
        }
    }

    pub fn into_fragments(self) -> Option<FragmentStream<F>> {
        match self {
            Self::Single(_) => None,
            Self::Stream(stream) => Some(stream),
        }
    }
}

impl<T: Send + 'static> AdapterOutput<T, T> {
    /// View either variant as a lazy sequence; `Single` yields one item
    pub fn into_sequence(self) -> FragmentStream<T> {
        match self {
            Self::Single(response) => {
                Box::pin(futures_util::stream::once(async move { Ok::<_, AdapterError>(response) }))
            }
            Self::Stream(stream) => stream,
        }
    }
}

impl<R: fmt::Debug, F> fmt::Debug for AdapterOutput<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(response) => f.debug_tuple("Single").field(response).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// OpenAI-compatible facade over a Spark [`Transport`]
///
/// Holds only immutable configuration; every call owns its own
/// translation and assembly state.
pub struct SparkAdapter {
    config: AdapterConfig,
    transport: Arc<dyn Transport>,
}

impl SparkAdapter {
    pub fn new(config: AdapterConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Model name reported in every response
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Run a chat completion
    ///
    /// Role errors are returned before the transport is touched. Vendor
    /// failures are returned directly for non-streaming calls and as the
    /// final `Err` item of the stream otherwise.
    pub async fn chat_completions(&self, request: ChatCompletionRequest) -> Result<ChatOutput, AdapterError> {
        if request.messages.is_empty() {
            return Err(AdapterError::InvalidRequest("messages must not be empty".to_owned()));
        }

        let messages = translate_chat(&request, &self.config)?;
        let params = chat_params(&request, &self.config);

        tracing::debug!(
            transport = self.transport.name(),
            messages = messages.len(),
            stream = request.stream,
            "starting chat completion"
        );

        let records = self.transport.get_responses(messages, params).await?;
        let meta = self.meta();

        if request.stream {
            let stream = assembler::fragments(records, move |record| assembler::chat_chunk(record, &meta));
            return Ok(AdapterOutput::Stream(stream));
        }

        let response = assembler::aggregate(records).await?.into_chat_response(meta);
        Ok(AdapterOutput::Single(response))
    }

    /// Run a text completion
    pub async fn completions(&self, request: CompletionRequest) -> Result<CompletionOutput, AdapterError> {
        if request.prompt.is_empty() {
            return Err(AdapterError::InvalidRequest("prompt must not be empty".to_owned()));
        }

        let messages = translate_completion(&request);
        let params = completion_params(&request, &self.config);

        tracing::debug!(
            transport = self.transport.name(),
            prompts = messages.len(),
            stream = request.stream,
            "starting text completion"
        );

        let records = self.transport.get_responses(messages, params).await?;
        let meta = self.meta();

        if request.stream {
            let stream = assembler::fragments(records, move |record| assembler::completion_chunk(record, &meta));
            return Ok(AdapterOutput::Stream(stream));
        }

        let response = assembler::aggregate(records).await?.into_completion_response(meta);
        Ok(AdapterOutput::Single(response))
    }

    fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            model: self.config.model_name.clone(),
            created: now_secs(),
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
