//! Vendor record stream -> canonical responses
//!
//! Every record is checked before use: a non-zero status code aborts the
//! call with [`VendorFailure::Status`] and nothing derived from that record
//! is emitted. Streaming maps records one-to-one onto fragments; the
//! non-streaming path folds them into an [`Aggregate`].

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use crate::error::{AdapterError, VendorFailure};
use crate::transport::RecordStream;
use crate::types::{
    AssistantMessage, ChatChoice, ChatCompletionChunk, ChatCompletionResponse, ChunkChoice, ChunkDelta,
    CompletionChoice, CompletionResponse, FinishReason, ObjectKind, Role, Usage, VendorRecord,
};

/// Canonical fragments of one streaming call
pub type FragmentStream<T> = Pin<Box<dyn Stream<Item = Result<T, AdapterError>> + Send>>;

/// Fields shared by every response of one call
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Model name reported to the caller
    pub model: String,
    /// Unix timestamp of the call
    pub created: u64,
}

/// Reject records carrying a vendor error
pub fn check(record: VendorRecord) -> Result<VendorRecord, AdapterError> {
    if record.is_ok() {
        return Ok(record);
    }

    tracing::error!(record = ?record, "spark returned an error record");

    Err(VendorFailure::Status(Box::new(record)).into())
}

/// Map each checked record through `build`, ending after the done record
///
/// An error, whether from the transport or from [`check`], is yielded once
/// and ends the stream. Dropping the returned stream drops `records`.
pub fn fragments<T, F>(records: RecordStream, build: F) -> FragmentStream<T>
where
    T: Send + 'static,
    F: FnMut(VendorRecord) -> T + Send + 'static,
{
    let stream = futures_util::stream::unfold(Some((records, build)), |state| async move {
        let (mut records, mut build) = state?;

        let record = match records.next().await?.and_then(check) {
            Ok(record) => record,
            Err(e) => return Some((Err(e), None)),
        };

        let done = record.is_done();
        let fragment = build(record);

        if done {
            Some((Ok(fragment), None))
        } else {
            Some((Ok(fragment), Some((records, build))))
        }
    });

    Box::pin(stream)
}

/// Streamed chat fragment for one record
pub fn chat_chunk(record: VendorRecord, meta: &ResponseMeta) -> ChatCompletionChunk {
    let (usage, finish_reason) = closing_fields(&record);

    ChatCompletionChunk {
        id: record.session_id,
        object: ObjectKind::ChatCompletionChunk,
        created: meta.created,
        model: meta.model.clone(),
        usage,
        choices: vec![ChunkChoice {
            index: 0,
            delta: ChunkDelta {
                role: Some(Role::Assistant),
                content: Some(record.content_fragment),
            },
            finish_reason,
        }],
    }
}

/// Streamed text completion fragment for one record
pub fn completion_chunk(record: VendorRecord, meta: &ResponseMeta) -> CompletionResponse {
    let (usage, finish_reason) = closing_fields(&record);

    CompletionResponse {
        id: Some(record.session_id),
        object: ObjectKind::TextCompletion,
        created: meta.created,
        model: meta.model.clone(),
        usage,
        choices: vec![CompletionChoice {
            text: record.content_fragment,
            index: 0,
            finish_reason,
        }],
    }
}

/// Usage and finish reason: real values on the done record, empty otherwise
fn closing_fields(record: &VendorRecord) -> (Usage, Option<FinishReason>) {
    if record.is_done() {
        (record.usage.unwrap_or_default(), Some(FinishReason::Stop))
    } else {
        (Usage::default(), None)
    }
}

/// Running state of a non-streaming call
#[derive(Debug, Default)]
pub struct Aggregate {
    id: Option<String>,
    text: String,
    usage: Usage,
}

impl Aggregate {
    /// Fold one checked record into the aggregate
    pub fn push(&mut self, record: VendorRecord) {
        self.text.push_str(&record.content_fragment);

        if record.is_done() {
            self.usage = record.usage.unwrap_or_default();
        }

        self.id = Some(record.session_id);
    }

    pub fn into_chat_response(self, meta: ResponseMeta) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: self.id,
            object: ObjectKind::ChatCompletion,
            created: meta.created,
            model: meta.model,
            usage: self.usage,
            choices: vec![ChatChoice {
                index: 0,
                message: AssistantMessage::text(self.text),
                finish_reason: Some(FinishReason::Stop),
            }],
        }
    }

    pub fn into_completion_response(self, meta: ResponseMeta) -> CompletionResponse {
        CompletionResponse {
            id: self.id,
            object: ObjectKind::TextCompletion,
            created: meta.created,
            model: meta.model,
            usage: self.usage,
            choices: vec![CompletionChoice {
                text: self.text,
                index: 0,
                finish_reason: Some(FinishReason::Stop),
            }],
        }
    }
}

/// Drain `records` into one aggregate, failing on the first bad record
///
/// A stream that ends without a done record is not an error: usage stays
/// zero and the id is the last one seen.
pub async fn aggregate(mut records: RecordStream) -> Result<Aggregate, AdapterError> {
    let mut aggregate = Aggregate::default();

    while let Some(record) = records.next().await {
        aggregate.push(check(record?)?);
    }

    if aggregate.id.is_some() && aggregate.usage.is_zero() {
        tracing::debug!("spark stream ended without usage totals");
    }

    Ok(aggregate)
}
