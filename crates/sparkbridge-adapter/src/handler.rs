//! Axum route handlers for the OpenAI-compatible endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt};
use serde::Serialize;

use crate::adapter::{AdapterOutput, SparkAdapter, now_secs};
use crate::assembler::FragmentStream;
use crate::error::AdapterError;
use crate::types::{ChatCompletionRequest, CompletionRequest, ModelCard, ModelList};

/// Owner reported by `/v1/models`
const MODEL_OWNER: &str = "xunfei";

/// Build the router serving the adapter's endpoints
pub fn adapter_router(adapter: Arc<SparkAdapter>) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/completions", routing::post(completions))
        .route("/v1/models", routing::get(list_models))
        .with_state(adapter)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(
    State(adapter): State<Arc<SparkAdapter>>,
    body: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(&AdapterError::InvalidRequest(rejection.body_text())),
    };

    match adapter.chat_completions(request).await {
        Ok(output) => output_response(output),
        Err(e) => error_response(&e),
    }
}

/// Handle `POST /v1/completions`
async fn completions(
    State(adapter): State<Arc<SparkAdapter>>,
    body: Result<Json<CompletionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(&AdapterError::InvalidRequest(rejection.body_text())),
    };

    match adapter.completions(request).await {
        Ok(output) => output_response(output),
        Err(e) => error_response(&e),
    }
}

/// Handle `GET /v1/models`
async fn list_models(State(adapter): State<Arc<SparkAdapter>>) -> Json<ModelList> {
    Json(ModelList {
        object: "list".to_owned(),
        data: vec![ModelCard {
            id: adapter.model_name().to_owned(),
            object: "model".to_owned(),
            created: now_secs(),
            owned_by: MODEL_OWNER.to_owned(),
        }],
    })
}

fn output_response<R, F>(output: AdapterOutput<R, F>) -> Response
where
    R: Serialize,
    F: Serialize + Send + 'static,
{
    match output {
        AdapterOutput::Single(response) => Json(response).into_response(),
        AdapterOutput::Stream(fragments) => sse_response(fragments).into_response(),
    }
}

/// Serialize fragments as SSE `data:` events
///
/// A successful stream is terminated by `data: [DONE]`; an error, including
/// a fragment that fails to serialize, becomes the final event instead.
fn sse_response<F>(fragments: FragmentStream<F>) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
    F: Serialize + Send + 'static,
{
    let events = futures_util::stream::unfold(Some(fragments), |state| async move {
        let mut fragments = state?;

        match fragments.next().await {
            Some(Ok(fragment)) => match serde_json::to_string(&fragment) {
                Ok(data) => Some((Event::default().data(data), Some(fragments))),
                Err(e) => {
                    let error = AdapterError::Internal(anyhow::anyhow!("failed to encode stream fragment: {e}"));
                    tracing::error!(error = %error, "spark stream failed");
                    Some((error_event(&error), None))
                }
            },
            Some(Err(e)) => {
                tracing::warn!(error = %e, "spark stream failed");
                Some((error_event(&e), None))
            }
            None => Some((Event::default().data("[DONE]"), None)),
        }
    });

    Sse::new(events.map(Ok::<_, axum::Error>)).keep_alive(KeepAlive::default())
}

fn error_event(error: &AdapterError) -> Event {
    Event::default().data(error_body(error).to_string())
}

/// OpenAI-style error payload
fn error_body(error: &AdapterError) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "message": error.client_message(),
            "type": error.error_type(),
            "code": error.vendor_record().map(|record| record.status_code),
        }
    })
}

fn error_response(error: &AdapterError) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        tracing::error!(error = %error, "request failed");
    } else {
        tracing::debug!(error = %error, "rejected request");
    }

    (status, Json(error_body(error))).into_response()
}
