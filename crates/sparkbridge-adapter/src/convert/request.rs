//! Canonical request -> vendor message list and parameters

use serde_json::{Map, Value};
use sparkbridge_config::AdapterConfig;

use crate::error::AdapterError;
use crate::types::{ChatCompletionRequest, CompletionRequest, Role, VendorMessage, VendorParams};

/// Assistant reply that follows every translated system message
pub const SYSTEM_ACKNOWLEDGEMENT: &str = "ok";

/// Chat request fields with no Spark counterpart, never forwarded
const CHAT_ONLY_FIELDS: &[&str] = &[
    "n",
    "stop",
    "user",
    "seed",
    "top_p",
    "logit_bias",
    "logprobs",
    "top_logprobs",
    "stream_options",
    "presence_penalty",
    "frequency_penalty",
    "response_format",
    "functions",
    "function_call",
    "tools",
    "tool_choice",
    "parallel_tool_calls",
];

/// Text completion request fields with no Spark counterpart, never forwarded
const COMPLETION_ONLY_FIELDS: &[&str] = &[
    "n",
    "stop",
    "user",
    "seed",
    "top_p",
    "logit_bias",
    "logprobs",
    "stream_options",
    "presence_penalty",
    "frequency_penalty",
    "suffix",
    "echo",
    "best_of",
];

/// Translate chat messages into the vendor's two-role conversation
///
/// A system message becomes a user turn rendered through the configured
/// template followed by an assistant turn acknowledging it. Function
/// messages are rejected before anything is produced.
pub fn translate_chat(
    request: &ChatCompletionRequest,
    config: &AdapterConfig,
) -> Result<Vec<VendorMessage>, AdapterError> {
    let mut messages = Vec::with_capacity(request.messages.len());

    for message in &request.messages {
        match message.role {
            Role::System => {
                messages.push(VendorMessage::user(config.render_system(&message.content)));
                messages.push(VendorMessage::assistant(SYSTEM_ACKNOWLEDGEMENT));
            }
            Role::User => messages.push(VendorMessage::user(message.content.clone())),
            Role::Assistant => messages.push(VendorMessage::assistant(message.content.clone())),
            Role::Function => return Err(AdapterError::UnsupportedRole { role: message.role }),
        }
    }

    Ok(messages)
}

/// Translate text completion prompts, one user turn per prompt
pub fn translate_completion(request: &CompletionRequest) -> Vec<VendorMessage> {
    request.prompt.iter().cloned().map(VendorMessage::user).collect()
}

/// Vendor parameters for a chat request
pub fn chat_params(request: &ChatCompletionRequest, config: &AdapterConfig) -> VendorParams {
    build_params(request.temperature, request.max_length, &request.extra, CHAT_ONLY_FIELDS, config)
}

/// Vendor parameters for a text completion request
pub fn completion_params(request: &CompletionRequest, config: &AdapterConfig) -> VendorParams {
    build_params(request.temperature, request.max_tokens, &request.extra, COMPLETION_ONLY_FIELDS, config)
}

/// Build the per-call parameter map
///
/// Layers, later ones winning: computed values (`chat_id`, scaled
/// temperature, token limit), configured extras, request extras. Request
/// extras named in `unsupported` are dropped.
pub fn build_params(
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    request_extra: &Map<String, Value>,
    unsupported: &[&str],
    config: &AdapterConfig,
) -> VendorParams {
    let mut params = VendorParams::new();

    params.insert("chat_id".to_owned(), Value::from(uuid::Uuid::new_v4().to_string()));

    if let Some(temperature) = temperature {
        params.insert("temperature".to_owned(), Value::from(temperature * config.temperature_scale));
    }

    if let Some(max_tokens) = max_tokens {
        params.insert(config.max_tokens_key.clone(), Value::from(max_tokens));
    }

    params.extend(config.extras.iter().map(|(k, v)| (k.clone(), v.clone())));

    for (key, value) in request_extra {
        if unsupported.contains(&key.as_str()) {
            tracing::debug!(field = %key, "dropping request field unsupported by spark");
            continue;
        }
        params.insert(key.clone(), value.clone());
    }

    params
}
