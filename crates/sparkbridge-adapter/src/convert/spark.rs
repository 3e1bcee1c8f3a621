//! Vendor messages/records <-> Spark websocket frames

use crate::protocol::spark::{
    STATUS_LAST_FRAME, SparkMessage, SparkMessageList, SparkParameter, SparkRequest, SparkRequestHeader,
    SparkRequestPayload, SparkResponse,
};
use crate::types::{CompletionStatus, Usage, VendorMessage, VendorParams, VendorRecord, VendorRole};

/// Build the request frame for one call
///
/// `domain` is written first so that parameters may override it.
pub fn build_spark_request(
    app_id: &str,
    uid: Option<&str>,
    domain: &str,
    messages: Vec<VendorMessage>,
    params: VendorParams,
) -> SparkRequest {
    let mut chat = VendorParams::new();
    chat.insert("domain".to_owned(), domain.into());
    chat.extend(params);

    SparkRequest {
        header: SparkRequestHeader {
            app_id: app_id.to_owned(),
            uid: uid.map(ToOwned::to_owned),
        },
        parameter: SparkParameter { chat },
        payload: SparkRequestPayload {
            message: SparkMessageList {
                text: messages.into_iter().map(Into::into).collect(),
            },
        },
    }
}

impl From<VendorMessage> for SparkMessage {
    fn from(message: VendorMessage) -> Self {
        let role = match message.role {
            VendorRole::User => "user",
            VendorRole::Assistant => "assistant",
        };

        Self {
            role: role.to_owned(),
            content: message.content,
        }
    }
}

impl From<SparkResponse> for VendorRecord {
    fn from(frame: SparkResponse) -> Self {
        let header = frame.header;
        let payload = frame.payload;

        let last = header.status == STATUS_LAST_FRAME
            || payload
                .as_ref()
                .is_some_and(|p| p.choices.status == STATUS_LAST_FRAME);

        let content_fragment = payload
            .as_ref()
            .map(|p| p.choices.text.iter().map(|t| t.content.as_str()).collect::<String>())
            .unwrap_or_default();

        let usage = payload.and_then(|p| p.usage).map(|u| Usage {
            prompt_tokens: u.text.prompt_tokens,
            completion_tokens: u.text.completion_tokens,
            total_tokens: u.text.total_tokens,
        });

        Self {
            status_code: header.code,
            message: (header.code != 0).then_some(header.message),
            session_id: header.sid,
            content_fragment,
            completion_status: if last {
                CompletionStatus::Done
            } else {
                CompletionStatus::InProgress
            },
            usage: if last { usage } else { None },
        }
    }
}
