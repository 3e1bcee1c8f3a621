//! iFlytek Spark websocket transport
//!
//! One websocket connection per call: connect to the signed endpoint,
//! send a single request frame, then read response frames until the last
//! one (or an error frame) arrives.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use sparkbridge_config::{SparkConfig, SparkEndpoint};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::{RecordStream, Transport, auth};
use crate::convert::spark::build_spark_request;
use crate::error::{AdapterError, VendorFailure};
use crate::protocol::spark::SparkResponse;
use crate::types::{VendorMessage, VendorParams, VendorRecord};

type SparkSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport speaking the Spark chat websocket protocol
pub struct SparkTransport {
    app_id: String,
    uid: Option<String>,
    api_key: SecretString,
    api_secret: SecretString,
    endpoint: SparkEndpoint,
    timeout: Duration,
}

impl SparkTransport {
    /// Create a transport from validated Spark settings
    pub fn new(config: &SparkConfig) -> anyhow::Result<Self> {
        Ok(Self {
            app_id: config.app_id.clone(),
            uid: config.uid.clone(),
            api_key: SecretString::from(config.api_key.expose_secret().to_owned()),
            api_secret: SecretString::from(config.api_secret.expose_secret().to_owned()),
            endpoint: config.endpoint()?,
            timeout: config.timeout()?,
        })
    }

    async fn connect(&self) -> Result<SparkSocket, AdapterError> {
        let url = auth::signed_url(
            &self.endpoint.url,
            self.api_key.expose_secret(),
            self.api_secret.expose_secret(),
            Timestamp::now(),
        )?;

        let (socket, _) = tokio::time::timeout(self.timeout, tokio_tungstenite::connect_async(url.as_str()))
            .await
            .map_err(|_| VendorFailure::Timeout(self.timeout))?
            .map_err(|e| VendorFailure::Transport(format!("websocket connect failed: {e}")))?;

        Ok(socket)
    }
}

#[async_trait]
impl Transport for SparkTransport {
    fn name(&self) -> &'static str {
        "spark"
    }

    async fn get_responses(
        &self,
        messages: Vec<VendorMessage>,
        params: VendorParams,
    ) -> Result<RecordStream, AdapterError> {
        let request = build_spark_request(
            &self.app_id,
            self.uid.as_deref(),
            &self.endpoint.domain,
            messages,
            params,
        );
        let body = serde_json::to_string(&request).map_err(|e| anyhow::anyhow!("failed to encode spark request: {e}"))?;

        let mut socket = self.connect().await?;

        tracing::debug!(domain = %self.endpoint.domain, "sending spark request");

        socket
            .send(Message::Text(body))
            .await
            .map_err(|e| VendorFailure::Transport(format!("failed to send request frame: {e}")))?;

        let timeout = self.timeout;
        let stream = futures_util::stream::unfold(Some(socket), move |state| async move {
            let mut socket = state?;

            loop {
                let message = match tokio::time::timeout(timeout, socket.next()).await {
                    Err(_) => return Some((Err(AdapterError::from(VendorFailure::Timeout(timeout))), None)),
                    Ok(None) => return None,
                    Ok(Some(Err(e))) => {
                        return Some((Err(AdapterError::from(VendorFailure::Transport(e.to_string()))), None));
                    }
                    Ok(Some(Ok(message))) => message,
                };

                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(frame) => {
                        tracing::debug!(?frame, "spark closed the connection");
                        return None;
                    }
                    _ => continue,
                };

                let record = match serde_json::from_str::<SparkResponse>(&text) {
                    Ok(frame) => VendorRecord::from(frame),
                    Err(e) => {
                        let failure = VendorFailure::Transport(format!("malformed spark frame: {e}"));
                        return Some((Err(AdapterError::from(failure)), None));
                    }
                };

                if record.is_done() || !record.is_ok() {
                    if let Err(e) = socket.close(None).await {
                        tracing::debug!(error = %e, "failed to close spark connection");
                    }
                    return Some((Ok(record), None));
                }

                return Some((Ok(record), Some(socket)));
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use url::Url;

    fn config(addr: std::net::SocketAddr, timeout: &str) -> SparkConfig {
        SparkConfig {
            app_id: "app".to_owned(),
            api_key: SecretString::from("key".to_owned()),
            api_secret: SecretString::from("secret".to_owned()),
            api_model_version: "v3.1".to_owned(),
            base_url: Some(Url::parse(&format!("ws://{addr}/v3.1/chat")).unwrap()),
            domain: None,
            uid: None,
            timeout: timeout.to_owned(),
        }
    }

    /// Accept one connection, capture the request frame, replay `frames`
    async fn scripted_server(
        frames: Vec<serde_json::Value>,
    ) -> (std::net::SocketAddr, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();

            let Some(Ok(Message::Text(request))) = socket.next().await else {
                panic!("expected a text request frame");
            };

            for frame in frames {
                socket.send(Message::Text(frame.to_string())).await.unwrap();
            }

            // Hold the connection until the client hangs up
            while let Some(Ok(_)) = socket.next().await {}

            request
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn streams_records_until_last_frame() {
        let (addr, server) = scripted_server(vec![
            serde_json::json!({
                "header": {"code": 0, "message": "Success", "sid": "cht01", "status": 1},
                "payload": {
                    "choices": {"status": 1, "seq": 0, "text": [{"content": "Hel", "role": "assistant", "index": 0}]}
                }
            }),
            serde_json::json!({
                "header": {"code": 0, "message": "Success", "sid": "cht01", "status": 2},
                "payload": {
                    "choices": {"status": 2, "seq": 1, "text": [{"content": "lo", "role": "assistant", "index": 0}]},
                    "usage": {
                        "text": {"question_tokens": 1, "prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}
                    }
                }
            }),
        ])
        .await;

        let transport = SparkTransport::new(&config(addr, "5s")).unwrap();
        let stream = transport
            .get_responses(vec![VendorMessage::user("hi")], VendorParams::new())
            .await
            .unwrap();

        let records: Vec<_> = stream.collect().await;
        let records: Vec<_> = records.into_iter().map(Result::unwrap).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content_fragment, "Hel");
        assert!(records[1].is_done());
        assert_eq!(records[1].usage.map(|u| u.total_tokens), Some(3));

        let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(request["header"]["app_id"], "app");
        assert_eq!(request["parameter"]["chat"]["domain"], "generalv3");
        assert_eq!(request["payload"]["message"]["text"][0]["content"], "hi");
    }

    #[tokio::test]
    async fn error_frame_ends_stream() {
        let (addr, _server) = scripted_server(vec![serde_json::json!({
            "header": {"code": 10013, "message": "input content audit failed", "sid": "cht02", "status": 2}
        })])
        .await;

        let transport = SparkTransport::new(&config(addr, "5s")).unwrap();
        let records: Vec<_> = transport
            .get_responses(vec![VendorMessage::user("hi")], VendorParams::new())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().status_code, 10013);
    }

    #[tokio::test]
    async fn silent_vendor_times_out() {
        let (addr, _server) = scripted_server(vec![]).await;

        let transport = SparkTransport::new(&config(addr, "100ms")).unwrap();
        let records: Vec<_> = transport
            .get_responses(vec![VendorMessage::user("hi")], VendorParams::new())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0],
            Err(AdapterError::VendorRequest(VendorFailure::Timeout(_)))
        ));
    }

    #[tokio::test]
    async fn dropping_stream_closes_connection() {
        let (addr, server) = scripted_server(vec![serde_json::json!({
            "header": {"code": 0, "message": "Success", "sid": "cht03", "status": 1},
            "payload": {"choices": {"status": 1, "seq": 0, "text": [{"content": "a", "role": "assistant", "index": 0}]}}
        })])
        .await;

        let transport = SparkTransport::new(&config(addr, "30s")).unwrap();
        let mut stream = transport
            .get_responses(vec![VendorMessage::user("hi")], VendorParams::new())
            .await
            .unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.content_fragment, "a");
        drop(stream);

        let hung_up = tokio::time::timeout(Duration::from_secs(3), server).await;
        assert!(hung_up.is_ok(), "vendor connection still open after the stream was dropped");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_before_streaming() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = SparkTransport::new(&config(addr, "1s")).unwrap();
        let result = transport
            .get_responses(vec![VendorMessage::user("hi")], VendorParams::new())
            .await;

        assert!(matches!(
            result,
            Err(AdapterError::VendorRequest(VendorFailure::Transport(_)))
        ));
    }
}
