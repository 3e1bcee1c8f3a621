//! Mock Spark websocket backend for integration tests
//!
//! Accepts any number of connections, records the handshake URI and the
//! request frame of each, then replays a fixed reply.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_util::sync::CancellationToken;
use url::Url;

/// What the mock sends back after reading the request frame
#[derive(Debug, Clone)]
pub enum Reply {
    /// Content fragments, the last carrying the given usage
    Answer { fragments: Vec<String>, usage: (u32, u32, u32) },
    /// A single error frame
    Error { code: i64, message: String },
    /// Fragments followed by an error frame
    FailAfter { fragments: Vec<String>, code: i64 },
    /// Never answer
    Silent,
}

impl Reply {
    pub fn answer(fragments: &[&str], usage: (u32, u32, u32)) -> Self {
        Self::Answer {
            fragments: fragments.iter().map(|&f| f.to_owned()).collect(),
            usage,
        }
    }

    fn frames(&self) -> Vec<serde_json::Value> {
        match self {
            Self::Answer { fragments, usage } => {
                let last = fragments.len().saturating_sub(1);
                fragments
                    .iter()
                    .enumerate()
                    .map(|(seq, content)| {
                        let status = if seq == last { 2 } else { 1 };
                        let mut frame = text_frame(seq, content, status);
                        if seq == last {
                            frame["payload"]["usage"] = serde_json::json!({"text": {
                                "question_tokens": usage.0,
                                "prompt_tokens": usage.0,
                                "completion_tokens": usage.1,
                                "total_tokens": usage.2
                            }});
                        }
                        frame
                    })
                    .collect()
            }
            Self::Error { code, message } => vec![error_frame(*code, message)],
            Self::FailAfter { fragments, code } => fragments
                .iter()
                .enumerate()
                .map(|(seq, content)| text_frame(seq, content, 1))
                .chain(std::iter::once(error_frame(*code, "engine error")))
                .collect(),
            Self::Silent => Vec::new(),
        }
    }
}

fn text_frame(seq: usize, content: &str, status: u8) -> serde_json::Value {
    serde_json::json!({
        "header": {"code": 0, "message": "Success", "sid": "cht000mock", "status": status},
        "payload": {"choices": {"status": status, "seq": seq, "text": [
            {"content": content, "role": "assistant", "index": 0}
        ]}}
    })
}

fn error_frame(code: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "header": {"code": code, "message": message, "sid": "cht000mock", "status": 2}
    })
}

#[derive(Default)]
struct Recorded {
    uris: Vec<String>,
    requests: Vec<serde_json::Value>,
}

/// Mock Spark server handle
pub struct MockSpark {
    addr: SocketAddr,
    shutdown: CancellationToken,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockSpark {
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let token = shutdown.clone();
        let state = Arc::clone(&recorded);
        tokio::spawn(async move {
            loop {
                let stream = tokio::select! {
                    () = token.cancelled() => break,
                    accepted = listener.accept() => match accepted {
                        Ok((stream, _)) => stream,
                        Err(_) => continue,
                    },
                };

                tokio::spawn(serve_connection(stream, reply.clone(), Arc::clone(&state)));
            }
        });

        Ok(Self {
            addr,
            shutdown,
            recorded,
        })
    }

    /// Endpoint to configure as `spark.base_url`
    pub fn url(&self) -> Url {
        Url::parse(&format!("ws://{}/v3.5/chat", self.addr)).unwrap()
    }

    /// Number of connections that sent a request frame
    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().requests.len()
    }

    /// Request frames received so far
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.recorded.lock().unwrap().requests.clone()
    }

    /// Handshake URIs (path and query) received so far
    pub fn uris(&self) -> Vec<String> {
        self.recorded.lock().unwrap().uris.clone()
    }
}

impl Drop for MockSpark {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn serve_connection(stream: tokio::net::TcpStream, reply: Reply, recorded: Arc<Mutex<Recorded>>) {
    let handshake_state = Arc::clone(&recorded);
    let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        handshake_state.lock().unwrap().uris.push(request.uri().to_string());
        Ok(response)
    };

    let Ok(mut socket) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
        return;
    };

    let Some(Ok(Message::Text(request))) = socket.next().await else {
        return;
    };
    if let Ok(request) = serde_json::from_str(&request) {
        recorded.lock().unwrap().requests.push(request);
    }

    for frame in reply.frames() {
        if socket.send(Message::Text(frame.to_string())).await.is_err() {
            return;
        }
    }

    // Keep the socket open until the client closes it
    while let Some(Ok(_)) = socket.next().await {}
}
