//! Stub transport and sink used by the unit tests.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::deliver::DownloadSink;
use crate::error::{ClientError, ClientResult};
use crate::transport::{RawResponse, StatementTransport};

/// One call observed by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedCall {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Records every call and answers with a canned response or a transport failure.
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    outcome: Result<RawResponse, String>,
}

impl RecordingTransport {
    pub fn respond(response: RawResponse) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(response),
        }
    }

    pub fn ok(body: Vec<u8>) -> Self {
        Self::respond(RawResponse::new(200, body))
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Err(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementTransport for RecordingTransport {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> ClientResult<RawResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            body,
        });
        self.outcome.clone().map_err(ClientError::Transport)
    }
}

/// Keeps saved payloads in memory; returns the bare filename as the "path".
#[derive(Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSink {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl DownloadSink for RecordingSink {
    fn save(&self, filename: &str, payload: &[u8]) -> ClientResult<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), payload.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
