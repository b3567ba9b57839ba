//! Scripted transport for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::transport::{GraphqlRequest, GraphqlTransport};

/// Replays queued responses in order and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_data(&self, data: Value) {
        self.responses.lock().unwrap().push_back(Ok(data));
    }

    pub fn push_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Operation names of the requests sent so far
    pub fn operations(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.operation_name.clone().unwrap_or_default())
            .collect()
    }

    pub fn last_request(&self) -> Option<GraphqlRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".to_string())))
    }
}
