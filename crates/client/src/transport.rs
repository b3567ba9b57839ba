//! GraphQL transport
//!
//! A transport sends one request document and hands back the `data` member of
//! the response, or the error that should be shown instead.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// `extensions.code` the server attaches to validation failures
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";

/// `extensions.code` the server attaches to failures of its own
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Configuration for the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Full URL of the GraphQL endpoint
    pub endpoint: String,
}

/// A GraphQL request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(operation_name: &str, query: &str, variables: Value) -> Self {
        Self {
            query: query.to_string(),
            variables,
            operation_name: Some(operation_name.to_string()),
        }
    }
}

/// A GraphQL response document
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorBody {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphqlErrorBody {
    fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

impl GraphqlResponse {
    /// Any error fails the whole operation, even alongside partial data.
    fn into_result(self) -> Result<Value> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(match first.code() {
                Some(BAD_USER_INPUT) => ClientError::Validation(first.message),
                Some(INTERNAL_SERVER_ERROR) => ClientError::Transport(first.message),
                _ => ClientError::Graphql(first.message),
            });
        }
        self.data.ok_or_else(|| {
            ClientError::Decode(serde::de::Error::custom(
                "response carried neither data nor errors",
            ))
        })
    }
}

/// Sends GraphQL requests
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Execute a request, returning the response `data`
    async fn execute(&self, request: GraphqlRequest) -> Result<Value>;
}

#[async_trait]
impl<T: GraphqlTransport + ?Sized> GraphqlTransport for Arc<T> {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        (**self).execute(request).await
    }
}

/// Transport posting JSON over HTTP
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: config.endpoint,
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        debug!(
            "Sending {} to {}",
            request.operation_name.as_deref().unwrap_or("anonymous operation"),
            self.endpoint
        );

        let res = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to reach {}: {}", self.endpoint, e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response: {}", e)))?;

        // Servers may answer a rejected request with a non-2xx status and an
        // errors document; the document is more useful than the status.
        match serde_json::from_str::<GraphqlResponse>(&body) {
            Ok(envelope) if status.is_success() || !envelope.errors.is_empty() => {
                envelope.into_result()
            }
            Ok(_) => Err(ClientError::Transport(format!("Server returned {}", status))),
            Err(_) if !status.is_success() => {
                Err(ClientError::Transport(format!("Server returned {}", status)))
            }
            Err(e) => Err(ClientError::Decode(e)),
        }
    }
}
