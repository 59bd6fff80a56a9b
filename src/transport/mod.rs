//! Transport abstraction layer for A2A protocol

pub mod http;
#[cfg(test)]
pub mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
};

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::{protocol::error::A2AError, service::TaskEventStream};

/// Protocol-agnostic transport request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The endpoint path (e.g., "/tasks", "/tasks/123?limit=5")
    pub endpoint: String,

    /// HTTP method or equivalent operation (e.g., "POST", "GET", "PUT", "DELETE")
    pub method: String,

    /// Headers or metadata for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }
}

/// Protocol-agnostic transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code (e.g., HTTP status code)
    pub status: u16,

    /// Response headers or metadata
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the response
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Check if the response indicates a client error (4xx status code)
    pub fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Check if the response indicates a server error (5xx status code)
    pub fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Map an unsuccessful response to an error
    ///
    /// Agents answer failures with `{"message": ..., "taskId"?: ...}`.
    pub fn to_error(&self) -> A2AError {
        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
                return match self.status {
                    400 | 422 => A2AError::Validation(message.to_string()),
                    401 | 403 => A2AError::Auth(message.to_string()),
                    404 => match json.get("taskId").and_then(|v| v.as_str()) {
                        Some(task_id) => A2AError::TaskNotFound {
                            task_id: task_id.to_string(),
                        },
                        None => A2AError::NotFound(message.to_string()),
                    },
                    504 => A2AError::Timeout,
                    _ => A2AError::Transport(format!("HTTP {}: {}", self.status, message)),
                };
            }
        }

        A2AError::Transport(format!("HTTP error: {}", self.status))
    }
}

/// Core transport trait for executing protocol-agnostic requests
///
/// This trait abstracts over the network so the A2A protocol layer can run
/// against a real agent or an in-process stand-in.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), A2AError>>;

    /// Execute a transport request asynchronously
    ///
    /// # Arguments
    ///
    /// * `request` - The protocol-agnostic request to execute
    ///
    /// # Returns
    ///
    /// A protocol-agnostic response or an error
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, A2AError>;

    /// Execute a request whose response is a Server-Sent Events stream
    ///
    /// Transports without streaming support return `A2AError::Transport`.
    async fn execute_streaming(
        &self,
        request: TransportRequest,
    ) -> Result<TaskEventStream, A2AError> {
        Err(A2AError::Transport(format!(
            "Streaming is not supported by this transport ({})",
            request.endpoint
        )))
    }

    /// Get the base URL or identifier for this transport
    ///
    /// For HTTP transports, this would be the base URL (e.g., "<https://agent.example.com>")
    fn base_url(&self) -> &Url;

    /// Check if this transport supports streaming responses
    fn supports_streaming(&self) -> bool {
        false
    }
}

/// Implement Transport for boxed transports
#[async_trait]
impl<T: Transport> Transport for Box<T> {
    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), A2AError>> {
        (**self).poll_ready(cx)
    }

    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, A2AError> {
        (**self).execute(request).await
    }

    async fn execute_streaming(
        &self,
        request: TransportRequest,
    ) -> Result<TaskEventStream, A2AError> {
        (**self).execute_streaming(request).await
    }

    fn base_url(&self) -> &Url {
        (**self).base_url()
    }

    fn supports_streaming(&self) -> bool {
        (**self).supports_streaming()
    }
}
