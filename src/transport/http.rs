//! HTTP transport implementation for A2A protocol

use std::task::{Context, Poll};

use async_trait::async_trait;
use url::Url;

use crate::{codec::SseCodec, protocol::error::A2AError, service::TaskEventStream};

use super::{Transport, TransportRequest, TransportResponse};

/// HTTP transport implementation using reqwest
///
/// This transport implements the HTTP+JSON binding of the A2A protocol.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the agent (e.g., "<https://agent.example.com>")
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }

    /// Resolve an endpoint path against the base URL
    ///
    /// A base URL with a path prefix (`https://host/agents/a/`) keeps it.
    fn url_for(&self, endpoint: &str) -> Result<Url, A2AError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| A2AError::Transport(format!("Invalid endpoint {}: {}", endpoint, e)))
    }

    fn request_builder(&self, request: &TransportRequest) -> Result<reqwest::RequestBuilder, A2AError> {
        let url = self.url_for(&request.endpoint)?;

        let mut req_builder = match request.method.as_str() {
            "POST" => self.client.post(url),
            "GET" => self.client.get(url),
            "PUT" => self.client.put(url),
            "DELETE" => self.client.delete(url),
            _ => {
                return Err(A2AError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.body.is_empty() {
            req_builder = req_builder.body(request.body.clone());
        }

        Ok(req_builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let response = self.request_builder(&request)?.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_streaming(
        &self,
        request: TransportRequest,
    ) -> Result<TaskEventStream, A2AError> {
        let response = self
            .request_builder(&request)?
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.bytes().await.unwrap_or_default();
            return Err(TransportResponse::new(status).body(body).to_error());
        }

        let events = SseCodec::new().parse_stream(response.bytes_stream());
        Ok(TaskEventStream::new(events))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}
