use std::{
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use async_trait::async_trait;
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Mock transport for internal testing
///
/// Answers every request with the configured handler and records what was
/// sent, so tests can assert on paths, headers and bodies.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Arc<dyn Fn(&TransportRequest) -> TransportResponse + Send + Sync>,
    sent: Arc<Mutex<Vec<TransportRequest>>>,
    base_url: Url,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            sent: Arc::default(),
            base_url: Url::parse("mock://agent/").unwrap(),
        }
    }

    /// Create a mock transport that always returns 200 OK with an empty body
    pub fn ok() -> Self {
        Self::new(|_| TransportResponse::new(200))
    }

    /// Requests executed so far, oldest first
    pub fn sent(&self) -> Vec<TransportRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let response = (self.handler)(&request);
        self.sent.lock().unwrap().push(request);
        Ok(response)
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
