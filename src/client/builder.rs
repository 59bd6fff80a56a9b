//! Fluent construction of an [`AgentClient`]

use std::{sync::Arc, time::Duration};

use url::Url;

use crate::{
    client::{A2AProtocolService, AgentClient, ClientConfig},
    codec::JsonCodec,
    layer::AuthCredentials,
    transport::{HttpTransport, Transport},
};

/// Builds an [`AgentClient`] over a transport
///
/// ```rust,no_run
/// use tower_a2a_server::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "http://127.0.0.1:8000".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_bearer_auth("token123")
///     .with_timeout(Duration::from_secs(60))
///     .build();
///
/// let card = client.discover().await?;
/// println!("Connected to: {}", card.name);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Talk to the agent behind `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_auth(mut self, credentials: AuthCredentials) -> Self {
        self.config.auth = Some(credentials);
        self
    }

    pub fn with_bearer_auth(self, token: impl Into<String>) -> Self {
        self.with_auth(AuthCredentials::bearer(token))
    }

    /// Send `key` in the `header` the agent card advertises
    pub fn with_api_key_auth(self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.with_auth(AuthCredentials::api_key(key, header))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Turn response checking on or off (on by default)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config.validate_responses = enabled;
        self
    }

    pub fn build(self) -> AgentClient<A2AProtocolService<T>> {
        let service = A2AProtocolService::new(self.transport, Arc::new(JsonCodec));
        AgentClient::new(service, self.config)
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Client for the HTTP+JSON binding at `agent_url`
    pub fn new_http(agent_url: Url) -> Self {
        Self::new(HttpTransport::new(agent_url))
    }
}
