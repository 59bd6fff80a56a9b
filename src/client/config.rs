//! Client configuration

use std::{collections::HashMap, time::Duration};

use crate::{layer::AuthCredentials, service::RequestContext};

/// Deadline applied to each call unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How an [`AgentClient`](super::AgentClient) talks to its agent
///
/// The agent's address belongs to the transport; this holds what goes into
/// every request on top of it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,

    /// Credentials sent with every request
    pub auth: Option<AuthCredentials>,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,

    /// Reject responses that break the task lifecycle rules
    pub validate_responses: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            auth: None,
            headers: HashMap::new(),
            validate_responses: true,
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    /// Context for one outgoing request
    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            auth: self.auth.clone(),
            timeout: Some(self.timeout),
            headers: self.headers.clone(),
        }
    }
}
