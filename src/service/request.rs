//! Requests flowing through the Tower stack

use std::{collections::HashMap, time::Duration};

use crate::{layer::auth::AuthCredentials, protocol::operation::A2AOperation};

/// One protocol operation plus the context it runs in
#[derive(Debug, Clone)]
pub struct A2ARequest {
    pub operation: A2AOperation,
    pub context: RequestContext,
}

impl A2ARequest {
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Per-request context
///
/// The same type travels both directions. A client fills it from its
/// [`ClientConfig`](crate::client::ClientConfig) with the credentials to send;
/// the HTTP front end fills it with the credentials the caller presented, for
/// [`AuthLayer`](crate::layer::AuthLayer) to check.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub auth: Option<AuthCredentials>,

    /// Deadline for the whole exchange; only the client enforces it
    pub timeout: Option<Duration>,

    /// Extra headers a client sends with the request
    pub headers: HashMap<String, String>,
}

impl RequestContext {
    /// Context for a caller who presented `auth`, or nothing
    pub fn presented(auth: Option<AuthCredentials>) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_anonymous_without_deadline() {
        let context = RequestContext::default();
        assert!(context.auth.is_none());
        assert!(context.timeout.is_none());
        assert!(context.headers.is_empty());
    }

    #[test]
    fn test_presented_credentials() {
        let context = RequestContext::presented(Some(AuthCredentials::bearer("t")));
        assert_eq!(context.auth, Some(AuthCredentials::bearer("t")));

        let request = A2ARequest::new(A2AOperation::DiscoverAgent, context);
        assert!(request.operation.is_public());
    }
}
