//! Authentication layer for A2A protocol
//!
//! Clients attach [`AuthCredentials`] to the request context and the protocol
//! service turns them into headers. On the server the HTTP front end extracts
//! whatever credentials the caller presented into the same context field, and
//! [`AuthLayer`] rejects requests that do not match the configured ones.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose, Engine as _};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{agent::SecurityScheme, error::A2AError},
    service::{A2ARequest, A2AResponse},
};

/// Authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub enum AuthCredentials {
    /// Bearer token authentication
    Bearer(String),

    /// API key authentication
    ApiKey { key: String, header: String },

    /// Basic HTTP authentication
    Basic { username: String, password: String },
}

impl AuthCredentials {
    /// Create bearer token credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Create API key credentials
    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            header: header.into(),
        }
    }

    /// Create basic auth credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the header name and value for this credential
    pub fn to_header(&self) -> (String, String) {
        match self {
            AuthCredentials::Bearer(token) => {
                ("Authorization".to_string(), format!("Bearer {}", token))
            }
            AuthCredentials::ApiKey { key, header } => (header.clone(), key.clone()),
            AuthCredentials::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                ("Authorization".to_string(), format!("Basic {}", encoded))
            }
        }
    }

    /// Read the credentials a caller presented
    ///
    /// When an API key header is configured it is consulted first, so an
    /// unrelated `Authorization` header added along the way does not shadow
    /// the key. Otherwise `Authorization: Bearer` and `Authorization: Basic`
    /// are recognised. Malformed values are treated as absent.
    pub fn from_headers(headers: &HeaderMap, api_key_header: Option<&str>) -> Option<Self> {
        if let Some(header) = api_key_header {
            if let Some(key) = headers.get(header).and_then(|v| v.to_str().ok()) {
                return Some(Self::api_key(key, header));
            }
        }

        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(Self::bearer(token.trim()));
        }
        let encoded = value.strip_prefix("Basic ")?;
        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self::basic(username, password))
    }

    /// Compare against presented credentials without leaking secret contents through timing
    pub fn verify(&self, presented: &AuthCredentials) -> bool {
        match (self, presented) {
            (AuthCredentials::Bearer(expected), AuthCredentials::Bearer(given)) => {
                secret_eq(expected, given)
            }
            (
                AuthCredentials::ApiKey { key, header },
                AuthCredentials::ApiKey {
                    key: given,
                    header: given_header,
                },
            ) => header.eq_ignore_ascii_case(given_header) && secret_eq(key, given),
            (
                AuthCredentials::Basic { username, password },
                AuthCredentials::Basic {
                    username: given_user,
                    password: given_password,
                },
            ) => secret_eq(username, given_user) & secret_eq(password, given_password),
            _ => false,
        }
    }

    /// Security scheme advertising this kind of credential
    pub fn scheme(&self) -> SecurityScheme {
        match self {
            AuthCredentials::Bearer(_) => SecurityScheme::bearer(),
            AuthCredentials::ApiKey { header, .. } => SecurityScheme::api_key(header.clone()),
            AuthCredentials::Basic { .. } => SecurityScheme::basic(),
        }
    }
}

// Length is not hidden; contents are.
fn secret_eq(expected: &str, given: &str) -> bool {
    let (expected, given) = (expected.as_bytes(), given.as_bytes());
    expected.len() == given.len()
        && expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthCredentials::Bearer(_) => f.write_str("Bearer(***)"),
            AuthCredentials::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("header", header)
                .finish_non_exhaustive(),
            AuthCredentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Authentication layer
///
/// Requires every non-public operation to carry the expected credentials.
/// Agent discovery is always allowed.
#[derive(Clone, Debug)]
pub struct AuthLayer {
    credentials: AuthCredentials,
}

impl AuthLayer {
    /// Create a new authentication layer
    pub fn new(credentials: AuthCredentials) -> Self {
        Self { credentials }
    }

    /// Require a bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(AuthCredentials::bearer(token))
    }

    /// Require an API key in `header`
    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(AuthCredentials::api_key(key, header))
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

/// Authentication service
#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    credentials: AuthCredentials,
}

impl<S> AuthService<S> {
    fn check(&self, req: &A2ARequest) -> Result<(), A2AError> {
        if req.operation.is_public() {
            return Ok(());
        }

        match &req.context.auth {
            None => Err(A2AError::Auth("Missing credentials".into())),
            Some(presented) if self.credentials.verify(presented) => Ok(()),
            Some(_) => Err(A2AError::Auth("Invalid credentials".into())),
        }
    }
}

impl<S> Service<A2ARequest> for AuthService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = self.check(&req) {
            tracing::debug!(operation = req.operation.name(), error = %e, "request rejected");
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        protocol::{operation::A2AOperation, task::TaskStatus},
        service::RequestContext,
    };

    #[test]
    fn test_bearer_credentials() {
        let creds = AuthCredentials::bearer("test-token");
        let (header, value) = creds.to_header();

        assert_eq!(header, "Authorization");
        assert_eq!(value, "Bearer test-token");
    }

    #[test]
    fn test_api_key_credentials() {
        let creds = AuthCredentials::api_key("secret-key", "X-API-Key");
        let (header, value) = creds.to_header();

        assert_eq!(header, "X-API-Key");
        assert_eq!(value, "secret-key");
    }

    #[test]
    fn test_basic_credentials_round_trip_through_headers() {
        let creds = AuthCredentials::basic("user", "pa:ss");
        let (_, value) = creds.to_header();
        assert!(value.starts_with("Basic "));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        assert_eq!(AuthCredentials::from_headers(&headers, None), Some(creds));
    }

    #[test]
    fn test_from_headers_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("k-1"));

        assert_eq!(AuthCredentials::from_headers(&headers, None), None);
        assert_eq!(
            AuthCredentials::from_headers(&headers, Some("x-api-key")),
            Some(AuthCredentials::api_key("k-1", "x-api-key"))
        );
    }

    #[test]
    fn test_configured_api_key_wins_over_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("k-1"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic !!not-base64"));

        let presented = AuthCredentials::from_headers(&headers, Some("X-API-Key")).unwrap();
        assert!(AuthCredentials::api_key("k-1", "X-API-Key").verify(&presented));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer proxy-token"));
        let presented = AuthCredentials::from_headers(&headers, Some("X-API-Key")).unwrap();
        assert!(AuthCredentials::api_key("k-1", "X-API-Key").verify(&presented));
    }

    #[test]
    fn test_verify() {
        let expected = AuthCredentials::basic("user", "pass");
        assert!(expected.verify(&AuthCredentials::basic("user", "pass")));
        assert!(!expected.verify(&AuthCredentials::basic("user", "pasS")));
        assert!(!expected.verify(&AuthCredentials::basic("user", "pass2")));
        assert!(!expected.verify(&AuthCredentials::bearer("pass")));
        assert!(!AuthCredentials::bearer("abc").verify(&AuthCredentials::bearer("abd")));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", AuthCredentials::bearer("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }

    fn list_request(auth: Option<AuthCredentials>) -> A2ARequest {
        let mut context = RequestContext::default();
        context.auth = auth;
        A2ARequest::new(
            A2AOperation::ListTasks {
                status: Some(TaskStatus::Completed),
                limit: None,
            },
            context,
        )
    }

    #[tokio::test]
    async fn test_auth_service_checks_credentials() {
        let inner =
            tower::service_fn(|_req: A2ARequest| async { Ok::<_, A2AError>(A2AResponse::Empty) });
        let service = AuthLayer::bearer("token").layer(inner);

        let missing = service.clone().oneshot(list_request(None)).await;
        assert!(matches!(missing, Err(A2AError::Auth(_))));

        let wrong = service
            .clone()
            .oneshot(list_request(Some(AuthCredentials::bearer("nope"))))
            .await;
        assert!(matches!(wrong, Err(A2AError::Auth(_))));

        let ok = service
            .clone()
            .oneshot(list_request(Some(AuthCredentials::bearer("token"))))
            .await;
        assert!(ok.unwrap().is_empty());

        let discover = service
            .oneshot(A2ARequest::new(
                A2AOperation::DiscoverAgent,
                RequestContext::default(),
            ))
            .await;
        assert!(discover.is_ok());
    }
}
