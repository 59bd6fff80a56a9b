//! Agent server configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields a working local agent:
//!
//! ```toml
//! bind = "127.0.0.1"
//! port = 8000
//! handler_timeout_secs = 30
//! max_tasks = 10000
//!
//! [agent]
//! name = "Compliance Review Agent"
//!
//! [auth]
//! bearer_token = "change-me"
//!
//! [compliance]
//! human_review_gate = false
//!
//! [[compliance.rules]]
//! keyword = "guarantee"
//! category = "misleading_claims"
//! severity = "high"
//! ```

use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    handler::{ComplianceHandler, HandlerRegistry, KeywordRule},
    layer::AuthCredentials,
    protocol::error::{A2AError, A2AResult},
    server::AppState,
    service::{AgentCardRegistry, TaskService},
    store::InMemoryTaskStore,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// URL advertised on the agent card; derived from `bind` and `port` when unset
    pub public_url: Option<String>,
    pub handler_timeout_secs: Option<u64>,
    /// Retention bound for the in-memory task store
    pub max_tasks: Option<usize>,
    pub agent: AgentSettings,
    pub auth: AuthSettings,
    pub compliance: ComplianceSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            public_url: None,
            handler_timeout_secs: None,
            max_tasks: None,
            agent: AgentSettings::default(),
            auth: AuthSettings::default(),
            compliance: ComplianceSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "Compliance Review Agent".to_string(),
            description: "Reviews documents for risky wording and routes them to human review"
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub bearer_token: Option<String>,
    pub api_key: Option<String>,
    pub api_key_header: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_key: None,
            api_key_header: "X-API-Key".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSettings {
    /// Stop in `input-required` instead of completing when review is needed
    pub human_review_gate: bool,
    pub rules: Vec<KeywordRule>,
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            human_review_gate: false,
            rules: KeywordRule::defaults(),
        }
    }
}

impl ServerConfig {
    /// Read and validate a TOML config file
    pub async fn load(path: &Path) -> A2AResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| A2AError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(content: &str) -> A2AResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| A2AError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values for consistency
    pub fn validate(&self) -> A2AResult<()> {
        let mut errors = Vec::new();

        if self.agent.name.trim().is_empty() {
            errors.push("agent.name must not be empty");
        }
        if self.handler_timeout_secs == Some(0) {
            errors.push("handler_timeout_secs must be greater than 0");
        }
        if self.max_tasks == Some(0) {
            errors.push("max_tasks must be greater than 0");
        }
        if self.auth.bearer_token.is_some() && self.auth.api_key.is_some() {
            errors.push("auth.bearer_token and auth.api_key are mutually exclusive");
        }
        if self.auth.api_key.is_some() && self.auth.api_key_header.trim().is_empty() {
            errors.push("auth.api_key_header must not be empty");
        }
        if self
            .compliance
            .rules
            .iter()
            .any(|rule| rule.keyword.trim().is_empty())
        {
            errors.push("compliance.rules keywords must not be empty");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(A2AError::Config(errors.join("; ")))
        }
    }

    /// Address to listen on
    pub fn socket_addr(&self) -> A2AResult<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| A2AError::Config(format!("Invalid bind address: {}", e)))
    }

    /// URL advertised on the agent card
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.bind, self.port))
    }

    /// Credentials callers must present, if any
    pub fn auth_credentials(&self) -> Option<AuthCredentials> {
        if let Some(token) = &self.auth.bearer_token {
            return Some(AuthCredentials::bearer(token));
        }
        self.auth
            .api_key
            .as_ref()
            .map(|key| AuthCredentials::api_key(key, &self.auth.api_key_header))
    }

    /// Assemble the task service described by this config
    pub fn build_service(&self) -> TaskService {
        let handler = ComplianceHandler::new(self.compliance.rules.clone())
            .with_human_review_gate(self.compliance.human_review_gate);
        let handlers = HandlerRegistry::new(handler);

        let cards = AgentCardRegistry::build(
            &self.agent.name,
            &self.agent.description,
            self.public_url(),
            &self.agent.version,
            &handlers,
            self.auth_credentials()
                .map(|creds| vec![creds.scheme()])
                .unwrap_or_default(),
        );

        let mut service = TaskService::new(handlers, cards);
        if let Some(max) = self.max_tasks {
            service = service.with_store(Arc::new(InMemoryTaskStore::with_max_tasks(max)));
        }
        if let Some(secs) = self.handler_timeout_secs {
            service = service.with_handler_timeout(Duration::from_secs(secs));
        }
        service
    }

    /// Router state: the task service plus the configured auth
    pub fn app_state(&self) -> AppState {
        let state = AppState::new(self.build_service());
        match self.auth_credentials() {
            Some(credentials) => state.with_auth(credentials),
            None => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{handler::Severity, protocol::SecurityScheme};

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.public_url(), "http://127.0.0.1:8000");
        assert_eq!(config.compliance.rules, KeywordRule::defaults());
        assert!(config.auth_credentials().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = ServerConfig::from_toml_str(
            r#"
            bind = "0.0.0.0"
            port = 9000
            public_url = "https://agents.example.com/compliance"
            handler_timeout_secs = 5
            max_tasks = 100

            [agent]
            name = "Reviewer"

            [auth]
            api_key = "k-1"
            api_key_header = "X-Agent-Key"

            [compliance]
            human_review_gate = true

            [[compliance.rules]]
            keyword = "risk-free"
            category = "misleading_claims"
            severity = "critical"
            "#,
        )
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert_eq!(config.public_url(), "https://agents.example.com/compliance");
        assert_eq!(config.agent.description, AgentSettings::default().description);
        assert_eq!(config.compliance.rules.len(), 1);
        assert_eq!(config.compliance.rules[0].severity, Severity::Critical);
        assert_eq!(
            config.auth_credentials(),
            Some(AuthCredentials::api_key("k-1", "X-Agent-Key"))
        );

        let card = config.build_service().get_card();
        assert_eq!(card.name, "Reviewer");
        assert_eq!(card.url, "https://agents.example.com/compliance");
        assert_eq!(
            card.authentication,
            vec![SecurityScheme::api_key("X-Agent-Key")]
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let both = r#"
            [auth]
            bearer_token = "a"
            api_key = "b"
        "#;
        assert!(matches!(
            ServerConfig::from_toml_str(both),
            Err(A2AError::Config(_))
        ));

        assert!(ServerConfig::from_toml_str("handler_timeout_secs = 0").is_err());
        assert!(ServerConfig::from_toml_str("port = \"eighty\"").is_err());
        assert!(ServerConfig::from_toml_str("bind = \"not an ip\"")
            .unwrap()
            .socket_addr()
            .is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ServerConfig::load(Path::new("/definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, A2AError::Config(_)));
    }
}
