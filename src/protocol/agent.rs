//! Agent discovery and capability types

use serde::{Deserialize, Serialize};

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent.json` and describes
/// the agent's capabilities, skills, and authentication requirements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Base URL the agent is reachable at
    pub url: String,

    /// Agent version
    pub version: String,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    /// Skills the agent can be invoked for, in advertised order
    #[serde(default)]
    pub skills: Vec<AgentSkill>,

    /// Supported authentication schemes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<SecurityScheme>,

    /// URL to agent documentation
    #[serde(
        rename = "documentationUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub documentation_url: Option<String>,
}

impl AgentCard {
    /// Create a new agent card
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            version: version.into(),
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
            authentication: Vec::new(),
            documentation_url: None,
        }
    }

    /// Set the capability flags
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Add a skill to the agent card
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Add authentication schemes
    pub fn with_authentication(mut self, schemes: Vec<SecurityScheme>) -> Self {
        self.authentication = schemes;
        self
    }

    /// Set the documentation URL
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Look up an advertised skill by id
    pub fn skill(&self, id: &str) -> Option<&AgentSkill> {
        self.skills.iter().find(|skill| skill.id == id)
    }
}

/// Agent capabilities
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCapabilities {
    /// Supports streaming task progress
    #[serde(default)]
    pub streaming: bool,

    /// Supports push notifications via webhooks
    #[serde(rename = "pushNotifications", default)]
    pub push_notifications: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable streaming
    pub fn with_streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Enable push notifications
    pub fn with_push_notifications(mut self) -> Self {
        self.push_notifications = true;
        self
    }
}

/// A named capability the agent can be invoked for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Stable identifier used to route tasks
    pub id: String,

    /// Display name
    pub name: String,

    /// What the skill does
    pub description: String,

    /// Accepted input content types
    #[serde(default)]
    pub input_modes: Vec<String>,

    /// Produced output content types
    #[serde(default)]
    pub output_modes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl AgentSkill {
    /// Create a skill taking plain text and producing JSON
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            input_modes: vec!["text/plain".to_string()],
            output_modes: vec!["application/json".to_string()],
            tags: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Replace the accepted input content types
    pub fn with_input_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_modes = modes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the produced output content types
    pub fn with_output_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_modes = modes.into_iter().map(Into::into).collect();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add an example prompt
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// Security scheme for authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SecurityScheme {
    /// API key carried in a request header
    #[serde(rename_all = "camelCase")]
    ApiKey {
        /// Where the key is carried (always "header" here)
        #[serde(rename = "in")]
        location: String,
        /// Header name
        name: String,
    },

    /// HTTP `Authorization` scheme (bearer or basic)
    #[serde(rename_all = "camelCase")]
    Http {
        scheme: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,
    },
}

impl SecurityScheme {
    /// Bearer token scheme
    pub fn bearer() -> Self {
        SecurityScheme::Http {
            scheme: "bearer".to_string(),
            bearer_format: None,
        }
    }

    /// Basic HTTP scheme
    pub fn basic() -> Self {
        SecurityScheme::Http {
            scheme: "basic".to_string(),
            bearer_format: None,
        }
    }

    /// API key in the given header
    pub fn api_key(header: impl Into<String>) -> Self {
        SecurityScheme::ApiKey {
            location: "header".to_string(),
            name: header.into(),
        }
    }
}
