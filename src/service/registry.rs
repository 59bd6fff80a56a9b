//! Agent card registry

use std::sync::Arc;

use crate::{
    handler::HandlerRegistry,
    protocol::{AgentCapabilities, AgentCard, SecurityScheme},
};

/// Holds the agent card built once at startup
///
/// The card is never mutated after construction, so every caller sees the
/// same descriptor for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct AgentCardRegistry {
    card: Arc<AgentCard>,
}

impl AgentCardRegistry {
    /// Freeze a card
    pub fn new(card: AgentCard) -> Self {
        Self {
            card: Arc::new(card),
        }
    }

    /// Build the card from agent identity, the registered skills and the auth schemes in use
    pub fn build(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
        handlers: &HandlerRegistry,
        authentication: Vec<SecurityScheme>,
    ) -> Self {
        let card = handlers.skills().into_iter().fold(
            AgentCard::new(name, description, url, version)
                .with_capabilities(AgentCapabilities::new().with_streaming())
                .with_authentication(authentication),
            AgentCard::with_skill,
        );
        Self::new(card)
    }

    /// The agent card
    pub fn get_card(&self) -> Arc<AgentCard> {
        self.card.clone()
    }
}
