//! Skill handlers invoked by the task service
//!
//! A handler is the business logic behind one advertised skill. It receives
//! the concatenated text of a task's message and either produces a structured
//! result, asks for human input, or fails. Handler errors never escape the
//! task service; they are recorded on the task.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::protocol::{error::A2AError, message::Message, AgentSkill};

pub mod compliance;

pub use compliance::{ComplianceHandler, KeywordRule, Severity};

/// What the handler sees besides the extracted text
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Id of the task being processed
    pub task_id: String,

    /// The full originating message, for handlers that look past text parts
    pub message: Message,
}

/// Successful handler result
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    /// Processing finished; the map becomes the task's data artifact
    Completed(Map<String, Value>),

    /// Processing needs a human before it can go on
    InputRequired(String),
}

impl HandlerOutcome {
    /// Completed outcome from any JSON value; non-objects are wrapped as `{"result": value}`
    pub fn completed(value: Value) -> Self {
        match value {
            Value::Object(map) => HandlerOutcome::Completed(map),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                HandlerOutcome::Completed(map)
            }
        }
    }
}

/// Business logic behind a skill
#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    /// Skill descriptor advertised on the agent card
    fn skill(&self) -> AgentSkill;

    /// Process the text content of a task
    async fn handle(&self, input: &str, ctx: &HandlerContext) -> anyhow::Result<HandlerOutcome>;
}

/// Adapter turning a closure into a [`TaskHandler`]
pub struct FnHandler<F> {
    skill: AgentSkill,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&str) -> anyhow::Result<HandlerOutcome> + Send + Sync + 'static,
{
    /// Wrap `f` as the handler for `skill`
    pub fn new(skill: AgentSkill, f: F) -> Self {
        Self { skill, f }
    }
}

#[async_trait]
impl<F> TaskHandler for FnHandler<F>
where
    F: Fn(&str) -> anyhow::Result<HandlerOutcome> + Send + Sync + 'static,
{
    fn skill(&self) -> AgentSkill {
        self.skill.clone()
    }

    async fn handle(&self, input: &str, _ctx: &HandlerContext) -> anyhow::Result<HandlerOutcome> {
        (self.f)(input)
    }
}

struct Entry {
    skill: AgentSkill,
    handler: Arc<dyn TaskHandler>,
}

/// Skill id to handler mapping with a fallback for unrouted tasks
pub struct HandlerRegistry {
    // entries[0] is the default handler
    entries: Vec<Entry>,
}

impl HandlerRegistry {
    /// Create a registry whose default handler serves tasks without a skill id
    pub fn new(default: impl TaskHandler) -> Self {
        Self::from_arc(Arc::new(default))
    }

    /// Create a registry from a shared default handler
    pub fn from_arc(default: Arc<dyn TaskHandler>) -> Self {
        Self {
            entries: vec![Entry {
                skill: default.skill(),
                handler: default,
            }],
        }
    }

    /// Register a handler under its skill id
    ///
    /// A handler whose skill id is already taken replaces the previous one,
    /// keeping its position in the advertised skill list.
    pub fn register(mut self, handler: impl TaskHandler) -> Self {
        let handler: Arc<dyn TaskHandler> = Arc::new(handler);
        let skill = handler.skill();

        match self.entries.iter_mut().find(|e| e.skill.id == skill.id) {
            Some(entry) => {
                tracing::warn!(skill_id = %skill.id, "replacing registered skill handler");
                entry.skill = skill;
                entry.handler = handler;
            }
            None => self.entries.push(Entry { skill, handler }),
        }
        self
    }

    /// Pick the handler for a task
    ///
    /// # Errors
    ///
    /// Returns `A2AError::Validation` when an explicit skill id is not registered
    pub fn resolve(&self, skill_id: Option<&str>) -> Result<Arc<dyn TaskHandler>, A2AError> {
        let Some(id) = skill_id else {
            return Ok(self.entries[0].handler.clone());
        };

        self.entries
            .iter()
            .find(|e| e.skill.id == id)
            .map(|e| e.handler.clone())
            .ok_or_else(|| A2AError::Validation(format!("Unknown skill: {}", id)))
    }

    /// Advertised skills, default handler first
    pub fn skills(&self) -> Vec<AgentSkill> {
        self.entries.iter().map(|e| e.skill.clone()).collect()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field(
                "skills",
                &self.entries.iter().map(|e| &e.skill.id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
