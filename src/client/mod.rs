//! High-level client API for talking to A2A agents

pub mod agent;
pub mod builder;
pub mod config;
pub mod service;

pub use agent::AgentClient;
pub use builder::A2AClientBuilder;
pub use config::ClientConfig;
pub use service::A2AProtocolService;
