//! # Tower A2A Server
//!
//! A Tower-based Agent2Agent (A2A) agent: agent card discovery, a task
//! lifecycle service with pluggable skill handlers, an axum HTTP front end,
//! and a matching client.
//!
//! The server side is a stack of Tower services. An axum route turns the
//! HTTP request into an [`A2AOperation`](protocol::A2AOperation), which then
//! passes through [`AuthLayer`](layer::AuthLayer) and
//! [`A2AValidationLayer`](layer::A2AValidationLayer) before reaching
//! [`TaskService`](service::TaskService).
//!
//! ## Example
//!
//! ```rust,no_run
//! use tower_a2a_server::{config::ServerConfig, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//!     server::serve(listener, server::router(config.app_state())).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod handler;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod store;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClientBuilder, AgentClient},
        handler::{HandlerOutcome, HandlerRegistry, TaskHandler},
        protocol::error::A2AError,
        protocol::{
            A2AOperation, AgentCard, CreateTaskRequest, Message, Part, Role, Task, TaskEvent,
            TaskStatus,
        },
        service::{AgentCardRegistry, TaskService},
    };
}
