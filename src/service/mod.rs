//! Tower Service implementations

pub mod core;
pub mod registry;
pub mod request;
pub mod response;

pub use core::TaskService;
pub use registry::AgentCardRegistry;
pub use request::{A2ARequest, RequestContext};
pub use response::{A2AResponse, TaskEventStream};
