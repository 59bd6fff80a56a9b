//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{
        error::A2AError,
        message::{Message, Part},
        operation::A2AOperation,
        task::TaskStatus,
    },
    service::{A2ARequest, A2AResponse},
};

/// Largest page a list request may ask for
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Layer that validates A2A protocol requests and responses
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct A2AValidationService<S> {
    inner: S,
}

/// Check an operation before it is executed
///
/// Empty message part lists are allowed through: they produce a failed task
/// rather than a rejected request.
pub fn validate_request(operation: &A2AOperation) -> Result<(), A2AError> {
    match operation {
        A2AOperation::CreateTask { request, .. } => {
            if let Some(skill_id) = &request.skill_id {
                if skill_id.trim().is_empty() {
                    return Err(A2AError::Validation("Skill ID cannot be empty".into()));
                }
            }
            validate_message(&request.message)?;
        }
        A2AOperation::GetTask { task_id } => validate_task_id(task_id)?,
        A2AOperation::SendFollowUp { task_id, message } => {
            validate_task_id(task_id)?;
            validate_message(message)?;
        }
        A2AOperation::ListTasks {
            limit: Some(limit), ..
        } => {
            if *limit == 0 {
                return Err(A2AError::Validation("Limit must be greater than 0".into()));
            }
            if *limit > MAX_LIST_LIMIT {
                return Err(A2AError::Validation(format!(
                    "Limit cannot exceed {}",
                    MAX_LIST_LIMIT
                )));
            }
        }
        _ => {}
    }

    Ok(())
}

fn validate_task_id(task_id: &str) -> Result<(), A2AError> {
    if task_id.trim().is_empty() {
        return Err(A2AError::Validation("Task ID cannot be empty".into()));
    }
    Ok(())
}

fn validate_message(message: &Message) -> Result<(), A2AError> {
    for part in &message.parts {
        if let Part::File(file) = part {
            let valid = file
                .mime_type
                .split_once('/')
                .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty());
            if !valid {
                return Err(A2AError::Validation(format!(
                    "Invalid file MIME type: {:?}",
                    file.mime_type
                )));
            }
        }
    }
    Ok(())
}

/// Check that a response respects the task lifecycle rules
///
/// A violation is the responder's fault, so it is reported as a protocol
/// error rather than a validation error.
pub fn validate_response(resp: &A2AResponse) -> Result<(), A2AError> {
    match resp {
        A2AResponse::Task(task) => {
            if task.id.is_empty() {
                return Err(A2AError::Protocol("Task ID cannot be empty".into()));
            }

            if task.status == TaskStatus::Completed && task.artifacts.is_empty() {
                return Err(A2AError::Protocol(
                    "Completed task must have artifacts".into(),
                ));
            }

            if task.status == TaskStatus::Failed {
                match &task.error {
                    None => {
                        return Err(A2AError::Protocol(
                            "Failed task must have an error".into(),
                        ))
                    }
                    Some(error) if error.message.trim().is_empty() => {
                        return Err(A2AError::Protocol(
                            "Failed task error must have a message".into(),
                        ))
                    }
                    Some(_) => {}
                }
                if !task.artifacts.is_empty() {
                    return Err(A2AError::Protocol(
                        "Failed task cannot have artifacts".into(),
                    ));
                }
            }
        }
        A2AResponse::AgentCard(card) => {
            if card.name.is_empty() {
                return Err(A2AError::Protocol("Agent name cannot be empty".into()));
            }
            if card.skills.is_empty() {
                return Err(A2AError::Protocol(
                    "Agent card must advertise at least one skill".into(),
                ));
            }
        }
        _ => {}
    }

    Ok(())
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
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
        // Validate request before passing to inner service
        if let Err(e) = validate_request(&req.operation) {
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;
            validate_response(&response)?;
            Ok(response)
        })
    }
}
