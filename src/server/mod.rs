//! HTTP front end for the task service, powered by axum.
//!
//! Serves:
//! - `GET  /.well-known/agent.json`: Agent Card discovery
//! - `POST /tasks`                 : create a task and run it
//! - `POST /tasks/stream`          : create a task, stream progress as SSE
//! - `GET  /tasks`                 : list tasks (`?status=&limit=`)
//! - `GET  /tasks/{id}`            : task snapshot
//! - `POST /tasks/{id}/send`       : follow-up message
//! - `GET  /health`                : health check
//!
//! Every route is translated into an [`A2AOperation`] and sent through the
//! Tower stack `auth → validation → TaskService`.

use std::{collections::HashMap, future::Future};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, ServiceExt};

use crate::{
    codec::sse::ERROR_EVENT,
    layer::{A2AValidationLayer, AuthCredentials, AuthLayer},
    protocol::{
        error::{A2AError, A2AResult},
        message::Message,
        operation::A2AOperation,
        task::{CreateTaskRequest, Task, TaskListResponse, TaskStatus},
        AgentCard,
    },
    service::{A2ARequest, A2AResponse, RequestContext, TaskService},
};

/// Shared state for the HTTP front end.
#[derive(Clone, Debug)]
pub struct AppState {
    tasks: TaskService,
    auth: Option<AuthLayer>,
    api_key_header: Option<String>,
}

impl AppState {
    /// Serve `tasks` without authentication
    pub fn new(tasks: TaskService) -> Self {
        Self {
            tasks,
            auth: None,
            api_key_header: None,
        }
    }

    /// Require `credentials` on every route except discovery and health
    pub fn with_auth(mut self, credentials: AuthCredentials) -> Self {
        if let AuthCredentials::ApiKey { header, .. } = &credentials {
            self.api_key_header = Some(header.clone());
        }
        self.auth = Some(AuthLayer::new(credentials));
        self
    }

    async fn call(&self, headers: &HeaderMap, operation: A2AOperation) -> A2AResult<A2AResponse> {
        let context = RequestContext::presented(AuthCredentials::from_headers(
            headers,
            self.api_key_header.as_deref(),
        ));

        ServiceBuilder::new()
            .option_layer(self.auth.clone())
            .layer(A2AValidationLayer::new())
            .service(self.tasks.clone())
            .oneshot(A2ARequest::new(operation, context))
            .await
    }

    async fn call_for_task(&self, headers: &HeaderMap, operation: A2AOperation) -> A2AResult<Task> {
        let name = operation.name();
        self.call(headers, operation)
            .await?
            .into_task()
            .ok_or_else(|| unexpected_response(name))
    }
}

/// Build the axum router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/.well-known/agent.json",
            get(get_agent_card).fallback(not_found),
        )
        .route(
            "/tasks",
            post(create_task).get(list_tasks).fallback(not_found),
        )
        .route(
            "/tasks/stream",
            post(create_task_streaming).fallback(not_found),
        )
        .route("/tasks/{id}", get(get_task).fallback(not_found))
        .route("/tasks/{id}/send", post(send_follow_up).fallback(not_found))
        .route("/health", get(health_check).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> A2AResult<()> {
    serve_with_shutdown(listener, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Serve until `shutdown` resolves, letting in-flight requests finish.
pub async fn serve_with_shutdown<F>(listener: TcpListener, app: Router, shutdown: F) -> A2AResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| A2AError::Transport(e.to_string()))?;

    tracing::info!("A2A agent listening on http://{}", addr);
    tracing::info!("   Agent Card: http://{}/.well-known/agent.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| A2AError::Transport(e.to_string()))?;

    tracing::info!("A2A agent stopped");
    Ok(())
}

impl IntoResponse for A2AError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = json!({ "message": self.to_string() });
        if let Some(task_id) = self.task_id() {
            body["taskId"] = json!(task_id);
        }

        (status, Json(body)).into_response()
    }
}

fn unexpected_response(operation: &str) -> A2AError {
    A2AError::Protocol(format!("Unexpected response to {}", operation))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> A2AResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| A2AError::Validation(format!("Invalid request body: {}", e)))
}

/// GET /.well-known/agent.json
async fn get_agent_card(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> A2AResult<Json<AgentCard>> {
    let card = state
        .call(&headers, A2AOperation::DiscoverAgent)
        .await?
        .into_agent_card()
        .ok_or_else(|| unexpected_response("discover_agent"))?;

    Ok(Json(AgentCard::clone(&card)))
}

/// POST /tasks
async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> A2AResult<Json<Task>> {
    let request: CreateTaskRequest = parse_body(&body)?;
    let operation = A2AOperation::CreateTask {
        request,
        stream: false,
    };

    Ok(Json(state.call_for_task(&headers, operation).await?))
}

/// POST /tasks/stream
async fn create_task_streaming(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> A2AResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let request: CreateTaskRequest = parse_body(&body)?;
    let operation = A2AOperation::CreateTask {
        request,
        stream: true,
    };

    let events = state
        .call(&headers, operation)
        .await?
        .into_stream()
        .ok_or_else(|| unexpected_response("create_task_streaming"))?
        .map(|item| match item {
            Ok(event) => Event::default().event(event.kind()).json_data(&event),
            Err(err) => Ok(Event::default()
                .event(ERROR_EVENT)
                .data(json!({ "message": err.to_string() }).to_string())),
        });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// GET /tasks
async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> A2AResult<Json<TaskListResponse>> {
    let status = params
        .get("status")
        .map(|s| s.parse::<TaskStatus>())
        .transpose()?;
    let limit = params
        .get("limit")
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| A2AError::Validation(format!("Invalid limit: {}", s)))
        })
        .transpose()?;

    let tasks = state
        .call(&headers, A2AOperation::ListTasks { status, limit })
        .await?
        .into_task_list()
        .ok_or_else(|| unexpected_response("list_tasks"))?;

    Ok(Json(TaskListResponse {
        total: tasks.len(),
        tasks,
    }))
}

/// GET /tasks/{id}
async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> A2AResult<Json<Task>> {
    let task = state
        .call_for_task(&headers, A2AOperation::GetTask { task_id })
        .await?;
    Ok(Json(task))
}

/// POST /tasks/{id}/send
async fn send_follow_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
    body: Bytes,
) -> A2AResult<Json<Task>> {
    let message: Message = parse_body(&body)?;
    let task = state
        .call_for_task(&headers, A2AOperation::SendFollowUp { task_id, message })
        .await?;
    Ok(Json(task))
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "A2A",
    }))
}

async fn not_found(uri: Uri) -> A2AError {
    A2AError::NotFound(uri.path().to_string())
}
