//! Client and server talking over a real socket

use std::time::Duration;

use futures::StreamExt;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_a2a_server::{
    config::ServerConfig,
    prelude::*,
    protocol::{Part, TaskEvent},
    server,
};
use url::Url;

struct RunningAgent {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), A2AError>>,
}

impl RunningAgent {
    async fn start(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        let app = server::router(config.app_state());
        let handle = tokio::spawn(server::serve_with_shutdown(listener, app, async move {
            let _ = rx.await;
        }));

        Self {
            url: Url::parse(&format!("http://{}/", addr)).unwrap(),
            shutdown: Some(tx),
            handle,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_discover_and_review() {
    let agent = RunningAgent::start(ServerConfig::default()).await;
    let mut client = A2AClientBuilder::new_http(agent.url.clone())
        .build();

    let card = client.discover().await.unwrap();
    assert_eq!(card.name, "Compliance Review Agent");
    assert_eq!(card.skills[0].id, "compliance-review");
    assert!(card.capabilities.streaming);

    let task = client
        .create_task(Message::user("We guarantee unlimited confidential returns"))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.artifacts[0].as_data().unwrap()["risk_count"], 3);

    let fetched = client.get_task(&task.id).await.unwrap();
    assert_eq!(fetched, task);

    agent.stop().await;
}

#[tokio::test]
async fn test_list_and_follow_up() {
    let agent = RunningAgent::start(ServerConfig::default()).await;
    let mut client = A2AClientBuilder::new_http(agent.url.clone())
        .build();

    let completed = client
        .create_task(Message::user("Plain newsletter"))
        .await
        .unwrap();
    let failed = client
        .create_task(Message::with_parts(Role::User, vec![Part::file("text/plain", b"x".to_vec())]))
        .await
        .unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert_eq!(failed.error.as_ref().unwrap().code, "NO_TEXT_CONTENT");

    let all = client.list_tasks(None, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_failed = client
        .list_tasks_by_status(TaskStatus::Failed)
        .await
        .unwrap();
    assert_eq!(only_failed.len(), 1);
    assert_eq!(only_failed[0].id, failed.id);

    let after = client
        .send_follow_up(&completed.id, Message::user("Any update?"))
        .await
        .unwrap();
    assert_eq!(after, completed);

    agent.stop().await;
}

#[tokio::test]
async fn test_streamed_task() {
    let agent = RunningAgent::start(ServerConfig::default()).await;
    let mut client = A2AClientBuilder::new_http(agent.url.clone())
        .build();

    let stream = client
        .create_task_streaming(CreateTaskRequest::new(Message::user("We guarantee it")))
        .await
        .unwrap();
    let events: Vec<TaskEvent> = stream
        .map(|event| event.unwrap())
        .collect()
        .await;

    let kinds: Vec<_> = events.iter().map(TaskEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "status-update",
            "status-update",
            "artifact-update",
            "status-update"
        ]
    );
    assert!(events.last().unwrap().is_final());

    let task = client.get_task(events[0].task_id()).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    agent.stop().await;
}

#[tokio::test]
async fn test_errors_cross_the_wire() {
    let agent = RunningAgent::start(ServerConfig::default()).await;
    let mut client = A2AClientBuilder::new_http(agent.url.clone())
        .build();

    let err = client.get_task("no-such-task").await.unwrap_err();
    assert!(matches!(err, A2AError::TaskNotFound { ref task_id } if task_id == "no-such-task"));

    let err = client
        .create_task_for_skill(Message::user("hello"), "translation")
        .await
        .unwrap_err();
    assert!(matches!(err, A2AError::Validation(_)));
    assert!(client.list_tasks(None, None).await.unwrap().is_empty());

    let http = reqwest::Client::new();
    let response = http
        .post(agent.url.join("tasks").unwrap())
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = http
        .delete(agent.url.join("tasks").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let health: serde_json::Value = http
        .get(agent.url.join("health").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    agent.stop().await;
}

#[tokio::test]
async fn test_bearer_auth() {
    let mut config = ServerConfig::default();
    config.auth.bearer_token = Some("s3cret".to_string());
    let agent = RunningAgent::start(config).await;

    let mut anonymous = A2AClientBuilder::new_http(agent.url.clone())
        .build();
    let card = anonymous.discover().await.unwrap();
    assert_eq!(card.authentication.len(), 1);

    let err = anonymous
        .create_task(Message::user("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, A2AError::Auth(_)));

    let mut wrong = A2AClientBuilder::new_http(agent.url.clone())
        .with_bearer_auth("guess")
        .build();
    assert!(matches!(
        wrong.list_tasks(None, None).await.unwrap_err(),
        A2AError::Auth(_)
    ));

    let mut authorized = A2AClientBuilder::new_http(agent.url.clone())
        .with_bearer_auth("s3cret")
        .with_timeout(Duration::from_secs(5))
        .build();
    let task = authorized.create_task(Message::user("hello")).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    agent.stop().await;
}

#[tokio::test]
async fn test_api_key_auth() {
    let mut config = ServerConfig::default();
    config.auth.api_key = Some("k-1".to_string());
    config.auth.api_key_header = "X-Agent-Key".to_string();
    let agent = RunningAgent::start(config).await;

    let mut wrong_header = A2AClientBuilder::new_http(agent.url.clone())
        .with_api_key_auth("k-1", "X-API-Key")
        .build();
    assert!(matches!(
        wrong_header.list_tasks(None, None).await.unwrap_err(),
        A2AError::Auth(_)
    ));

    let mut authorized = A2AClientBuilder::new_http(agent.url.clone())
        .with_api_key_auth("k-1", "X-Agent-Key")
        .build();
    let task = authorized.create_task(Message::user("hello")).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    agent.stop().await;
}
