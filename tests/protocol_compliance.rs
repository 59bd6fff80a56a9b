//! A2A wire format compliance tests
//!
//! These tests pin the JSON shapes that peers see on the wire.

use serde_json::{json, Map};
use tower_a2a_server::{
    handler::{ComplianceHandler, HandlerRegistry},
    protocol::{
        error::TaskError, AgentCard, AgentSkill, Artifact, CreateTaskRequest, Message, Part,
        Role, SecurityScheme, Task, TaskEvent, TaskStatus,
    },
    service::{AgentCardRegistry, TaskService},
};

fn compliance_service() -> TaskService {
    let handlers = HandlerRegistry::new(ComplianceHandler::default());
    let cards = AgentCardRegistry::build(
        "Compliance Review Agent",
        "Reviews documents",
        "http://localhost:8000",
        "1.0.0",
        &handlers,
        Vec::new(),
    );
    TaskService::new(handlers, cards)
}

#[test]
fn test_role_serialization() {
    let json = serde_json::to_value(Message::user("Hello")).unwrap();
    assert_eq!(json["role"], "user");

    let json = serde_json::to_value(Message::agent("Hi there")).unwrap();
    assert_eq!(json["role"], "agent");
}

#[test]
fn test_text_part_serialization() {
    let json = serde_json::to_value(Part::text("Hello, world!")).unwrap();

    assert_eq!(json, json!({"type": "text", "text": "Hello, world!"}));
}

#[test]
fn test_file_part_serialization() {
    let part = Part::named_file("doc.pdf", "application/pdf", b"%PDF".to_vec());
    let json = serde_json::to_value(&part).unwrap();

    assert_eq!(json["type"], "file");
    assert_eq!(json["mimeType"], "application/pdf");
    assert_eq!(json["name"], "doc.pdf");
    // base64 of "%PDF"
    assert_eq!(json["bytes"], "JVBERg==");
    assert!(json.get("mime_type").is_none());
}

#[test]
fn test_data_part_serialization() {
    let mut data = Map::new();
    data.insert("key".to_string(), json!("value"));
    let json = serde_json::to_value(Part::data(data)).unwrap();

    assert_eq!(json["type"], "data");
    assert_eq!(json["data"]["key"], "value");
}

#[test]
fn test_message_deserialization_from_wire() {
    let wire = json!({
        "role": "user",
        "parts": [
            {"type": "text", "text": "Review this"},
            {"type": "file", "mimeType": "text/plain", "bytes": "aGVsbG8="},
            {"type": "data", "data": {"source": "upload"}}
        ],
        "messageId": "msg-123"
    });

    let msg: Message = serde_json::from_value(wire).unwrap();
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.parts.len(), 3);
    assert_eq!(msg.message_id.as_deref(), Some("msg-123"));
    match &msg.parts[1] {
        Part::File(file) => {
            assert_eq!(file.mime_type, "text/plain");
            assert_eq!(file.bytes, b"hello");
        }
        other => panic!("Expected file part, got {:?}", other),
    }
}

#[test]
fn test_unknown_part_type_rejected() {
    let wire = json!({"role": "user", "parts": [{"type": "video", "url": "x"}]});
    assert!(serde_json::from_value::<Message>(wire).is_err());
}

#[test]
fn test_task_status_wire_names() {
    let names: Vec<_> = [
        TaskStatus::Created,
        TaskStatus::Processing,
        TaskStatus::Completed,
        TaskStatus::Failed,
        TaskStatus::InputRequired,
    ]
    .iter()
    .map(|status| serde_json::to_value(status).unwrap())
    .collect();

    assert_eq!(
        names,
        vec![
            json!("created"),
            json!("processing"),
            json!("completed"),
            json!("failed"),
            json!("input-required")
        ]
    );
}

#[test]
fn test_task_field_naming() {
    let task = Task::new("task-123", Message::user("Test")).with_skill_id("compliance-review");
    let json = serde_json::to_value(&task).unwrap();

    assert!(json.get("createdAt").is_some());
    assert_eq!(json["skillId"], "compliance-review");
    assert!(json["artifacts"].is_array());
    assert!(json.get("created_at").is_none());
    // optional fields are omitted when unset
    assert!(json.get("error").is_none());
    assert!(json.get("statusMessage").is_none());
}

#[test]
fn test_failed_task_error_shape() {
    let mut task = Task::new("task-1", Message::user("Test"));
    task.transition(TaskStatus::Processing).unwrap();
    task.fail(TaskError::no_text_content()).unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"]["code"], "NO_TEXT_CONTENT");
    assert_eq!(json["error"]["message"], "no text content provided");
}

#[test]
fn test_artifact_shape() {
    let artifact = Artifact::text("summary", "All clear");
    let json = serde_json::to_value(&artifact).unwrap();

    assert!(json["artifactId"].is_string());
    assert_eq!(json["name"], "summary");
    assert_eq!(json["type"], "text");
    assert_eq!(json["text"], "All clear");
}

#[test]
fn test_agent_card_shape() {
    let card = AgentCard::new("Agent", "Does things", "http://localhost:8000", "1.0.0")
        .with_skill(AgentSkill::new("echo", "Echo", "Echoes input").with_tag("demo"))
        .with_authentication(vec![SecurityScheme::bearer()]);
    let json = serde_json::to_value(&card).unwrap();

    assert_eq!(json["name"], "Agent");
    assert_eq!(json["url"], "http://localhost:8000");
    assert!(json["capabilities"].is_object());
    assert_eq!(json["skills"][0]["id"], "echo");
    assert_eq!(json["skills"][0]["tags"][0], "demo");
    assert!(json["authentication"].is_array());
}

#[test]
fn test_event_shapes() {
    let json = serde_json::to_value(TaskEvent::status("task-1", TaskStatus::Completed)).unwrap();
    assert_eq!(json["kind"], "status-update");
    assert_eq!(json["taskId"], "task-1");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["final"], true);

    let json = serde_json::to_value(TaskEvent::status("task-1", TaskStatus::Processing)).unwrap();
    assert_eq!(json["final"], false);
}

#[test]
fn test_create_request_shape() {
    let request: CreateTaskRequest = serde_json::from_value(json!({
        "message": {"role": "user", "parts": [{"type": "text", "text": "hi"}]},
        "skillId": "compliance-review"
    }))
    .unwrap();
    assert_eq!(request.skill_id.as_deref(), Some("compliance-review"));

    let request: CreateTaskRequest = serde_json::from_value(json!({
        "message": {"role": "user", "parts": []}
    }))
    .unwrap();
    assert!(request.skill_id.is_none());
}

#[tokio::test]
async fn test_keyword_review_scenario() {
    let service = compliance_service();

    let task = service
        .create_task(CreateTaskRequest::new(Message::user(
            "We guarantee unlimited confidential returns",
        )))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.artifacts.len(), 1);
    let result = task.artifacts[0].as_data().unwrap();
    assert_eq!(result["risk_count"], 3);
    assert_eq!(result["risk_score"], 75);
    assert_eq!(result["requires_human_review"], true);

    let stored = service.get_task(&task.id).await.unwrap();
    assert_eq!(stored, task);
}

#[tokio::test]
async fn test_clean_document_scenario() {
    let service = compliance_service();

    let task = service
        .create_task(CreateTaskRequest::new(Message::user(
            "Quarterly newsletter for our members",
        )))
        .await
        .unwrap();

    let result = task.artifacts[0].as_data().unwrap();
    assert_eq!(result["risk_count"], 0);
    assert_eq!(result["recommendation"], "No issues found");
    assert_eq!(result["requires_human_review"], false);
}
