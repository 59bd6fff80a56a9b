//! A2A message types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message in the A2A protocol
///
/// Messages are the input container for tasks. Each message has a role
/// and an ordered sequence of parts (text, file, or data).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Message content parts
    pub parts: Vec<Part>,

    /// Optional message identifier
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl Message {
    /// Create a new message with text content
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
            message_id: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Create a message from an explicit list of parts
    pub fn with_parts(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            message_id: None,
        }
    }

    /// Add a message part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Set the message ID
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Concatenated content of all text parts, joined by newlines
    ///
    /// Returns `None` when no text part carries non-whitespace content.
    pub fn text_content(&self) -> Option<String> {
        let text = self
            .parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an AI agent
    Agent,
}

/// Inline binary file content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    /// MIME type of the file
    pub mime_type: String,

    /// Name of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw file content, base64-encoded on the wire
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// A part of a message
///
/// Exactly one variant per part, discriminated by the `type` field on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,
    },

    /// Inline file
    File(FilePart),

    /// Structured key-value data
    Data {
        /// The structured data
        data: Map<String, Value>,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file part from raw bytes
    pub fn file(mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::File(FilePart {
            mime_type: mime_type.into(),
            name: None,
            bytes: bytes.into(),
        })
    }

    /// Create a named file part from raw bytes
    pub fn named_file(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::File(FilePart {
            mime_type: mime_type.into(),
            name: Some(name.into()),
            bytes: bytes.into(),
        })
    }

    /// Create a data part
    pub fn data(data: Map<String, Value>) -> Self {
        Self::Data { data }
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Wire name of the part kind
    pub fn kind(&self) -> &'static str {
        match self {
            Part::Text { .. } => "text",
            Part::File(_) => "file",
            Part::Data { .. } => "data",
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.parts.len(), 1);

        match &msg.parts[0] {
            Part::Text { text } => assert_eq!(text, "Hello, agent!"),
            _ => panic!("Expected text part"),
        }
    }

    #[test]
    fn test_text_content_joins_text_parts() {
        let msg = Message::user("first")
            .with_part(Part::file("text/plain", b"ignored".to_vec()))
            .with_part(Part::text("second"));

        assert_eq!(msg.text_content().as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_text_content_none_without_text() {
        let msg = Message::with_parts(Role::User, vec![Part::file("image/png", vec![1, 2, 3])]);
        assert_eq!(msg.text_content(), None);

        let empty = Message::with_parts(Role::User, vec![]);
        assert_eq!(empty.text_content(), None);

        let blank = Message::user("   \n ");
        assert_eq!(blank.text_content(), None);
    }

    #[test]
    fn test_part_wire_format() {
        let json = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(json, json!({"type": "text", "text": "hi"}));

        let json = serde_json::to_value(Part::file("text/plain", b"abc".to_vec())).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["mimeType"], "text/plain");
        assert_eq!(json["bytes"], "YWJj");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_part_deserialization() {
        let parts: Vec<Part> = serde_json::from_value(json!([
            {"type": "text", "text": "hello"},
            {"type": "file", "mimeType": "application/pdf", "name": "a.pdf", "bytes": "AQID"},
            {"type": "data", "data": {"amount": 42}}
        ]))
        .unwrap();

        assert_eq!(parts[0].as_text(), Some("hello"));
        match &parts[1] {
            Part::File(file) => {
                assert_eq!(file.bytes, vec![1, 2, 3]);
                assert_eq!(file.name.as_deref(), Some("a.pdf"));
            }
            _ => panic!("Expected file part"),
        }
        assert_eq!(parts[2].kind(), "data");
    }

    #[test]
    fn test_invalid_part_rejected() {
        let bad: Result<Part, _> = serde_json::from_value(json!({"type": "video", "url": "x"}));
        assert!(bad.is_err());

        let bad_bytes: Result<Part, _> =
            serde_json::from_value(json!({"type": "file", "mimeType": "a/b", "bytes": "%%%"}));
        assert!(bad_bytes.is_err());

        let not_object: Result<Part, _> =
            serde_json::from_value(json!({"type": "data", "data": [1, 2]}));
        assert!(not_object.is_err());
    }
}
