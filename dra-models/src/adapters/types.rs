//! Conversation types and the role remap applied before transmission.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Role of a message as the agent layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// System message setting context/behavior.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
    /// The model's request to run a tool.
    ToolCall,
    /// Output of a tool run.
    ToolResponse,
}

/// Role as transmitted to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportRole {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// The transport role used when no remap applies.
    pub fn natural(self) -> TransportRole {
        match self {
            Role::System => TransportRole::System,
            Role::User => TransportRole::User,
            Role::Assistant | Role::ToolCall => TransportRole::Assistant,
            Role::ToolResponse => TransportRole::Tool,
        }
    }
}

/// Mapping from abstract roles to transport roles.
///
/// The default is the tool remap every adapter applies: `tool-call` goes out
/// as `assistant`, `tool-response` as `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    overrides: HashMap<Role, TransportRole>,
}

impl RoleMap {
    /// No overrides; every role maps to its natural transport role.
    pub fn identity() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// The tool remap.
    pub fn tool_remap() -> Self {
        Self::identity()
            .with(Role::ToolCall, TransportRole::Assistant)
            .with(Role::ToolResponse, TransportRole::User)
    }

    /// Override the transport role for `role`.
    pub fn with(mut self, role: Role, transport: TransportRole) -> Self {
        self.overrides.insert(role, transport);
        self
    }

    pub fn transport_role(&self, role: Role) -> TransportRole {
        self.overrides
            .get(&role)
            .copied()
            .unwrap_or_else(|| role.natural())
    }

    /// Convert a conversation to outbound messages.
    pub fn apply(&self, conversation: &[Message]) -> Vec<WireMessage> {
        conversation
            .iter()
            .map(|m| WireMessage {
                role: self.transport_role(m.role),
                content: m.content.to_wire(),
            })
            .collect()
    }
}

impl Default for RoleMap {
    fn default() -> Self {
        Self::tool_remap()
    }
}

/// Content of a message, either text or structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Simple text content.
    Text(String),
    /// Structured content parts (text, images, audio).
    Parts(Vec<ContentPart>),
}

impl Content {
    /// Create text content.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Get content as text, joining parts if necessary.
    pub fn as_text(&self) -> String {
        match self {
            Content::Text(s) => s.clone(),
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Audio file attached to this content, if any.
    pub fn audio(&self) -> Option<&PathBuf> {
        match self {
            Content::Text(_) => None,
            Content::Parts(parts) => parts.iter().find_map(|p| match p {
                ContentPart::Audio { path } => Some(path),
                _ => None,
            }),
        }
    }

    /// Chat-completions content: a string, or an array of text/image parts.
    /// Audio parts are not sent inline.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Content::Text(s) => serde_json::Value::String(s.clone()),
            Content::Parts(parts) => serde_json::Value::Array(
                parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => {
                            Some(serde_json::json!({ "type": "text", "text": text }))
                        }
                        ContentPart::Image { url } => Some(serde_json::json!({
                            "type": "image_url",
                            "image_url": { "url": url },
                        })),
                        ContentPart::Audio { .. } => None,
                    })
                    .collect(),
            ),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A part of structured content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content.
    Text { text: String },
    /// Image by URL (`https://` or `data:` URL).
    Image { url: String },
    /// Audio file on local disk, for transcription.
    Audio { path: PathBuf },
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender.
    pub role: Role,
    /// Content of the message.
    pub content: Content,
}

impl Message {
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool-call message.
    pub fn tool_call(content: impl Into<Content>) -> Self {
        Self::new(Role::ToolCall, content)
    }

    /// Create a tool-response message.
    pub fn tool_response(content: impl Into<Content>) -> Self {
        Self::new(Role::ToolResponse, content)
    }
}

/// A message after role remapping, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: TransportRole,
    pub content: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_map_remaps_tool_roles() {
        let roles = RoleMap::default();
        assert_eq!(roles.transport_role(Role::ToolCall), TransportRole::Assistant);
        assert_eq!(roles.transport_role(Role::ToolResponse), TransportRole::User);
        assert_eq!(roles.transport_role(Role::System), TransportRole::System);
        assert_eq!(roles.transport_role(Role::User), TransportRole::User);
        assert_eq!(roles.transport_role(Role::Assistant), TransportRole::Assistant);
    }

    #[test]
    fn identity_role_map_keeps_tool_role() {
        let roles = RoleMap::identity();
        assert_eq!(roles.transport_role(Role::ToolResponse), TransportRole::Tool);
    }

    #[test]
    fn apply_remaps_conversation() {
        let conversation = vec![
            Message::system("be brief"),
            Message::tool_call("search(q)"),
            Message::tool_response("3 results"),
        ];
        let wire = RoleMap::default().apply(&conversation);
        let roles: Vec<_> = wire.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                TransportRole::System,
                TransportRole::Assistant,
                TransportRole::User
            ]
        );
        assert_eq!(wire[2].content, serde_json::json!("3 results"));
    }

    #[test]
    fn role_serializes_kebab_case() {
        let json = serde_json::to_string(&Role::ToolResponse).unwrap();
        assert_eq!(json, "\"tool-response\"");
        let json = serde_json::to_string(&TransportRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn parts_to_wire_skip_audio() {
        let content = Content::Parts(vec![
            ContentPart::Text {
                text: "describe".to_string(),
            },
            ContentPart::Image {
                url: "https://example.com/a.png".to_string(),
            },
            ContentPart::Audio {
                path: PathBuf::from("/tmp/a.wav"),
            },
        ]);
        let wire = content.to_wire();
        let parts = wire.as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["image_url"]["url"], "https://example.com/a.png");
        assert_eq!(content.audio(), Some(&PathBuf::from("/tmp/a.wav")));
        assert_eq!(content.as_text(), "describe");
    }
}
