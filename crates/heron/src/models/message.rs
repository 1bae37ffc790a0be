use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::role::Role;

/// A tool invocation requested by the model. The arguments may arrive in any
/// JSON shape (including a raw string); they are normalized at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new<S: Into<String>>(name: S, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Opaque id, unique within the assistant message that produced it
    pub id: String,
    pub call: ToolCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// The id of the request this result answers
    pub id: String,
    /// Tool results are always strings, even when the tool failed
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Content passed inside a message, which can be plain text or tool content
pub enum MessageContent {
    Text(String),
    ToolRequest(ToolRequest),
    ToolResponse(ToolResponse),
}

impl MessageContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn tool_request<S: Into<String>>(id: S, call: ToolCall) -> Self {
        MessageContent::ToolRequest(ToolRequest {
            id: id.into(),
            call,
        })
    }

    pub fn tool_response<S: Into<String>, T: Into<String>>(id: S, output: T) -> Self {
        MessageContent::ToolResponse(ToolResponse {
            id: id.into(),
            output: output.into(),
        })
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        if let MessageContent::ToolRequest(ref tool_request) = self {
            Some(tool_request)
        } else {
            None
        }
    }

    pub fn as_tool_response(&self) -> Option<&ToolResponse> {
        if let MessageContent::ToolResponse(ref tool_response) = self {
            Some(tool_response)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<MessageContent>,
}

impl Message {
    fn with_role(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new system message with the current timestamp
    pub fn system() -> Self {
        Message::with_role(Role::System)
    }

    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message::with_role(Role::User)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message::with_role(Role::Assistant)
    }

    /// Create a new tool-result message with the current timestamp
    pub fn tool() -> Self {
        Message::with_role(Role::Tool)
    }

    /// Add any MessageContent to the message
    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(MessageContent::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request<S: Into<String>>(self, id: S, call: ToolCall) -> Self {
        self.with_content(MessageContent::tool_request(id, call))
    }

    /// Add a tool response to the message
    pub fn with_tool_response<S: Into<String>, T: Into<String>>(self, id: S, output: T) -> Self {
        self.with_content(MessageContent::tool_response(id, output))
    }

    /// All text blocks joined with newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| content.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The tool requests this message carries, in the order the model listed them
    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        self.content
            .iter()
            .filter_map(|content| content.as_tool_request())
            .collect()
    }

    /// Whether this message is a tool result rather than conversational content
    pub fn is_tool_result(&self) -> bool {
        self.role == Role::Tool
    }
}
