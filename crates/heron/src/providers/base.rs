use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::Message;
use crate::models::tool::ToolSpec;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for chat completion providers (OpenAI and compatibles).
///
/// The system prompt travels inside `messages` as a system-role entry. No
/// contract is made about what the provider returns: the agent loop has to
/// degrade safely whatever shape the response takes, including ill-formed or
/// missing tool arguments.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next message given the full conversation so far
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<(Message, Usage)>;
}
