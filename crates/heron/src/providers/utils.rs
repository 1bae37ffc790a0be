use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::models::message::{Message, MessageContent, ToolCall};
use crate::models::role::Role;
use crate::models::tool::ToolSpec;

/// Convert internal Message format to OpenAI's API message specification
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        match message.role {
            Role::System | Role::User => {
                messages_spec.push(json!({
                    "role": message.role,
                    "content": message.text(),
                }));
            }
            Role::Assistant => {
                let mut converted = json!({ "role": "assistant" });
                let text = message.text();
                if !text.is_empty() {
                    converted["content"] = json!(text);
                }

                let tool_calls: Vec<Value> = message
                    .tool_requests()
                    .iter()
                    .map(|request| {
                        // The wire format wants stringified arguments
                        let arguments = match &request.call.arguments {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        json!({
                            "id": request.id,
                            "type": "function",
                            "function": {
                                "name": request.call.name,
                                "arguments": arguments,
                            }
                        })
                    })
                    .collect();
                if !tool_calls.is_empty() {
                    converted["tool_calls"] = json!(tool_calls);
                }
                // An assistant message with neither text nor tool calls has
                // no wire representation
                if converted.get("content").is_some() || converted.get("tool_calls").is_some() {
                    messages_spec.push(converted);
                }
            }
            Role::Tool => {
                // One wire message per tool response block, in order
                for content in &message.content {
                    if let MessageContent::ToolResponse(response) = content {
                        messages_spec.push(json!({
                            "role": "tool",
                            "tool_call_id": response.id,
                            "content": response.output,
                        }));
                    }
                }
            }
        }
    }

    messages_spec
}

/// Convert internal ToolSpec format to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[ToolSpec]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Convert OpenAI's API response to internal Message format
pub fn openai_response_to_message(response: Value) -> Result<Message> {
    let original = response["choices"][0]
        .get("message")
        .ok_or_else(|| anyhow!("No completion choice in response"))?
        .clone();

    let mut message = Message::assistant();

    if let Some(text) = original.get("content").and_then(Value::as_str) {
        if !text.is_empty() {
            message = message.with_text(text);
        }
    }

    if let Some(tool_calls) = original.get("tool_calls").and_then(Value::as_array) {
        for tool_call in tool_calls {
            let id = tool_call["id"].as_str().unwrap_or_default().to_string();
            let name = tool_call["function"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let raw = tool_call["function"]["arguments"]
                .as_str()
                .unwrap_or_default();
            // Unparsable payloads ride along as raw strings; dispatch coerces
            // them into an object later
            let arguments = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            message = message.with_tool_request(id, ToolCall::new(name, arguments));
        }
    }

    Ok(message)
}
