use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AgentResult;
use crate::models::tool::ToolSpec;

/// A tool the agent can execute on the model's behalf.
///
/// Implementations return a result string on success and an `AgentError` on
/// failure; the registry converts failures to strings at the dispatch
/// boundary, so callers of [`ToolRegistry::dispatch`] never see an error.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool, the key it is registered and invoked under
    fn name(&self) -> &str;
    /// A description of what the tool does
    fn description(&self) -> &str;
    /// A json schema describing the arguments the tool accepts
    fn parameters(&self) -> Value;
    /// Execute the tool with normalized arguments
    async fn call(&self, args: &Map<String, Value>) -> AgentResult<String>;
}

/// A tool powered by a plain closure, for small synchronous handlers.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
    handler: Box<dyn Fn(&Map<String, Value>) -> AgentResult<String> + Send + Sync>,
}

impl FunctionTool {
    pub fn new<N, D>(
        name: N,
        description: D,
        parameters: Value,
        handler: impl Fn(&Map<String, Value>) -> AgentResult<String> + Send + Sync + 'static,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        FunctionTool {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        self.parameters.clone()
    }

    async fn call(&self, args: &Map<String, Value>) -> AgentResult<String> {
        (self.handler)(args)
    }
}

/// Maps tool names to handlers and contains their failures.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool by name. On a name collision the last registration
    /// silently wins; callers are responsible for keeping names unique.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// The advertised tool list, sent to the model alongside the conversation
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|tool| ToolSpec::new(tool.name(), tool.description(), tool.parameters()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a named tool and always come back with a string.
    ///
    /// Unknown names and handler failures are reported as ordinary result
    /// strings so that a broken tool call can never abort the agent loop.
    pub async fn dispatch(&self, name: &str, raw_arguments: &Value) -> String {
        let args = normalize_arguments(raw_arguments);
        let Some(tool) = self.tools.get(name) else {
            return format!("Error: unknown tool '{name}'");
        };
        info!(tool = name, "invoking tool");
        match tool.call(&args).await {
            Ok(output) => output,
            Err(e) => format!("Error during tool '{name}': {e}"),
        }
    }
}

/// Coerce whatever argument shape the model produced into a JSON object.
/// String payloads are parsed as JSON; anything that still is not an object
/// is wrapped as `{"query": <string form>}`.
fn normalize_arguments(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => query_fallback(raw),
        },
        _ => query_fallback(raw),
    }
}

fn query_fallback(raw: &Value) -> Map<String, Value> {
    let text = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut map = Map::new();
    map.insert("query".to_string(), Value::String(text));
    map
}
