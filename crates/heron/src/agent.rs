use tracing::{error, warn};

use crate::conversation::Conversation;
use crate::extract::extract_answer;
use crate::models::message::{Message, ToolRequest};
use crate::prompt::{file_hint, DEFAULT_SYSTEM_PROMPT};
use crate::providers::base::Provider;
use crate::registry::{Tool, ToolRegistry};

pub const DEFAULT_MAX_STEPS: usize = 10;

/// Agent drives model/tool round trips until the model stops requesting tools
/// or the step budget runs out.
///
/// One step is one model invocation plus whatever tool calls it requested.
/// The budget bounds worst-case cost against a model that would call tools
/// forever; hitting it is a safe truncation, not an error, because the
/// extractor still produces a best-effort answer from partial history.
pub struct Agent {
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
    system_prompt: String,
    max_steps: usize,
}

impl Agent {
    /// Create a new Agent with the specified provider, the stock system
    /// prompt and the default step budget
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            registry: ToolRegistry::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Replace the system prompt. An empty prompt suppresses the system
    /// message entirely.
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Make a tool available to the model
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.registry.register(tool);
    }

    /// Answer a question, optionally hinting at a local file the tools can
    /// inspect. Always returns a string: provider failures, broken tools and
    /// budget exhaustion all degrade to whatever the history supports.
    pub async fn run(&self, question: &str, file_path: Option<&str>) -> String {
        let mut conversation = self.seed(question, file_path);
        self.drive(&mut conversation).await;
        extract_answer(&conversation)
    }

    fn seed(&self, question: &str, file_path: Option<&str>) -> Conversation {
        let mut conversation = Conversation::new();
        if !self.system_prompt.is_empty() {
            conversation.push(Message::system().with_text(&self.system_prompt));
        }
        if let Some(path) = file_path {
            conversation.push(Message::user().with_text(file_hint(path)));
        }
        conversation.push(Message::user().with_text(question));
        conversation
    }

    async fn drive(&self, conversation: &mut Conversation) {
        let tools = self.registry.specs();
        let mut steps = 0;
        while steps < self.max_steps {
            let response = match self.provider.complete(conversation.messages(), &tools).await {
                Ok((message, _usage)) => message,
                Err(e) => {
                    error!("LLM invocation failed: {e}");
                    // Substitute a user-role message so the model sees the
                    // failure on its next turn and can retry or adapt
                    conversation.push(Message::user().with_text(format!("Error invoking LLM: {e}")));
                    steps += 1;
                    continue;
                }
            };

            let requests: Vec<ToolRequest> =
                response.tool_requests().into_iter().cloned().collect();
            conversation.push(response);

            if requests.is_empty() {
                break;
            }

            // All results for this turn are appended, in request order,
            // before the next model call
            for request in &requests {
                let output = self
                    .registry
                    .dispatch(&request.call.name, &request.call.arguments)
                    .await;
                conversation.push(Message::tool().with_tool_response(request.id.clone(), output));
            }
            steps += 1;
        }

        if steps >= self.max_steps {
            warn!(
                max_steps = self.max_steps,
                "step budget exhausted before the model finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;
    use crate::models::message::{MessageContent, ToolCall};
    use crate::models::role::Role;
    use crate::providers::mock::MockProvider;
    use crate::registry::FunctionTool;
    use crate::tools;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_add_tool(counter: Arc<AtomicUsize>) -> Box<dyn Tool> {
        Box::new(FunctionTool::new(
            "add",
            "Add two numbers",
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number"},
                    "b": {"type": "number"}
                },
                "required": ["a", "b"]
            }),
            move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                let a = args.get("a").and_then(Value::as_f64).unwrap_or_default();
                let b = args.get("b").and_then(Value::as_f64).unwrap_or_default();
                Ok(format!("{}", a + b))
            },
        ))
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request(
                "call_1",
                ToolCall::new("add", json!({"a": 2, "b": 3})),
            ),
            Message::assistant().with_text("FINAL ANSWER: 5"),
        ]);
        let tool_calls = Arc::new(AtomicUsize::new(0));

        let mut agent = Agent::new(Box::new(provider.clone()));
        agent.add_tool(counting_add_tool(tool_calls.clone()));

        let answer = agent.run("What is 2 + 3?", None).await;

        assert_eq!(answer, "5");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(tool_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_simple_response_without_tools() {
        let provider = MockProvider::new(vec![Message::assistant().with_text("Hello!")]);
        let agent = Agent::new(Box::new(provider.clone()));

        let answer = agent.run("Hi", None).await;

        assert_eq!(answer, "Hello!");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_step_budget_bounds_model_calls() {
        // A model that never stops asking for tools gets cut off after
        // exactly max_steps invocations
        let provider = MockProvider::repeating(
            Message::assistant().with_tool_request("1", ToolCall::new("add", json!({"a": 1, "b": 1}))),
        );
        let mut agent = Agent::new(Box::new(provider.clone())).with_max_steps(3);
        agent.add_tool(tools::add());

        agent.run("loop forever", None).await;

        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_tool_results_preserve_request_order() {
        let provider = MockProvider::new(vec![
            Message::assistant()
                .with_tool_request("1", ToolCall::new("add", json!({"a": 1, "b": 2})))
                .with_tool_request("2", ToolCall::new("add", json!({"a": 10, "b": 20}))),
            Message::assistant().with_text("FINAL ANSWER: done"),
        ]);
        let mut agent = Agent::new(Box::new(provider)).with_system_prompt("");
        agent.add_tool(tools::add());

        let mut conversation = agent.seed("two sums", None);
        agent.drive(&mut conversation).await;

        // question, assistant tool requests, the two results in request
        // order, then the final assistant message
        let messages = conversation.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].tool_requests().len(), 2);

        let first = messages[2].content[0].as_tool_response().unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(first.output, "3");

        let second = messages[3].content[0].as_tool_response().unwrap();
        assert_eq!(second.id, "2");
        assert_eq!(second.output, "30");

        assert_eq!(messages[4].text(), "FINAL ANSWER: done");
    }

    #[tokio::test]
    async fn test_broken_tool_does_not_abort_the_run() {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request("1", ToolCall::new("broken", json!({}))),
            Message::assistant().with_text("FINAL ANSWER: recovered"),
        ]);
        let mut agent = Agent::new(Box::new(provider.clone()));
        agent.add_tool(Box::new(FunctionTool::new(
            "broken",
            "Always fails",
            json!({"type": "object", "properties": {}}),
            |_| Err(AgentError::ExecutionError("boom".to_string())),
        )));

        let answer = agent.run("try the broken tool", None).await;

        // The loop carried on to the second model turn
        assert_eq!(answer, "recovered");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_and_loop_continues() {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request("1", ToolCall::new("missing", json!({}))),
            Message::assistant().with_text("FINAL ANSWER: ok"),
        ]);
        let agent = Agent::new(Box::new(provider.clone()));

        let answer = agent.run("use a tool I do not have", None).await;

        assert_eq!(answer, "ok");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_provider_degrades_to_error_text() {
        let provider = MockProvider::failing();
        let agent = Agent::new(Box::new(provider.clone())).with_max_steps(4);

        let answer = agent.run("anything", None).await;

        // One synthetic error message per attempted step, and the last one
        // becomes the answer
        assert_eq!(provider.call_count(), 4);
        assert_eq!(answer, "Error invoking LLM: connection refused");
    }

    #[tokio::test]
    async fn test_file_hint_is_seeded_before_the_question() {
        let provider = MockProvider::new(vec![]);
        let agent = Agent::new(Box::new(provider));

        let conversation = agent.seed("what is in the file?", Some("/tmp/data.csv"));

        let messages = conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[1]
            .text()
            .starts_with("A file is available at local path: /tmp/data.csv."));
        assert_eq!(messages[2].text(), "what is in the file?");
    }

    #[tokio::test]
    async fn test_zero_budget_returns_question_text() {
        // Degenerate configuration: no model call ever happens, so the
        // extractor falls back to the latest non-tool message
        let provider = MockProvider::new(vec![]);
        let agent = Agent::new(Box::new(provider.clone())).with_max_steps(0);

        let answer = agent.run("unanswered", None).await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(answer, "unanswered");
    }

    #[test]
    fn test_tool_message_shape() {
        let message = Message::tool().with_tool_response("call_9", "output");
        assert_eq!(message.role, Role::Tool);
        assert!(matches!(
            message.content[0],
            MessageContent::ToolResponse(_)
        ));
    }
}
