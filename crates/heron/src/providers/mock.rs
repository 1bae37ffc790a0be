use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::models::tool::ToolSpec;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
    repeat: Option<Message>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            repeat: None,
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// A provider that returns the same response on every invocation
    pub fn repeating(response: Message) -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            repeat: Some(response),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// A provider whose every invocation fails
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            repeat: None,
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    /// How many times complete() has been invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<(Message, Usage)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        if let Some(response) = &self.repeat {
            return Ok((response.clone(), Usage::default()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok((Message::assistant().with_text(""), Usage::default()))
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}
