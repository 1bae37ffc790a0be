use crate::models::message::Message;

/// Append-only message history for a single agent run.
///
/// Insertion order is semantically meaningful: the sequence is the literal
/// context handed to the provider on every call. There is no removal or
/// reordering operation. A `Conversation` is exclusively owned by one run and
/// must not be shared across concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the history
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The most recent message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The full ordered history, as passed to the provider
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user().with_text("first"));
        conversation.push(Message::assistant().with_text("second"));
        conversation.push(Message::user().with_text("third"));

        let texts: Vec<String> = conversation
            .messages()
            .iter()
            .map(|message| message.text())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(conversation.last().unwrap().text(), "third");
    }

    #[test]
    fn test_empty_conversation() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert!(conversation.last().is_none());
    }
}
