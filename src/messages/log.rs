use super::types::{Message, Sender};

/// Append-only chat history shown in the chat region
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<Message>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(Message::new(sender, text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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
        let mut log = ChatLog::new();
        log.push(Sender::Operator, "status");
        log.push(Sender::Assistant, "All systems nominal.");

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].text, "status");
        assert_eq!(log.last().map(|m| m.sender), Some(Sender::Assistant));
    }

    #[test]
    fn test_clear() {
        let mut log = ChatLog::new();
        log.push(Sender::Operator, "hi");
        log.clear();
        assert!(log.is_empty());
    }
}
