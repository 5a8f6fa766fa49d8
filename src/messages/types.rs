use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The local operator (typed or transcribed input)
    Operator,
    /// The assistant (local acknowledgements and backend responses)
    Assistant,
}

/// Display prefixes for chat lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLabels {
    pub operator: String,
    pub assistant: String,
}

impl Default for ChatLabels {
    fn default() -> Self {
        Self {
            operator: "BOSS".to_string(),
            assistant: "JARVIS".to_string(),
        }
    }
}

impl ChatLabels {
    pub fn label(&self, sender: Sender) -> &str {
        match sender {
            Sender::Operator => &self.operator,
            Sender::Assistant => &self.assistant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Self::new(Sender::Operator, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Render as a single attributed chat line, e.g. `JARVIS: Online.`
    pub fn chat_line(&self, labels: &ChatLabels) -> String {
        format!("{}: {}", labels.label(self.sender), self.text)
    }
}
