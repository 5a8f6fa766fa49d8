//! Command and voice interaction coordinator

pub mod dialogue;
pub mod handler;
pub mod rules;

pub use dialogue::DialogueState;
pub use handler::{Coordinator, GreetingSettings};
pub use rules::{classify, normalize, Classification, CommandRule, RULES};
