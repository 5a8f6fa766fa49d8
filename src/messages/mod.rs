pub mod log;
pub mod types;

pub use log::ChatLog;
pub use types::{ChatLabels, Message, Sender};
