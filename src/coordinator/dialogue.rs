/// Listening and speaking flags, owned by the coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogueState {
    pub is_listening: bool,
    pub is_speaking: bool,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &'static str {
        match (self.is_listening, self.is_speaking) {
            (true, true) => "listening + speaking",
            (true, false) => "listening",
            (false, true) => "speaking",
            (false, false) => "idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let mut state = DialogueState::new();
        assert_eq!(state.status(), "idle");
        state.is_speaking = true;
        assert_eq!(state.status(), "speaking");
        state.is_listening = true;
        assert_eq!(state.status(), "listening + speaking");
    }
}
