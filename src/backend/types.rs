//! Wire types for the command and telemetry endpoints

use serde::{Deserialize, Serialize};

/// `POST /command` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandBody<'a> {
    pub command: &'a str,
}

/// `POST /command` response
///
/// `data` is kept as raw JSON: some commands answer with a list of results,
/// others with an object or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Title of the first entry when `data` is a non-empty list.
    pub fn top_title(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .as_array()?
            .first()?
            .get("title")?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_serialization() {
        let body = serde_json::to_string(&CommandBody { command: "open youtube" }).unwrap();
        assert_eq!(body, r#"{"command":"open youtube"}"#);
    }

    #[test]
    fn test_top_title_takes_first_entry_only() {
        let resp: CommandResponse = serde_json::from_value(json!({
            "status": "success",
            "message": "Found 2 results",
            "data": [{"title": "X", "url": "https://x"}, {"title": "Y"}]
        }))
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.top_title(), Some("X"));
    }

    #[test]
    fn test_top_title_absent_cases() {
        assert_eq!(CommandResponse::success("ok").top_title(), None);
        assert_eq!(
            CommandResponse::success("ok").with_data(json!([])).top_title(),
            None
        );
        assert_eq!(
            CommandResponse::success("ok")
                .with_data(json!({"title": "not a list"}))
                .top_title(),
            None
        );
        assert_eq!(
            CommandResponse::success("ok")
                .with_data(json!([{"url": "no title"}]))
                .top_title(),
            None
        );
    }

    #[test]
    fn test_missing_status_is_malformed() {
        assert!(serde_json::from_str::<CommandResponse>(r#"{"message": "hi"}"#).is_err());
    }
}
