//! HTTP client for the command and telemetry endpoints

use super::types::{CommandBody, CommandResponse};
use crate::telemetry::{MetricSample, TelemetrySource};
use crate::Result;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Trim whitespace and trailing slashes, and strip an endpoint path pasted
/// along with the host.
pub fn normalize_base_url(s: &str) -> String {
    let mut t = s.trim().trim_end_matches('/').to_string();
    if t.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    for suffix in ["/command", "/stats"] {
        if t.ends_with(suffix) {
            t.truncate(t.len() - suffix.len());
            t = t.trim_end_matches('/').to_string();
        }
    }
    if t.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    t
}

/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a command. Any HTTP status is accepted as long as the body
    /// parses; the backend reports failures through `status`.
    pub async fn send_command(&self, command: &str) -> Result<CommandResponse> {
        let url = format!("{}/command", self.base_url);
        debug!("POST {} {:?}", url, command);

        let body = self
            .http
            .post(&url)
            .json(&CommandBody { command })
            .send()
            .await?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_stats(&self) -> Result<MetricSample> {
        let url = format!("{}/stats", self.base_url);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl TelemetrySource for BackendClient {
    fn fetch(&self) -> impl Future<Output = Result<MetricSample>> + Send {
        self.fetch_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HudError;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(""), "http://localhost:5000");
        assert_eq!(normalize_base_url("  "), "http://localhost:5000");
        assert_eq!(
            normalize_base_url(" http://10.0.0.2:5000/ "),
            "http://10.0.0.2:5000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000/command"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000/stats/"),
            "http://localhost:5000"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let client =
            BackendClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = client.send_command("status").await.unwrap_err();
        assert!(matches!(err, HudError::Transport(_)));
        assert!(client.fetch_stats().await.is_err());
    }
}
