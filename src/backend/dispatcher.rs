//! Runs command requests on the tokio runtime

use super::client::BackendClient;
use super::{CommandBackend, CommandRequest, RemoteEvent, RemoteOutcome};
use crate::utils::Repaint;
use crossbeam_channel::Sender;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// [`CommandBackend`] that performs each request as a tokio task and reports
/// the outcome over a crossbeam channel.
pub struct HttpCommandBackend {
    client: BackendClient,
    runtime: Handle,
    events: Sender<RemoteEvent>,
    repaint: Repaint,
}

impl HttpCommandBackend {
    pub fn new(
        client: BackendClient,
        runtime: Handle,
        events: Sender<RemoteEvent>,
        repaint: Repaint,
    ) -> Self {
        Self {
            client,
            runtime,
            events,
            repaint,
        }
    }
}

impl CommandBackend for HttpCommandBackend {
    fn send(&self, request: CommandRequest) {
        let client = self.client.clone();
        let events = self.events.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            if let Some(delay) = request.delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = match client.send_command(&request.command).await {
                Ok(response) => {
                    debug!("Command {:?} -> {}", request.command, response.status);
                    RemoteOutcome::Response(response)
                }
                Err(e) => {
                    warn!("Command {:?} failed: {}", request.command, e);
                    RemoteOutcome::TransportFailure(e.to_string())
                }
            };

            let event = RemoteEvent {
                purpose: request.purpose,
                outcome,
            };
            if events.send(event).is_err() {
                debug!("Coordinator gone, dropping command result");
            }
            repaint();
        });
    }
}
