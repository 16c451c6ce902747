//! The alert pipeline: gate, fetch, format, notify.
//!
//! Control flows strictly downward through the four stages; every branch
//! is terminal within one invocation and nothing is retried. The store and
//! notifier are injected trait objects so tests can substitute endpoints.

use crate::core::{ChatNotifier, Outcome, ReportStore, TriggerEvent};
use crate::formatting::TextFormatter;
use crate::gate::gate;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Runs the full pipeline for one trigger invocation.
pub struct AlertHandler {
    store: Arc<dyn ReportStore>,
    notifier: Arc<dyn ChatNotifier>,
    formatter: Box<dyn TextFormatter>,
}

impl AlertHandler {
    /// Creates a new `AlertHandler`.
    pub fn new(
        store: Arc<dyn ReportStore>,
        notifier: Arc<dyn ChatNotifier>,
        formatter: Box<dyn TextFormatter>,
    ) -> Self {
        Self {
            store,
            notifier,
            formatter,
        }
    }

    /// Parses a raw trigger body and runs the pipeline on it.
    ///
    /// A body that is not valid JSON, or that carries the wrong types for
    /// the fields this handler reads, is a client error. A well-formed
    /// body that simply lacks the resource name falls through to the gate
    /// and comes back as an ignored event.
    pub async fn handle_raw(&self, body: &[u8]) -> Outcome {
        let event: TriggerEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    error = %e,
                    payload = %String::from_utf8_lossy(body),
                    "Error parsing trigger payload"
                );
                return Outcome::ClientError(e.to_string());
            }
        };
        self.handle(&event).await
    }

    /// Runs the pipeline on an already-parsed event.
    #[instrument(skip(self, event))]
    pub async fn handle(&self, event: &TriggerEvent) -> Outcome {
        let identifier = match gate(event) {
            Some(identifier) => identifier,
            None => return Outcome::Ignored,
        };
        info!(table = %identifier.table_id, "Processing alert");

        let reports = match self
            .store
            .fetch_flagged_reports(&identifier.table_id)
            .await
        {
            Ok(reports) => reports,
            Err(e) => {
                error!(table = %identifier.table_id, error = %e, "Error querying result table");
                return Outcome::ServerError("BigQuery query failed.".to_string());
            }
        };

        if reports.is_empty() {
            info!(table = %identifier.table_id, "Table is empty. No alert needed.");
            return Outcome::NoContent;
        }

        let text = self.formatter.format_alert(&reports, &identifier.run_date);
        match self.notifier.send(&text).await {
            Ok(()) => {
                info!(count = reports.len(), "Alert sent successfully.");
                Outcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Error sending chat message");
                Outcome::ServerError("Failed to send alert.".to_string())
            }
        }
    }
}
