// src/formatting.rs

use crate::core::FlaggedReport;

/// A trait for rendering flagged reports into a single alert body.
pub trait TextFormatter: Send + Sync {
    /// Renders the alert text for a non-empty set of reports.
    ///
    /// Report order is preserved exactly; the fetcher already sorted the
    /// rows ascending and this layer must not re-sort or deduplicate.
    fn format_alert(&self, reports: &[FlaggedReport], run_date: &str) -> String;
}

/// A formatter producing the chat-flavored anomaly alert message.
pub struct ChatTextFormatter;

impl TextFormatter for ChatTextFormatter {
    fn format_alert(&self, reports: &[FlaggedReport], run_date: &str) -> String {
        let report_list: Vec<String> = reports
            .iter()
            .map(|report| format!("• `{}`", report.flagged_table_name))
            .collect();

        format!(
            "🚨 *Dataform Anomaly Alert*\n\n\
             The following *{}* reports have new flagged data for run date: *{}*\n\n\
             {}",
            reports.len(),
            run_date,
            report_list.join("\n")
        )
    }
}
