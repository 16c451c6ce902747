//! Common utilities and fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use flagwatch::core::{ChatNotifier, FlaggedReport, NotifyError, ReportStore, StoreError};
use std::sync::Mutex;

/// Resource name of a valid flagged-alerting table creation event.
pub const FLAGGED_RESOURCE: &str =
    "projects/p1/datasets/d1/tables/flagged_alerting_tables_20240115";

/// Resource name of an event this notifier must ignore.
pub const IRRELEVANT_RESOURCE: &str = "projects/p1/datasets/d1/tables/daily_revenue_20240115";

/// Builds a raw trigger body carrying the given resource name.
pub fn trigger_body(resource_name: &str) -> Vec<u8> {
    serde_json::json!({ "protoPayload": { "resourceName": resource_name } })
        .to_string()
        .into_bytes()
}

/// An in-memory report store with a scripted response, recording every
/// table id it is queried for.
pub struct MemoryStore {
    reports: Vec<FlaggedReport>,
    fail: bool,
    pub queries: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_reports(names: &[&str]) -> Self {
        Self {
            reports: names.iter().map(|n| FlaggedReport::new(n)).collect(),
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_reports(&[])
    }

    pub fn failing() -> Self {
        Self {
            reports: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn fetch_flagged_reports(
        &self,
        table_id: &str,
    ) -> Result<Vec<FlaggedReport>, StoreError> {
        self.queries.lock().unwrap().push(table_id.to_string());
        if self.fail {
            return Err(StoreError::Response("backend unavailable".to_string()));
        }
        Ok(self.reports.clone())
    }
}

/// A notifier that records every message body it is asked to deliver.
pub struct RecordingNotifier {
    fail: bool,
    pub sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Rejected {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "rejected".to_string(),
            });
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
