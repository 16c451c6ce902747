//! Core domain types and service traits for Flagwatch
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern component interactions throughout the application.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Table-name prefix that marks a resource as relevant to this notifier.
pub const FLAGGED_TABLE_PREFIX: &str = "flagged_alerting_tables_";

/// The audit-log payload delivered by the job-completion trigger.
///
/// Only `protoPayload.resourceName` is read; all other fields of the event
/// are ignored. A missing field deserializes to an empty string, which the
/// gate classifies as an irrelevant event rather than a malformed one.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TriggerEvent {
    #[serde(default, rename = "protoPayload")]
    pub proto_payload: ProtoPayload,
}

/// The nested audit-log entry carrying the resource name.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProtoPayload {
    #[serde(default, rename = "resourceName")]
    pub resource_name: String,
}

/// Identity of the result table, derived from a validated trigger event.
///
/// Only ever constructed by the gate after the prefix and segment-count
/// checks have passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentifier {
    /// Fully-qualified `project.dataset.table` address.
    pub table_id: String,
    /// The `YYYYMMDD` suffix of the table name.
    pub run_date: String,
}

/// One row of the flagged-report result table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FlaggedReport {
    /// Name of the downstream artifact flagged as anomalous.
    pub flagged_table_name: String,
}

impl FlaggedReport {
    pub fn new(name: &str) -> Self {
        Self {
            flagged_table_name: name.to_string(),
        }
    }
}

/// Terminal outcome of one invocation.
///
/// Every exit path of the pipeline maps to exactly one variant, and every
/// variant to exactly one HTTP-style status code reported back to the
/// triggering infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event did not describe a flagged-alerting table. Not an error.
    Ignored,
    /// The result table exists but holds no rows. The expected steady state.
    NoContent,
    /// An alert was formatted and accepted by the messaging endpoint.
    Sent,
    /// The trigger payload could not be parsed. Carries the parse error text.
    ClientError(String),
    /// The query or the delivery failed. Carries the reported status string.
    ServerError(String),
}

impl Outcome {
    /// The HTTP-style status code for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Ignored | Outcome::NoContent => 204,
            Outcome::Sent => 200,
            Outcome::ClientError(_) => 400,
            Outcome::ServerError(_) => 500,
        }
    }

    /// Human-readable status string reported to the trigger infrastructure.
    pub fn status_text(&self) -> &str {
        match self {
            Outcome::Ignored => "Event ignored.",
            Outcome::NoContent => "No alert sent.",
            Outcome::Sent => "Alert sent.",
            Outcome::ClientError(_) => "Payload parsing failed.",
            Outcome::ServerError(msg) => msg,
        }
    }
}

/// Errors from the result-store query interface.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The query request could not be issued or the response not read.
    #[error("query request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend rejected the query (table missing, permission denied).
    #[error("query rejected with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The backend answered with a shape this client cannot interpret.
    #[error("malformed query response: {0}")]
    Response(String),
}

/// Errors from the messaging endpoint.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The webhook request could not be issued.
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("webhook rejected message with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

// =============================================================================
// Service Traits
// =============================================================================

/// Reads flagged reports from the result store.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetches all rows of the named result table, ascending by report name.
    ///
    /// # Arguments
    /// * `table_id` - Fully-qualified `project.dataset.table` address
    ///
    /// # Returns
    /// * `Ok` with the fully materialized row set (possibly empty)
    /// * `Err` for any query failure; the caller does not retry
    async fn fetch_flagged_reports(&self, table_id: &str)
        -> Result<Vec<FlaggedReport>, StoreError>;
}

/// Delivers alert text to the messaging endpoint.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Sends one message body to the fixed destination.
    ///
    /// # Returns
    /// * `Ok(())` if the endpoint accepted the message
    /// * `Err` if delivery failed; the caller does not retry
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
