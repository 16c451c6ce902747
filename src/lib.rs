//! Flagwatch - a data-quality job completion notifier
//!
//! This library closes the loop between an automated data pipeline and a
//! human operator: when a scheduled job produces a flagged-alerting result
//! table, its rows are formatted into a chat message and delivered to a
//! fixed webhook endpoint.
pub mod notification;

pub mod bigquery;
pub mod cli;
pub mod config;
pub mod core;
pub mod formatting;
pub mod gate;
pub mod handler;
pub mod server;

// Re-export core types for convenience
pub use crate::core::*;
