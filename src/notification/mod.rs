//! Delivery of formatted alerts to the messaging endpoint.
//!
//! The destination webhook URL is the one piece of process-wide
//! configuration; it is fixed at startup and never derived from event
//! data, so tests can substitute their own endpoint.
pub mod chat;
