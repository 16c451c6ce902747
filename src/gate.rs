//! Event gate: classifies inbound trigger events.
//!
//! The triggering infrastructure delivers audit-log events for many kinds
//! of resources. Only table creations whose name carries the
//! flagged-alerting prefix concern this notifier; everything else is
//! filtered here before any external call is made.

use crate::core::{ResourceIdentifier, TriggerEvent, FLAGGED_TABLE_PREFIX};
use tracing::debug;

/// Extracts the result-table identity from a trigger event.
///
/// Returns `None` when the event does not describe a flagged-alerting
/// table. Callers report that as a no-content outcome, not an error.
pub fn gate(event: &TriggerEvent) -> Option<ResourceIdentifier> {
    let resource_name = event.proto_payload.resource_name.as_str();
    let parts: Vec<&str> = resource_name.split('/').collect();
    if parts.len() < 6 || !parts[5].starts_with(FLAGGED_TABLE_PREFIX) {
        debug!(resource = %resource_name, "ignoring irrelevant event");
        return None;
    }

    let table = parts[5];
    Some(ResourceIdentifier {
        table_id: format!("{}.{}.{}", parts[1], parts[3], parts[5]),
        // The prefix check guarantees the name is longer than the YYYYMMDD
        // suffix; `get` guards against a split char boundary in a hostile
        // resource name.
        run_date: table
            .get(table.len() - 8..)
            .unwrap_or_default()
            .to_string(),
    })
}
