//! Metric registration for the gateway.
//!
//! Counter increments live next to the code they count; this module only
//! attaches descriptions so exporters render them with units and help
//! text.

use metrics::{describe_counter, Unit};

/// Metrics prefix for all PaperDesk metrics
pub const METRICS_PREFIX: &str = "paperdesk";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_signups_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of accounts created"
    );

    describe_counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of arXiv search queries issued"
    );

    describe_counter!(
        format!("{}_chat_messages_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of chat messages persisted"
    );

    describe_counter!(
        format!("{}_chat_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of chat replies served by the local fallback"
    );
}
