//! Connector metrics.
//!
//! Counters are emitted through the `metrics` facade; nothing is recorded until the host
//! installs a recorder.

use crate::action::ItemAction;
use crate::filter::FilterDecision;
use metrics::{counter, describe_counter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Actions produced by synchronizations and item extractions.
pub const ACTIONS_TOTAL: &str = "catalog_connector_actions_total";

/// Outcomes of item filter evaluation.
pub const FILTER_DECISIONS_TOTAL: &str = "catalog_connector_filter_decisions_total";

/// Errors surfaced through result streams.
pub const STREAM_ERRORS_TOTAL: &str = "catalog_connector_stream_errors_total";

/// Registers all connector metric descriptions.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total item actions produced by connectors");
    describe_counter!(
        FILTER_DECISIONS_TOTAL,
        "Total item filter evaluations by decision"
    );
    describe_counter!(STREAM_ERRORS_TOTAL, "Total errors yielded by result streams");
}

#[derive(Debug, Default)]
struct Tallies {
    actions: AtomicU64,
    filter_decisions: AtomicU64,
    stream_errors: AtomicU64,
}

/// Metrics handle bound to one connector.
///
/// Besides emitting counters, the handle keeps its own totals; clones share them.
#[derive(Debug, Clone)]
pub struct ConnectorMetrics {
    connector: String,
    tallies: Arc<Tallies>,
}

impl ConnectorMetrics {
    pub fn new(connector_id: impl Into<String>) -> Self {
        Self {
            connector: connector_id.into(),
            tallies: Arc::default(),
        }
    }

    pub fn connector(&self) -> &str {
        &self.connector
    }

    pub fn actions(&self) -> u64 {
        self.tallies.actions.load(Ordering::Relaxed)
    }

    pub fn filter_decisions(&self) -> u64 {
        self.tallies.filter_decisions.load(Ordering::Relaxed)
    }

    pub fn stream_errors(&self) -> u64 {
        self.tallies.stream_errors.load(Ordering::Relaxed)
    }

    /// Record one produced action, labelled `upsert` or `delete`.
    pub fn record_action(&self, action: &ItemAction) {
        counter!(
            ACTIONS_TOTAL,
            "connector" => self.connector.clone(),
            "kind" => action.kind()
        )
        .increment(1);
        self.tallies.actions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filter_decision(&self, decision: &FilterDecision<'_>) {
        counter!(
            FILTER_DECISIONS_TOTAL,
            "connector" => self.connector.clone(),
            "decision" => decision.label()
        )
        .increment(1);
        self.tallies.filter_decisions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stream_error(&self) {
        counter!(STREAM_ERRORS_TOTAL, "connector" => self.connector.clone()).increment(1);
        self.tallies.stream_errors.fetch_add(1, Ordering::Relaxed);
    }
}
