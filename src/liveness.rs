use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-cycle liveness report.
///
/// `online` lists the distinct heartbeat records observed this cycle in
/// arrival order; `offline` lists every previously known record that did not
/// reappear, in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessReport {
    pub online: Vec<String>,
    pub offline: Vec<String>,
}

/// Splits a `"name#description"` heartbeat record for display.
/// Records without a separator read as a bare name with an empty description.
pub fn split_record(record: &str) -> (&str, &str) {
    match record.split_once('#') {
        Some((name, description)) => (name, description),
        None => (record, ""),
    }
}

/// Heartbeat liveness tracker.
///
/// Liveness is inferred purely from presence versus absence in the current
/// polling batch — no timeouts. A record once seen is remembered forever, and
/// reads as down in any cycle where it is known but absent.
///
/// Identity is the full literal record string, description included: a
/// participant whose description text changes registers as a brand-new entity
/// and its old record reads down from then on. That behavior is inherited
/// from the deployed system and kept; see the tests.
#[derive(Debug, Default)]
pub struct LivenessTracker {
    ever_seen: BTreeSet<String>,
}

impl LivenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct records ever observed.
    pub fn known_count(&self) -> usize {
        self.ever_seen.len()
    }

    /// Folds one cycle's heartbeat records into the registry and reports.
    ///
    /// Duplicate records within the cycle are ignored after the first.
    pub fn observe_cycle<I, S>(&mut self, records: I) -> LivenessReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current: BTreeSet<String> = BTreeSet::new();
        let mut online = Vec::new();

        for record in records {
            let record = record.as_ref();
            if current.insert(record.to_string()) {
                online.push(record.to_string());
                self.ever_seen.insert(record.to_string());
            }
        }

        let offline = self
            .ever_seen
            .iter()
            .filter(|known| !current.contains(*known))
            .cloned()
            .collect();

        LivenessReport { online, offline }
    }
}
