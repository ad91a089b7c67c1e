//! In-memory log of submitted operations, rendered as a collapsible overlay.

use tracing::{debug, warn};
use uuid::Uuid;
use whsk_types::{OperationRecord, OperationStatus};

#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    records: Vec<OperationRecord>,
    expanded: bool,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending record under a fresh id and return the id.
    pub fn start(&mut self, title: impl Into<String>, description: impl Into<String>) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.records.push(OperationRecord::pending(id.clone(), title, description));
        id
    }

    pub fn complete(&mut self, id: &str, tx_hash: impl Into<String>) -> bool {
        let tx_hash = tx_hash.into();
        self.transition(id, OperationStatus::Success, |r| r.tx_hash = Some(tx_hash))
    }

    /// Mark failed; the description is replaced by the error message.
    pub fn fail(&mut self, id: &str, message: impl Into<String>) -> bool {
        let message = message.into();
        self.transition(id, OperationStatus::Error, |r| r.description = message)
    }

    fn transition(&mut self, id: &str, next: OperationStatus, patch: impl FnOnce(&mut OperationRecord)) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            warn!(id, "update for unknown operation");
            return false;
        };
        if !record.status.can_transition_to(next) {
            warn!(id, from = record.status.as_str(), to = next.as_str(), "rejected status transition");
            return false;
        }
        record.status = next;
        patch(record);
        debug!(id, status = next.as_str(), "operation settled");
        true
    }

    /// Remove a settled record. Pending records stay.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let Some(pos) = self.records.iter().position(|r| r.id == id) else {
            return false;
        };
        if !self.records[pos].status.is_terminal() {
            return false;
        }
        self.records.remove(pos);
        true
    }

    pub fn get(&self, id: &str) -> Option<&OperationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order_and_unique_ids() {
        let mut log = OperationLog::new();
        let a = log.start("Wrapping HSK", "1 HSK → WHSK");
        let b = log.start("Unwrapping WHSK", "2 WHSK → HSK");
        assert_ne!(a, b);
        let ids: Vec<_> = log.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn success_attaches_hash_and_is_final() {
        let mut log = OperationLog::new();
        let id = log.start("Wrapping HSK", "1 HSK → WHSK");
        assert!(log.complete(&id, "0xhash"));

        let record = log.get(&id).unwrap();
        assert_eq!(record.status, OperationStatus::Success);
        assert_eq!(record.tx_hash.as_deref(), Some("0xhash"));
        assert_eq!(record.description, "1 HSK → WHSK");

        assert!(!log.fail(&id, "late failure"));
        assert_eq!(log.get(&id).unwrap().status, OperationStatus::Success);
    }

    #[test]
    fn error_replaces_description() {
        let mut log = OperationLog::new();
        let id = log.start("Unwrapping WHSK", "10 WHSK → HSK");
        assert!(log.fail(&id, "user rejected"));
        let record = log.get(&id).unwrap();
        assert_eq!(record.status, OperationStatus::Error);
        assert_eq!(record.description, "user rejected");
        assert_eq!(record.tx_hash, None);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut log = OperationLog::new();
        assert!(!log.complete("missing", "0x1"));
        assert!(!log.dismiss("missing"));
        assert!(log.is_empty());
    }

    #[test]
    fn only_settled_records_can_be_dismissed() {
        let mut log = OperationLog::new();
        let pending = log.start("Wrapping HSK", "1 HSK → WHSK");
        let done = log.start("Wrapping HSK", "2 HSK → WHSK");
        log.complete(&done, "0xhash");

        assert!(!log.dismiss(&pending));
        assert!(log.dismiss(&done));
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].id, pending);
    }

    #[test]
    fn expansion_toggles() {
        let mut log = OperationLog::new();
        assert!(!log.is_expanded());
        assert!(log.toggle_expanded());
        assert!(!log.toggle_expanded());
    }
}
