use std::collections::VecDeque;

use crate::entity::{TransactionRecord, TxStatus};

/// Maximum number of recent swaps kept in history
pub const MAX_RECENT_TRANSACTIONS: usize = 5;

/// Newest-first list of recent swaps, oldest entries dropped beyond capacity
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    records: VecDeque<TransactionRecord>,
    capacity: usize,
}

impl Default for TransactionHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_RECENT_TRANSACTIONS)
    }
}

impl TransactionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Settle the record with the given signature. False if absent or already final.
    pub fn settle(&mut self, signature: &str, status: TxStatus) -> bool {
        self.records
            .iter_mut()
            .find(|r| r.signature == signature)
            .map(|r| r.settle(status))
            .unwrap_or(false)
    }

    pub fn get(&self, signature: &str) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.signature == signature)
    }

    pub fn records(&self) -> Vec<TransactionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(signature: &str) -> TransactionRecord {
        TransactionRecord {
            signature: signature.to_string(),
            timestamp: Utc::now(),
            from_token: "SOL".to_string(),
            to_token: "USDC".to_string(),
            from_amount: "1".to_string(),
            to_amount: "100.000000".to_string(),
            status: TxStatus::Pending,
        }
    }

    #[test]
    fn keeps_five_most_recent_newest_first() {
        let mut history = TransactionHistory::default();
        for i in 0..8 {
            history.push(record(&format!("sig{}", i)));
        }

        let signatures: Vec<String> = history.records().into_iter().map(|r| r.signature).collect();
        assert_eq!(signatures, vec!["sig7", "sig6", "sig5", "sig4", "sig3"]);
        assert_eq!(history.len(), MAX_RECENT_TRANSACTIONS);
    }

    #[test]
    fn settle_updates_matching_record_once() {
        let mut history = TransactionHistory::default();
        history.push(record("a"));
        history.push(record("b"));

        assert!(history.settle("a", TxStatus::Success));
        assert!(!history.settle("a", TxStatus::Error));
        assert!(!history.settle("missing", TxStatus::Error));

        assert_eq!(history.get("a").map(|r| r.status), Some(TxStatus::Success));
        assert_eq!(history.get("b").map(|r| r.status), Some(TxStatus::Pending));
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut history = TransactionHistory::with_capacity(0);
        history.push(record("a"));
        history.push(record("b"));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.records()[0].signature, "b");
    }
}
