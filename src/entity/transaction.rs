use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Error,
}

impl TxStatus {
    /// Only `Pending` may settle, and only into a final status
    pub fn can_transition_to(self, next: TxStatus) -> bool {
        self == TxStatus::Pending && next != TxStatus::Pending
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A swap awaiting wallet approval and network confirmation
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub payload: Vec<u8>,
    pub last_valid_block_height: u64,
    pub input_token: Token,
    pub output_token: Token,
    pub amount: String,
}

/// History entry for a broadcast swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    pub from_token: String,
    pub to_token: String,
    pub from_amount: String,
    pub to_amount: String,
    pub status: TxStatus,
}

impl TransactionRecord {
    pub fn pending(signature: String, pending: &PendingTransaction, to_amount: String) -> Self {
        Self {
            signature,
            timestamp: Utc::now(),
            from_token: pending.input_token.symbol.clone(),
            to_token: pending.output_token.symbol.clone(),
            from_amount: pending.amount.trim().to_string(),
            to_amount,
            status: TxStatus::Pending,
        }
    }

    /// Move to a final status. Returns false if the transition is not allowed.
    pub fn settle(&mut self, status: TxStatus) -> bool {
        if !self.status.can_transition_to(status) {
            return false;
        }
        self.status = status;
        true
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {} → {} {}",
            self.from_amount, self.from_token, self.to_amount, self.to_token
        )
    }
}
