use std::collections::VecDeque;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::Address, programs::Instruction};

/// A committed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: Uuid,
    /// The slot during which the transaction was processed
    pub slot: u64,
    /// Unix timestamp of when the transaction was processed
    pub block_time: i64,
    pub signer: Address,
    pub instructions: Vec<Instruction>,
    /// Program log messages emitted during the transaction
    pub logs: Vec<String>,
    /// Accounts initialized by the transaction
    pub created: Vec<Address>,
}

/// Bounded in-memory transaction store, oldest evicted first
pub struct TransactionHistory {
    records: DashMap<Uuid, TransactionRecord>,
    order: Mutex<VecDeque<Uuid>>,
    capacity: usize,
}

impl TransactionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: DashMap::new(),
            order: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&self, record: TransactionRecord) {
        let mut order = self.order.lock();
        order.push_back(record.signature);
        self.records.insert(record.signature, record);

        while order.len() > self.capacity {
            if let Some(evicted) = order.pop_front() {
                self.records.remove(&evicted);
                tracing::debug!(signature = %evicted, "Evicted transaction from history");
            }
        }
    }

    pub fn get(&self, signature: &Uuid) -> Option<TransactionRecord> {
        self.records.get(signature).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
