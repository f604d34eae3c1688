use serde::{Deserialize, Serialize};

use super::Address;

/// Per-wallet todo list header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub owner: Address,
    /// Index the next task will receive; never reused
    pub last_todo: u8,
    /// Number of tasks that have not been removed
    pub todo_count: u8,
}

impl UserProfile {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            last_todo: 0,
            todo_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoAccount {
    pub owner: Address,
    pub index: u8,
    pub todo: String,
    pub done: bool,
}
