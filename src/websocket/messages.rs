use serde::{Deserialize, Serialize};

use crate::models::{Account, Address};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    AccountSubscribe { address: Address },
    AccountUnsubscribe { address: Address },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Subscribed {
        address: Address,
    },
    Unsubscribed {
        address: Address,
    },
    AccountNotification {
        address: Address,
        slot: u64,
        /// `None` when the account was closed
        account: Option<Account>,
    },
    Error {
        message: String,
    },
}
