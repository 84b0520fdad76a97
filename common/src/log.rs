//! Log records in the shape returned by `eth_getLogs`, and the decoded form that
//! is persisted to transfer files.

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{quantity::parse_quantity, transfer::TransferEvent};

/// One entry of an `eth_getLogs` result. Fields the engine does not interpret
/// are carried through untouched so that files keep everything the provider sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub block_number: String,
    pub data: String,
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawLog {
    /// Identity of a log on chain, if the provider reported it.
    pub fn identity(&self) -> Option<(&str, &str)> {
        match (&self.transaction_hash, &self.log_index) {
            (Some(tx), Some(index)) => Some((tx.as_str(), index.as_str())),
            _ => None,
        }
    }
}

/// A raw log augmented with its decoded transfer fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferLog {
    #[serde(flatten)]
    pub log: RawLog,
    pub from: Address,
    pub to: Address,
    pub amount: BigDecimal,
}

impl TransferLog {
    pub fn block_height(&self) -> crate::Result<u64> {
        parse_quantity(&self.log.block_number)
            .ok_or_else(|| crate::Error::InvalidBlockNumber(self.log.block_number.clone()))
    }

    pub fn to_event(&self) -> crate::Result<TransferEvent> {
        Ok(TransferEvent {
            block_height: self.block_height()?,
            from: self.from,
            to: self.to,
            amount: self.amount.clone(),
        })
    }
}

/// Converts a transfer file into the event stream the ledger consumes.
pub fn to_events(logs: &[TransferLog]) -> crate::Result<Vec<TransferEvent>> {
    logs.iter().map(TransferLog::to_event).collect()
}
