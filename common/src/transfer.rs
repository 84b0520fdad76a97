use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// A decoded ERC20 transfer. `amount` is already scaled by the token decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferEvent {
    pub block_height: u64,
    pub from: Address,
    pub to: Address,
    pub amount: BigDecimal,
}

/// One address's net position at a snapshot height. Also the record format of balance files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub address: Address,
    pub amount: BigDecimal,
}
