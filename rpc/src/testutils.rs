//! An in-memory chain that answers `eth_blockNumber` and `eth_getLogs`, with
//! failure injection per log window.

use std::{collections::HashMap, sync::Mutex};

use alloy::primitives::{Address, B256, U256};
use holders_common::{
    erc20::TRANSFER_TOPIC,
    log::RawLog,
    quantity::{format_quantity, parse_quantity},
};
use serde_json::{Map, Value};

use crate::RpcGateway;

pub struct MockChain {
    latest: u64,
    logs: Vec<RawLog>,
    failures: Mutex<HashMap<u64, usize>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockChain {
    pub fn new(latest: u64, logs: Vec<RawLog>) -> Self {
        Self {
            latest,
            logs,
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The `eth_getLogs` window starting at `from_block` fails `times` times before answering.
    pub fn fail_window(self, from_block: u64, times: usize) -> Self {
        self.failures
            .lock()
            .expect("poisoned")
            .insert(from_block, times);
        self
    }

    pub fn contract() -> Address {
        Address::with_last_byte(0xee)
    }

    pub fn address(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    /// A well-formed transfer log between `MockChain::address(from)` and `MockChain::address(to)`.
    pub fn transfer_log(block: u64, log_index: u64, from: u8, to: u8, raw_amount: u64) -> RawLog {
        let mut tx_hash = [0u8; 32];
        tx_hash[..8].copy_from_slice(&block.to_be_bytes());
        tx_hash[8..16].copy_from_slice(&log_index.to_be_bytes());

        RawLog {
            block_number: format_quantity(block),
            data: B256::from(U256::from(raw_amount)).to_string(),
            topics: vec![
                TRANSFER_TOPIC.to_string(),
                Self::address(from).into_word().to_string(),
                Self::address(to).into_word().to_string(),
            ],
            transaction_hash: Some(B256::from(tx_hash).to_string()),
            log_index: Some(format_quantity(log_index)),
            extra: Map::new(),
        }
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("poisoned").clone()
    }

    /// Inclusive `(fromBlock, toBlock)` of every `eth_getLogs` call, in call order.
    pub fn get_logs_windows(&self) -> Vec<(u64, u64)> {
        self.calls()
            .into_iter()
            .filter(|(method, _)| method == "eth_getLogs")
            .filter_map(|(_, params)| Self::window(&params))
            .collect()
    }

    fn window(params: &Value) -> Option<(u64, u64)> {
        let filter = params.get(0)?;
        let from = parse_quantity(filter.get("fromBlock")?.as_str()?)?;
        let to = parse_quantity(filter.get("toBlock")?.as_str()?)?;
        Some((from, to))
    }

    fn error(method: &str, code: i32, message: &str) -> crate::Error {
        crate::Error::JsonRpc {
            method: method.to_string(),
            code,
            message: message.to_string(),
            data: None,
        }
    }
}

impl RpcGateway for MockChain {
    async fn call(&self, method: &str, params: Value) -> crate::Result<Value> {
        self.calls
            .lock()
            .expect("poisoned")
            .push((method.to_string(), params.clone()));

        match method {
            "eth_blockNumber" => Ok(Value::String(format_quantity(self.latest))),
            "eth_getLogs" => {
                let (from, to) = Self::window(&params)
                    .ok_or_else(|| Self::error(method, -32602, "Invalid params"))?;

                if let Some(remaining) = self.failures.lock().expect("poisoned").get_mut(&from) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(Self::error(method, -32603, "upstream timeout"));
                    }
                }

                let logs: Vec<&RawLog> = self
                    .logs
                    .iter()
                    .filter(|log| {
                        parse_quantity(&log.block_number)
                            .is_some_and(|height| from <= height && height <= to)
                    })
                    .collect();
                serde_json::to_value(logs).map_err(|e| Self::error(method, -32603, &e.to_string()))
            }
            _ => Err(Self::error(method, -32601, "Method not found")),
        }
    }
}
