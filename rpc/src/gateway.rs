use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use alloy::primitives::{Address, B256};
use holders_common::{
    log::RawLog,
    quantity::{format_quantity, parse_quantity},
};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
    reqwest::{parse_url, Reqwest},
    rpc_types::{JsonRpcRequest, JsonRpcResponse},
    serde::SerdeResponseParse,
};

/// Filter object for `eth_getLogs`. Block bounds are inclusive.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Address,
    pub from_block: String,
    pub to_block: String,
    pub topics: Vec<B256>,
}

impl LogFilter {
    pub fn new(address: Address, from_block: u64, to_block: u64, topics: Vec<B256>) -> Self {
        Self {
            address,
            from_block: format_quantity(from_block),
            to_block: format_quantity(to_block),
            topics,
        }
    }
}

/// A single JSON-RPC round trip. Implementors only provide [`RpcGateway::call`];
/// the typed helpers are built on top of it.
pub trait RpcGateway: Send + Sync {
    fn call(&self, method: &str, params: Value) -> impl Future<Output = crate::Result<Value>> + Send;

    /// `eth_blockNumber`
    fn block_number(&self) -> impl Future<Output = crate::Result<u64>> + Send {
        async move {
            let method = "eth_blockNumber";
            let result = self.call(method, json!([])).await?;
            result
                .as_str()
                .and_then(parse_quantity)
                .ok_or_else(|| crate::Error::UnexpectedResult {
                    method: method.to_string(),
                    reason: format!("expected a hex quantity, got {result}"),
                })
        }
    }

    /// `eth_getLogs`
    fn get_logs(&self, filter: &LogFilter) -> impl Future<Output = crate::Result<Vec<RawLog>>> + Send {
        let method = "eth_getLogs";
        let params = serde_json::to_value([filter])
            .map_err(|error| crate::Error::ParamsFormattingFailed { method, error });
        async move {
            let result = self.call(method, params?).await?;
            result
                .serde_parse_custom()
                .map_err(|error| crate::Error::ResultParseFailed {
                    method: method.to_string(),
                    error,
                })
        }
    }
}

/// Gateway speaking JSON-RPC over HTTP. Any credential must already be part of `url`.
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpGateway {
    pub fn new<U: ToString>(url: U) -> crate::Result<Self> {
        Ok(Self {
            client: Client::new(),
            url: parse_url(url)?,
            next_id: AtomicU64::new(1),
        })
    }
}

impl RpcGateway for HttpGateway {
    async fn call(&self, method: &str, params: Value) -> crate::Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        tracing::trace!(id, method, "rpc call");

        Reqwest::post(&self.client, &self.url)
            .json_body(&request)
            .receive_json::<JsonRpcResponse<Value>>()
            .await?
            .into_result(method)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use holders_common::erc20::TRANSFER_TOPIC;

    use super::*;
    use crate::testutils::MockChain;

    #[test]
    fn test_log_filter_shape() {
        let filter = LogFilter::new(
            address!("0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2"),
            1,
            50_001,
            vec![TRANSFER_TOPIC],
        );
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "address": "0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2",
                "fromBlock": "0x1",
                "toBlock": "0xc351",
                "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"]
            })
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(crate::Error::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_block_number() {
        let chain = MockChain::new(0x4a2bd3, vec![]);
        assert_eq!(chain.block_number().await.unwrap(), 0x4a2bd3);
    }

    #[tokio::test]
    async fn test_get_logs_filters_range() {
        let chain = MockChain::new(
            100,
            vec![
                MockChain::transfer_log(5, 0, 1, 2, 10),
                MockChain::transfer_log(50, 0, 2, 3, 4),
            ],
        );
        let filter = LogFilter::new(MockChain::contract(), 1, 10, vec![TRANSFER_TOPIC]);
        let logs = chain.get_logs(&filter).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].block_number, "0x5");
    }
}
