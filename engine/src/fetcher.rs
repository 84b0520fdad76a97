use std::collections::HashSet;

use alloy::primitives::Address;
use holders_common::{erc20::TRANSFER_TOPIC, log::RawLog};
use holders_rpc::{LogFilter, RpcGateway};
use tracing::{debug, info};

use crate::retry::{retry, RetryPolicy};

pub const DEFAULT_CHUNK_SIZE: u64 = 50_000;

#[derive(Clone, Debug, PartialEq)]
pub struct FetchConfig {
    /// Width of each `eth_getLogs` window in blocks.
    pub chunk_size: u64,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Inclusive `(from, to)` windows covering `from_block..=latest`. A window ends
/// on the block the next one starts at, so consecutive windows share one block.
pub fn windows(from_block: u64, latest: u64, chunk_size: u64) -> impl Iterator<Item = (u64, u64)> {
    std::iter::successors(Some(from_block), move |start| start.checked_add(chunk_size))
        .take_while(move |start| *start <= latest)
        .map(move |start| (start, start.saturating_add(chunk_size).min(latest)))
}

/// Accumulator for one fetch. A log already accepted from the previous window's
/// boundary block is not appended again.
#[derive(Default)]
struct FetchState {
    logs: Vec<RawLog>,
    seen: HashSet<(String, String)>,
}

impl FetchState {
    fn accept(&mut self, logs: Vec<RawLog>) -> usize {
        let before = self.logs.len();
        for log in logs {
            if let Some((tx, index)) = log.identity() {
                if !self.seen.insert((tx.to_string(), index.to_string())) {
                    continue;
                }
            }
            self.logs.push(log);
        }
        self.logs.len() - before
    }
}

/// Walks a block range in fixed windows, retrying each window on its own.
pub struct LogFetcher<G> {
    gateway: G,
    config: FetchConfig,
}

impl<G: RpcGateway> LogFetcher<G> {
    pub fn new(gateway: G, config: FetchConfig) -> crate::Result<Self> {
        if config.chunk_size == 0 {
            return Err(crate::Error::InvalidChunkSize);
        }
        Ok(Self { gateway, config })
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn latest_block(&self) -> crate::Result<u64> {
        retry(&self.config.retry, holders_rpc::Error::is_retryable, |_| {
            self.gateway.block_number()
        })
        .await
        .map_err(|e| crate::Error::LatestBlockFailed {
            attempts: e.attempts,
            source: e.error,
        })
    }

    /// All Transfer logs emitted by `contract` from block 1 up to the chain
    /// head as of the start of the call.
    pub async fn fetch_transfer_logs(&self, contract: Address) -> crate::Result<Vec<RawLog>> {
        self.fetch_transfer_logs_from(contract, 1).await
    }

    pub async fn fetch_transfer_logs_from(
        &self,
        contract: Address,
        from_block: u64,
    ) -> crate::Result<Vec<RawLog>> {
        let latest = self.latest_block().await?;
        info!(
            %contract,
            from_block,
            latest,
            chunk_size = self.config.chunk_size,
            "fetching transfer logs"
        );

        let mut state = FetchState::default();
        for (from, to) in windows(from_block, latest, self.config.chunk_size) {
            let logs = self.fetch_window(contract, from, to).await?;
            let received = logs.len();
            let accepted = state.accept(logs);
            debug!(from, to, received, accepted, "window done");
        }

        info!(%contract, count = state.logs.len(), "fetched transfer logs");
        Ok(state.logs)
    }

    async fn fetch_window(&self, contract: Address, from: u64, to: u64) -> crate::Result<Vec<RawLog>> {
        let filter = LogFilter::new(contract, from, to, vec![TRANSFER_TOPIC]);
        retry(&self.config.retry, holders_rpc::Error::is_retryable, |attempt| {
            debug!(from, to, attempt, "eth_getLogs");
            self.gateway.get_logs(&filter)
        })
        .await
        .map_err(|e| crate::Error::ChunkFetchFailed {
            from,
            to,
            attempts: e.attempts,
            source: e.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use holders_rpc::testutils::MockChain;

    use super::*;

    fn fetcher(chain: MockChain, chunk_size: u64) -> LogFetcher<MockChain> {
        LogFetcher::new(
            chain,
            FetchConfig {
                chunk_size,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn logs() -> Vec<RawLog> {
        vec![
            MockChain::transfer_log(1, 0, 1, 2, 100),
            MockChain::transfer_log(3, 0, 2, 3, 10),
            MockChain::transfer_log(3, 1, 2, 4, 10),
            MockChain::transfer_log(10, 0, 3, 1, 5),
            MockChain::transfer_log(11, 0, 4, 1, 1),
            MockChain::transfer_log(25, 0, 1, 5, 7),
        ]
    }

    #[test]
    fn test_windows() {
        assert_eq!(
            windows(1, 25, 10).collect::<Vec<_>>(),
            vec![(1, 11), (11, 21), (21, 25)]
        );
        assert_eq!(windows(1, 21, 10).collect::<Vec<_>>(), vec![(1, 11), (11, 21), (21, 21)]);
        assert_eq!(windows(1, 1, 50_000).collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(windows(1, 0, 10).count(), 0);
        assert_eq!(windows(u64::MAX, u64::MAX, 10).collect::<Vec<_>>(), vec![(u64::MAX, u64::MAX)]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = LogFetcher::new(
            MockChain::new(10, vec![]),
            FetchConfig {
                chunk_size: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(crate::Error::InvalidChunkSize)));
    }

    #[tokio::test]
    async fn test_chunked_equals_single_fetch() {
        let single = fetcher(MockChain::new(30, logs()), 1_000);
        let chunked = fetcher(MockChain::new(30, logs()), 10);

        let all = single.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        let parts = chunked.fetch_transfer_logs(MockChain::contract()).await.unwrap();

        assert_eq!(all, logs());
        assert_eq!(parts, all);
        assert_eq!(
            chunked.gateway().get_logs_windows(),
            vec![(1, 11), (11, 21), (21, 30)]
        );
    }

    #[tokio::test]
    async fn test_chunk_size_one() {
        let chunked = fetcher(MockChain::new(30, logs()), 1);
        let parts = chunked.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        assert_eq!(parts, logs());
        assert_eq!(chunked.gateway().get_logs_windows().len(), 30);
    }

    #[tokio::test]
    async fn test_latest_block_resolved_once() {
        let chain = fetcher(MockChain::new(30, logs()), 10);
        chain.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        let block_number_calls = chain
            .gateway()
            .calls()
            .iter()
            .filter(|(method, _)| method == "eth_blockNumber")
            .count();
        assert_eq!(block_number_calls, 1);
    }

    #[tokio::test]
    async fn test_logs_after_head_are_excluded() {
        let chain = fetcher(MockChain::new(20, logs()), 10);
        let fetched = chain.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        assert_eq!(fetched, logs()[..5].to_vec());
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let chain = fetcher(MockChain::new(30, logs()).fail_window(11, 2), 10);
        let fetched = chain.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        assert_eq!(fetched, logs());
        assert_eq!(
            chain.gateway().get_logs_windows(),
            vec![(1, 11), (11, 21), (11, 21), (11, 21), (21, 30)]
        );
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let chain = fetcher(MockChain::new(30, logs()).fail_window(11, 4), 10);
        let err = chain
            .fetch_transfer_logs(MockChain::contract())
            .await
            .unwrap_err();
        match err {
            crate::Error::ChunkFetchFailed {
                from, to, attempts, ..
            } => assert_eq!((from, to, attempts), (11, 21, 4)),
            other => panic!("unexpected {other:?}"),
        }
        // nothing after the failing window was requested
        assert_eq!(chain.gateway().get_logs_windows().last(), Some(&(11, 21)));
    }

    #[tokio::test]
    async fn test_resume_from_block() {
        let chain = fetcher(MockChain::new(30, logs()), 10);
        let fetched = chain
            .fetch_transfer_logs_from(MockChain::contract(), 11)
            .await
            .unwrap();
        assert_eq!(fetched, logs()[4..].to_vec());
        assert_eq!(chain.gateway().get_logs_windows(), vec![(11, 21), (21, 30)]);
    }

    #[tokio::test]
    async fn test_logs_without_identity_are_kept() {
        let mut log = MockChain::transfer_log(11, 0, 1, 2, 3);
        log.transaction_hash = None;
        let chain = fetcher(MockChain::new(30, vec![log.clone()]), 10);
        let fetched = chain.fetch_transfer_logs(MockChain::contract()).await.unwrap();
        // block 11 sits on the boundary of two windows
        assert_eq!(fetched, vec![log.clone(), log]);
    }
}
