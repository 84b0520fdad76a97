//! Log ingestion and balance reconstruction for ERC20 tokens.
//!
//! Data flows from an [`RpcGateway`](holders_rpc::RpcGateway) through
//! [`fetcher::LogFetcher`] and [`decoder`] into an ordered stream of
//! [`TransferEvent`](holders_common::transfer::TransferEvent)s, which the
//! [`ledger`] folds into balances and [`timeseries`] turns into a history of
//! holder counts and [`gini`] coefficients.
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod gini;
pub mod ledger;
pub mod retry;
pub mod timeseries;

pub use error::{DecodeError, EngineError as Error, Result};
