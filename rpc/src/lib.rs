//! JSON-RPC plumbing for talking to an Ethereum node.
//!
//! The engine only needs two methods, `eth_blockNumber` and `eth_getLogs`, and
//! reaches them through the [`RpcGateway`] trait so tests can swap in a
//! scripted chain.
pub mod error;
pub mod gateway;
pub mod reqwest;
pub mod rpc_types;
pub mod serde;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use error::{Result, RpcError as Error};
pub use gateway::{HttpGateway, LogFilter, RpcGateway};
