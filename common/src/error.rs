use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Block number '{0}' is not a valid hex quantity.")]
    InvalidBlockNumber(String),
}
