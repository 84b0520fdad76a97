pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Chunk size must be at least 1 block.")]
    InvalidChunkSize,

    #[error("Time series step must be at least 1 block.")]
    InvalidStep,

    #[error("Failed to resolve the latest block after {attempts} attempts. (Error: {source})")]
    LatestBlockFailed {
        attempts: usize,
        source: holders_rpc::Error,
    },

    #[error("Failed to fetch logs for blocks {from}..={to} after {attempts} attempts. (Error: {source})")]
    ChunkFetchFailed {
        from: u64,
        to: u64,
        attempts: usize,
        source: holders_rpc::Error,
    },

    #[error("Failed to decode log #{index}. (Error: {source})")]
    Decode { index: usize, source: DecodeError },

    #[error("Transfer #{index} at block {height} is out of order, streams must be sorted by block.")]
    UnorderedStream { index: usize, height: u64 },

    #[error("Cannot compute a Gini coefficient over an empty distribution.")]
    EmptyDistribution,

    #[error("Cannot compute a Gini coefficient over a distribution that sums to zero.")]
    ZeroSum,

    #[error(transparent)]
    TransferLog(#[from] holders_common::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Expected 3 topics for a Transfer event, found {0}.")]
    TopicCount(usize),

    #[error("Topic {position} '{value}' is not a 32 byte hex word.")]
    InvalidTopic { position: usize, value: String },

    #[error("Log is not a Transfer event (topic0 = {0}).")]
    NotTransfer(String),

    #[error("Data '{0}' is not valid hex.")]
    InvalidData(String),

    #[error("Data is empty, expected a uint256 amount.")]
    EmptyData,

    #[error("Data is {0} bytes long, a uint256 amount fits in 32.")]
    DataTooLong(usize),

    #[error("Block number '{0}' is not a valid hex quantity.")]
    InvalidBlockNumber(String),

    #[error("Amount {raw} with {decimals} decimals could not be scaled.")]
    InvalidAmount { raw: String, decimals: u8 },
}
