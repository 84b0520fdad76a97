pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Utils(#[from] holders_utils::Error),

    #[error(transparent)]
    Rpc(#[from] holders_rpc::Error),

    #[error(transparent)]
    Engine(#[from] holders_engine::Error),

    #[error(transparent)]
    TransferLog(#[from] holders_common::Error),
}
