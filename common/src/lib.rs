pub mod erc20;
pub mod error;
pub mod log;
pub mod quantity;
pub mod text_truncate;
pub mod transfer;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
