use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, UtilsError>;

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("The RPC URL '{0}' needs an API key. Pass --api-key, set INFURA_KEY or run `holders config set-api-key`.")]
    ApiKeyNotSet(String),

    #[error("Failed to get base directories.")]
    BaseDirsFailed,

    #[error("Failed to create directory: {0:?}. (Error: {1:?})")]
    CreateDirAllFailed(PathBuf, std::io::Error),

    #[error("Failed to read the file: {0:?}. (Error: {1:?})")]
    FileReadFailed(PathBuf, std::io::Error),

    #[error("Failed to write to the file: {0:?}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error("Parsing the toml file failed: {0:?}. (Error: {1:?})")]
    TomlParsingFailed(PathBuf, toml::de::Error),

    #[error("Formatting to toml format failed: {0}. (Error: {1:?})")]
    TomlFormattingFailed(String, toml::ser::Error),

    #[error("Parsing the json file failed: {0:?} at '{path}'. (Error: {1})", path = .1.path())]
    JsonParsingFailed(PathBuf, serde_path_to_error::Error<serde_json::Error>),

    #[error("Formatting to json failed. (Error: {0})")]
    JsonFormattingFailed(serde_json::Error),

    #[error("Writing output failed. (Error: {0})")]
    OutputFailed(#[from] std::io::Error),

    #[error("Failed to initialise logging. (Error: {0})")]
    LogInitFailed(String),

    #[error(transparent)]
    TransferLog(#[from] holders_common::Error),
}
