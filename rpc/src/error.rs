use serde_json::Value;
use url::Url;

use crate::{
    reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage},
    serde::SerdePathError,
};

pub type Result<T> = std::result::Result<T, RpcError>;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    #[error("Please check your internet connection, the RPC URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}', Context='{context:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error("Formatting params for '{method}' failed. (Error: {error})")]
    ParamsFormattingFailed {
        method: &'static str,
        error: serde_json::Error,
    },

    #[error("RPC method '{method}' returned error {code}: {message}")]
    JsonRpc {
        method: String,
        code: i32,
        message: String,
        data: Option<Value>,
    },

    #[error("RPC method '{method}' returned an unexpected result: {reason}")]
    UnexpectedResult { method: String, reason: String },

    #[error("RPC method '{method}' returned a result that could not be parsed. (Error: {error})")]
    ResultParseFailed {
        method: String,
        error: SerdePathError,
    },
}

impl RpcError {
    /// Whether repeating the same call could succeed. Malformed requests and
    /// bad configuration never will.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidUrl(_) | Self::ReqwestErrorContextMissing | Self::ParamsFormattingFailed { .. }
        )
    }
}
