use serde::de::DeserializeOwned;
use serde_json::Value;

pub type SerdePathError = serde_path_to_error::Error<serde_json::Error>;

/// Deserialise with the JSON path of the failing field attached to the error.
pub trait SerdeResponseParse {
    fn serde_parse_custom<T>(self) -> Result<T, SerdePathError>
    where
        T: DeserializeOwned;
}

impl SerdeResponseParse for Value {
    fn serde_parse_custom<T>(self) -> Result<T, SerdePathError>
    where
        T: DeserializeOwned,
    {
        serde_path_to_error::deserialize(self)
    }
}

impl SerdeResponseParse for &str {
    fn serde_parse_custom<T>(self) -> Result<T, SerdePathError>
    where
        T: DeserializeOwned,
    {
        serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(self))
    }
}

#[cfg(test)]
mod tests {
    use holders_common::log::RawLog;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_carries_path() {
        let value = json!([
            { "blockNumber": "0x1", "data": "0x", "topics": [] },
            { "blockNumber": "0x2", "data": 7, "topics": [] }
        ]);
        let err = value.serde_parse_custom::<Vec<RawLog>>().unwrap_err();
        assert_eq!(err.path().to_string(), "[1].data");
    }

    #[test]
    fn test_str_parse() {
        let logs: Vec<RawLog> = r#"[{"blockNumber":"0x1","data":"0x","topics":[]}]"#
            .serde_parse_custom()
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].block_number, "0x1");
    }
}
