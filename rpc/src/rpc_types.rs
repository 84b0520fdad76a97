use serde::{
    de::{Error, Unexpected},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    String(String),
    #[default]
    Null,
}

// Read through `Value`: an untagged enum buffers numbers in a form that only
// `Value` understands once serde_json keeps them as literal text.
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Id::Null),
            Value::String(s) => Ok(Id::String(s)),
            Value::Number(n) => n.as_u64().map(Id::Number).ok_or_else(|| {
                D::Error::invalid_value(Unexpected::Other("non integer id"), &"an unsigned integer")
            }),
            _ => Err(D::Error::invalid_type(
                Unexpected::Other("array or object"),
                &"a number, string or null",
            )),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TwoPointZero;

impl Serialize for TwoPointZero {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for TwoPointZero {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(TwoPointZero)
        } else {
            Err(D::Error::invalid_value(Unexpected::Str(&s), &"\"2.0\""))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObj {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: TwoPointZero,
    pub method: String,
    pub params: Option<Value>,
    pub id: Id,
}

/// `result` and `error` are plain optional fields rather than a flattened enum,
/// so numbers inside an error object are read straight from the text.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: TwoPointZero,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObj>,
    pub id: Id,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: &str, params: Value) -> Self {
        JsonRpcRequest {
            jsonrpc: TwoPointZero,
            method: method.to_string(),
            params: Some(params),
            id: Id::Number(id),
        }
    }
}

impl<T> JsonRpcResponse<T> {
    /// Unwraps the payload, turning a JSON-RPC error object into [`crate::Error::JsonRpc`].
    pub fn into_result(self, method: &str) -> crate::Result<T> {
        match (self.result, self.error) {
            (_, Some(err)) => Err(crate::Error::JsonRpc {
                method: method.to_string(),
                code: err.code,
                message: err.message,
                data: err.data,
            }),
            (Some(v), None) => Ok(v),
            (None, None) => Err(crate::Error::UnexpectedResult {
                method: method.to_string(),
                reason: "response has neither a result nor an error".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_shape() {
        let req = JsonRpcRequest::new(7, "eth_blockNumber", json!([]));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 7})
        );
    }

    #[test]
    fn test_response_success() {
        let resp: JsonRpcResponse<Value> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#).unwrap();
        assert_eq!(resp.id, Id::Number(1));
        assert_eq!(resp.into_result("eth_blockNumber").unwrap(), json!("0x10"));

        let resp: JsonRpcResponse<Value> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"abc","result":[]}"#).unwrap();
        assert_eq!(resp.id, Id::String("abc".to_string()));
    }

    #[test]
    fn test_response_error() {
        let resp: JsonRpcResponse<Value> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"query returned more than 10000 results"}}"#,
        )
        .unwrap();
        match resp.into_result("eth_getLogs") {
            Err(crate::Error::JsonRpc { method, code, .. }) => {
                assert_eq!(method, "eth_getLogs");
                assert_eq!(code, -32005);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_response_without_payload() {
        let resp: JsonRpcResponse<Value> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null}"#).unwrap();
        assert_eq!(resp.id, Id::Null);
        assert!(matches!(
            resp.into_result("eth_blockNumber"),
            Err(crate::Error::UnexpectedResult { .. })
        ));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let resp = serde_json::from_str::<JsonRpcResponse<Value>>(
            r#"{"jsonrpc":"1.0","id":1,"result":"0x10"}"#,
        );
        assert!(resp.is_err());
    }
}
