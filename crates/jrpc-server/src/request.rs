use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::error::Category;

use crate::error::ErrorObject;
use crate::types::RequestId;

/// A decoded JSON-RPC request.
///
/// Missing members fall back to their defaults: an empty `method` simply
/// fails lookup, an absent `id` makes the request a notification. The
/// `jsonrpc` member is carried as-is and not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "jsonrpc", default)]
    pub version: String,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: RequestId,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            version: crate::JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// True when no response may be sent for this request.
    pub fn is_notification(&self) -> bool {
        self.id.is_notification()
    }

    /// Decode one request from raw bytes.
    ///
    /// Malformed JSON is a Parse error. Well-formed JSON that is not an object,
    /// or whose members have the wrong types, is an Invalid Request.
    pub fn decode(payload: &[u8]) -> Result<Self, ErrorObject> {
        let value: Value = serde_json::from_slice(payload).map_err(decode_error)?;
        if !value.is_object() {
            return Err(ErrorObject::invalid_request()
                .with_cause(format!("request must be a JSON object, got {}", kind(&value))));
        }
        serde_json::from_value(value).map_err(decode_error)
    }
}

/// Syntax-level failures are Parse errors, everything else is a shape problem.
pub(crate) fn decode_error(err: serde_json::Error) -> ErrorObject {
    match err.classify() {
        Category::Data => ErrorObject::invalid_request().with_cause(err),
        _ => ErrorObject::parse_error().with_cause(err),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
