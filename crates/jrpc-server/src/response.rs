use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ErrorObject;
use crate::returns::Outcome;
use crate::types::{JsonRpcVersion, RequestId};

/// A JSON-RPC response carrying either a result or an error.
///
/// Both `result` and `error` are omitted when empty: a method with no return
/// values answers with neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "jsonrpc")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    pub id: RequestId,
}

impl Response {
    pub fn success(id: RequestId, result: Option<Value>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0.to_string(),
            result,
            error: None,
            id,
        }
    }

    pub fn error(id: RequestId, error: ErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Shape an invocation outcome.
    ///
    /// No values means no `result`, one value is the result itself, several
    /// values become an array in declaration order.
    pub fn from_outcome(id: RequestId, outcome: Outcome, expose_internal: bool) -> Self {
        match outcome {
            Ok(mut values) => {
                let result = match values.len() {
                    0 => None,
                    1 => values.pop(),
                    _ => Some(Value::Array(values)),
                };
                Self::success(id, result.map(normalize_numbers))
            }
            Err(err) => Self::error(id, err.into_error_object(expose_internal)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// What a call produces when it produces anything: one response object or a
/// batch array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Single(Response),
    Batch(Vec<Response>),
}

impl Reply {
    pub fn as_single(&self) -> Option<&Response> {
        match self {
            Reply::Single(response) => Some(response),
            Reply::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[Response]> {
        match self {
            Reply::Single(_) => None,
            Reply::Batch(responses) => Some(responses),
        }
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Single(response)
    }
}

impl From<Vec<Response>> for Reply {
    fn from(responses: Vec<Response>) -> Self {
        Reply::Batch(responses)
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render integral floats in shortest form (`3` rather than `3.0`).
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
                Value::Number(Number::from(f as i64))
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}
