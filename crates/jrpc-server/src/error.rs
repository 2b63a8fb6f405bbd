use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Boxed error used as the diagnostic cause of a protocol error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Application-defined code reported by a method through [`ServerError`].
    ServerError(i64),
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
///
/// `cause` never reaches the wire. It keeps the underlying failure around for
/// the server's error reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip)]
    pub cause: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl ErrorObject {
    pub fn new(code: JsonRpcErrorCode, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data,
            cause: None,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None)
    }

    pub fn invalid_request() -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None)
    }

    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, None)
    }

    pub fn invalid_params(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, data)
    }

    pub fn internal_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, data)
    }

    /// Structured error reported by a method: the code and data pass through
    /// verbatim, the message is always "Server error".
    pub fn server_error(code: i64, data: Option<Value>) -> Self {
        if !crate::error_codes::is_server_error(code) {
            debug!(code, "Server error code outside the reserved -32099..=-32000 range");
        }
        Self::new(JsonRpcErrorCode::ServerError(code), data)
    }

    /// Attach the diagnostic cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(Arc::from(cause.into()));
        self
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl PartialEq for ErrorObject {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message && self.data == other.data
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, " data: {}", data)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " cause: {}", cause)?;
        }
        Ok(())
    }
}

/// Structured error a method returns to choose its own error code and payload.
///
/// ```rust
/// use jrpc_server::ServerError;
///
/// fn divide(a: f64, b: f64) -> Result<f64, ServerError> {
///     if b == 0.0 {
///         return Err(ServerError::new(-32001).with_data("divide by zero"));
///     }
///     Ok(a / b)
/// }
/// # assert_eq!(divide(1.0, 0.0).unwrap_err().code, -32001);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("server error {code}{}", .data.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct ServerError {
    pub code: i64,
    pub data: Option<Value>,
}

impl ServerError {
    pub fn new(code: i64) -> Self {
        Self { code, data: None }
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// The error half of a method's `Result` return.
///
/// Every `std::error::Error` converts into it. A [`ServerError`] is recognised
/// and kept structured; anything else becomes an internal error.
#[derive(Debug)]
pub enum MethodError {
    Server { code: i64, data: Option<Value> },
    Internal(BoxError),
}

impl MethodError {
    pub fn internal(err: impl Into<BoxError>) -> Self {
        MethodError::Internal(err.into())
    }

    /// Shape into the wire error. `expose_internal` copies an internal error's
    /// message into `data`; the cause is always attached.
    pub fn into_error_object(self, expose_internal: bool) -> ErrorObject {
        match self {
            MethodError::Server { code, data } => ErrorObject::server_error(code, data),
            MethodError::Internal(err) => {
                let data = expose_internal.then(|| Value::String(err.to_string()));
                ErrorObject::internal_error(data).with_cause(err)
            }
        }
    }
}

impl fmt::Display for MethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodError::Server { code, data } => match data {
                Some(data) => write!(f, "server error {}: {}", code, data),
                None => write!(f, "server error {}", code),
            },
            MethodError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl<E> From<E> for MethodError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        let boxed: BoxError = Box::new(err);
        match boxed.downcast::<ServerError>() {
            Ok(server) => {
                let ServerError { code, data } = *server;
                MethodError::Server { code, data }
            }
            Err(other) => MethodError::Internal(other),
        }
    }
}

/// Errors raised while building a [`Registry`](crate::Registry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no methods were registered")]
    Empty,

    #[error("method '{0}' is registered more than once")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes;
    use serde_json::json;
    use tracing_test::traced_test;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::InvalidParams.code(), -32602);
        assert_eq!(JsonRpcErrorCode::InternalError.code(), -32603);
        assert_eq!(JsonRpcErrorCode::ServerError(-32001).code(), -32001);
        assert_eq!(JsonRpcErrorCode::ServerError(-32001).message(), "Server error");
    }

    #[test]
    fn test_error_serialization_skips_cause() {
        let error = ErrorObject::internal_error(None).with_cause(DiskError);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, json!({"code": -32603, "message": "Internal error"}));
        assert_eq!(error.cause().unwrap().to_string(), "disk on fire");
    }

    #[test]
    fn test_server_error_range() {
        assert!(error_codes::is_server_error(error_codes::SERVER_ERROR_START));
        assert!(error_codes::is_server_error(-32001));
        assert!(error_codes::is_server_error(error_codes::SERVER_ERROR_END));
        assert!(!error_codes::is_server_error(-31999));
        assert!(!error_codes::is_server_error(error_codes::INTERNAL_ERROR));
        assert!(!error_codes::is_server_error(42));
    }

    #[test]
    #[traced_test]
    fn test_out_of_range_server_error_is_logged() {
        let object = ErrorObject::server_error(42, None);
        assert_eq!(object.code, 42);
        assert!(logs_contain("outside the reserved"));
    }

    #[test]
    #[traced_test]
    fn test_in_range_server_error_is_not_logged() {
        let _ = ErrorObject::server_error(-32001, None);
        assert!(!logs_contain("outside the reserved"));
    }

    #[test]
    fn test_server_error_converts_structured() {
        let err: MethodError = ServerError::new(-32001).with_data("divide by zero").into();
        let object = err.into_error_object(false);
        assert_eq!(object.code, -32001);
        assert_eq!(object.message, "Server error");
        assert_eq!(object.data, Some(json!("divide by zero")));
        assert!(object.cause.is_none());
    }

    #[test]
    fn test_generic_error_becomes_internal() {
        let err: MethodError = DiskError.into();
        assert!(matches!(err, MethodError::Internal(_)));

        let hidden = MethodError::from(DiskError).into_error_object(false);
        assert_eq!(hidden.code, -32603);
        assert!(hidden.data.is_none());
        assert!(hidden.cause.is_some());

        let exposed = MethodError::from(DiskError).into_error_object(true);
        assert_eq!(exposed.data, Some(json!("disk on fire")));
    }
}
