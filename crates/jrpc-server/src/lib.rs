//! # JSON-RPC 2.0 Dispatch Engine
//!
//! A transport-agnostic JSON-RPC 2.0 server. Methods are registered with
//! their real Rust signatures; the engine binds positional params to the
//! declared argument types, runs the method and shapes its return values into
//! a response.
//!
//! ## Features
//! - Single requests and concurrent batches
//! - Notifications (absent or `null` id) are executed but never answered
//! - Typed registration through closures or the `#[rpc_methods]` attribute
//! - Structured server errors through [`ServerError`]
//! - Cooperative cancellation through [`RequestContext`]
//!
//! ```rust
//! use jrpc_server::{RegistryBuilder, RequestContext, Server, ServerError};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RegistryBuilder::new()
//!     .method_with_context("Subtract", |_ctx: RequestContext, a: f64, b: f64| async move {
//!         a - b
//!     })
//!     .method("Divide", |a: f64, b: f64| async move {
//!         if b == 0.0 {
//!             return Err(ServerError::new(-32001).with_data("divide by zero"));
//!         }
//!         Ok(a / b)
//!     })
//!     .build()?;
//! let server = Server::new(registry);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! let reply = runtime.block_on(server.call(
//!     RequestContext::new(),
//!     br#"{"jsonrpc": "2.0", "method": "Divide", "params": [5, 0], "id": 1}"#,
//! ));
//! let error = reply.as_ref().and_then(|r| r.as_single()).and_then(|r| r.error.as_ref());
//! assert_eq!(error.map(|e| e.code), Some(-32001));
//! # Ok(())
//! # }
//! ```

mod batch;
pub mod classify;
pub mod context;
mod dispatch;
pub mod error;
pub mod handler;
pub mod params;
pub mod registry;
pub mod request;
pub mod response;
pub mod returns;
pub mod server;
pub mod signature;
pub mod types;

pub mod prelude;

// Re-export main types
pub use classify::{Payload, classify};
pub use context::RequestContext;
pub use error::{
    BoxError, ErrorObject, JsonRpcErrorCode, MethodError, RegistryError, ServerError,
};
pub use handler::{ContextHandler, Handler, RpcMethod};
pub use params::{BindError, FromParams};
pub use registry::{Registry, RegistryBuilder, RpcService};
pub use request::Request;
pub use response::{Reply, Response};
pub use returns::{IntoReturns, Json, Outcome};
pub use server::{BatchOrder, ErrorReporter, Server, ServerBuilder, ServerConfig};
pub use signature::{Signature, TypeInfo};
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "macros")]
pub use jrpc_derive::rpc_methods;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;

    /// Whether `code` lies in the range reserved for implementation-defined
    /// server errors.
    pub fn is_server_error(code: i64) -> bool {
        (SERVER_ERROR_START..=SERVER_ERROR_END).contains(&code)
    }
}
