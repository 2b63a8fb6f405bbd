//! # JSON-RPC Server Prelude
//!
//! Convenient re-exports of the types needed to register methods and serve
//! requests.
//!
//! ```rust
//! use jrpc_server::prelude::*;
//! ```

pub use crate::context::RequestContext;
pub use crate::error::{ErrorObject, MethodError, ServerError};
pub use crate::registry::{Registry, RegistryBuilder, RpcService};
pub use crate::response::{Reply, Response};
pub use crate::returns::Json;
pub use crate::server::{BatchOrder, Server, ServerConfig};
pub use crate::types::RequestId;

#[cfg(feature = "macros")]
pub use jrpc_derive::rpc_methods;

// Standard error codes
pub use crate::error_codes::*;
