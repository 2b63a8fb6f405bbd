//! # JSON-RPC over HTTP
//!
//! This crate binds a [`jrpc_server::Server`] to an HTTP endpoint.
//!
//! ## Behaviour
//! - One hyper HTTP/1 connection task per accepted TCP stream
//! - Requests to any other path get `404 Not Found`
//! - The whole body is the JSON-RPC payload; protocol errors are reported
//!   in-band, so every dispatched request is answered with `200 OK`
//! - A reply of "nothing" (notifications) is written as `null`
//! - Each request gets its own cancellation token, cancelled when the request
//!   is dropped, and the peer address as `peer_addr` metadata

pub mod handler;
pub mod server;

#[cfg(test)]
mod tests;

// Re-export main types
pub use handler::{JSON_CONTENT_TYPE, PEER_ADDR_KEY, RpcHttpHandler, render_reply};
pub use server::{HttpConfig, HttpRpcServer, HttpRpcServerBuilder};

/// Result type for HTTP transport operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP transport errors
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP error: {0}")]
    Hyper(#[from] hyper::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
