//! # JSON-RPC Derive Macros
//!
//! This crate provides the `#[rpc_methods]` attribute, which registers every
//! public method of an `impl` block with a `jrpc_server` registry.
//!
//! ## Features
//!
//! - The method's identifier is its wire name, `#[rpc(name = "...")]` overrides it
//! - `#[rpc_methods(rename_all = "PascalCase")]` renames every method at once
//! - `#[rpc(skip)]` keeps a public method off the wire
//! - A first parameter of type `RequestContext` (or `&RequestContext`) receives
//!   the request context and is not counted as a positional param
//! - Sync and async methods are both supported
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jrpc_server::{RequestContext, ServerError, rpc_methods};
//!
//! struct Calculator;
//!
//! #[rpc_methods(rename_all = "PascalCase")]
//! impl Calculator {
//!     pub fn add(&self, _ctx: RequestContext, a: i64, b: i64) -> i64 {
//!         a + b
//!     }
//!
//!     pub async fn divide(&self, a: f64, b: f64) -> Result<f64, ServerError> {
//!         if b == 0.0 {
//!             return Err(ServerError::new(-32001).with_data("divide by zero"));
//!         }
//!         Ok(a / b)
//!     }
//! }
//! ```
//!
//! ## Code Organization
//!
//! - **Attribute Macro**: expansion in the service_attr module
//! - **Utilities**: attribute parsing and name conventions in the utils module

use proc_macro::TokenStream;
use syn::{ItemImpl, Meta, Token, parse_macro_input, punctuated::Punctuated};

mod service_attr;
mod utils;

#[cfg(test)]
mod tests;

/// Attribute macro that implements `RpcService` for the annotated type
///
/// The `impl` block is emitted unchanged apart from the `#[rpc(...)]` helper
/// attributes. Registered methods must take `&self` and owned, deserializable
/// parameters; their return type must implement `IntoReturns`.
///
/// # Attributes
///
/// - `#[rpc_methods(rename_all = "PascalCase" | "camelCase" | "snake_case")]`
/// - `#[rpc(name = "...")]` on a method - explicit wire name
/// - `#[rpc(skip)]` on a method - not registered
///
/// # Example
///
/// ```rust,ignore
/// use jrpc_server::{Registry, rpc_methods};
///
/// struct Greeter;
///
/// #[rpc_methods]
/// impl Greeter {
///     #[rpc(name = "greet")]
///     pub fn hello(&self, name: String) -> String {
///         format!("Hello, {}", name)
///     }
/// }
///
/// let registry = Registry::from_service(Greeter).unwrap();
/// assert!(registry.contains("greet"));
/// ```
#[proc_macro_attribute]
pub fn rpc_methods(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args with Punctuated::<Meta, Token![,]>::parse_terminated);
    let input = parse_macro_input!(input as ItemImpl);
    service_attr::rpc_methods_impl(args, input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
