//! Test modules for the jrpc-http crate


use jrpc_server::{RegistryBuilder, RequestContext, Server, ServerError};

/// Calculator-style server shared by the HTTP tests
pub(crate) fn test_server() -> Server {
    let registry = RegistryBuilder::new()
        .method_with_context("Subtract", |_ctx: RequestContext, a: f64, b: f64| async move {
            a - b
        })
        .method("Divide", |a: f64, b: f64| async move {
            if b == 0.0 {
                return Err(ServerError::new(-32001).with_data("divide by zero"));
            }
            Ok(a / b)
        })
        .method_with_context("Peer", |ctx: RequestContext| async move {
            ctx.metadata(crate::PEER_ADDR_KEY).map(str::to_string)
        })
        .method("Update", |_value: i64| async {})
        .build()
        .expect("test registry");
    Server::new(registry)
}
