//! # JSON-RPC Calculator Server
//!
//! Serves `Add`, `Subtract` and `Divide` over HTTP.
//!
//! ## Usage
//! ```bash
//! # Start server on default port (8090)
//! cargo run --package calculator-server
//! ```
//!
//! ## Try it
//! ```bash
//! curl -s http://127.0.0.1:8090/rpc \
//!   -d '{"jsonrpc":"2.0","method":"Subtract","params":[5,2],"id":1}'
//! # {"jsonrpc":"2.0","result":3,"id":1}
//!
//! curl -s http://127.0.0.1:8090/rpc \
//!   -d '{"jsonrpc":"2.0","method":"Divide","params":[5,0],"id":1}'
//! # {"jsonrpc":"2.0","error":{"code":-32001,"message":"Server error","data":"divide by zero"},"id":1}
//! ```

use std::net::SocketAddr;

use clap::Parser;
use jrpc_http::{HttpRpcServer, PEER_ADDR_KEY};
use jrpc_server::{RequestContext, Server, ServerError, rpc_methods};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "JRPC_BIND", default_value = "127.0.0.1:8090")]
    bind: SocketAddr,

    /// Path of the JSON-RPC endpoint
    #[arg(long, env = "JRPC_PATH", default_value = "/rpc")]
    path: String,

    /// Log filter, e.g. `info` or `jrpc_server=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

/// Error code reported for a zero divisor
const DIVIDE_BY_ZERO: i64 = -32001;
/// Error code reported when an integer sum does not fit in an `i64`
const OVERFLOW: i64 = -32002;

struct Calculator;

#[rpc_methods(rename_all = "PascalCase")]
impl Calculator {
    pub fn add(&self, ctx: RequestContext, a: i64, b: i64) -> Result<i64, ServerError> {
        debug!(peer = ctx.metadata(PEER_ADDR_KEY), "add {} {}", a, b);
        a.checked_add(b)
            .ok_or_else(|| ServerError::new(OVERFLOW).with_data("integer overflow"))
    }

    pub fn subtract(&self, ctx: RequestContext, a: f64, b: f64) -> f64 {
        debug!(peer = ctx.metadata(PEER_ADDR_KEY), "subtract {} {}", a, b);
        a - b
    }

    pub fn divide(&self, a: f64, b: f64) -> Result<f64, ServerError> {
        if b == 0.0 {
            return Err(ServerError::new(DIVIDE_BY_ZERO).with_data("divide by zero"));
        }
        Ok(a / b)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level)?)
        .init();

    let server = Server::from_service(Calculator)?;
    info!("Registered methods: {:?}", server.registry().method_names());

    let http = HttpRpcServer::builder(server)
        .bind_address(args.bind)
        .path(args.path)
        .build();
    http.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn call(payload: &str) -> Value {
        let server = Server::from_service(Calculator).unwrap();
        let reply = server
            .call(RequestContext::new(), payload.as_bytes())
            .await
            .unwrap();
        serde_json::to_value(reply).unwrap()
    }

    #[tokio::test]
    async fn test_add() {
        assert_eq!(
            call(r#"{"jsonrpc":"2.0","method":"Add","params":[2,3],"id":1}"#).await,
            json!({"jsonrpc": "2.0", "result": 5, "id": 1})
        );
    }

    #[tokio::test]
    async fn test_add_overflow_is_server_error() {
        assert_eq!(
            call(r#"{"jsonrpc":"2.0","method":"Add","params":[9223372036854775807,1],"id":2}"#)
                .await,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32002, "message": "Server error", "data": "integer overflow"},
                "id": 2
            })
        );
    }

    #[tokio::test]
    async fn test_divide_by_zero() {
        let reply = call(r#"{"jsonrpc":"2.0","method":"Divide","params":[5,0],"id":3}"#).await;
        assert_eq!(reply["error"]["code"], json!(DIVIDE_BY_ZERO));
        assert_eq!(reply["error"]["data"], json!("divide by zero"));
    }
}
