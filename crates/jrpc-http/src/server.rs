//! HTTP JSON-RPC server

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use jrpc_server::Server;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::{HttpError, Result, RpcHttpHandler};

/// Configuration for the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Path of the JSON-RPC endpoint
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8090)),
            path: "/rpc".to_string(),
        }
    }
}

/// Builder for [`HttpRpcServer`]
pub struct HttpRpcServerBuilder {
    config: HttpConfig,
    server: Server,
}

impl HttpRpcServerBuilder {
    pub fn new(server: Server) -> Self {
        Self {
            config: HttpConfig::default(),
            server,
        }
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Set the endpoint path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> HttpRpcServer {
        let handler = RpcHttpHandler::new(self.server, self.config.path.clone());
        HttpRpcServer {
            config: self.config,
            handler,
        }
    }
}

/// Serves a JSON-RPC [`Server`] over HTTP/1.
#[derive(Clone)]
pub struct HttpRpcServer {
    config: HttpConfig,
    handler: RpcHttpHandler,
}

impl HttpRpcServer {
    pub fn builder(server: Server) -> HttpRpcServerBuilder {
        HttpRpcServerBuilder::new(server)
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn handler(&self) -> &RpcHttpHandler {
        &self.handler
    }

    /// Bind the configured address and serve until accepting fails.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_address).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("JSON-RPC server listening on {}", listener.local_addr()?);
        info!("JSON-RPC endpoint available at: {}", self.config.path);

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("New connection from {}", peer_addr);

            let handler = self.handler.clone();
            tokio::spawn(async move {
                if let Err(err) = serve_connection(stream, peer_addr, handler).await {
                    match &err {
                        HttpError::Hyper(hyper_err) if hyper_err.is_incomplete_message() => {
                            debug!("Client disconnected (normal): {}", err);
                        }
                        _ => error!("Error serving connection: {}", err),
                    }
                }
            });
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    handler: RpcHttpHandler,
) -> Result<()> {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let handler = handler.clone();
        async move { Ok::<_, Infallible>(handler.handle_request(req, Some(peer_addr)).await) }
    });
    http1::Builder::new().serve_connection(io, service).await?;
    Ok(())
}
