//! Request handling for the JSON-RPC endpoint

use std::fmt::Display;
use std::net::SocketAddr;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use jrpc_server::{Reply, RequestContext, Server};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::Result;

/// Content type of every JSON-RPC response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Metadata key under which the client's socket address is stored
pub const PEER_ADDR_KEY: &str = "peer_addr";

/// Routes one HTTP request into the JSON-RPC server.
#[derive(Clone)]
pub struct RpcHttpHandler {
    server: Server,
    path: String,
}

impl RpcHttpHandler {
    pub fn new(server: Server, path: impl Into<String>) -> Self {
        Self {
            server,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Handle one request. Generic over the body so tests can pass `Full`.
    pub async fn handle_request<B>(
        &self,
        req: Request<B>,
        peer_addr: Option<SocketAddr>,
    ) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        debug!("Handling {} {}", req.method(), req.uri().path());

        if req.uri().path() != self.path {
            let mut response = Response::new(Full::new(Bytes::from_static(b"Not Found")));
            *response.status_mut() = StatusCode::NOT_FOUND;
            return response;
        }

        // A failed read still dispatches: the empty payload becomes a parse error.
        let payload = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                error!("Failed to read request body: {}", err);
                Bytes::new()
            }
        };

        let token = CancellationToken::new();
        let _cancel_on_drop = token.clone().drop_guard();
        let mut ctx = RequestContext::new().with_cancellation(token);
        if let Some(peer_addr) = peer_addr {
            ctx = ctx.with_metadata(PEER_ADDR_KEY, peer_addr.to_string());
        }

        let reply = self.server.call(ctx, &payload).await;
        let body = match render_reply(reply.as_ref()) {
            Ok(body) => body,
            Err(err) => {
                error!("Failed to render reply: {}", err);
                Bytes::new()
            }
        };

        let mut response = Response::new(Full::new(body));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        response
    }
}

/// JSON text of a reply followed by a newline; no reply renders as `null`.
pub fn render_reply(reply: Option<&Reply>) -> Result<Bytes> {
    let mut body = serde_json::to_vec(&reply)?;
    body.push(b'\n');
    Ok(Bytes::from(body))
}
