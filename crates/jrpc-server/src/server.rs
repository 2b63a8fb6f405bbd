//! The dispatch engine's public entry point.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::batch;
use crate::classify::{Payload, classify};
use crate::context::RequestContext;
use crate::dispatch::dispatch;
use crate::error::{ErrorObject, RegistryError};
use crate::registry::{Registry, RpcService};
use crate::response::{Reply, Response};
use crate::types::RequestId;

/// Diagnostic callback for errors that carry an internal cause.
pub type ErrorReporter = Arc<dyn Fn(&ErrorObject) + Send + Sync>;

/// Order of the responses inside a batch reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchOrder {
    /// Whichever worker finishes first is written first.
    #[default]
    Completion,
    /// Responses follow the order of the batch elements.
    Input,
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub batch_order: BatchOrder,
    /// Put an internal error's message into the `data` of its -32603 response.
    pub expose_internal_errors: bool,
    /// Treat an absent or null `params` member as `[]`.
    pub allow_omitted_params: bool,
    pub error_reporter: ErrorReporter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            batch_order: BatchOrder::default(),
            expose_internal_errors: false,
            allow_omitted_params: false,
            error_reporter: Arc::new(log_error),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("batch_order", &self.batch_order)
            .field("expose_internal_errors", &self.expose_internal_errors)
            .field("allow_omitted_params", &self.allow_omitted_params)
            .finish_non_exhaustive()
    }
}

fn log_error(err: &ErrorObject) {
    match err.cause() {
        Some(cause) => error!(code = err.code, message = %err.message, cause = %cause, "Request failed"),
        None => error!(code = err.code, message = %err.message, "Request failed"),
    }
}

/// State shared by every dispatch and batch worker.
pub(crate) struct Shared {
    pub(crate) registry: Registry,
    pub(crate) config: ServerConfig,
}

impl Shared {
    pub(crate) fn report(&self, err: &ErrorObject) {
        if err.cause().is_some() {
            (self.config.error_reporter)(err);
        } else {
            debug!(code = err.code, message = %err.message, "Request answered with error");
        }
    }
}

/// Builder for [`Server`]
pub struct ServerBuilder {
    registry: Registry,
    config: ServerConfig,
}

impl ServerBuilder {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            config: ServerConfig::default(),
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn batch_order(mut self, order: BatchOrder) -> Self {
        self.config.batch_order = order;
        self
    }

    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.config.expose_internal_errors = expose;
        self
    }

    pub fn allow_omitted_params(mut self, allow: bool) -> Self {
        self.config.allow_omitted_params = allow;
        self
    }

    pub fn error_reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&ErrorObject) + Send + Sync + 'static,
    {
        self.config.error_reporter = Arc::new(reporter);
        self
    }

    pub fn build(self) -> Server {
        Server {
            shared: Arc::new(Shared {
                registry: self.registry,
                config: self.config,
            }),
        }
    }
}

/// JSON-RPC 2.0 server over a fixed method registry.
///
/// Cheap to clone; every clone dispatches against the same registry.
///
/// ```rust
/// use jrpc_server::{RegistryBuilder, RequestContext, Server};
///
/// # block_on(async {
/// let registry = RegistryBuilder::new()
///     .method("Add", |a: i64, b: i64| async move { a + b })
///     .build()
///     .unwrap();
/// let server = Server::new(registry);
/// let reply = server
///     .call(
///         RequestContext::new(),
///         br#"{"jsonrpc": "2.0", "method": "Add", "params": [1, 2], "id": 1}"#,
///     )
///     .await
///     .unwrap();
/// assert_eq!(
///     reply.to_json_string().unwrap(),
///     r#"{"jsonrpc":"2.0","result":3,"id":1}"#
/// );
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct Server {
    shared: Arc<Shared>,
}

impl Server {
    pub fn new(registry: Registry) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: Registry) -> ServerBuilder {
        ServerBuilder::new(registry)
    }

    /// Build a server over every method of `service`.
    pub fn from_service<S: RpcService>(service: S) -> Result<Self, RegistryError> {
        Ok(Self::new(Registry::from_service(service)?))
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.shared.config
    }

    /// Process one raw payload, single or batch.
    ///
    /// `None` means nothing should be written back: a notification, or a
    /// batch made only of notifications. Protocol failures are always
    /// answered in-band, so this never fails.
    pub async fn call(&self, ctx: RequestContext, payload: &[u8]) -> Option<Reply> {
        match classify(payload) {
            Payload::Single(payload) => dispatch(&self.shared, ctx, payload)
                .await
                .map(Reply::from),
            Payload::Batch(elements) => {
                debug!(size = elements.len(), "Dispatching batch");
                batch::run(&self.shared, ctx, elements).await.map(Reply::from)
            }
            Payload::EmptyBatch => {
                let err = ErrorObject::invalid_request();
                self.shared.report(&err);
                Some(Response::error(RequestId::Null, err).into())
            }
            Payload::Malformed(err) => {
                self.shared.report(&err);
                Some(Response::error(RequestId::Null, err).into())
            }
        }
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("registry", &self.shared.registry)
            .field("config", &self.shared.config)
            .finish()
    }
}
