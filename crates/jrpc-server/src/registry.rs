//! Method registry: exact-name lookup from method name to its typed invoker.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::RegistryError;
use crate::handler::{ContextHandler, ContextMethod, Handler, PlainMethod, RpcMethod};
use crate::params::FromParams;
use crate::signature::Signature;

/// A value whose public operations can be registered as a unit.
///
/// Usually implemented by `#[rpc_methods]` on an `impl` block.
pub trait RpcService: Send + Sync + 'static {
    fn register(self: Arc<Self>, builder: RegistryBuilder) -> RegistryBuilder;
}

/// Collects methods before freezing them into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    methods: Vec<Arc<dyn RpcMethod>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method that takes positional parameters only.
    ///
    /// ```rust
    /// use jrpc_server::RegistryBuilder;
    ///
    /// let registry = RegistryBuilder::new()
    ///     .method("Add", |a: i64, b: i64| async move { a + b })
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(registry.signature("Add").unwrap().arity(), 2);
    /// ```
    pub fn method<F, Args>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Handler<Args>,
        Args: FromParams,
    {
        self.methods
            .push(Arc::new(PlainMethod::new(name.into(), handler)));
        self
    }

    /// Register a method whose first parameter is the request context. The
    /// context is supplied by the dispatcher and is not a positional param.
    pub fn method_with_context<F, Args>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: ContextHandler<Args>,
        Args: FromParams,
    {
        self.methods
            .push(Arc::new(ContextMethod::new(name.into(), handler)));
        self
    }

    /// Register every method of a service.
    pub fn service<S: RpcService>(self, service: Arc<S>) -> Self {
        service.register(self)
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        if self.methods.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut methods = HashMap::with_capacity(self.methods.len());
        for method in self.methods {
            let name = method.signature().name().to_string();
            match methods.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::Duplicate(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    debug!("Registered method {}", method.signature());
                    entry.insert(method);
                }
            }
        }
        Ok(Registry { methods })
    }
}

/// Immutable name → method table, built once and shared read-only.
#[derive(Clone)]
pub struct Registry {
    methods: HashMap<String, Arc<dyn RpcMethod>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build a registry holding every method of `service`.
    pub fn from_service<S: RpcService>(service: S) -> Result<Self, RegistryError> {
        RegistryBuilder::new().service(Arc::new(service)).build()
    }

    /// Case-sensitive exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn RpcMethod>> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.get(name).map(|method| method.signature())
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("methods", &self.method_names())
            .finish()
    }
}
