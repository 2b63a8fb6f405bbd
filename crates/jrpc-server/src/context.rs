//! Request context handed to methods that ask for one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Cancellation-bearing context for one inbound call.
///
/// The transport creates one per payload and every request of a batch shares
/// it. Cancellation is cooperative: the dispatcher never interrupts a running
/// method, a method that wants to stop early must watch the token itself.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    metadata: Arc<HashMap<String, String>>,
}

impl RequestContext {
    /// A context that is never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tie this context to an existing cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Attach a metadata entry (peer address, request path, ...).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.metadata).insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Signal cancellation to every holder of this context.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Wait until cancellation is requested. Returns immediately if it already was.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}
