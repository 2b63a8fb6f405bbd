//! Batch coordination: one worker per element, joined before replying.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::value::RawValue;
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::dispatch::dispatch;
use crate::response::Response;
use crate::server::{BatchOrder, Shared};

enum Collector {
    Completion(Vec<Response>),
    Input(Vec<Option<Response>>),
}

impl Collector {
    fn new(order: BatchOrder, size: usize) -> Self {
        match order {
            BatchOrder::Completion => Collector::Completion(Vec::with_capacity(size)),
            BatchOrder::Input => Collector::Input((0..size).map(|_| None).collect()),
        }
    }

    fn push(&mut self, index: usize, response: Response) {
        match self {
            Collector::Completion(responses) => responses.push(response),
            Collector::Input(slots) => slots[index] = Some(response),
        }
    }

    fn finish(&mut self) -> Vec<Response> {
        match self {
            Collector::Completion(responses) => mem::take(responses),
            Collector::Input(slots) => mem::take(slots).into_iter().flatten().collect(),
        }
    }
}

/// Dispatch every element concurrently and gather the non-suppressed
/// responses. `None` when every element was a notification.
///
/// Must be called from within a tokio runtime. Workers are detached tasks:
/// dropping the returned future stops the join but never the workers, which
/// run to completion. Only a method observing `ctx` can stop early.
pub(crate) async fn run(
    shared: &Arc<Shared>,
    ctx: RequestContext,
    elements: Vec<Box<RawValue>>,
) -> Option<Vec<Response>> {
    let size = elements.len();
    let collector = Arc::new(Mutex::new(Collector::new(shared.config.batch_order, size)));

    let workers: Vec<_> = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let shared = Arc::clone(shared);
            let ctx = ctx.clone();
            let collector = Arc::clone(&collector);
            tokio::spawn(async move {
                if let Some(response) = dispatch(&shared, ctx, element.get().as_bytes()).await {
                    collector.lock().push(index, response);
                }
            })
        })
        .collect();

    for worker in workers {
        if let Err(err) = worker.await {
            error!(error = %err, "Batch worker did not complete");
        }
    }

    let responses = collector.lock().finish();
    debug!(size, responses = responses.len(), "Batch complete");
    if responses.is_empty() {
        None
    } else {
        Some(responses)
    }
}
