//! The single-request pipeline: decode, lookup, bind, invoke, shape.

use serde_json::Value;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::ErrorObject;
use crate::params::positional;
use crate::request::Request;
use crate::response::Response;
use crate::returns::Outcome;
use crate::server::Shared;
use crate::types::RequestId;

/// Run one request to completion. `None` means the response is suppressed
/// because the request is a notification.
pub(crate) async fn dispatch(
    shared: &Shared,
    ctx: RequestContext,
    payload: &[u8],
) -> Option<Response> {
    let Request {
        method, params, id, ..
    } = match Request::decode(payload) {
        Ok(request) => request,
        Err(error) => {
            // No usable id: always answered, with id null.
            shared.report(&error);
            return Some(Response::error(RequestId::Null, error));
        }
    };
    debug!(method = %method, id = %id, "Dispatching request");

    let response = match invoke(shared, ctx, &method, params).await {
        Ok(outcome) => {
            Response::from_outcome(id, outcome, shared.config.expose_internal_errors)
        }
        Err(error) => Response::error(id, error),
    };
    if let Some(error) = &response.error {
        shared.report(error);
    }

    if response.id.is_notification() {
        debug!(method = %method, "Suppressing response to notification");
        return None;
    }
    Some(response)
}

async fn invoke(
    shared: &Shared,
    ctx: RequestContext,
    method: &str,
    params: Option<Value>,
) -> Result<Outcome, ErrorObject> {
    let Some(target) = shared.registry.get(method) else {
        return Err(ErrorObject::method_not_found());
    };
    let signature = target.signature();
    let params = positional(
        params,
        signature.arity(),
        shared.config.allow_omitted_params,
    )
    .map_err(|err| err.into_error_object())?;
    let call = target
        .bind(ctx, params)
        .map_err(|err| err.into_error_object())?;
    Ok(call.await)
}
