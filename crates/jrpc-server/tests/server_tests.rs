//! End-to-end dispatch tests through `Server::call`.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use jrpc_server::{BatchOrder, RegistryBuilder, RequestContext, Server, ServerError};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("ledger unavailable")]
struct LedgerError;

fn server_with(order: BatchOrder, updates: Arc<AtomicUsize>) -> Server {
    let hello_updates = Arc::clone(&updates);
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
        .method("GetData", || async { ("hello".to_string(), 5i64) })
        .method("NotifyHello", move |_a: i64, _b: i64, _c: i64| {
            let updates = Arc::clone(&hello_updates);
            async move {
                updates.fetch_add(1, Ordering::SeqCst);
            }
        })
        .method("Update", move |_value: i64| {
            let updates = Arc::clone(&updates);
            async move {
                updates.fetch_add(1, Ordering::SeqCst);
            }
        })
        .method("Balance", || async { Err::<f64, _>(LedgerError) })
        .method_with_context("WaitForCancel", |ctx: RequestContext| async move {
            ctx.cancelled().await;
            "cancelled"
        })
        .build()
        .unwrap();
    Server::builder(registry).batch_order(order).build()
}

fn server() -> Server {
    server_with(BatchOrder::Completion, Arc::new(AtomicUsize::new(0)))
}

async fn call(server: &Server, payload: &str) -> Option<Value> {
    server
        .call(RequestContext::new(), payload.as_bytes())
        .await
        .map(|reply| serde_json::to_value(reply).unwrap())
}

async fn call_text(server: &Server, payload: &str) -> Option<String> {
    server
        .call(RequestContext::new(), payload.as_bytes())
        .await
        .map(|reply| reply.to_json_string().unwrap())
}

#[tokio::test]
async fn test_subtract_with_context() {
    let reply = call_text(
        &server(),
        r#"{"jsonrpc":"2.0","method":"Subtract","params":[5,2],"id":1}"#,
    )
    .await;
    assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","result":3,"id":1}"#));
}

#[tokio::test]
async fn test_divide_by_zero_is_structured_error() {
    let reply = call_text(
        &server(),
        r#"{"jsonrpc":"2.0","method":"Divide","params":[5,0],"id":1}"#,
    )
    .await;
    assert_eq!(
        reply.as_deref(),
        Some(
            r#"{"jsonrpc":"2.0","error":{"code":-32001,"message":"Server error","data":"divide by zero"},"id":1}"#
        )
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let reply = call_text(&server(), "[]").await;
    assert_eq!(
        reply.as_deref(),
        Some(r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}"#)
    );
}

#[tokio::test]
async fn test_notification_only_batch_runs_and_yields_nothing() {
    let updates = Arc::new(AtomicUsize::new(0));
    let server = server_with(BatchOrder::Completion, Arc::clone(&updates));
    let reply = call(
        &server,
        r#"[{"jsonrpc":"2.0","method":"NotifyHello","params":[1,2,4]},{"jsonrpc":"2.0","method":"Update","params":[7]}]"#,
    )
    .await;
    assert_eq!(reply, None);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_multiple_returns_become_array() {
    let reply = call(&server(), r#"{"jsonrpc":"2.0","method":"GetData","params":[],"id":"d"}"#)
        .await
        .unwrap();
    assert_eq!(reply, json!({"jsonrpc": "2.0", "result": ["hello", 5], "id": "d"}));
}

#[tokio::test]
async fn test_unknown_method_echoes_id() {
    let reply = call(&server(), r#"{"jsonrpc":"2.0","method":"foobar","id":"1"}"#)
        .await
        .unwrap();
    assert_eq!(
        reply,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found"},
            "id": "1"
        })
    );
}

#[tokio::test]
async fn test_generic_error_is_internal() {
    let reply = call(&server(), r#"{"jsonrpc":"2.0","method":"Balance","params":[],"id":4}"#)
        .await
        .unwrap();
    assert_eq!(
        reply,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32603, "message": "Internal error"},
            "id": 4
        })
    );
}

#[tokio::test]
async fn test_top_level_parse_and_shape_errors() {
    let server = server();
    let parse = call(&server, r#"{"jsonrpc":"2.0","method":"foobar,"params":"bar","baz]"#)
        .await
        .unwrap();
    assert_eq!(
        parse,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32700, "message": "Parse error"},
            "id": null
        })
    );

    let shape = call(&server, r#"{"jsonrpc":"2.0","method":1,"params":"bar","id":1}"#)
        .await
        .unwrap();
    assert_eq!(shape["error"]["code"], json!(-32600));
    assert_eq!(shape["id"], Value::Null);
}

#[tokio::test]
async fn test_empty_payload_is_parse_error() {
    let reply = call(&server(), "").await.unwrap();
    assert_eq!(reply["error"]["code"], json!(-32700));
    assert_eq!(reply["id"], Value::Null);
}

#[tokio::test]
async fn test_invalid_batch_elements() {
    let reply = call(&server(), "[1,2,3]").await.unwrap();
    let expected = json!({
        "jsonrpc": "2.0",
        "error": {"code": -32600, "message": "Invalid Request"},
        "id": null
    });
    assert_eq!(reply, json!([expected, expected, expected]));
}

#[tokio::test]
async fn test_mixed_batch_counts_non_notifications() {
    let reply = call(
        &server(),
        r#"[
            {"jsonrpc": "2.0", "method": "Subtract", "params": [1, 2], "id": "1"},
            {"jsonrpc": "2.0", "method": "Update", "params": [7]},
            {"jsonrpc": "2.0", "method": "Subtract", "params": [42, 23], "id": "2"},
            {"foo": "boo"},
            {"jsonrpc": "2.0", "method": "foo.get", "params": {"name": "myself"}, "id": "5"},
            {"jsonrpc": "2.0", "method": "GetData", "params": [], "id": "9"}
        ]"#,
    )
    .await
    .unwrap();

    let responses = reply.as_array().unwrap();
    // The `{"foo": "boo"}` element has no id, so it is treated as a notification.
    assert_eq!(responses.len(), 4);

    let ids: HashSet<String> = responses.iter().map(|r| r["id"].to_string()).collect();
    let expected: HashSet<String> = ["\"1\"", "\"2\"", "\"5\"", "\"9\""]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(ids, expected);

    let by_id = |id: &str| {
        responses
            .iter()
            .find(|r| r["id"] == json!(id))
            .cloned()
            .unwrap()
    };
    assert_eq!(by_id("1")["result"], json!(-1));
    assert_eq!(by_id("2")["result"], json!(19));
    assert_eq!(by_id("5")["error"]["code"], json!(-32601));
    assert_eq!(by_id("9")["result"], json!(["hello", 5]));
}

#[tokio::test]
async fn test_input_order_batch() {
    let server = server_with(BatchOrder::Input, Arc::new(AtomicUsize::new(0)));
    let reply = call(
        &server,
        r#"[
            {"jsonrpc": "2.0", "method": "Subtract", "params": [3, 1], "id": 1},
            1,
            {"jsonrpc": "2.0", "method": "Divide", "params": [1, 0], "id": 3}
        ]"#,
    )
    .await
    .unwrap();
    let ids: Vec<Value> = reply
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), Value::Null, json!(3)]);
}

#[tokio::test]
async fn test_context_cancellation_reaches_method() {
    let server = server();
    let ctx = RequestContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let reply = server
        .call(
            ctx,
            br#"{"jsonrpc":"2.0","method":"WaitForCancel","params":[],"id":1}"#,
        )
        .await
        .unwrap();
    let response = reply.as_single().unwrap();
    assert_eq!(response.result, Some(json!("cancelled")));
}

#[tokio::test]
async fn test_server_is_shared_across_tasks() {
    let server = server();
    let mut handles = Vec::new();
    for n in 0..16i64 {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            let payload =
                format!(r#"{{"jsonrpc":"2.0","method":"Subtract","params":[{n},1],"id":{n}}}"#);
            let reply = server
                .call(RequestContext::new(), payload.as_bytes())
                .await
                .unwrap();
            serde_json::to_value(reply).unwrap()
        }));
    }
    for (n, handle) in handles.into_iter().enumerate() {
        let reply = handle.await.unwrap();
        assert_eq!(reply["id"], json!(n));
        assert_eq!(reply["result"], json!(n as i64 - 1));
    }
}
