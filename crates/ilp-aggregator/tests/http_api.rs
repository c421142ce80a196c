#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

use ilp_aggregator::http::{self, SignalReq};
use ilp_aggregator::ops;
use ilp_aggregator::pipeline::SignalKind;
use ilp_aggregator::router::build_router;
use ilp_core::record::RawTransaction;

mod common;
use common::{state_with, RecordingSink};

fn raw(v: serde_json::Value) -> RawTransaction {
    serde_json::from_value(v).unwrap()
}

async fn post_json(
    state: &ilp_aggregator::app_state::AppState,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 16).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn metrics_endpoint_returns_the_five_keys() {
    let state = state_with(Arc::new(RecordingSink::default()));
    let Json(view) = http::get_metrics(State(state)).await;

    let body = serde_json::to_value(view).unwrap();
    assert_eq!(body["transactions_processed"], json!(1_548_290));
    assert_eq!(body["checks_passed"], json!(1_548_290 - 987 * 5));
    assert_eq!(body["fatigue_locks"], json!(987));
    assert_eq!(body["mismatch_rate"], json!(0.0));
    assert_eq!(body["camera_failure_rate"], json!(0.0));
    assert_eq!(body.as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn transaction_endpoint_accepts_and_rejects() {
    let state = state_with(Arc::new(RecordingSink::default()));

    let Json(ack) = http::post_transaction(
        State(state.clone()),
        Ok(Json(raw(json!({ "agent_id": "A4739", "value_ghs": 250.75 })))),
    )
    .await
    .unwrap();
    assert_eq!(serde_json::to_value(ack).unwrap(), json!({ "accepted": true, "sequence": 1_548_291 }));

    let err = http::post_transaction(State(state.clone()), Ok(Json(raw(json!({ "value_ghs": 10.0 })))))
        .await
        .unwrap_err();
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["accepted"], json!(false));
    assert_eq!(body["code"], json!("MISSING_FIELD"));

    assert_eq!(state.aggregator().snapshot().transactions_processed, 1_548_291);
}

#[tokio::test]
async fn signal_endpoint_reports_new_total() {
    let state = state_with(Arc::new(RecordingSink::default()));
    let req: SignalReq = serde_json::from_value(json!({ "kind": "fatigue_lock", "agent_id": "A4739" })).unwrap();

    let Json(ack) = http::post_signal(State(state.clone()), Ok(Json(req))).await.unwrap();
    assert_eq!(ack.kind, SignalKind::FatigueLock);
    assert_eq!(ack.total, 988);
}

#[tokio::test]
async fn prometheus_output_includes_counters_and_outcomes() {
    let state = state_with(Arc::new(RecordingSink::default()));
    state
        .pipeline()
        .submit(RawTransaction::from_parts(Some("A4739"), Some(1.0)))
        .await
        .unwrap();

    let resp = ops::metrics(State(state.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("ilp_transactions_processed 1548291"));
    assert!(text.contains("ilp_fatigue_locks 987"));
    assert!(text.contains("ilp_submissions_total{outcome=\"accepted\"} 1"));
    assert!(text.contains("ilp_draining 0"));
}

#[tokio::test]
async fn readiness_flips_when_draining() {
    let state = state_with(Arc::new(RecordingSink::default()));
    assert_eq!(ops::readyz(State(state.clone())).await.into_response().status(), StatusCode::OK);

    state.set_draining();
    assert_eq!(
        ops::readyz(State(state.clone())).await.into_response().status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(ops::healthz().await.into_response().status(), StatusCode::OK);
}

#[tokio::test]
async fn router_accepts_and_rejects_transactions_as_json() {
    let state = state_with(Arc::new(RecordingSink::default()));

    let (status, body) =
        post_json(&state, "/api/v1/transactions", r#"{"agent_id":"A4739","value_ghs":250.75}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accepted": true, "sequence": 1_548_291 }));

    let (status, body) =
        post_json(&state, "/api/v1/transactions", r#"{"agent_id":"X","value_ghs":-5.0}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], json!("INVALID_VALUE"));
    assert_eq!(body["reason"], json!("invalid value_ghs: must be non-negative, got -5"));
}

#[tokio::test]
async fn malformed_transaction_bodies_are_bad_requests() {
    let state = state_with(Arc::new(RecordingSink::default()));

    for bad in [
        "{not json",
        "[1,2]",
        r#"{"agent_id":"A","value_ghs":1e400}"#,
        "",
    ] {
        let (status, body) = post_json(&state, "/api/v1/transactions", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body={bad}");
        assert_eq!(body["accepted"], json!(false), "body={bad}");
        assert_eq!(body["code"], json!("BAD_REQUEST"), "body={bad}");
        assert!(body["reason"].as_str().is_some_and(|r| !r.is_empty()), "body={bad}");
    }

    assert_eq!(state.aggregator().snapshot().transactions_processed, 1_548_290);
}

#[tokio::test]
async fn unknown_signal_kind_is_a_bad_request() {
    let state = state_with(Arc::new(RecordingSink::default()));

    let (status, body) = post_json(&state, "/api/v1/signals", r#"{"kind":"coffee_break"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("BAD_REQUEST"));

    let (status, body) = post_json(&state, "/api/v1/signals", r#"{"kind":"camera_failure"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "kind": "camera_failure", "total": 1 }));

    assert_eq!(state.aggregator().snapshot().fatigue_locks, 987);
}

#[tokio::test]
async fn state_keeps_loaded_config() {
    let state = state_with(Arc::new(RecordingSink::default()));
    assert_eq!(state.cfg().sink.publish_timeout_ms, 50);
    assert_eq!(state.cfg().metrics.seed.transactions_processed, 1_548_290);
}
