//! Domain HTTP endpoints (`/api/v1/...`).
//!
//! Handlers are thin: decode, call the pipeline or aggregator, map the
//! result. Every failure is a JSON body with a stable code: 422 for
//! validation rejections, 400 for bodies that do not decode.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use ilp_core::aggregate::OperationalMetricsView;
use ilp_core::error::{ClientCode, IlpError, IngestionError};
use ilp_core::record::RawTransaction;

use crate::app_state::AppState;
use crate::pipeline::{Acknowledgement, SignalKind};

/// Client-visible error: `{ accepted: false, code, reason }`.
#[derive(Debug)]
pub struct ApiError(pub IlpError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::MissingField | ClientCode::InvalidValue | ClientCode::InvalidAgentId => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(e: IngestionError) -> Self {
        Self(IlpError::Rejected(e))
    }
}

// Malformed JSON, wrong top-level shape, out-of-range numbers, bad content type.
impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self(IlpError::BadRequest(r.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "accepted": false,
            "code": self.0.client_code().as_str(),
            "reason": self.0.reason(),
        }));
        (self.status(), body).into_response()
    }
}

pub async fn get_metrics(State(state): State<AppState>) -> Json<OperationalMetricsView> {
    Json(state.aggregator().compute_operational_metrics())
}

pub async fn post_transaction(
    State(state): State<AppState>,
    body: Result<Json<RawTransaction>, JsonRejection>,
) -> Result<Json<Acknowledgement>, ApiError> {
    let Json(raw) = body?;
    let ack = state.pipeline().submit(raw).await?;
    Ok(Json(ack))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalReq {
    pub kind: SignalKind,
    #[serde(default)]
    pub agent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignalAck {
    pub kind: SignalKind,
    pub total: u64,
}

pub async fn post_signal(
    State(state): State<AppState>,
    body: Result<Json<SignalReq>, JsonRejection>,
) -> Result<Json<SignalAck>, ApiError> {
    let Json(req) = body?;
    if let Some(agent) = req.agent_id.as_deref() {
        tracing::debug!(agent_id = %agent, signal = req.kind.as_str(), "signal from agent");
    }
    let total = state.pipeline().record_signal(req.kind);
    Ok(Json(SignalAck {
        kind: req.kind,
        total,
    }))
}
