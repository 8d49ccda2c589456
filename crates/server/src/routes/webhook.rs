//! Telegram update intake.
//!
//! Every request is acknowledged with `200 {"ok":true}`. Telegram retries
//! non-2xx deliveries, so a failure here is logged and counted but never
//! surfaced to the caller.

use crate::metrics::record_update;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use qrbot::{decode_update, EnvelopeError, MessageContext, Outcome};
use serde_json::{json, Value};
use std::sync::Arc;

/// Webhook handler
pub async fn telegram_webhook(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<Value>) {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "failed to read webhook body");
            record_update("body_error");
            return acknowledge();
        }
    };

    let update = match decode_update(&body) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode update");
            record_update("decode_error");
            return acknowledge();
        }
    };

    let ctx = match MessageContext::from_update(&update) {
        Ok(ctx) => ctx,
        Err(err @ EnvelopeError::MissingMessage { .. }) => {
            tracing::debug!(update_id = update.update_id, error = %err, "ignoring update");
            record_update("ignored");
            return acknowledge();
        }
        Err(err) => {
            tracing::warn!(update_id = update.update_id, error = %err, "unusable update");
            record_update("envelope_error");
            return acknowledge();
        }
    };

    match state.pipeline.handle(&ctx).await {
        Ok(outcome) => {
            let label = match &outcome {
                Outcome::Command { .. } => "command",
                Outcome::Rejected(_) => "rejected",
                Outcome::QrSent(_) => "qr_sent",
            };
            tracing::debug!(
                update_id = update.update_id,
                chat_id = ctx.chat_id,
                outcome = label,
                "update handled"
            );
            record_update(label);
        }
        Err(err) => {
            tracing::error!(
                update_id = update.update_id,
                chat_id = ctx.chat_id,
                error = %err,
                "failed to answer message"
            );
            record_update("pipeline_error");
        }
    }

    acknowledge()
}

fn acknowledge() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "ok": true })))
}
