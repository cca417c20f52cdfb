use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use crate::domain::models::payment::WebhookEvent;
use crate::domain::services::webhook_verifier::{self, SIGNATURE_HEADER};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Entry point for payment processor notifications. Signature first, JSON
/// second, business logic last. Every accepted event gets a 200 so the
/// processor stops retrying; the outcome is only logged.
pub async fn handle_stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if state.config.webhook_secret.is_empty() {
        return Err(AppError::InternalWithMsg("Webhook secret is not configured".to_string()));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Missing signature header".to_string()))?;

    webhook_verifier::verify_signature(
        &state.config.webhook_secret,
        signature,
        &body,
        Utc::now().timestamp(),
    )?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Malformed webhook payload: {}", e)))?;

    let outcome = state.reconciler.process(event).await?;
    info!("Webhook reconciled: {:?}", outcome);

    Ok(Json(json!({ "received": true })))
}
