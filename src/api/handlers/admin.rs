use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::GenerateTicketRequest;
use crate::api::extractors::admin::AdminAuth;
use crate::domain::models::ticket::{NewTicketParams, Ticket, MANUAL_SESSION_ID};
use crate::domain::services::mailer::IssuedTicket;
use crate::domain::services::{qr, ticket_number};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Same shape check the original signup form applied: no whitespace, one @,
/// a dot somewhere in the domain.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !local.contains(char::is_whitespace)
        && !domain.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Staff-issued single ticket, outside any payment session. Uses the
/// sentinel session id, so it never collides with webhook issuance.
pub async fn generate_ticket(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Json(payload): Json<GenerateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(email) = payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
        return Err(AppError::Validation("Email is required".to_string()));
    };
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    let number = ticket_number::generate();
    let qr_code_data = qr::generate_qr_data_url(&number)?;
    let event = state.event_repo.find_next_upcoming(Utc::now().date_naive()).await?;

    let ticket = Ticket::new(NewTicketParams {
        ticket_number: number.clone(),
        event_id: event.as_ref().map(|e| e.id.clone()),
        customer_email: email.to_string(),
        customer_name: payload.customer_name.clone(),
        session_id: MANUAL_SESSION_ID.to_string(),
        payment_intent: None,
        qr_code_data: qr_code_data.clone(),
        batch_seq: None,
    });

    let created = state
        .ticket_repo
        .insert_batch(std::slice::from_ref(&ticket))
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::Internal)?;

    info!("Manually issued ticket {} for {}", created.ticket_number, email);

    let issued = [IssuedTicket { ticket_number: number, qr_code_data }];
    if let Err(e) = state
        .mailer
        .send_tickets(
            email,
            payload.customer_name.as_deref().or(Some("Guest")),
            &issued,
            event.as_ref(),
        )
        .await
    {
        error!("Manual issuance email to {} failed: {}", email, e);
    }

    Ok(Json(json!({
        "success": true,
        "ticket_number": created.ticket_number,
        "customer_email": created.customer_email,
        "customer_name": created.customer_name,
        "qr_code_data": created.qr_code_data,
        "event_id": created.event_id,
    })))
}
