use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::{MarkUsedRequest, VerifyTicketRequest};
use crate::domain::models::ticket::TicketWithEvent;
use crate::domain::services::ticket_number;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

fn ticket_json(found: &TicketWithEvent) -> serde_json::Value {
    json!({
        "id": found.ticket.id,
        "ticketNumber": found.ticket.ticket_number,
        "customerName": found.ticket.customer_name,
        "customerEmail": found.ticket.customer_email,
        "eventTitle": found.event.as_ref().map(|e| e.event_title.clone()),
        "eventDate": found.event.as_ref().map(|e| e.date.to_string()),
        "eventTime": found.event.as_ref().map(|e| e.time.clone()),
        "eventLocation": found.event.as_ref().map(|e| e.location.clone()),
        "used": found.ticket.used,
    })
}

/// Lookup step of the door console. Business outcomes (unknown number, bad
/// format, already used) are all HTTP 200 with `valid` set accordingly; the
/// scanner distinguishes them by body, not by status.
pub async fn verify_ticket(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(number) = payload.ticket_number.as_deref() else {
        return Err(AppError::Validation("Ticket number is required".to_string()));
    };
    let number = number.trim();

    if !ticket_number::is_valid(number) {
        return Ok(Json(json!({ "error": "Invalid ticket format", "valid": false })));
    }

    let Some(found) = state.ticket_repo.find_by_number(number).await? else {
        return Ok(Json(json!({ "error": "Ticket not found", "valid": false })));
    };

    if found.ticket.used {
        return Ok(Json(json!({
            "valid": false,
            "alreadyUsed": true,
            "usedDate": found.ticket.used_date,
            "ticket": ticket_json(&found),
        })));
    }

    Ok(Json(json!({ "valid": true, "ticket": ticket_json(&found) })))
}

/// Check-in step. Guarded at the store layer so two scanners racing on the
/// same ticket admit exactly one person.
pub async fn mark_ticket_used(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MarkUsedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(ticket_id) = payload.ticket_id.as_deref() else {
        return Err(AppError::Validation("Ticket ID is required".to_string()));
    };

    let ticket = state.ticket_repo.mark_used(ticket_id).await?;
    info!("Ticket {} checked in", ticket.ticket_number);

    Ok(Json(json!({ "success": true, "ticket": ticket })))
}
