use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::TicketQuery;
use crate::domain::models::ticket::TicketWithEvent;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;

/// Post-purchase retrieval: by checkout session (the confirmation page) or
/// by buyer email (support lookups). One of the two is required.
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TicketQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tickets: Vec<TicketWithEvent> = if let Some(session_id) = query.session_id.as_deref() {
        let rows = state.ticket_repo.find_by_session(session_id).await?;
        // One batch shares one event; resolve it once.
        let event = match rows.first().and_then(|t| t.event_id.as_deref()) {
            Some(event_id) => state.event_repo.find_by_id(event_id).await?,
            None => None,
        };
        rows.into_iter()
            .map(|ticket| TicketWithEvent { event: event.clone(), ticket })
            .collect()
    } else if let Some(email) = query.email.as_deref() {
        state.ticket_repo.find_by_email(email).await?
    } else {
        return Err(AppError::Validation("session_id or email query parameter is required".to_string()));
    };

    Ok(Json(json!({ "count": tickets.len(), "tickets": tickets })))
}
