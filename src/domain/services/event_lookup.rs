use crate::domain::models::event::Event;
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Resolves the event a purchase belongs to: an explicit reference first,
/// else the next upcoming event, else none. Callers must tolerate `None`
/// (tickets are still issued, the email just omits the event block).
pub async fn resolve_event(
    repo: &Arc<dyn EventRepository>,
    explicit_id: Option<&str>,
) -> Result<Option<Event>, AppError> {
    if let Some(id) = explicit_id {
        match repo.find_by_id(id).await? {
            Some(event) => return Ok(Some(event)),
            None => warn!("Event {} from session metadata not found, falling back to next upcoming", id),
        }
    }

    repo.find_next_upcoming(Utc::now().date_naive()).await
}
