use crate::domain::models::{
    event::Event,
    ticket::{Ticket, TicketWithEvent},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Atomic batch insert: all rows or none. A uniqueness violation
    /// (concurrent issuance for the same session, or a ticket-number
    /// collision) surfaces as `AppError::Conflict`.
    async fn insert_batch(&self, tickets: &[Ticket]) -> Result<Vec<Ticket>, AppError>;
    async fn find_by_session(&self, session_id: &str) -> Result<Vec<Ticket>, AppError>;
    async fn find_by_number(&self, ticket_number: &str) -> Result<Option<TicketWithEvent>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Vec<TicketWithEvent>, AppError>;
    /// Flips `used` exactly once. NotFound for unknown ids, Conflict when the
    /// ticket was already checked in.
    async fn mark_used(&self, ticket_id: &str) -> Result<Ticket, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    /// Smallest date >= `from`, ties broken by id.
    async fn find_next_upcoming(&self, from: NaiveDate) -> Result<Option<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    /// Set for images referenced inline from the HTML body via `cid:`.
    pub content_id: Option<String>,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: &[EmailAttachment],
    ) -> Result<(), AppError>;
}
