use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::event::Event;

/// Sentinel session id for tickets issued by staff outside the payment flow.
/// Never subject to the per-session duplicate check.
pub const MANUAL_SESSION_ID: &str = "admin-created";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Ticket {
    pub id: String,
    pub ticket_number: String,
    pub event_id: Option<String>,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub session_id: String,
    pub payment_intent: Option<String>,
    pub qr_code_data: String,
    pub used: bool,
    pub used_date: Option<DateTime<Utc>>,
    pub purchase_date: DateTime<Utc>,
    /// Ordinal within the issuance batch; NULL for manually issued tickets.
    pub batch_seq: Option<i32>,
}

pub struct NewTicketParams {
    pub ticket_number: String,
    pub event_id: Option<String>,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub session_id: String,
    pub payment_intent: Option<String>,
    pub qr_code_data: String,
    pub batch_seq: Option<i32>,
}

impl Ticket {
    pub fn new(params: NewTicketParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_number: params.ticket_number,
            event_id: params.event_id,
            customer_email: params.customer_email,
            customer_name: params.customer_name,
            session_id: params.session_id,
            payment_intent: params.payment_intent,
            qr_code_data: params.qr_code_data,
            used: false,
            used_date: None,
            purchase_date: Utc::now(),
            batch_seq: params.batch_seq,
        }
    }
}

/// Ticket joined with its event, as served by the verification and
/// retrieval endpoints.
#[derive(Debug, Serialize, Clone)]
pub struct TicketWithEvent {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub event: Option<Event>,
}
