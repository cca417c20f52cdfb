use crate::domain::models::payment::{PaymentSession, WebhookEvent};
use crate::domain::models::ticket::{NewTicketParams, Ticket};
use crate::domain::ports::{EventRepository, TicketRepository};
use crate::domain::services::mailer::{IssuedTicket, TicketMailer};
use crate::domain::services::{event_lookup, qr, ticket_number};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What a delivered webhook event amounted to. Every variant is an
/// acknowledgement; the processor must not retry any of these.
#[derive(Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Tickets were minted and (best effort) emailed.
    Issued(usize),
    /// This session already has tickets; delivery was a retry or a race.
    SkippedDuplicate,
    /// Payment not settled yet; a later event will carry the settlement.
    NotSettled,
    /// Session had no customer email to deliver to. Logged for follow-up.
    MissingEmail,
    /// Event type we deliberately do not act on.
    Ignored,
}

/// Turns verified payment notifications into issued tickets. Idempotent per
/// session: retries and concurrent deliveries converge on one batch.
pub struct Reconciler {
    ticket_repo: Arc<dyn TicketRepository>,
    event_repo: Arc<dyn EventRepository>,
    mailer: Arc<TicketMailer>,
}

impl Reconciler {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        event_repo: Arc<dyn EventRepository>,
        mailer: Arc<TicketMailer>,
    ) -> Self {
        Self { ticket_repo, event_repo, mailer }
    }

    pub async fn process(&self, event: WebhookEvent) -> Result<ReconcileOutcome, AppError> {
        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session = parse_session(event.data.object)?;
                if !session.is_settled() {
                    info!(
                        "Session {} completed but not settled yet, awaiting async payment",
                        session.id
                    );
                    return Ok(ReconcileOutcome::NotSettled);
                }
                self.issue(session).await
            }
            "checkout.session.async_payment_succeeded" => {
                let session = parse_session(event.data.object)?;
                self.issue(session).await
            }
            "payment_intent.succeeded" | "charge.succeeded" | "charge.updated" => {
                info!("Acknowledging {} (handled via checkout.session events)", event.event_type);
                Ok(ReconcileOutcome::Ignored)
            }
            other => {
                info!("Ignoring unhandled webhook event type {}", other);
                Ok(ReconcileOutcome::Ignored)
            }
        }
    }

    async fn issue(&self, session: PaymentSession) -> Result<ReconcileOutcome, AppError> {
        let existing = self.ticket_repo.find_by_session(&session.id).await?;
        if !existing.is_empty() {
            info!(
                "Session {} already has {} ticket(s), skipping issuance",
                session.id,
                existing.len()
            );
            return Ok(ReconcileOutcome::SkippedDuplicate);
        }

        let Some(email) = session.customer_email() else {
            error!("Session {} settled without a customer email, cannot deliver", session.id);
            return Ok(ReconcileOutcome::MissingEmail);
        };
        let email = email.to_string();

        let quantity = session.quantity();
        let event = event_lookup::resolve_event(&self.event_repo, session.event_id()).await?;
        if event.is_none() {
            warn!("No event found for session {}, issuing unbound tickets", session.id);
        }

        let mut drafts = Vec::with_capacity(quantity as usize);
        let mut issued = Vec::with_capacity(quantity as usize);
        for seq in 0..quantity {
            let number = ticket_number::generate();
            let qr_code_data = qr::generate_qr_data_url(&number)?;
            issued.push(IssuedTicket {
                ticket_number: number.clone(),
                qr_code_data: qr_code_data.clone(),
            });
            drafts.push(Ticket::new(NewTicketParams {
                ticket_number: number,
                event_id: event.as_ref().map(|e| e.id.clone()),
                customer_email: email.clone(),
                customer_name: session.customer_name().map(str::to_string),
                session_id: session.id.clone(),
                payment_intent: session.payment_intent.clone(),
                qr_code_data,
                batch_seq: Some(seq as i32),
            }));
        }

        match self.ticket_repo.insert_batch(&drafts).await {
            Ok(_) => {}
            // A concurrent delivery won the insert; its batch stands.
            Err(AppError::Conflict(_)) => {
                info!("Session {} raced a concurrent issuance, skipping", session.id);
                return Ok(ReconcileOutcome::SkippedDuplicate);
            }
            Err(e) => return Err(e),
        }

        info!("Issued {} ticket(s) for session {}", issued.len(), session.id);

        if let Err(e) = self
            .mailer
            .send_tickets(&email, session.customer_name(), &issued, event.as_ref())
            .await
        {
            // Tickets exist either way; delivery can be replayed from the
            // stored rows.
            error!("Ticket email for session {} failed: {}", session.id, e);
        }

        Ok(ReconcileOutcome::Issued(issued.len()))
    }
}

fn parse_session(object: serde_json::Value) -> Result<PaymentSession, AppError> {
    serde_json::from_value(object)
        .map_err(|e| AppError::Validation(format!("Malformed checkout session payload: {}", e)))
}
