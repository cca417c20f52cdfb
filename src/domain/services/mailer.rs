use crate::domain::models::event::Event;
use crate::domain::ports::{EmailAttachment, EmailService};
use crate::domain::services::{pdf, qr};
use crate::error::AppError;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::error;

/// What the mailer needs per issued ticket.
pub struct IssuedTicket {
    pub ticket_number: String,
    pub qr_code_data: String,
}

/// Renders and dispatches ticket delivery emails. One email per issuance
/// batch: the HTML body references QR images inline by `cid:qrcode{index}`,
/// and each ticket additionally gets a printable PDF attachment.
pub struct TicketMailer {
    email: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl TicketMailer {
    pub fn new(email: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        Self { email, templates }
    }

    pub async fn send_tickets(
        &self,
        recipient: &str,
        customer_name: Option<&str>,
        tickets: &[IssuedTicket],
        event: Option<&Event>,
    ) -> Result<(), AppError> {
        let mut ctx = Context::new();
        ctx.insert("customer_name", customer_name.unwrap_or("there"));
        ctx.insert("ticket_count", &tickets.len());
        ctx.insert(
            "ticket_numbers",
            &tickets.iter().map(|t| t.ticket_number.as_str()).collect::<Vec<_>>(),
        );
        ctx.insert("has_event", &event.is_some());
        if let Some(event) = event {
            ctx.insert("event_title", &event.event_title);
            ctx.insert("event_date", &event.date.to_string());
            ctx.insert("event_time", &event.time);
            ctx.insert("event_location", &event.location);
        }

        let html_body = self
            .templates
            .render("ticket_email.html", &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))?;

        let mut attachments = Vec::with_capacity(tickets.len() * 2);
        for (i, ticket) in tickets.iter().enumerate() {
            let Some(png) = qr::data_url_png_bytes(&ticket.qr_code_data) else {
                error!("Ticket {} carries an unreadable QR data URL, skipping attachments", ticket.ticket_number);
                continue;
            };

            attachments.push(EmailAttachment {
                filename: format!("qrcode{}.png", i),
                content_id: Some(format!("qrcode{}", i)),
                data: png.clone(),
            });

            // A broken PDF should not block delivery of the QR codes.
            match pdf::render_ticket_pdf(&ticket.ticket_number, &png, event) {
                Ok(bytes) => attachments.push(EmailAttachment {
                    filename: format!("ticket-{}.pdf", ticket.ticket_number),
                    content_id: None,
                    data: bytes,
                }),
                Err(e) => error!("PDF render failed for {}: {}", ticket.ticket_number, e),
            }
        }

        let event_title = event.map(|e| e.event_title.as_str()).unwrap_or("Cicada Event");
        let subject = if tickets.len() == 1 {
            format!("Your Ticket - {}", event_title)
        } else {
            format!("Your {} Tickets - {}", tickets.len(), event_title)
        };

        self.email.send(recipient, &subject, &html_body, &attachments).await
    }

    /// Plain confirmation when we could issue nothing to attach, so the buyer
    /// still hears from us and support has an order id to search for.
    pub async fn send_purchase_fallback(
        &self,
        recipient: &str,
        customer_name: Option<&str>,
        order_id: &str,
    ) -> Result<(), AppError> {
        let mut ctx = Context::new();
        ctx.insert("customer_name", customer_name.unwrap_or("there"));
        ctx.insert("order_id", order_id);

        let html_body = self
            .templates
            .render("fallback_email.html", &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))?;

        self.email
            .send(recipient, "Order Confirmation - Cicada Collective", &html_body, &[])
            .await
    }
}
