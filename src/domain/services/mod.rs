pub mod event_lookup;
pub mod mailer;
pub mod pdf;
pub mod qr;
pub mod reconciler;
pub mod ticket_number;
pub mod webhook_verifier;
