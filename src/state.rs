use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{EmailService, EventRepository, TicketRepository};
use crate::domain::services::mailer::TicketMailer;
use crate::domain::services::reconciler::Reconciler;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub mailer: Arc<TicketMailer>,
    pub reconciler: Arc<Reconciler>,
    pub templates: Arc<Tera>,
}
