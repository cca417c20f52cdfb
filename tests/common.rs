use ticketing_backend::{
    api::router::create_router,
    config::Config,
    domain::models::event::{Event, NewEventParams},
    domain::ports::{EmailAttachment, EmailService},
    domain::services::mailer::TicketMailer,
    domain::services::reconciler::Reconciler,
    domain::services::webhook_verifier,
    error::AppError,
    infra::repositories::{sqlite_event_repo::SqliteEventRepo, sqlite_ticket_repo::SqliteTicketRepo},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tera::Tera;
use tower::ServiceExt;
use serde_json::Value;

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";

#[derive(Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Captures outbound mail so tests can assert on recipients, bodies, and
/// inline attachments.
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: &[EmailAttachment],
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachments: attachments.to_vec(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<RecordingEmailService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("ticket_email.html", include_str!("../src/templates/ticket_email.html")).unwrap();
        tera.add_raw_template("fallback_email.html", include_str!("../src/templates/fallback_email.html")).unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            webhook_secret: WEBHOOK_SECRET.to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from_alias: "Test <noreply@test>".to_string(),
            admin_api_token: ADMIN_TOKEN.to_string(),
        };

        let email = Arc::new(RecordingEmailService { sent: Mutex::new(Vec::new()) });
        let event_repo: Arc<dyn ticketing_backend::domain::ports::EventRepository> =
            Arc::new(SqliteEventRepo::new(pool.clone()));
        let ticket_repo: Arc<dyn ticketing_backend::domain::ports::TicketRepository> =
            Arc::new(SqliteTicketRepo::new(pool.clone()));
        let mailer = Arc::new(TicketMailer::new(email.clone(), templates.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            reconciler: Arc::new(Reconciler::new(
                ticket_repo.clone(),
                event_repo.clone(),
                mailer.clone(),
            )),
            event_repo,
            ticket_repo,
            email_service: email.clone(),
            mailer,
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
        }
    }

    pub async fn seed_event(&self, title: &str, date: NaiveDate) -> Event {
        let event = Event::new(NewEventParams {
            event_title: title.to_string(),
            date,
            time: "8:00 PM".to_string(),
            location: "The Warehouse".to_string(),
            image: None,
            price_id: Some("price_test".to_string()),
            unit_price: Some(2500),
        });
        self.state.event_repo.create(&event).await.expect("Failed to seed event")
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Delivers a signed webhook payload, the way the payment processor would.
    pub async fn deliver_webhook(&self, payload: &Value) -> (StatusCode, Value) {
        let body = payload.to_string();
        let signature =
            webhook_verifier::sign_payload(WEBHOOK_SECRET, body.as_bytes(), Utc::now().timestamp());
        self.deliver_webhook_with_signature(&body, &signature).await
    }

    pub async fn deliver_webhook_with_signature(
        &self,
        body: &str,
        signature: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/webhooks/stripe")
            .header(header::CONTENT_TYPE, "application/json")
            .header("stripe-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn ticket_count(&self, session_id: &str) -> usize {
        self.state
            .ticket_repo
            .find_by_session(session_id)
            .await
            .expect("find_by_session failed")
            .len()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

/// A settled checkout session payload in the processor's wire shape.
#[allow(dead_code)]
pub fn completed_session_payload(session_id: &str, email: &str, quantity: &str) -> Value {
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": {"object": {
            "id": session_id,
            "payment_status": "paid",
            "status": "complete",
            "payment_intent": "pi_test_123",
            "customer_details": {"email": email, "name": "Alex Example"},
            "metadata": {"quantity": quantity}
        }}
    })
}
