use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{EventRepository, TicketRepository};
use crate::domain::services::mailer::TicketMailer;
use crate::domain::services::reconciler::Reconciler;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_ticket_repo::PostgresTicketRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_ticket_repo::SqliteTicketRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template("ticket_email.html", include_str!("../templates/ticket_email.html"))
        .expect("Failed to load ticket email template");
    tera.add_raw_template("fallback_email.html", include_str!("../templates/fallback_email.html"))
        .expect("Failed to load fallback email template");
    let templates = Arc::new(tera);

    let mailer = Arc::new(TicketMailer::new(email_service.clone(), templates.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let event_repo: Arc<dyn EventRepository> =
            Arc::new(PostgresEventRepo::new(pool.clone()));
        let ticket_repo: Arc<dyn TicketRepository> =
            Arc::new(PostgresTicketRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            reconciler: Arc::new(Reconciler::new(
                ticket_repo.clone(),
                event_repo.clone(),
                mailer.clone(),
            )),
            event_repo,
            ticket_repo,
            email_service,
            mailer,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let event_repo: Arc<dyn EventRepository> =
            Arc::new(SqliteEventRepo::new(pool.clone()));
        let ticket_repo: Arc<dyn TicketRepository> =
            Arc::new(SqliteTicketRepo::new(pool.clone()));

        AppState {
            config: config.clone(),
            reconciler: Arc::new(Reconciler::new(
                ticket_repo.clone(),
                event_repo.clone(),
                mailer.clone(),
            )),
            event_repo,
            ticket_repo,
            email_service,
            mailer,
            templates,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
