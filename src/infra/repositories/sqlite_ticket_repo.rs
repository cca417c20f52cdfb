use crate::domain::models::{
    event::Event,
    ticket::{Ticket, TicketWithEvent},
};
use crate::domain::ports::TicketRepository;
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqlitePool};

const TICKET_WITH_EVENT_SELECT: &str = "SELECT t.*, \
     e.id AS e_id, e.event_title AS e_event_title, e.date AS e_date, e.time AS e_time, \
     e.location AS e_location, e.image AS e_image, e.price_id AS e_price_id, \
     e.unit_price AS e_unit_price, e.created_at AS e_created_at \
     FROM tickets t LEFT JOIN events e ON e.id = t.event_id";

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_joined_row(row: &SqliteRow) -> Result<TicketWithEvent, sqlx::Error> {
    let ticket = Ticket::from_row(row)?;
    let event = match row.try_get::<Option<String>, _>("e_id")? {
        Some(id) => Some(Event {
            id,
            event_title: row.try_get("e_event_title")?,
            date: row.try_get("e_date")?,
            time: row.try_get("e_time")?,
            location: row.try_get("e_location")?,
            image: row.try_get("e_image")?,
            price_id: row.try_get("e_price_id")?,
            unit_price: row.try_get("e_unit_price")?,
            created_at: row.try_get("e_created_at")?,
        }),
        None => None,
    };
    Ok(TicketWithEvent { ticket, event })
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn insert_batch(&self, tickets: &[Ticket]) -> Result<Vec<Ticket>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let row = sqlx::query_as::<_, Ticket>(
                "INSERT INTO tickets (id, ticket_number, event_id, customer_email, customer_name, session_id, payment_intent, qr_code_data, used, used_date, purchase_date, batch_seq)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING *"
            )
                .bind(&ticket.id).bind(&ticket.ticket_number).bind(&ticket.event_id).bind(&ticket.customer_email)
                .bind(&ticket.customer_name).bind(&ticket.session_id).bind(&ticket.payment_intent).bind(&ticket.qr_code_data)
                .bind(ticket.used).bind(ticket.used_date).bind(ticket.purchase_date).bind(ticket.batch_seq)
                .fetch_one(&mut *tx).await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::Conflict("Tickets already issued for this session".to_string())
                    } else {
                        AppError::Database(e)
                    }
                })?;
            created.push(row);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE session_id = ? ORDER BY batch_seq ASC")
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_number(&self, ticket_number: &str) -> Result<Option<TicketWithEvent>, AppError> {
        let row = sqlx::query(&format!("{} WHERE t.ticket_number = ?", TICKET_WITH_EVENT_SELECT))
            .bind(ticket_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        row.as_ref().map(map_joined_row).transpose().map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<TicketWithEvent>, AppError> {
        let rows = sqlx::query(&format!(
            "{} WHERE t.customer_email = ? ORDER BY t.purchase_date DESC",
            TICKET_WITH_EVENT_SELECT
        ))
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.iter().map(map_joined_row).collect::<Result<Vec<_>, _>>().map_err(AppError::Database)
    }

    async fn mark_used(&self, ticket_id: &str) -> Result<Ticket, AppError> {
        let updated = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET used = 1, used_date = ? WHERE id = ? AND used = 0 RETURNING *",
        )
            .bind(Utc::now())
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match updated {
            Some(ticket) => Ok(ticket),
            None => {
                let exists = sqlx::query("SELECT id FROM tickets WHERE id = ?")
                    .bind(ticket_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
                if exists.is_some() {
                    Err(AppError::Conflict("Ticket has already been used".to_string()))
                } else {
                    Err(AppError::NotFound("Ticket not found".to_string()))
                }
            }
        }
    }
}
