use crate::domain::models::event::Event;
use crate::domain::ports::EventRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, event_title, date, time, location, image, price_id, unit_price, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.event_title).bind(event.date).bind(&event.time)
            .bind(&event.location).bind(&event.image).bind(&event.price_id).bind(event.unit_price)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_next_upcoming(&self, from: NaiveDate) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE date >= $1 ORDER BY date ASC, id ASC LIMIT 1",
        )
            .bind(from)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET event_title=$1, date=$2, time=$3, location=$4, image=$5, price_id=$6, unit_price=$7
             WHERE id=$8
             RETURNING *"
        )
            .bind(&event.event_title).bind(event.date).bind(&event.time).bind(&event.location)
            .bind(&event.image).bind(&event.price_id).bind(event.unit_price)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }
}
