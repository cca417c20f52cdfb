use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub event_title: String,
    pub date: NaiveDate,
    /// Display string ("8:00 PM"), not parsed anywhere.
    pub time: String,
    pub location: String,
    pub image: Option<String>,
    pub price_id: Option<String>,
    pub unit_price: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub event_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image: Option<String>,
    pub price_id: Option<String>,
    pub unit_price: Option<i64>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_title: params.event_title,
            date: params.date,
            time: params.time,
            location: params.location,
            image: params.image,
            price_id: params.price_id,
            unit_price: params.unit_price,
            created_at: Utc::now(),
        }
    }
}
