use chrono::NaiveDate;
use serde::Deserialize;

/// Scanner and manual entry both post here; camelCase matches the console.
#[derive(Deserialize)]
pub struct VerifyTicketRequest {
    #[serde(rename = "ticketNumber")]
    pub ticket_number: Option<String>,
}

#[derive(Deserialize)]
pub struct MarkUsedRequest {
    #[serde(rename = "ticketId")]
    pub ticket_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TicketQuery {
    pub session_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateTicketRequest {
    pub email: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub event_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image: Option<String>,
    pub price_id: Option<String>,
    pub unit_price: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub event_title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub price_id: Option<String>,
    pub unit_price: Option<i64>,
}
