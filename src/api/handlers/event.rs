use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::api::extractors::admin::AdminAuth;
use crate::domain::models::event::{Event, NewEventParams};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.event_title.trim().is_empty() {
        return Err(AppError::Validation("Event title is required".into()));
    }

    let event = Event::new(NewEventParams {
        event_title: payload.event_title,
        date: payload.date,
        time: payload.time,
        location: payload.location,
        image: payload.image,
        price_id: payload.price_id,
        unit_price: payload.unit_price,
    });

    info!("Creating event: {}", event.event_title);
    let created = state.event_repo.create(&event).await?;
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if let Some(title) = payload.event_title {
        event.event_title = title;
    }
    if let Some(date) = payload.date {
        event.date = date;
    }
    if let Some(time) = payload.time {
        event.time = time;
    }
    if let Some(location) = payload.location {
        event.location = location;
    }
    if payload.image.is_some() {
        event.image = payload.image;
    }
    if payload.price_id.is_some() {
        event.price_id = payload.price_id;
    }
    if payload.unit_price.is_some() {
        event.unit_price = payload.unit_price;
    }

    let updated = state.event_repo.update(&event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.delete(&event_id).await?;
    Ok(Json(json!({ "success": true })))
}
