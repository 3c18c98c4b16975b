use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::notifications;

use super::service_error;

#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    pub unread: Option<bool>,
}

pub async fn list_notifications(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let notifications =
        notifications::list_notifications(&db, query.unread.unwrap_or(false))
            .await
            .map_err(service_error)?;

    Ok(Json(
        json!({ "notifications": notifications, "total": notifications.len() }),
    ))
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    pub r#type: String,
}

pub async fn create_notification(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let notification =
        notifications::create_notification(&db, payload.title, payload.message, payload.r#type)
            .await
            .map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "notification": notification })),
    ))
}

pub async fn mark_read(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let notification = notifications::mark_read(&db, id).await.map_err(service_error)?;

    Ok(Json(json!({ "notification": notification })))
}

pub async fn mark_all_read(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let marked = notifications::mark_all_read(&db).await.map_err(service_error)?;

    Ok(Json(json!({ "marked": marked })))
}
