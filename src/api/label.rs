use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::labels;
use crate::services::labels::LabelSettings;

use super::service_error;

#[derive(Deserialize)]
pub struct GenerateLabelRequest {
    pub book_id: i32,
    pub template: Option<String>,
    pub size: Option<String>,
}

pub async fn generate_label(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<GenerateLabelRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let label = labels::generate_label(
        &db,
        payload.book_id,
        LabelSettings {
            template: payload.template,
            size: payload.size,
        },
    )
    .await
    .map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "label": label, "message": "Label ready" })),
    ))
}

pub async fn list_labels(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let labels = labels::list_labels(&db).await.map_err(service_error)?;

    Ok(Json(json!({ "labels": labels, "total": labels.len() })))
}

pub async fn print_label(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let label = labels::print_label(&db, id).await.map_err(service_error)?;

    Ok(Json(json!({ "label": label, "message": "Print recorded" })))
}

#[derive(Deserialize)]
pub struct PrintBatchRequest {
    pub ids: Vec<i32>,
}

pub async fn print_batch(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<PrintBatchRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if payload.ids.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No labels selected".to_string()));
    }

    let outcome = labels::print_labels(&db, &payload.ids).await;

    Ok(Json(json!({ "outcome": outcome })))
}

pub async fn repair_barcodes(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let outcome = labels::fix_incompatible_barcodes(&db)
        .await
        .map_err(service_error)?;

    Ok(Json(json!({ "outcome": outcome })))
}

#[derive(Deserialize)]
pub struct ValidateQuery {
    pub code: String,
}

pub async fn validate_barcode(Query(query): Query<ValidateQuery>) -> Json<Value> {
    Json(json!({
        "code": query.code,
        "valid": labels::is_valid_barcode(&query.code),
    }))
}
