use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::infrastructure::config::CirculationConfig;
use crate::models::active_borrowing::Entity as ActiveBorrowing;
use crate::models::book::Entity as Book;
use crate::models::borrow_record::Entity as BorrowRecord;
use crate::models::member::Entity as Member;
use crate::services::circulation;
use crate::services::circulation::{BorrowRequest, BorrowingFilter, LedgerFilter};

use super::service_error;

#[derive(Deserialize)]
pub struct ListBorrowingsQuery {
    pub member_id: Option<i32>,
}

pub async fn list_borrowings(
    State(db): State<DatabaseConnection>,
    State(cfg): State<CirculationConfig>,
    Query(query): Query<ListBorrowingsQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let borrowings = circulation::list_active_borrowings(
        &db,
        &cfg,
        BorrowingFilter {
            member_id: query.member_id,
        },
    )
    .await
    .map_err(service_error)?;

    Ok(Json(
        json!({ "borrowings": borrowings, "total": borrowings.len() }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/borrowings",
    responses(
        (status = 201, description = "Loan opened"),
        (status = 400, description = "Precondition failed"),
        (status = 404, description = "Member or book not found")
    )
)]
pub async fn create_borrowing(
    State(db): State<DatabaseConnection>,
    State(cfg): State<CirculationConfig>,
    Json(payload): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let borrowing = circulation::borrow_book(&db, &cfg, payload)
        .await
        .map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "borrowing": borrowing, "message": "Loan opened successfully" })),
    ))
}

pub async fn return_borrowing(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let record = circulation::return_borrowing(&db, id)
        .await
        .map_err(service_error)?;

    Ok(Json(
        json!({ "record": record, "message": "Loan returned successfully" }),
    ))
}

#[derive(Deserialize)]
pub struct ReturnByPairRequest {
    pub member_id: i32,
    pub book_id: i32,
}

pub async fn return_by_member_and_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<ReturnByPairRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let record = circulation::return_borrowing_for(&db, payload.member_id, payload.book_id)
        .await
        .map_err(service_error)?;

    Ok(Json(
        json!({ "record": record, "message": "Loan returned successfully" }),
    ))
}

pub async fn renew_borrowing(
    State(db): State<DatabaseConnection>,
    State(cfg): State<CirculationConfig>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let borrowing = circulation::renew_borrowing(&db, &cfg, id)
        .await
        .map_err(service_error)?;

    Ok(Json(
        json!({ "borrowing": borrowing, "message": "Loan renewed successfully" }),
    ))
}

#[derive(Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<i32>,
}

pub async fn bulk_return(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<BulkRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if payload.ids.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No borrowings selected".to_string()));
    }

    let outcome = circulation::bulk_return(&db, &payload.ids).await;

    Ok(Json(json!({ "outcome": outcome })))
}

pub async fn bulk_extend(
    State(db): State<DatabaseConnection>,
    State(cfg): State<CirculationConfig>,
    Json(payload): Json<BulkRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if payload.ids.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No borrowings selected".to_string()));
    }

    let outcome = circulation::bulk_extend(&db, &cfg, &payload.ids).await;

    Ok(Json(json!({ "outcome": outcome })))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub member_id: Option<i32>,
    pub status: Option<String>,
}

pub async fn list_history(
    State(db): State<DatabaseConnection>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let records = circulation::list_borrow_records(
        &db,
        LedgerFilter {
            member_id: query.member_id,
            status: query.status,
        },
    )
    .await
    .map_err(service_error)?;

    Ok(Json(json!({ "records": records, "total": records.len() })))
}

pub async fn sweep_overdue(
    State(db): State<DatabaseConnection>,
    State(cfg): State<CirculationConfig>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let outcome = circulation::mark_overdue(&db, &cfg)
        .await
        .map_err(service_error)?;

    Ok(Json(json!({ "outcome": outcome })))
}

/// Dashboard counters. The four tables feed disjoint views, so the counts
/// are loaded concurrently.
pub async fn overview(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let (members, books, records, borrowings) = tokio::join!(
        Member::find().count(&db),
        Book::find().count(&db),
        BorrowRecord::find().count(&db),
        ActiveBorrowing::find().count(&db),
    );

    let internal = |e: sea_orm::DbErr| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());

    Ok(Json(json!({
        "members": members.map_err(internal)?,
        "books": books.map_err(internal)?,
        "ledger_entries": records.map_err(internal)?,
        "active_borrowings": borrowings.map_err(internal)?,
    })))
}
