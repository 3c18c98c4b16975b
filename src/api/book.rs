use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::models::BookDto;
use crate::services::{circulation, lookup};

use super::{domain_error, service_error};

const BOOK_STATUSES: [&str; 5] = ["available", "borrowed", "reserved", "damaged", "lost"];

#[derive(Deserialize)]
pub struct ListBooksQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "List catalogued books")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let books = state
        .book_repo
        .find_all(BookFilter {
            status: query.status,
            category: query.category,
            query: query.q,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "books": books, "total": books.len() })))
}

#[utoipa::path(
    post,
    path = "/api/books",
    responses(
        (status = 201, description = "Book catalogued"),
        (status = 400, description = "Missing title/barcode or duplicate barcode")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookDto>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let book = state.book_repo.create(payload).await.map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "book": book, "message": "Book catalogued successfully" })),
    ))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let book = state
        .book_repo
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "Book not found".to_string()))?;

    Ok(Json(json!({ "book": book })))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookDto>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let book = state
        .book_repo
        .update(id, payload)
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "book": book, "message": "Book updated successfully" })))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.book_repo.delete(id).await.map_err(domain_error)?;

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Direct status override for maintenance work (damaged/lost/back on shelf).
pub async fn update_book_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !BOOK_STATUSES.contains(&payload.status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown book status '{}'", payload.status),
        ));
    }

    let mut book = state
        .book_repo
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "Book not found".to_string()))?;

    book.status = Some(payload.status);
    let book = state
        .book_repo
        .update(id, book)
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "book": book, "message": "Book status updated" })))
}

pub async fn reserve_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let book = circulation::reserve_book(&db, id).await.map_err(service_error)?;

    Ok(Json(json!({ "book": book, "message": "Book reserved" })))
}

pub async fn release_reservation(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let book = circulation::release_reservation(&db, id)
        .await
        .map_err(service_error)?;

    Ok(Json(json!({ "book": book, "message": "Reservation released" })))
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub q: Option<String>,
}

pub async fn lookup_book(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let q = query.q.unwrap_or_default();

    let books = state
        .book_repo
        .find_all(BookFilter::default())
        .await
        .map_err(domain_error)?;

    let outcome = lookup::find_book(&books, &q);

    if !q.trim().is_empty() && outcome.is_empty() {
        return Err((StatusCode::NOT_FOUND, "Book not found".to_string()));
    }

    Ok(Json(json!({
        "selected": outcome.selected,
        "candidates": outcome.candidates,
    })))
}
