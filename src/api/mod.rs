pub mod book;
pub mod circulation;
pub mod data;
pub mod export;
pub mod health;
pub mod label;
pub mod member;
pub mod notification;

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Router,
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::ServiceError;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Members
        .route(
            "/members",
            get(member::list_members).post(member::create_member),
        )
        .route("/members/lookup", get(member::lookup_member))
        .route(
            "/members/:id",
            get(member::get_member)
                .put(member::update_member)
                .delete(member::delete_member),
        )
        // Books
        .route("/books", get(book::list_books).post(book::create_book))
        .route("/books/lookup", get(book::lookup_book))
        .route("/books/import", post(data::import_books))
        .route(
            "/books/:id",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/books/:id/status", put(book::update_book_status))
        .route("/books/:id/reserve", post(book::reserve_book))
        .route("/books/:id/release", post(book::release_reservation))
        // Circulation
        .route(
            "/borrowings",
            get(circulation::list_borrowings).post(circulation::create_borrowing),
        )
        .route(
            "/borrowings/return",
            post(circulation::return_by_member_and_book),
        )
        .route("/borrowings/bulk/return", post(circulation::bulk_return))
        .route("/borrowings/bulk/extend", post(circulation::bulk_extend))
        .route("/borrowings/overdue/sweep", post(circulation::sweep_overdue))
        .route("/borrowings/history", get(circulation::list_history))
        .route("/borrowings/:id/return", put(circulation::return_borrowing))
        .route("/borrowings/:id/renew", put(circulation::renew_borrowing))
        .route("/overview", get(circulation::overview))
        // Labels
        .route(
            "/labels",
            get(label::list_labels).post(label::generate_label),
        )
        .route("/labels/print", post(label::print_batch))
        .route("/labels/repair", post(label::repair_barcodes))
        .route("/labels/validate", get(label::validate_barcode))
        .route("/labels/:id/print", post(label::print_label))
        // Notifications
        .route(
            "/notifications",
            get(notification::list_notifications).post(notification::create_notification),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/:id/read", put(notification::mark_read))
        // Export
        .route("/export", get(export::export_data))
        .route("/export/books.csv", get(export::export_books_csv))
        .with_state(state)
}

pub(crate) fn service_error(e: ServiceError) -> (StatusCode, String) {
    let status = match &e {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) | ServiceError::InvalidState(_) => StatusCode::BAD_REQUEST,
        ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

pub(crate) fn domain_error(e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Database(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
