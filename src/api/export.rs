use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;

use crate::models::{active_borrowing, book, book_label, borrow_record, member, notification};

/// Column order of the printable catalog table. Fixed; the school's
/// spreadsheet templates depend on it.
pub const EXPORT_HEADERS: [&str; 16] = [
    "Judul Buku",
    "Penulis",
    "ISBN",
    "Penerbit",
    "Tahun Terbit",
    "Kategori",
    "Sub Kategori",
    "Bahasa",
    "Jumlah Halaman",
    "Deskripsi",
    "Status",
    "Lokasi",
    "Tanggal Perolehan",
    "Cara Perolehan",
    "Harga",
    "Catatan",
];

#[derive(Serialize)]
pub struct BackupData {
    pub version: String,
    pub timestamp: String,
    pub members: Vec<member::Model>,
    pub books: Vec<book::Model>,
    pub borrow_records: Vec<borrow_record::Model>,
    pub active_borrowings: Vec<active_borrowing::Model>,
    pub book_labels: Vec<book_label::Model>,
    pub notifications: Vec<notification::Model>,
}

pub async fn export_data(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    // Fetch all data
    let members = member::Entity::find().all(&db).await.unwrap_or_default();
    let books = book::Entity::find().all(&db).await.unwrap_or_default();
    let borrow_records = borrow_record::Entity::find()
        .all(&db)
        .await
        .unwrap_or_default();
    let active_borrowings = active_borrowing::Entity::find()
        .all(&db)
        .await
        .unwrap_or_default();
    let book_labels = book_label::Entity::find().all(&db).await.unwrap_or_default();
    let notifications = notification::Entity::find()
        .all(&db)
        .await
        .unwrap_or_default();

    let backup = BackupData {
        version: "1.0".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        members,
        books,
        borrow_records,
        active_borrowings,
        book_labels,
        notifications,
    };

    let filename = format!(
        "siperpus_backup_{}.json",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename)
            .parse()
            .unwrap(),
    );

    (StatusCode::OK, headers, Json(backup))
}

/// Render one book as the fixed 16-column row.
pub fn book_to_row(book: &book::Model) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    vec![
        book.title.clone(),
        opt(&book.author),
        opt(&book.isbn),
        opt(&book.publisher),
        book.publication_year.map(|y| y.to_string()).unwrap_or_default(),
        opt(&book.category),
        opt(&book.sub_category),
        opt(&book.language),
        book.pages.map(|p| p.to_string()).unwrap_or_default(),
        opt(&book.description),
        book.status.clone(),
        opt(&book.location),
        opt(&book.acquisition_date),
        opt(&book.acquisition_method),
        book.price.map(|p| p.to_string()).unwrap_or_default(),
        opt(&book.notes),
    ]
}

pub async fn export_books_csv(
    State(db): State<DatabaseConnection>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let books = book::Entity::find()
        .order_by_asc(book::Column::Title)
        .all(&db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    for book in &books {
        writer
            .write_record(book_to_row(book))
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let filename = format!(
        "katalog_buku_{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename)
            .parse()
            .unwrap(),
    );

    Ok((StatusCode::OK, headers, body))
}
