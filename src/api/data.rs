use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::infrastructure::AppState;
use crate::modules::import::{map_row, parse_csv_rows, ColumnMapping};

/// Catalog import payload: a column-letter mapping plus rows, either already
/// split into cells or as raw CSV text.
#[derive(Deserialize)]
pub struct ImportRequest {
    pub mapping: ColumnMapping,
    pub rows: Option<Vec<Vec<String>>>,
    pub csv: Option<String>,
}

#[derive(Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub failed: usize,
    pub message: String,
}

pub async fn import_books(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResult>, (StatusCode, String)> {
    let mut rows = payload.rows.unwrap_or_default();

    if let Some(csv_text) = payload.csv {
        let parsed = parse_csv_rows(csv_text.as_bytes())
            .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
        rows.extend(parsed);
    }

    if rows.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No rows to import".to_string()));
    }

    let mut imported = 0;
    let mut failed = 0;

    for row in &rows {
        let mut book = match map_row(&payload.mapping, row) {
            Ok(book) => book,
            Err(e) => {
                failed += 1;
                tracing::warn!("import: skipping row: {}", e);
                continue;
            }
        };

        // Sheets exported from the catalog carry no barcode column; fall
        // back to the ISBN as the copy code.
        if book.barcode.trim().is_empty() {
            if let Some(isbn) = &book.isbn {
                book.barcode = isbn.trim().to_uppercase().replace(' ', "-");
            }
        }

        match state.book_repo.create(book).await {
            Ok(_) => imported += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!("import: row rejected: {}", e);
            }
        }
    }

    Ok(Json(ImportResult {
        imported,
        failed,
        message: format!("Imported {} of {} rows", imported, rows.len()),
    }))
}
