//! Book label generation and barcode compatibility.

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::models::book::Entity as Book;
use crate::models::book_label::{self, Entity as BookLabel};

use super::{now_timestamp, BulkOutcome, ServiceError};

pub const BARCODE_MIN_LEN: usize = 4;
pub const BARCODE_MAX_LEN: usize = 24;

/// Scanner-compatible barcode: uppercase letters, digits and hyphens, within
/// the length window the label printer accepts.
pub fn is_valid_barcode(code: &str) -> bool {
    (BARCODE_MIN_LEN..=BARCODE_MAX_LEN).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a compliant barcode from whatever the record currently carries.
/// Falls back to a code built from the book id when nothing salvageable
/// remains.
pub fn derive_barcode(book_id: i32, current: &str) -> String {
    let mut cleaned: String = current
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    cleaned.truncate(BARCODE_MAX_LEN);

    if is_valid_barcode(&cleaned) {
        cleaned
    } else {
        format!("LIB-{:06}", book_id)
    }
}

/// Print settings for a generated label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelSettings {
    pub template: Option<String>,
    pub size: Option<String>,
}

/// Create the label for a book. Idempotent: a book that already has a label
/// keeps it untouched, and that existing label is returned.
pub async fn generate_label(
    db: &DatabaseConnection,
    book_id: i32,
    settings: LabelSettings,
) -> Result<book_label::Model, ServiceError> {
    if let Some(existing) = BookLabel::find()
        .filter(book_label::Column::BookId.eq(book_id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let book = Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Book not found".to_string()))?;

    let barcode = if is_valid_barcode(&book.barcode) {
        book.barcode.clone()
    } else {
        derive_barcode(book.id, &book.barcode)
    };

    let now = now_timestamp();
    let label = book_label::ActiveModel {
        book_id: Set(book.id),
        barcode: Set(barcode),
        label_template: Set(settings
            .template
            .unwrap_or_else(|| "standard".to_string())),
        size: Set(settings.size.unwrap_or_else(|| "medium".to_string())),
        print_count: Set(0),
        last_printed_at: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(label)
}

/// List all labels, newest first
pub async fn list_labels(db: &DatabaseConnection) -> Result<Vec<book_label::Model>, ServiceError> {
    let labels = BookLabel::find()
        .order_by_desc(book_label::Column::Id)
        .all(db)
        .await?;
    Ok(labels)
}

/// Record one print run of a label.
pub async fn print_label(
    db: &DatabaseConnection,
    id: i32,
) -> Result<book_label::Model, ServiceError> {
    let label = BookLabel::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Label not found".to_string()))?;

    let now = now_timestamp();
    let mut active: book_label::ActiveModel = label.clone().into();
    active.print_count = Set(label.print_count + 1);
    active.last_printed_at = Set(Some(now.clone()));
    active.updated_at = Set(now);

    Ok(active.update(db).await?)
}

/// Print a batch of labels, each independently; a failed id does not stop or
/// revert the others.
pub async fn print_labels(db: &DatabaseConnection, ids: &[i32]) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for &id in ids {
        match print_label(db, id).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                outcome.failed += 1;
                tracing::warn!("print batch: label {} failed: {}", id, e);
            }
        }
    }
    outcome
}

/// Outcome of a barcode repair pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    pub fixed: usize,
    pub total: usize,
}

/// Re-derive a compliant barcode for every label that fails validation.
/// Labels that already validate are never touched.
pub async fn fix_incompatible_barcodes(
    db: &DatabaseConnection,
) -> Result<RepairOutcome, ServiceError> {
    let labels = BookLabel::find().all(db).await?;
    let mut outcome = RepairOutcome {
        total: labels.len(),
        ..Default::default()
    };

    for label in labels {
        if is_valid_barcode(&label.barcode) {
            continue;
        }

        let repaired = derive_barcode(label.book_id, &label.barcode);
        let mut active: book_label::ActiveModel = label.into();
        active.barcode = Set(repaired);
        active.updated_at = Set(now_timestamp());
        active.update(db).await?;
        outcome.fixed += 1;
    }

    Ok(outcome)
}
