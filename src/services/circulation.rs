//! Circulation desk logic: borrow, return, renew, overdue tracking.
//!
//! An open loan is one logical entity stored in two physical tables: the
//! append-only `borrow_records` ledger and the `active_borrowings`
//! projection. Every transition here writes both sides inside a single
//! database transaction, so a reader can never observe the ledger saying
//! "returned" while the projection still lists the loan open (or the
//! reverse).

use chrono::{Days, Local, NaiveDate};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::infrastructure::config::CirculationConfig;
use crate::models::active_borrowing::{self, Entity as ActiveBorrowing};
use crate::models::book::{self, Entity as Book};
use crate::models::borrow_record::{self, Entity as BorrowRecord};
use crate::models::member::Entity as Member;
use crate::services::notifications;

use super::{now_timestamp, BulkOutcome, ServiceError};

/// Day-granularity date format used on loan rows.
pub const DATE_FMT: &str = "%Y-%m-%d";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| ServiceError::Database(format!("Unreadable date '{}': {}", s, e)))
}

/// Locate the ledger entry backing an open loan.
async fn open_ledger_entry<C: ConnectionTrait>(
    conn: &C,
    member_id: i32,
    book_id: i32,
) -> Result<borrow_record::Model, ServiceError> {
    BorrowRecord::find()
        .filter(borrow_record::Column::MemberId.eq(member_id))
        .filter(borrow_record::Column::BookId.eq(book_id))
        .filter(borrow_record::Column::Status.is_in(["active", "overdue"]))
        .order_by_desc(borrow_record::Column::Id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::Database(format!(
                "No open ledger entry for member {} and book {}",
                member_id, book_id
            ))
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct BorrowRequest {
    pub member_id: i32,
    pub book_id: i32,
    /// Defaults to today when omitted.
    pub borrow_date: Option<String>,
}

/// Open a loan: projection row + ledger entry + book status, atomically.
pub async fn borrow_book(
    db: &DatabaseConnection,
    cfg: &CirculationConfig,
    req: BorrowRequest,
) -> Result<active_borrowing::Model, ServiceError> {
    let member = Member::find_by_id(req.member_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Member not found".to_string()))?;

    if member.status != "active" {
        return Err(ServiceError::InvalidState(format!(
            "Member is {}",
            member.status
        )));
    }

    let book = Book::find_by_id(req.book_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Book not found".to_string()))?;

    if book.status == "damaged" || book.status == "lost" {
        return Err(ServiceError::InvalidState(format!(
            "Book is currently {}",
            book.status
        )));
    }

    let existing = ActiveBorrowing::find()
        .filter(active_borrowing::Column::BookId.eq(book.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::InvalidState(
            "Book already has an open loan".to_string(),
        ));
    }

    let open_count = ActiveBorrowing::find()
        .filter(active_borrowing::Column::MemberId.eq(member.id))
        .count(db)
        .await?;
    let limit = cfg.borrow_limit_for(&member.role);
    if open_count >= limit {
        return Err(ServiceError::Validation(format!(
            "Borrow limit reached for {} ({}/{})",
            member.role, open_count, limit
        )));
    }

    let borrow_date = match &req.borrow_date {
        Some(s) => parse_date(s).map_err(|_| {
            ServiceError::Validation(format!("Invalid borrow date '{}'", s))
        })?,
        None => today(),
    };
    let due_date = borrow_date + Days::new(cfg.loan_period_days as u64);
    let now = now_timestamp();

    let txn = db.begin().await?;

    let borrowing = active_borrowing::ActiveModel {
        member_id: Set(member.id),
        book_id: Set(book.id),
        borrow_date: Set(fmt_date(borrow_date)),
        due_date: Set(fmt_date(due_date)),
        renewal_count: Set(0),
        fine_amount: Set(0.0),
        status: Set("active".to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    borrow_record::ActiveModel {
        member_id: Set(member.id),
        book_id: Set(book.id),
        borrow_date: Set(fmt_date(borrow_date)),
        due_date: Set(fmt_date(due_date)),
        return_date: Set(None),
        status: Set("active".to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut book_active: book::ActiveModel = book.into();
    book_active.status = Set("borrowed".to_owned());
    book_active.updated_at = Set(now);
    book_active.update(&txn).await?;

    txn.commit().await?;

    Ok(borrowing)
}

/// Close a loan: ledger closed, projection row deleted, book shelved again.
pub async fn return_borrowing(
    db: &DatabaseConnection,
    id: i32,
) -> Result<borrow_record::Model, ServiceError> {
    let borrowing = ActiveBorrowing::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("No open borrowing with this id".to_string()))?;

    close_loan(db, borrowing).await
}

/// Return variant for desks that scan member and book instead of the loan id.
pub async fn return_borrowing_for(
    db: &DatabaseConnection,
    member_id: i32,
    book_id: i32,
) -> Result<borrow_record::Model, ServiceError> {
    let borrowing = ActiveBorrowing::find()
        .filter(active_borrowing::Column::MemberId.eq(member_id))
        .filter(active_borrowing::Column::BookId.eq(book_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("No open borrowing for this member and book".to_string())
        })?;

    close_loan(db, borrowing).await
}

async fn close_loan(
    db: &DatabaseConnection,
    borrowing: active_borrowing::Model,
) -> Result<borrow_record::Model, ServiceError> {
    let record = open_ledger_entry(db, borrowing.member_id, borrowing.book_id).await?;
    let now = now_timestamp();

    let txn = db.begin().await?;

    let mut record_active: borrow_record::ActiveModel = record.into();
    record_active.return_date = Set(Some(fmt_date(today())));
    record_active.status = Set("returned".to_owned());
    record_active.updated_at = Set(now.clone());
    let closed = record_active.update(&txn).await?;

    ActiveBorrowing::delete_by_id(borrowing.id).exec(&txn).await?;

    let book = Book::find_by_id(borrowing.book_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Associated book not found".to_string()))?;
    let mut book_active: book::ActiveModel = book.into();
    book_active.status = Set("available".to_owned());
    book_active.updated_at = Set(now);
    book_active.update(&txn).await?;

    txn.commit().await?;

    Ok(closed)
}

/// Extend an open loan. The ledger entry's due date is mirrored so the two
/// views always agree.
pub async fn renew_borrowing(
    db: &DatabaseConnection,
    cfg: &CirculationConfig,
    id: i32,
) -> Result<active_borrowing::Model, ServiceError> {
    let borrowing = ActiveBorrowing::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("No open borrowing with this id".to_string()))?;

    if let Some(max) = cfg.max_renewals {
        if borrowing.renewal_count >= max {
            return Err(ServiceError::InvalidState(format!(
                "Renewal limit reached ({})",
                max
            )));
        }
    }

    let record = open_ledger_entry(db, borrowing.member_id, borrowing.book_id).await?;
    let due_date = parse_date(&borrowing.due_date)? + Days::new(cfg.renewal_extension_days as u64);
    let now = now_timestamp();

    let txn = db.begin().await?;

    let mut active: active_borrowing::ActiveModel = borrowing.clone().into();
    active.due_date = Set(fmt_date(due_date));
    active.renewal_count = Set(borrowing.renewal_count + 1);
    active.updated_at = Set(now.clone());
    let renewed = active.update(&txn).await?;

    let mut record_active: borrow_record::ActiveModel = record.into();
    record_active.due_date = Set(fmt_date(due_date));
    record_active.updated_at = Set(now);
    record_active.update(&txn).await?;

    txn.commit().await?;

    Ok(renewed)
}

/// Return each selected borrowing independently; failures do not stop or
/// revert the rest.
pub async fn bulk_return(db: &DatabaseConnection, ids: &[i32]) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for &id in ids {
        match return_borrowing(db, id).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                outcome.failed += 1;
                tracing::warn!("bulk return: borrowing {} failed: {}", id, e);
            }
        }
    }
    outcome
}

/// Renew each selected borrowing independently, best-effort.
pub async fn bulk_extend(
    db: &DatabaseConnection,
    cfg: &CirculationConfig,
    ids: &[i32],
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for &id in ids {
        match renew_borrowing(db, cfg, id).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                outcome.failed += 1;
                tracing::warn!("bulk extend: borrowing {} failed: {}", id, e);
            }
        }
    }
    outcome
}

/// Display state of an open loan, computed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanDisplayStatus {
    /// Past due; carries days late.
    Terlambat(i64),
    /// Due within the warning threshold; carries days remaining.
    MendekatiJatuhTempo(i64),
    /// Open with room to spare; carries days remaining.
    Aktif(i64),
}

impl LoanDisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanDisplayStatus::Terlambat(_) => "Terlambat",
            LoanDisplayStatus::MendekatiJatuhTempo(_) => "Mendekati Jatuh Tempo",
            LoanDisplayStatus::Aktif(_) => "Aktif",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            LoanDisplayStatus::Terlambat(d)
            | LoanDisplayStatus::MendekatiJatuhTempo(d)
            | LoanDisplayStatus::Aktif(d) => *d,
        }
    }
}

/// Derive the display state from a due date and the recorded loan status.
pub fn display_status(
    due_date: NaiveDate,
    recorded_status: &str,
    today: NaiveDate,
    due_soon_threshold_days: i64,
) -> LoanDisplayStatus {
    let days_until_due = (due_date - today).num_days();
    if recorded_status == "overdue" || days_until_due < 0 {
        LoanDisplayStatus::Terlambat(days_until_due.abs())
    } else if days_until_due <= due_soon_threshold_days {
        LoanDisplayStatus::MendekatiJatuhTempo(days_until_due)
    } else {
        LoanDisplayStatus::Aktif(days_until_due)
    }
}

/// Filter parameters for listing open borrowings
#[derive(Debug, Default, Clone)]
pub struct BorrowingFilter {
    pub member_id: Option<i32>,
}

/// Open borrowing enriched with member/book names and the derived display
/// state.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveBorrowingView {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrow_date: String,
    pub due_date: String,
    pub renewal_count: i32,
    pub fine_amount: f64,
    pub status: String,
    pub member_name: String,
    pub book_title: String,
    pub days_until_due: i64,
    pub display_status: String,
}

/// List open borrowings with related member and book info
pub async fn list_active_borrowings(
    db: &DatabaseConnection,
    cfg: &CirculationConfig,
    filter: BorrowingFilter,
) -> Result<Vec<ActiveBorrowingView>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(member_id) = filter.member_id {
        condition = condition.add(active_borrowing::Column::MemberId.eq(member_id));
    }

    let borrowings_with_members = ActiveBorrowing::find()
        .filter(condition)
        .order_by_asc(active_borrowing::Column::DueDate)
        .find_also_related(Member)
        .all(db)
        .await?;

    // Collect book IDs to fetch titles
    let book_ids: Vec<i32> = borrowings_with_members
        .iter()
        .map(|(b, _)| b.book_id)
        .collect();

    let mut book_title_map: HashMap<i32, String> = HashMap::new();

    if !book_ids.is_empty() {
        let books = Book::find()
            .filter(book::Column::Id.is_in(book_ids))
            .all(db)
            .await?;

        for b in books {
            book_title_map.insert(b.id, b.title);
        }
    }

    let today = today();
    let mut views = Vec::with_capacity(borrowings_with_members.len());

    for (borrowing, member) in borrowings_with_members {
        let due = parse_date(&borrowing.due_date)?;
        let state = display_status(
            due,
            &borrowing.status,
            today,
            cfg.due_soon_threshold_days,
        );
        let member_name = member
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let book_title = book_title_map
            .get(&borrowing.book_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        views.push(ActiveBorrowingView {
            id: borrowing.id,
            member_id: borrowing.member_id,
            book_id: borrowing.book_id,
            borrow_date: borrowing.borrow_date,
            due_date: borrowing.due_date,
            renewal_count: borrowing.renewal_count,
            fine_amount: borrowing.fine_amount,
            status: borrowing.status,
            member_name,
            book_title,
            days_until_due: (due - today).num_days(),
            display_status: state.label().to_string(),
        });
    }

    Ok(views)
}

/// Filter parameters for the historical ledger
#[derive(Debug, Default, Clone)]
pub struct LedgerFilter {
    pub member_id: Option<i32>,
    pub status: Option<String>,
}

/// List ledger entries, newest first
pub async fn list_borrow_records(
    db: &DatabaseConnection,
    filter: LedgerFilter,
) -> Result<Vec<borrow_record::Model>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(member_id) = filter.member_id {
        condition = condition.add(borrow_record::Column::MemberId.eq(member_id));
    }

    if let Some(status) = filter.status {
        condition = condition.add(borrow_record::Column::Status.eq(status));
    }

    let records = BorrowRecord::find()
        .filter(condition)
        .order_by_desc(borrow_record::Column::Id)
        .all(db)
        .await?;

    Ok(records)
}

/// Outcome of an overdue sweep
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SweepOutcome {
    pub checked: usize,
    pub flagged: usize,
}

/// Walk open borrowings past their due date: flag projection and ledger
/// `overdue`, accrue the daily fine, and raise one warning notification per
/// newly-flagged loan. Safe to run repeatedly; already-flagged loans only get
/// their fine refreshed.
pub async fn mark_overdue(
    db: &DatabaseConnection,
    cfg: &CirculationConfig,
) -> Result<SweepOutcome, ServiceError> {
    let open = ActiveBorrowing::find().all(db).await?;
    let today = today();
    let mut outcome = SweepOutcome {
        checked: open.len(),
        ..Default::default()
    };

    for borrowing in open {
        let due = parse_date(&borrowing.due_date)?;
        let days_late = (today - due).num_days();
        if days_late <= 0 {
            continue;
        }

        let newly_flagged = borrowing.status != "overdue";
        let record = open_ledger_entry(db, borrowing.member_id, borrowing.book_id).await?;
        let now = now_timestamp();

        let txn = db.begin().await?;

        let borrowing_id = borrowing.id;
        let mut active: active_borrowing::ActiveModel = borrowing.into();
        active.status = Set("overdue".to_owned());
        active.fine_amount = Set(days_late as f64 * cfg.fine_per_day);
        active.updated_at = Set(now.clone());
        active.update(&txn).await?;

        let mut record_active: borrow_record::ActiveModel = record.into();
        record_active.status = Set("overdue".to_owned());
        record_active.updated_at = Set(now);
        record_active.update(&txn).await?;

        txn.commit().await?;

        if newly_flagged {
            outcome.flagged += 1;
            let created = notifications::create_notification(
                db,
                "Peminjaman terlambat".to_string(),
                format!("Peminjaman #{} terlambat {} hari", borrowing_id, days_late),
                "warning".to_string(),
            )
            .await;
            if let Err(e) = created {
                tracing::warn!("overdue sweep: notification failed: {}", e);
            }
        }
    }

    Ok(outcome)
}

/// Hold an on-shelf copy for a member.
pub async fn reserve_book(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<book::Model, ServiceError> {
    set_book_status_guarded(db, book_id, "available", "reserved").await
}

/// Release a held copy back to the shelf.
pub async fn release_reservation(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<book::Model, ServiceError> {
    set_book_status_guarded(db, book_id, "reserved", "available").await
}

async fn set_book_status_guarded(
    db: &DatabaseConnection,
    book_id: i32,
    expected: &str,
    next: &str,
) -> Result<book::Model, ServiceError> {
    let book = Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Book not found".to_string()))?;

    if book.status != expected {
        return Err(ServiceError::InvalidState(format!(
            "Book is currently {}",
            book.status
        )));
    }

    let mut active: book::ActiveModel = book.into();
    active.status = Set(next.to_owned());
    active.updated_at = Set(now_timestamp());
    Ok(active.update(db).await?)
}
