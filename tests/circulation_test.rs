use chrono::{Days, Local, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use siperpus::config::CirculationConfig;
use siperpus::db;
use siperpus::models::{active_borrowing, book, borrow_record, member, notification};
use siperpus::services::circulation::{
    borrow_book, bulk_extend, bulk_return, display_status, list_active_borrowings, mark_overdue,
    renew_borrowing, return_borrowing, return_borrowing_for, BorrowRequest, BorrowingFilter,
    LoanDisplayStatus,
};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a test member
async fn create_test_member(db: &DatabaseConnection, name: &str, email: &str, ident: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let row = member::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        identifier: Set(ident.to_string()),
        role: Set("student".to_string()),
        status: Set("active".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = member::Entity::insert(row)
        .exec(db)
        .await
        .expect("Failed to create member");
    res.last_insert_id
}

// Helper to create a test book
async fn create_test_book(db: &DatabaseConnection, title: &str, barcode: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let row = book::ActiveModel {
        title: Set(title.to_string()),
        barcode: Set(barcode.to_string()),
        status: Set("available".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = book::Entity::insert(row)
        .exec(db)
        .await
        .expect("Failed to create book");
    res.last_insert_id
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::test]
async fn test_borrow_creates_ledger_and_projection() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    let borrowing = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .expect("borrow failed");

    assert_eq!(borrowing.renewal_count, 0);
    assert_eq!(borrowing.fine_amount, 0.0);
    assert_eq!(borrowing.status, "active");

    // Exactly one open ledger entry with matching keys
    let records = borrow_record::Entity::find()
        .filter(borrow_record::Column::MemberId.eq(member_id))
        .filter(borrow_record::Column::BookId.eq(book_id))
        .filter(borrow_record::Column::Status.eq("active"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].due_date, borrowing.due_date);

    // Book is flagged out
    let book = book::Entity::find_by_id(book_id).one(&db).await.unwrap().unwrap();
    assert_eq!(book.status, "borrowed");
}

#[tokio::test]
async fn test_borrow_rejects_book_with_open_loan() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let first = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let second = create_test_member(&db, "Budi Santoso", "budi@sekolah.sch.id", "S-002").await;
    let book_id = create_test_book(&db, "Bumi Manusia", "LIB-000002").await;

    borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id: first,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .expect("first borrow failed");

    let result = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id: second,
            book_id,
            borrow_date: None,
        },
    )
    .await;
    assert!(result.is_err());

    // Still exactly one projection row
    let rows = active_borrowing::Entity::find()
        .filter(active_borrowing::Column::BookId.eq(book_id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].member_id, first);
}

#[tokio::test]
async fn test_borrow_limit_enforced_per_role() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig {
        borrow_limit_student: 2,
        ..Default::default()
    };
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;

    for i in 0..2 {
        let book_id =
            create_test_book(&db, &format!("Buku {}", i), &format!("LIB-00000{}", i)).await;
        borrow_book(
            &db,
            &cfg,
            BorrowRequest {
                member_id,
                book_id,
                borrow_date: None,
            },
        )
        .await
        .expect("borrow under limit failed");
    }

    let book_id = create_test_book(&db, "Buku 3", "LIB-000099").await;
    let result = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await;
    assert!(result.is_err(), "third borrow should hit the student limit");
}

#[tokio::test]
async fn test_return_closes_ledger_and_deletes_projection() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    let borrowing = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    let record = return_borrowing(&db, borrowing.id).await.expect("return failed");
    assert_eq!(record.status, "returned");
    assert!(record.return_date.is_some());

    // Projection row is gone
    let remaining = active_borrowing::Entity::find_by_id(borrowing.id)
        .one(&db)
        .await
        .unwrap();
    assert!(remaining.is_none());

    // No open ledger entry survives
    let open = borrow_record::Entity::find()
        .filter(borrow_record::Column::Status.eq("active"))
        .all(&db)
        .await
        .unwrap();
    assert!(open.is_empty());

    // Book is back on the shelf
    let book = book::Entity::find_by_id(book_id).one(&db).await.unwrap().unwrap();
    assert_eq!(book.status, "available");
}

#[tokio::test]
async fn test_return_by_member_and_book() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    let record = return_borrowing_for(&db, member_id, book_id)
        .await
        .expect("return by pair failed");
    assert_eq!(record.status, "returned");

    // Second return of the same pair has nothing left to close
    let result = return_borrowing_for(&db, member_id, book_id).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_renewal_monotonicity() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    let borrowing = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    let original_due = NaiveDate::parse_from_str(&borrowing.due_date, "%Y-%m-%d").unwrap();

    let mut renewed = borrowing;
    for _ in 0..3 {
        renewed = renew_borrowing(&db, &cfg, renewed.id).await.expect("renew failed");
    }

    assert_eq!(renewed.renewal_count, 3);
    let due = NaiveDate::parse_from_str(&renewed.due_date, "%Y-%m-%d").unwrap();
    assert_eq!(due, original_due + Days::new(21));

    // Ledger due date mirrors the projection
    let record = borrow_record::Entity::find()
        .filter(borrow_record::Column::MemberId.eq(member_id))
        .filter(borrow_record::Column::BookId.eq(book_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.due_date, renewed.due_date);
}

#[tokio::test]
async fn test_bulk_return_is_best_effort() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let first_book = create_test_book(&db, "Buku Satu", "LIB-000001").await;
    let second_book = create_test_book(&db, "Buku Dua", "LIB-000002").await;

    let first = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id: first_book,
            borrow_date: None,
        },
    )
    .await
    .unwrap();
    let second = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id: second_book,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    // Middle id does not exist; the other two must still complete
    let outcome = bulk_return(&db, &[first.id, 99999, second.id]).await;
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);

    // The first success was not reverted by the middle failure
    let open = active_borrowing::Entity::find().all(&db).await.unwrap();
    assert!(open.is_empty());
    let book = book::Entity::find_by_id(first_book).one(&db).await.unwrap().unwrap();
    assert_eq!(book.status, "available");
}

#[tokio::test]
async fn test_bulk_extend_counts_failures() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Buku Satu", "LIB-000001").await;

    let borrowing = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    let outcome = bulk_extend(&db, &cfg, &[borrowing.id, 424242]).await;
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 1);

    let renewed = active_borrowing::Entity::find_by_id(borrowing.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renewed.renewal_count, 1);
}

#[test]
fn test_display_status_boundaries() {
    let today = today();
    let threshold = 3;

    // Due in 3 days: warning zone
    let state = display_status(today + Days::new(3), "active", today, threshold);
    assert_eq!(state, LoanDisplayStatus::MendekatiJatuhTempo(3));
    assert_eq!(state.label(), "Mendekati Jatuh Tempo");

    // Due in 4 days: still comfortably active
    let state = display_status(today + Days::new(4), "active", today, threshold);
    assert_eq!(state, LoanDisplayStatus::Aktif(4));
    assert_eq!(state.label(), "Aktif");

    // One day late
    let state = display_status(today - Days::new(1), "active", today, threshold);
    assert_eq!(state, LoanDisplayStatus::Terlambat(1));
    assert_eq!(state.label(), "Terlambat");

    // Recorded overdue wins even when the date looks fine
    let state = display_status(today + Days::new(5), "overdue", today, threshold);
    assert_eq!(state.label(), "Terlambat");
}

#[tokio::test]
async fn test_list_active_borrowings_derives_display_state() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: None,
        },
    )
    .await
    .unwrap();

    let views = list_active_borrowings(&db, &cfg, BorrowingFilter::default())
        .await
        .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].member_name, "Ana Wijaya");
    assert_eq!(views[0].book_title, "Laskar Pelangi");
    // Fresh 7-day loan sits outside the 3-day warning window
    assert_eq!(views[0].days_until_due, cfg.loan_period_days);
    assert_eq!(views[0].display_status, "Aktif");

    // Filter by another member comes back empty
    let views = list_active_borrowings(
        &db,
        &cfg,
        BorrowingFilter {
            member_id: Some(member_id + 1),
        },
    )
    .await
    .unwrap();
    assert!(views.is_empty());
}

#[tokio::test]
async fn test_overdue_sweep_flags_and_fines() {
    let db = setup_test_db().await;
    let cfg = CirculationConfig::default();
    let member_id = create_test_member(&db, "Ana Wijaya", "ana@sekolah.sch.id", "S-001").await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    // Borrowed 10 days ago with a 7-day period: due 3 days ago
    let backdated = (today() - Days::new(10)).format("%Y-%m-%d").to_string();
    let borrowing = borrow_book(
        &db,
        &cfg,
        BorrowRequest {
            member_id,
            book_id,
            borrow_date: Some(backdated),
        },
    )
    .await
    .unwrap();

    let outcome = mark_overdue(&db, &cfg).await.expect("sweep failed");
    assert_eq!(outcome.checked, 1);
    assert_eq!(outcome.flagged, 1);

    let flagged = active_borrowing::Entity::find_by_id(borrowing.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flagged.status, "overdue");
    assert_eq!(flagged.fine_amount, 3.0 * cfg.fine_per_day);

    let record = borrow_record::Entity::find()
        .filter(borrow_record::Column::BookId.eq(book_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, "overdue");

    // One warning notification was raised
    let warnings = notification::Entity::find()
        .filter(notification::Column::Type.eq("warning"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(warnings.len(), 1);

    // A second sweep refreshes the fine but raises nothing new
    let outcome = mark_overdue(&db, &cfg).await.unwrap();
    assert_eq!(outcome.flagged, 0);
    let warnings = notification::Entity::find()
        .filter(notification::Column::Type.eq("warning"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(warnings.len(), 1);

    // An overdue loan can still be returned normally
    let record = return_borrowing(&db, borrowing.id).await.unwrap();
    assert_eq!(record.status, "returned");
}
