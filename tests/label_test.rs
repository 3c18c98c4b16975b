use sea_orm::{DatabaseConnection, EntityTrait, Set};

use siperpus::db;
use siperpus::models::{book, book_label};
use siperpus::services::labels::{
    derive_barcode, fix_incompatible_barcodes, generate_label, is_valid_barcode, print_label,
    print_labels, LabelSettings,
};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
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

#[test]
fn test_barcode_validation_rules() {
    assert!(is_valid_barcode("LIB-000123"));
    assert!(is_valid_barcode("9789793062792"));
    assert!(!is_valid_barcode("abc"));          // lowercase
    assert!(!is_valid_barcode("AB"));           // too short
    assert!(!is_valid_barcode("LIB 000123"));   // space
    assert!(!is_valid_barcode(&"X".repeat(25))); // too long
}

#[test]
fn test_derive_barcode_salvages_or_falls_back() {
    // Salvageable: case-folded and stripped of illegal characters
    assert_eq!(derive_barcode(7, "lib 000123"), "LIB000123");

    // Nothing left to salvage: fall back to the id-based code
    assert_eq!(derive_barcode(7, "!!"), "LIB-000007");
}

#[tokio::test]
async fn test_generate_label_is_idempotent() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;

    let first = generate_label(&db, book_id, LabelSettings::default())
        .await
        .expect("generate failed");
    let second = generate_label(&db, book_id, LabelSettings::default())
        .await
        .expect("regenerate failed");

    assert_eq!(first.id, second.id);
    assert_eq!(first.barcode, second.barcode);

    // Exactly one label row for the book
    let labels = book_label::Entity::find().all(&db).await.unwrap();
    assert_eq!(labels.len(), 1);
}

#[tokio::test]
async fn test_generate_label_repairs_bad_book_barcode() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Buku Tanpa Kode", "??").await;

    let label = generate_label(&db, book_id, LabelSettings::default())
        .await
        .unwrap();
    assert!(is_valid_barcode(&label.barcode));
}

#[tokio::test]
async fn test_print_increments_count() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Laskar Pelangi", "LIB-000001").await;
    let label = generate_label(&db, book_id, LabelSettings::default())
        .await
        .unwrap();
    assert_eq!(label.print_count, 0);
    assert!(label.last_printed_at.is_none());

    let printed = print_label(&db, label.id).await.unwrap();
    assert_eq!(printed.print_count, 1);
    assert!(printed.last_printed_at.is_some());

    let printed = print_label(&db, label.id).await.unwrap();
    assert_eq!(printed.print_count, 2);
}

#[tokio::test]
async fn test_print_batch_is_best_effort() {
    let db = setup_test_db().await;
    let first_book = create_test_book(&db, "Buku Satu", "LIB-000001").await;
    let second_book = create_test_book(&db, "Buku Dua", "LIB-000002").await;
    let first = generate_label(&db, first_book, LabelSettings::default())
        .await
        .unwrap();
    let second = generate_label(&db, second_book, LabelSettings::default())
        .await
        .unwrap();

    let outcome = print_labels(&db, &[first.id, 99999, second.id]).await;
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);

    let reloaded = book_label::Entity::find_by_id(first.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.print_count, 1);
}

#[tokio::test]
async fn test_repair_is_noop_on_valid_barcodes() {
    let db = setup_test_db().await;

    for i in 0..3 {
        let book_id =
            create_test_book(&db, &format!("Buku {}", i), &format!("LIB-00000{}", i)).await;
        generate_label(&db, book_id, LabelSettings::default())
            .await
            .unwrap();
    }

    let before: Vec<String> = book_label::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.barcode)
        .collect();

    let outcome = fix_incompatible_barcodes(&db).await.unwrap();
    assert_eq!(outcome.fixed, 0);
    assert_eq!(outcome.total, 3);

    let after: Vec<String> = book_label::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.barcode)
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_repair_fixes_only_invalid_barcodes() {
    let db = setup_test_db().await;
    let good_book = create_test_book(&db, "Buku Baik", "LIB-000001").await;
    let bad_book = create_test_book(&db, "Buku Rusak", "LIB-000002").await;

    let good = generate_label(&db, good_book, LabelSettings::default())
        .await
        .unwrap();
    let bad = generate_label(&db, bad_book, LabelSettings::default())
        .await
        .unwrap();

    // Corrupt one barcode behind the service's back
    let mut active: book_label::ActiveModel = bad.clone().into();
    active.barcode = Set("kode rusak!".to_string());
    use sea_orm::ActiveModelTrait;
    active.update(&db).await.unwrap();

    let outcome = fix_incompatible_barcodes(&db).await.unwrap();
    assert_eq!(outcome.fixed, 1);
    assert_eq!(outcome.total, 2);

    let repaired = book_label::Entity::find_by_id(bad.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(is_valid_barcode(&repaired.barcode));

    let untouched = book_label::Entity::find_by_id(good.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.barcode, good.barcode);
}
