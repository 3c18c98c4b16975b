use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use siperpus::db;
use siperpus::models::notification;
use siperpus::services::notifications::{
    create_notification, list_notifications, mark_all_read, mark_read,
};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let db = setup_test_db().await;
    let created = create_notification(
        &db,
        "Buku jatuh tempo".to_string(),
        "Laskar Pelangi jatuh tempo besok".to_string(),
        "info".to_string(),
    )
    .await
    .unwrap();
    assert!(!created.is_read);

    let first = mark_read(&db, created.id).await.unwrap();
    assert!(first.is_read);

    // Marking again is a no-op, still observable as read
    let second = mark_read(&db, created.id).await.unwrap();
    assert!(second.is_read);
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_mark_all_read_only_touches_snapshot() {
    let db = setup_test_db().await;
    for i in 0..3 {
        create_notification(
            &db,
            format!("Pemberitahuan {}", i),
            "isi".to_string(),
            "info".to_string(),
        )
        .await
        .unwrap();
    }

    let marked = mark_all_read(&db).await.unwrap();
    assert_eq!(marked, 3);

    // A notification created afterwards keeps its unread flag
    let late = create_notification(
        &db,
        "Datang terlambat".to_string(),
        "isi".to_string(),
        "warning".to_string(),
    )
    .await
    .unwrap();

    let unread = notification::Entity::find()
        .filter(notification::Column::IsRead.eq(false))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, late.id);
}

#[tokio::test]
async fn test_unknown_kind_is_rejected() {
    let db = setup_test_db().await;
    let result = create_notification(
        &db,
        "Judul".to_string(),
        "isi".to_string(),
        "shout".to_string(),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_filters_unread() {
    let db = setup_test_db().await;
    let first = create_notification(&db, "A".to_string(), "a".to_string(), "info".to_string())
        .await
        .unwrap();
    create_notification(&db, "B".to_string(), "b".to_string(), "success".to_string())
        .await
        .unwrap();

    mark_read(&db, first.id).await.unwrap();

    let all = list_notifications(&db, false).await.unwrap();
    assert_eq!(all.len(), 2);

    let unread = list_notifications(&db, true).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].title, "B");
}
