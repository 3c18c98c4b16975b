//! Notification read-state. Read flags only ever move false -> true.

use sea_orm::*;

use crate::models::notification::{self, Entity as Notification};

use super::{now_timestamp, ServiceError};

const KINDS: [&str; 4] = ["info", "warning", "error", "success"];

pub async fn create_notification(
    db: &DatabaseConnection,
    title: String,
    message: String,
    kind: String,
) -> Result<notification::Model, ServiceError> {
    if !KINDS.contains(&kind.as_str()) {
        return Err(ServiceError::Validation(format!(
            "Unknown notification type '{}'",
            kind
        )));
    }

    let now = now_timestamp();
    let row = notification::ActiveModel {
        title: Set(title),
        message: Set(message),
        r#type: Set(kind),
        is_read: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(row)
}

/// List notifications, newest first
pub async fn list_notifications(
    db: &DatabaseConnection,
    unread_only: bool,
) -> Result<Vec<notification::Model>, ServiceError> {
    let mut query = Notification::find().order_by_desc(notification::Column::Id);

    if unread_only {
        query = query.filter(notification::Column::IsRead.eq(false));
    }

    Ok(query.all(db).await?)
}

/// Mark one notification read. Idempotent: an already-read notification is
/// returned unchanged.
pub async fn mark_read(
    db: &DatabaseConnection,
    id: i32,
) -> Result<notification::Model, ServiceError> {
    let row = Notification::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Notification not found".to_string()))?;

    if row.is_read {
        return Ok(row);
    }

    let mut active: notification::ActiveModel = row.into();
    active.is_read = Set(true);
    active.updated_at = Set(now_timestamp());

    Ok(active.update(db).await?)
}

/// Mark everything unread at call time. Notifications created while the
/// sweep runs keep their unread flag.
pub async fn mark_all_read(db: &DatabaseConnection) -> Result<usize, ServiceError> {
    let unread = Notification::find()
        .filter(notification::Column::IsRead.eq(false))
        .all(db)
        .await?;

    let mut marked = 0;
    for row in unread {
        let mut active: notification::ActiveModel = row.into();
        active.is_read = Set(true);
        active.updated_at = Set(now_timestamp());
        active.update(db).await?;
        marked += 1;
    }

    Ok(marked)
}
