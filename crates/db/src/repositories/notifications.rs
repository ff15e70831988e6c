use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use dispatch_core::errors::DispatchResult;
use dispatch_core::models::notification::{Notification, NotificationKind};

use crate::store::Store;

pub const COLLECTION: &str = "notifications";

fn build(
    recipient: &str,
    message: &str,
    kind: NotificationKind,
    booking_id: Option<Uuid>,
) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        recipient: recipient.to_string(),
        message: message.to_string(),
        kind,
        booking_id,
        read: false,
        created_at: Utc::now(),
    }
}

pub async fn create_notification(
    store: &Store,
    recipient: &str,
    message: &str,
    kind: NotificationKind,
    booking_id: Option<Uuid>,
) -> DispatchResult<Notification> {
    let notification = build(recipient, message, kind, booking_id);
    debug!(recipient, kind = ?notification.kind, "creating notification");
    store.append(COLLECTION, notification.clone()).await?;
    Ok(notification)
}

/// All notifications for `recipient`, newest first.
pub async fn notifications_for(store: &Store, recipient: &str) -> DispatchResult<Vec<Notification>> {
    let mut notifications = store
        .find_all(COLLECTION, |n: &Notification| n.recipient == recipient)
        .await?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(notifications)
}

pub async fn unread_count_for(store: &Store, recipient: &str) -> DispatchResult<usize> {
    let unread = store
        .find_all(COLLECTION, |n: &Notification| {
            n.recipient == recipient && !n.read
        })
        .await?;
    Ok(unread.len())
}

/// Flips the read flag when the notification belongs to `recipient`. An
/// unknown id and someone else's notification both return false.
pub async fn mark_read(store: &Store, id: Uuid, recipient: &str) -> DispatchResult<bool> {
    let touched = store
        .update_where(
            COLLECTION,
            |n: &Notification| n.id == id && n.recipient == recipient,
            |n| n.read = true,
        )
        .await?;
    Ok(touched > 0)
}

pub async fn mark_all_read(store: &Store, recipient: &str) -> DispatchResult<usize> {
    store
        .update_where(
            COLLECTION,
            |n: &Notification| n.recipient == recipient && !n.read,
            |n| n.read = true,
        )
        .await
}

/// Emits a reminder unless one already exists for this booking and recipient.
/// The duplicate check and the append share the collection's critical
/// section, so two interleaved sweeps cannot both emit.
pub async fn create_reminder_if_absent(
    store: &Store,
    booking_id: Uuid,
    recipient: &str,
    message: &str,
) -> DispatchResult<Option<Notification>> {
    store
        .mutate(COLLECTION, |notifications: &mut Vec<Notification>| {
            let already_sent = notifications.iter().any(|n| {
                n.kind == NotificationKind::BookingReminder
                    && n.booking_id == Some(booking_id)
                    && n.recipient == recipient
            });
            if already_sent {
                return Ok(None);
            }
            let notification = build(
                recipient,
                message,
                NotificationKind::BookingReminder,
                Some(booking_id),
            );
            notifications.push(notification.clone());
            Ok(Some(notification))
        })
        .await
}
