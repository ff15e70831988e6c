use uuid::Uuid;

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::notification::Notification;
use dispatch_core::models::user::Actor;
use dispatch_db::repositories::notifications;

use crate::Engine;

/// The actor's notifications, newest first.
pub async fn list_notifications(engine: &Engine, actor: &Actor) -> DispatchResult<Vec<Notification>> {
    notifications::notifications_for(&engine.store, &actor.email).await
}

pub async fn unread_count(engine: &Engine, actor: &Actor) -> DispatchResult<usize> {
    notifications::unread_count_for(&engine.store, &actor.email).await
}

/// Marks one of the actor's notifications as read. A notification that does
/// not exist and one that belongs to someone else are indistinguishable:
/// both are `NotFound`.
pub async fn mark_read(engine: &Engine, actor: &Actor, id: Uuid) -> DispatchResult<()> {
    if notifications::mark_read(&engine.store, id, &actor.email).await? {
        Ok(())
    } else {
        Err(DispatchError::NotFound(
            "Notification not found".to_string(),
        ))
    }
}

/// Marks every unread notification of the actor as read, returning how many
/// were flipped.
pub async fn mark_all_read(engine: &Engine, actor: &Actor) -> DispatchResult<usize> {
    notifications::mark_all_read(&engine.store, &actor.email).await
}
