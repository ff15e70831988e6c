use tracing::debug;

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::chat::{ChatMessage, ChatParticipant, Conversation};
use dispatch_core::models::user::{Actor, DirectoryUser, Role};
use dispatch_db::repositories::chats;

use crate::Engine;

/// Looks an email up across the directories; admins win ties, then staff,
/// then clients.
async fn resolve_user(
    engine: &Engine,
    email: &str,
) -> DispatchResult<Option<(DirectoryUser, Role)>> {
    if let Some(user) = engine.admins.find(email).await? {
        return Ok(Some((user, Role::Admin)));
    }
    if let Some(user) = engine.staff.find(email).await? {
        return Ok(Some((user, Role::Staff)));
    }
    if let Some(user) = engine.clients.find(email).await? {
        return Ok(Some((user, Role::Client)));
    }
    Ok(None)
}

/// Resolves a directory user for starting a conversation.
pub async fn search_user(engine: &Engine, email: &str) -> DispatchResult<ChatParticipant> {
    let (user, role) = resolve_user(engine, email)
        .await?
        .ok_or_else(|| DispatchError::NotFound(format!("User {email} not found")))?;
    Ok(ChatParticipant {
        name: user.display_name(),
        email: user.email,
        role,
    })
}

pub async fn send_message(
    engine: &Engine,
    actor: &Actor,
    recipient: &str,
    body: &str,
) -> DispatchResult<ChatMessage> {
    if recipient.trim().is_empty() {
        return Err(DispatchError::Validation(
            "Recipient is required".to_string(),
        ));
    }
    if body.trim().is_empty() {
        return Err(DispatchError::Validation("Message is required".to_string()));
    }
    chats::append_message(&engine.store, &actor.email, recipient, body).await
}

/// The full shared log with `other`, oldest first. Reading it marks every
/// message addressed to the actor as read: opening a conversation is the
/// acknowledgement.
pub async fn list_messages(
    engine: &Engine,
    actor: &Actor,
    other: &str,
) -> DispatchResult<Vec<ChatMessage>> {
    chats::read_messages(&engine.store, &actor.email, other).await
}

/// Every conversation the actor participates in, most recently active first.
pub async fn list_conversations(engine: &Engine, actor: &Actor) -> DispatchResult<Vec<Conversation>> {
    let logs = chats::logs_for(&engine.store, &actor.email).await?;
    let mut conversations = Vec::with_capacity(logs.len());

    for (key, messages) in logs {
        let Some(last) = messages.last() else {
            continue;
        };
        let Some(other) = key.other(&actor.email) else {
            continue;
        };
        let unread = messages
            .iter()
            .filter(|m| m.to == actor.email && !m.read)
            .count();
        let (name, role) = match resolve_user(engine, other).await? {
            Some((user, role)) => (user.display_name(), Some(role)),
            None => (other.to_string(), None),
        };
        conversations.push(Conversation {
            email: other.to_string(),
            name,
            role,
            last_message: last.body.clone(),
            last_activity: last.sent_at,
            unread,
        });
    }

    conversations.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    debug!(user = %actor.email, count = conversations.len(), "conversations listed");
    Ok(conversations)
}

/// Unread messages addressed to the actor, summed across all their logs.
pub async fn unread_count(engine: &Engine, actor: &Actor) -> DispatchResult<usize> {
    chats::unread_count_for(&engine.store, &actor.email).await
}
