use chrono::Utc;
use tracing::{debug, warn};

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::chat::{ChatMessage, PairKey};

use crate::store::{CHATS_DIR, Store};

fn log_collection(key: &PairKey) -> String {
    format!("{CHATS_DIR}/{}__{}", key.first(), key.second())
}

/// Chat history is the one place where dropping unreadable data beats
/// failing the operation, so a corrupt log reads as empty.
fn tolerate_corrupt(result: DispatchResult<Vec<ChatMessage>>) -> DispatchResult<Vec<ChatMessage>> {
    match result {
        Err(DispatchError::CorruptCollection { collection, .. }) => {
            warn!(collection = %collection, "chat log is corrupt, reading as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Appends one unread message to the pair's shared log.
pub async fn append_message(
    store: &Store,
    from: &str,
    to: &str,
    body: &str,
) -> DispatchResult<ChatMessage> {
    let key = PairKey::new(from, to);
    let message = ChatMessage {
        from: from.to_string(),
        to: to.to_string(),
        body: body.to_string(),
        sent_at: Utc::now(),
        read: false,
    };
    debug!(log = %log_collection(&key), "appending chat message");
    store.append(&log_collection(&key), message.clone()).await?;
    Ok(message)
}

pub async fn messages(store: &Store, key: &PairKey) -> DispatchResult<Vec<ChatMessage>> {
    tolerate_corrupt(store.load(&log_collection(key)).await)
}

/// Returns the pair's log in send order and, in the same critical section,
/// marks every message addressed to `reader` as read. The returned messages
/// carry the flags the reader was shown, from before the marking.
pub async fn read_messages(
    store: &Store,
    reader: &str,
    other: &str,
) -> DispatchResult<Vec<ChatMessage>> {
    let key = PairKey::new(reader, other);
    let existing = messages(store, &key).await?;
    if existing.is_empty() {
        return Ok(existing);
    }
    let result = store
        .mutate(&log_collection(&key), |messages: &mut Vec<ChatMessage>| {
            let shown = messages.clone();
            for message in messages.iter_mut() {
                if message.to == reader {
                    message.read = true;
                }
            }
            Ok(shown)
        })
        .await;
    tolerate_corrupt(result)
}

/// Every chat log on disk, keyed by its participant pair. Empty logs are
/// skipped; the pair is derived from the messages themselves rather than the
/// file name.
pub async fn all_logs(store: &Store) -> DispatchResult<Vec<(PairKey, Vec<ChatMessage>)>> {
    let mut logs = Vec::new();
    for collection in store.collections_in(CHATS_DIR).await? {
        let messages = tolerate_corrupt(store.load(&collection).await)?;
        let Some(first) = messages.first() else {
            continue;
        };
        let key = PairKey::new(&first.from, &first.to);
        logs.push((key, messages));
    }
    Ok(logs)
}

/// The logs `user` participates in.
pub async fn logs_for(store: &Store, user: &str) -> DispatchResult<Vec<(PairKey, Vec<ChatMessage>)>> {
    let mut logs = all_logs(store).await?;
    logs.retain(|(key, _)| key.contains(user));
    Ok(logs)
}

/// Unread messages addressed to `user`, summed across all their logs.
pub async fn unread_count_for(store: &Store, user: &str) -> DispatchResult<usize> {
    let logs = logs_for(store, user).await?;
    Ok(logs
        .iter()
        .flat_map(|(_, messages)| messages)
        .filter(|m| m.to == user && !m.read)
        .count())
}
