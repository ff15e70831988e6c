use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    pub to: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

/// Unordered pair of chat participants. Both orderings of the same two
/// addresses produce the same key, so one log serves both directions of a
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                first: a.to_string(),
                second: b.to_string(),
            }
        } else {
            Self {
                first: b.to_string(),
                second: a.to_string(),
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, email: &str) -> bool {
        self.first == email || self.second == email
    }

    /// The participant that is not `email`, or `None` when `email` is not
    /// part of the pair.
    pub fn other(&self, email: &str) -> Option<&str> {
        if self.first == email {
            Some(&self.second)
        } else if self.second == email {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// One entry of a user's conversation listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub email: String,
    pub name: String,
    pub role: Option<Role>,
    pub last_message: String,
    pub last_activity: DateTime<Utc>,
    pub unread: usize,
}

/// A directory user resolved for starting a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParticipant {
    pub email: String,
    pub name: String,
    pub role: Role,
}
