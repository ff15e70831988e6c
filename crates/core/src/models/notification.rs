use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingAssigned,
    BookingAccepted,
    BookingCompleted,
    BookingReminder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: String,
    pub message: String,
    pub kind: NotificationKind,
    pub booking_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
