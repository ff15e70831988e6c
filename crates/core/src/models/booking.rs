use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    PendingAcceptance,
    Accepted,
    Completed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::PendingAcceptance => "pending_acceptance",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Client details captured when the booking is created. This is a historical
/// snapshot, not a live reference: later edits to the client record must not
/// change past bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl ClientSnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client: ClientSnapshot,
    pub service: String,
    pub frequency: String,
    pub service_date: NaiveDate,
    pub status: BookingStatus,
    pub assigned_to: Option<String>,
    pub hours_worked: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub client: ClientSnapshot,
    pub service: String,
    pub frequency: String,
    pub service_date: NaiveDate,
}

/// Admin field patch. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingPatch {
    pub client: Option<ClientSnapshot>,
    pub service: Option<String>,
    pub frequency: Option<String>,
    pub service_date: Option<NaiveDate>,
}
