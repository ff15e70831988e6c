use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use dispatch_core::models::{
    booking::{Booking, BookingStatus, ClientSnapshot},
    chat::PairKey,
    notification::NotificationKind,
    user::{DirectoryUser, Role},
};

#[rstest]
#[case(BookingStatus::Pending, "pending")]
#[case(BookingStatus::PendingAcceptance, "pending_acceptance")]
#[case(BookingStatus::Accepted, "accepted")]
#[case(BookingStatus::Completed, "completed")]
fn test_booking_status_tags(#[case] status: BookingStatus, #[case] tag: &str) {
    assert_eq!(serde_json::to_value(status).unwrap(), json!(tag));
    assert_eq!(status.to_string(), tag);
}

#[rstest]
#[case(NotificationKind::BookingAssigned, "booking_assigned")]
#[case(NotificationKind::BookingAccepted, "booking_accepted")]
#[case(NotificationKind::BookingCompleted, "booking_completed")]
#[case(NotificationKind::BookingReminder, "booking_reminder")]
fn test_notification_kind_tags(#[case] kind: NotificationKind, #[case] tag: &str) {
    assert_eq!(serde_json::to_value(kind).unwrap(), json!(tag));
}

#[rstest]
#[case(Role::Client, "client")]
#[case(Role::Staff, "staff")]
#[case(Role::Admin, "admin")]
fn test_role_tags(#[case] role: Role, #[case] tag: &str) {
    assert_eq!(serde_json::to_value(role).unwrap(), json!(tag));
    assert_eq!(role.to_string(), tag);
}

#[test]
fn test_pair_key_ignores_ordering() {
    let forward = PairKey::new("ana@example.com", "ben@example.com");
    let backward = PairKey::new("ben@example.com", "ana@example.com");

    assert_eq!(forward, backward);
    assert_eq!(forward.first(), "ana@example.com");
    assert_eq!(forward.second(), "ben@example.com");
}

#[test]
fn test_pair_key_membership() {
    let key = PairKey::new("ana@example.com", "ben@example.com");

    assert!(key.contains("ana@example.com"));
    assert!(key.contains("ben@example.com"));
    assert!(!key.contains("casey@example.com"));

    assert_eq!(key.other("ana@example.com"), Some("ben@example.com"));
    assert_eq!(key.other("ben@example.com"), Some("ana@example.com"));
    assert_eq!(key.other("casey@example.com"), None);
}

#[test]
fn test_directory_user_display_name_falls_back_to_email() {
    let full = DirectoryUser {
        email: "sam@example.com".to_string(),
        first_name: Some("Sam".to_string()),
        last_name: Some("Rivera".to_string()),
        phone: None,
        location: None,
    };
    let bare = DirectoryUser {
        email: "admin@example.com".to_string(),
        first_name: None,
        last_name: None,
        phone: None,
        location: None,
    };

    assert_eq!(full.display_name(), "Sam Rivera");
    assert_eq!(bare.display_name(), "admin@example.com");
}

#[test]
fn test_directory_user_accepts_city_alias() {
    let user: DirectoryUser =
        serde_json::from_str(r#"{"email":"carla@example.com","city":"Springfield"}"#)
            .expect("Failed to deserialize directory user");

    assert_eq!(user.location.as_deref(), Some("Springfield"));
}

#[test]
fn test_booking_serialization() {
    let booking = Booking {
        id: Uuid::new_v4(),
        client: ClientSnapshot {
            first_name: "Carla".to_string(),
            last_name: "Nguyen".to_string(),
            email: "carla@example.com".to_string(),
            phone: Some("555-0101".to_string()),
            city: Some("Springfield".to_string()),
        },
        service: "deep-clean".to_string(),
        frequency: "weekly".to_string(),
        service_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        status: BookingStatus::Pending,
        assigned_to: None,
        hours_worked: None,
        created_at: Utc::now(),
        updated_at: None,
        completed_at: None,
    };

    let json = serde_json::to_string(&booking).expect("Failed to serialize booking");
    let deserialized: Booking = serde_json::from_str(&json).expect("Failed to deserialize booking");

    assert_eq!(deserialized.id, booking.id);
    assert_eq!(deserialized.client.full_name(), "Carla Nguyen");
    assert_eq!(deserialized.service_date, booking.service_date);
    assert_eq!(deserialized.status, booking.status);
    assert_eq!(deserialized.assigned_to, None);
}
