#![allow(dead_code)]

use chrono::NaiveDate;
use tempfile::TempDir;

use dispatch_core::models::booking::{Booking, BookingStatus, ClientSnapshot, CreateBookingRequest};
use dispatch_core::models::user::{Actor, Role};
use dispatch_engine::Engine;

pub const ADMIN: &str = "admin@dispatch.test";
pub const OPS: &str = "ops@dispatch.test";
pub const SAM: &str = "sam@staff.test";
pub const TONI: &str = "toni@staff.test";
pub const CARLA: &str = "carla@client.test";

pub struct TestContext {
    pub dir: TempDir,
    pub engine: Engine,
}

/// Builds an engine over a throwaway data directory seeded with one client
/// (Carla), two staff members (Sam, Toni) and two admins.
pub async fn setup() -> TestContext {
    let dir = TempDir::new().expect("Failed to create temp dir");

    std::fs::write(
        dir.path().join("clients.txt"),
        concat!(
            r#"{"email":"carla@client.test","first_name":"Carla","last_name":"Nguyen","phone":"555-0101","location":"Springfield"}"#,
            "\n",
        ),
    )
    .expect("Failed to write clients file");

    std::fs::write(
        dir.path().join("staff.txt"),
        concat!(
            r#"{"email":"sam@staff.test","first_name":"Sam","last_name":"Rivera","phone":"555-0102","location":"North"}"#,
            "\n",
            r#"{"email":"toni@staff.test","first_name":"Toni","last_name":"Okafor","phone":"555-0103","location":"South"}"#,
            "\n",
        ),
    )
    .expect("Failed to write staff file");

    std::fs::write(
        dir.path().join("admin.txt"),
        concat!(
            r#"{"email":"admin@dispatch.test","first_name":"Avery","last_name":"Admin"}"#,
            "\n",
            "ops@dispatch.test|legacy\n",
        ),
    )
    .expect("Failed to write admin file");

    let engine = Engine::open(dir.path()).await.expect("Failed to open engine");
    TestContext { dir, engine }
}

pub fn admin() -> Actor {
    Actor::new(ADMIN, Role::Admin)
}

pub fn ops() -> Actor {
    Actor::new(OPS, Role::Admin)
}

pub fn sam() -> Actor {
    Actor::new(SAM, Role::Staff)
}

pub fn toni() -> Actor {
    Actor::new(TONI, Role::Staff)
}

pub fn carla() -> Actor {
    Actor::new(CARLA, Role::Client)
}

pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

pub fn booking_request(client_email: &str, date: NaiveDate) -> CreateBookingRequest {
    CreateBookingRequest {
        client: ClientSnapshot {
            first_name: "Pat".to_string(),
            last_name: "Lee".to_string(),
            email: client_email.to_string(),
            phone: None,
            city: None,
        },
        service: "deep-clean".to_string(),
        frequency: "weekly".to_string(),
        service_date: date,
    }
}

/// Assignment and completion flags must track the status after every
/// transition.
pub fn assert_assignment_invariant(booking: &Booking) {
    let should_be_assigned = matches!(
        booking.status,
        BookingStatus::PendingAcceptance | BookingStatus::Accepted | BookingStatus::Completed
    );
    assert_eq!(
        booking.assigned_to.is_some(),
        should_be_assigned,
        "assigned_to out of step with status {}",
        booking.status
    );
    assert_eq!(
        booking.hours_worked.is_some(),
        booking.status == BookingStatus::Completed,
        "hours_worked out of step with status {}",
        booking.status
    );
}
