use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use dispatch_core::errors::DispatchResult;
use dispatch_core::models::booking::{Booking, BookingStatus};
use dispatch_db::repositories::{bookings, notifications};

use crate::Engine;

/// A reminder fires when the service start (the service date read as midnight
/// UTC) is between 23 and 24 hours away, inclusive. The window is only as
/// wide as the sweep interval, so a missed tick skips the reminder rather
/// than sending it late.
fn in_reminder_window(booking: &Booking, now: DateTime<Utc>) -> bool {
    let service_start = booking.service_date.and_time(NaiveTime::MIN).and_utc();
    service_start >= now + chrono::Duration::hours(23)
        && service_start <= now + chrono::Duration::hours(24)
}

fn reminder_message(booking: &Booking) -> String {
    let date = booking.service_date.format("%A, %B %-d, %Y");
    match &booking.assigned_to {
        Some(staff) => format!(
            "Reminder: Your service is scheduled for tomorrow, {date}. {staff} will be taking care of it."
        ),
        None => format!("Reminder: Your service is scheduled for tomorrow, {date}."),
    }
}

/// One reminder pass over all bookings: for every accepted booking whose
/// service is a day away, emit a single reminder to the client, provided the
/// client holds an account and no reminder for that booking and client exists
/// yet. Idempotency rests entirely on scanning prior notifications; there is
/// no sent-flag on the booking. Returns how many reminders went out.
pub async fn run_reminder_sweep(engine: &Engine, now: DateTime<Utc>) -> DispatchResult<usize> {
    let all = bookings::all_bookings(&engine.store).await?;
    let mut sent = 0;

    for booking in all {
        if booking.status != BookingStatus::Accepted || !in_reminder_window(&booking, now) {
            continue;
        }
        if !engine.clients.exists(&booking.client.email).await? {
            continue;
        }
        let created = notifications::create_reminder_if_absent(
            &engine.store,
            booking.id,
            &booking.client.email,
            &reminder_message(&booking),
        )
        .await?;
        if created.is_some() {
            info!(id = %booking.id, client = %booking.client.email, "reminder sent");
            sent += 1;
        }
    }

    Ok(sent)
}

/// Spawns the periodic reminder task: one sweep immediately, then one per
/// `every`. A failed sweep is logged and simply retried on the next tick.
pub fn spawn_reminder_scheduler(engine: Arc<Engine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match run_reminder_sweep(&engine, Utc::now()).await {
                Ok(sent) if sent > 0 => info!(sent, "reminder sweep finished"),
                Ok(_) => {}
                Err(err) => error!(error = %err, "reminder sweep failed"),
            }
        }
    })
}
