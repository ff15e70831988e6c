use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::booking::{Booking, BookingStatus, ClientSnapshot};

use crate::store::Store;

pub const COLLECTION: &str = "bookings";

pub async fn create_booking(
    store: &Store,
    client: ClientSnapshot,
    service: String,
    frequency: String,
    service_date: NaiveDate,
) -> DispatchResult<Booking> {
    let booking = Booking {
        id: Uuid::new_v4(),
        client,
        service,
        frequency,
        service_date,
        status: BookingStatus::Pending,
        assigned_to: None,
        hours_worked: None,
        created_at: Utc::now(),
        updated_at: None,
        completed_at: None,
    };

    debug!(id = %booking.id, "creating booking");
    store.append(COLLECTION, booking.clone()).await?;
    Ok(booking)
}

pub async fn all_bookings(store: &Store) -> DispatchResult<Vec<Booking>> {
    store.load(COLLECTION).await
}

pub async fn get_booking_by_id(store: &Store, id: Uuid) -> DispatchResult<Option<Booking>> {
    store.find_one(COLLECTION, |b: &Booking| b.id == id).await
}

/// Applies `f` to the booking inside the collection's critical section and
/// refreshes `updated_at`. When `f` fails, neither the record nor the file is
/// touched.
pub async fn mutate_booking<F>(store: &Store, id: Uuid, f: F) -> DispatchResult<Booking>
where
    F: FnOnce(&mut Booking) -> DispatchResult<()>,
{
    store
        .mutate(COLLECTION, |bookings: &mut Vec<Booking>| {
            let booking = bookings
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| DispatchError::NotFound(format!("Booking {id} not found")))?;
            f(booking)?;
            booking.updated_at = Some(Utc::now());
            Ok(booking.clone())
        })
        .await
}

pub async fn delete_booking(store: &Store, id: Uuid) -> DispatchResult<bool> {
    let removed = store.remove_where(COLLECTION, |b: &Booking| b.id == id).await?;
    Ok(removed > 0)
}
