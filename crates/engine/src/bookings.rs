use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use dispatch_core::errors::{DispatchError, DispatchResult};
use dispatch_core::models::booking::{
    Booking, BookingPatch, BookingStatus, ClientSnapshot, CreateBookingRequest,
};
use dispatch_core::models::notification::NotificationKind;
use dispatch_core::models::user::{Actor, Role};
use dispatch_db::repositories::{bookings, notifications};

use crate::{Engine, require_role};

fn service_date_label(booking: &Booking) -> String {
    booking.service_date.format("%b %-d, %Y").to_string()
}

async fn staff_display_name(engine: &Engine, email: &str) -> DispatchResult<String> {
    Ok(engine
        .staff
        .find(email)
        .await?
        .map(|user| user.display_name())
        .unwrap_or_else(|| email.to_string()))
}

fn ensure_assignee(booking: &Booking, actor: &Actor) -> DispatchResult<()> {
    if booking.assigned_to.as_deref() == Some(actor.email.as_str()) {
        Ok(())
    } else {
        Err(DispatchError::Unauthorized(
            "This booking is not assigned to you".to_string(),
        ))
    }
}

/// Creates a new booking in the `pending` state. When the client email is
/// already registered, the embedded snapshot is refreshed from the directory
/// record; it stays a snapshot either way and never tracks later edits.
pub async fn create_booking(
    engine: &Engine,
    actor: &Actor,
    request: CreateBookingRequest,
) -> DispatchResult<Booking> {
    require_role(actor, Role::Admin, "Creating a booking")?;

    if request.client.email.trim().is_empty() {
        return Err(DispatchError::Validation(
            "Client email is required".to_string(),
        ));
    }
    if request.service.trim().is_empty() {
        return Err(DispatchError::Validation("Service is required".to_string()));
    }
    if request.frequency.trim().is_empty() {
        return Err(DispatchError::Validation(
            "Frequency is required".to_string(),
        ));
    }

    let client = match engine.clients.find(&request.client.email).await? {
        Some(user) => ClientSnapshot {
            first_name: user.first_name.unwrap_or(request.client.first_name),
            last_name: user.last_name.unwrap_or(request.client.last_name),
            email: user.email,
            phone: user.phone.or(request.client.phone),
            city: user.location.or(request.client.city),
        },
        None => request.client,
    };

    let booking = bookings::create_booking(
        &engine.store,
        client,
        request.service,
        request.frequency,
        request.service_date,
    )
    .await?;

    info!(id = %booking.id, "booking created");
    Ok(booking)
}

/// Bookings visible to `actor`: admins see everything, staff the bookings
/// assigned to them, clients their own.
pub async fn list_bookings(engine: &Engine, actor: &Actor) -> DispatchResult<Vec<Booking>> {
    let mut all = bookings::all_bookings(&engine.store).await?;
    match actor.role {
        Role::Admin => {}
        Role::Staff => all.retain(|b| b.assigned_to.as_deref() == Some(actor.email.as_str())),
        Role::Client => all.retain(|b| b.client.email == actor.email),
    }
    Ok(all)
}

pub async fn get_booking(engine: &Engine, actor: &Actor, id: Uuid) -> DispatchResult<Booking> {
    let booking = bookings::get_booking_by_id(&engine.store, id)
        .await?
        .ok_or_else(|| DispatchError::NotFound(format!("Booking {id} not found")))?;

    let allowed = match actor.role {
        Role::Admin => true,
        Role::Staff => booking.assigned_to.as_deref() == Some(actor.email.as_str()),
        Role::Client => booking.client.email == actor.email,
    };
    if !allowed {
        return Err(DispatchError::Unauthorized(
            "This booking is not yours to view".to_string(),
        ));
    }

    Ok(booking)
}

/// Admin field patch. Only the provided fields are touched; `updated_at` is
/// refreshed either way.
pub async fn update_booking(
    engine: &Engine,
    actor: &Actor,
    id: Uuid,
    patch: BookingPatch,
) -> DispatchResult<Booking> {
    require_role(actor, Role::Admin, "Updating a booking")?;

    bookings::mutate_booking(&engine.store, id, |booking| {
        if let Some(client) = patch.client {
            booking.client = client;
        }
        if let Some(service) = patch.service {
            booking.service = service;
        }
        if let Some(frequency) = patch.frequency {
            booking.frequency = frequency;
        }
        if let Some(service_date) = patch.service_date {
            booking.service_date = service_date;
        }
        Ok(())
    })
    .await
}

/// Permanently removes the booking. There is no soft delete and no history
/// kept for removed bookings.
pub async fn delete_booking(engine: &Engine, actor: &Actor, id: Uuid) -> DispatchResult<()> {
    require_role(actor, Role::Admin, "Deleting a booking")?;

    if !bookings::delete_booking(&engine.store, id).await? {
        return Err(DispatchError::NotFound(format!("Booking {id} not found")));
    }
    info!(%id, "booking deleted");
    Ok(())
}

/// Assigns a `pending` booking to a staff member and asks them to respond.
/// A booking that already has an assignee must be declined (or patched) back
/// to `pending` before it can be assigned again.
pub async fn assign_booking(
    engine: &Engine,
    actor: &Actor,
    id: Uuid,
    staff_email: &str,
) -> DispatchResult<Booking> {
    require_role(actor, Role::Admin, "Assigning a booking")?;

    if !engine.staff.exists(staff_email).await? {
        return Err(DispatchError::NotFound(format!(
            "Staff member {staff_email} not found"
        )));
    }

    let booking = bookings::mutate_booking(&engine.store, id, |booking| {
        if booking.status != BookingStatus::Pending {
            return Err(DispatchError::InvalidTransition(format!(
                "Booking is {} and cannot be assigned",
                booking.status
            )));
        }
        booking.status = BookingStatus::PendingAcceptance;
        booking.assigned_to = Some(staff_email.to_string());
        Ok(())
    })
    .await?;

    notifications::create_notification(
        &engine.store,
        staff_email,
        &format!(
            "You have been assigned a new booking for {} on {}. Please accept or decline.",
            booking.client.full_name(),
            service_date_label(&booking)
        ),
        NotificationKind::BookingAssigned,
        Some(booking.id),
    )
    .await?;

    info!(id = %booking.id, staff = staff_email, "booking assigned");
    Ok(booking)
}

/// Staff acceptance: confirms the booking and notifies the client (when they
/// hold an account) and every admin.
pub async fn accept_booking(engine: &Engine, actor: &Actor, id: Uuid) -> DispatchResult<Booking> {
    require_role(actor, Role::Staff, "Accepting a booking")?;

    let booking = bookings::mutate_booking(&engine.store, id, |booking| {
        ensure_assignee(booking, actor)?;
        if booking.status == BookingStatus::Completed {
            return Err(DispatchError::InvalidTransition(
                "Booking is completed and can no longer be accepted".to_string(),
            ));
        }
        booking.status = BookingStatus::Accepted;
        Ok(())
    })
    .await?;

    let staff_name = staff_display_name(engine, &actor.email).await?;
    let date = service_date_label(&booking);

    if engine.clients.exists(&booking.client.email).await? {
        notifications::create_notification(
            &engine.store,
            &booking.client.email,
            &format!(
                "{staff_name} has accepted your booking for {date}. Your service is confirmed!"
            ),
            NotificationKind::BookingAccepted,
            Some(booking.id),
        )
        .await?;
    }

    for admin in engine.admins.all().await? {
        notifications::create_notification(
            &engine.store,
            &admin.email,
            &format!(
                "{staff_name} has accepted the booking for {} on {date}.",
                booking.client.full_name()
            ),
            NotificationKind::BookingAccepted,
            Some(booking.id),
        )
        .await?;
    }

    info!(id = %booking.id, staff = %actor.email, "booking accepted");
    Ok(booking)
}

/// Staff decline: the booking returns to `pending` with no assignee, ready
/// to be assigned again.
pub async fn decline_booking(engine: &Engine, actor: &Actor, id: Uuid) -> DispatchResult<Booking> {
    require_role(actor, Role::Staff, "Declining a booking")?;

    let booking = bookings::mutate_booking(&engine.store, id, |booking| {
        ensure_assignee(booking, actor)?;
        if booking.status == BookingStatus::Completed {
            return Err(DispatchError::InvalidTransition(
                "Booking is completed and can no longer be declined".to_string(),
            ));
        }
        booking.status = BookingStatus::Pending;
        booking.assigned_to = None;
        Ok(())
    })
    .await?;

    info!(id = %booking.id, staff = %actor.email, "booking declined");
    Ok(booking)
}

/// Marks an accepted booking as completed, records the hours worked and
/// notifies every admin.
pub async fn complete_booking(
    engine: &Engine,
    actor: &Actor,
    id: Uuid,
    hours_worked: f64,
) -> DispatchResult<Booking> {
    require_role(actor, Role::Staff, "Completing a booking")?;

    if hours_worked <= 0.0 {
        return Err(DispatchError::Validation(
            "Hours worked must be greater than zero".to_string(),
        ));
    }

    let booking = bookings::mutate_booking(&engine.store, id, |booking| {
        ensure_assignee(booking, actor)?;
        if booking.status != BookingStatus::Accepted {
            return Err(DispatchError::InvalidTransition(format!(
                "Booking is {} and must be accepted before it can be completed",
                booking.status
            )));
        }
        booking.status = BookingStatus::Completed;
        booking.hours_worked = Some(hours_worked);
        booking.completed_at = Some(Utc::now());
        Ok(())
    })
    .await?;

    let staff_name = staff_display_name(engine, &actor.email).await?;
    let date = service_date_label(&booking);

    for admin in engine.admins.all().await? {
        notifications::create_notification(
            &engine.store,
            &admin.email,
            &format!(
                "{staff_name} has completed the service for {} on {date}. ({hours_worked} hours worked)",
                booking.client.full_name()
            ),
            NotificationKind::BookingCompleted,
            Some(booking.id),
        )
        .await?;
    }

    info!(id = %booking.id, staff = %actor.email, hours = hours_worked, "booking completed");
    Ok(booking)
}
