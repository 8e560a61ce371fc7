//! Booking operations behind the HTTP handlers.
//!
//! `create_booking` checks the slot before inserting, but the check and the
//! insert are two separate store calls. Two requests for the same slot can both
//! pass the check; the store's own active-slot constraint then rejects the
//! later insert with `BookingError::Conflict`.

use crate::{
    backend::BookingBackend,
    error::{BookingError, BookingResult},
    slots::is_slot_taken,
    types::{Booking, BookingRequest, BookingStatus},
    validation::{
        normalize_booking_request, normalize_email, phone_digits, validate_booking_request,
    },
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

pub fn generate_booking_id() -> String {
    format!("BK-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

pub fn create_booking<T: BookingBackend>(
    backend: &T,
    mut request: BookingRequest,
) -> BookingResult<Booking> {
    normalize_booking_request(&mut request);
    validate_booking_request(&request)?;

    if is_slot_taken(backend, &request.restaurant.name, request.date, &request.time)? {
        warn!(
            restaurant = %request.restaurant.name,
            date = %request.date,
            time = %request.time,
            "Rejected booking for occupied slot"
        );
        return Err(BookingError::slot_taken());
    }

    let now = Utc::now();
    let booking = Booking {
        booking_id: request.booking_id.unwrap_or_else(generate_booking_id),
        restaurant: request.restaurant,
        date: request.date,
        time: request.time,
        party_size: request.party_size,
        customer_name: request.customer_name,
        customer_phone: phone_digits(&request.customer_phone),
        customer_email: request.customer_email,
        special_requests: request.special_requests,
        status: request.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let booking = backend.insert_booking(booking)?;
    info!(
        booking_id = %booking.booking_id,
        restaurant = %booking.restaurant.name,
        date = %booking.date,
        time = %booking.time,
        "Booking created"
    );
    Ok(booking)
}

pub fn customer_bookings<T: BookingBackend>(
    backend: &T,
    customer_email: &str,
) -> BookingResult<Vec<Booking>> {
    backend.customer_bookings(&normalize_email(customer_email))
}

/// Parses `status` and applies it. Unknown values fail with `InvalidStatus`
/// before the store is touched.
pub fn change_status<T: BookingBackend>(
    backend: &T,
    booking_id: &str,
    status: &str,
) -> BookingResult<Booking> {
    let status: BookingStatus = status
        .parse()
        .map_err(BookingError::InvalidStatus)?;
    let booking = backend.update_status(booking_id, status)?;
    info!(booking_id, %status, "Booking status updated");
    Ok(booking)
}

pub fn cancel_booking<T: BookingBackend>(backend: &T, booking_id: &str) -> BookingResult<Booking> {
    let booking = backend.update_status(booking_id, BookingStatus::Cancelled)?;
    info!(booking_id, "Booking cancelled");
    Ok(booking)
}
