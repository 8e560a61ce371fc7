//! Slot allocation rules.
//!
//! Every restaurant offers the same fixed catalog of half-hour slots. A slot is
//! occupied for a (restaurant, date) as long as a pending or confirmed booking
//! holds its label; cancelled and completed bookings never block it.

use crate::{backend::BookingBackend, error::BookingResult, types::Availability};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Bookable slots in canonical order, 12:00 PM through 10:00 PM.
pub const TIME_SLOTS: [&str; 21] = [
    "12:00 PM", "12:30 PM", "01:00 PM", "01:30 PM", "02:00 PM", "02:30 PM", "03:00 PM",
    "03:30 PM", "04:00 PM", "04:30 PM", "05:00 PM", "05:30 PM", "06:00 PM", "06:30 PM",
    "07:00 PM", "07:30 PM", "08:00 PM", "08:30 PM", "09:00 PM", "09:30 PM", "10:00 PM",
];

pub fn is_slot_taken<T: BookingBackend>(
    backend: &T,
    restaurant_name: &str,
    date: NaiveDate,
    time: &str,
) -> BookingResult<bool> {
    Ok(backend
        .find_active_booking(restaurant_name, date, time)?
        .is_some())
}

pub fn compute_availability<T: BookingBackend>(
    backend: &T,
    restaurant_name: &str,
    date: NaiveDate,
) -> BookingResult<Availability> {
    let taken: HashSet<String> = backend
        .active_bookings(restaurant_name, date)?
        .into_iter()
        .map(|booking| booking.time)
        .collect();

    let (booked_slots, available_slots): (Vec<String>, Vec<String>) = TIME_SLOTS
        .iter()
        .map(|slot| slot.to_string())
        .partition(|slot| taken.contains(slot));

    Ok(Availability {
        available_slots,
        booked_slots,
    })
}
