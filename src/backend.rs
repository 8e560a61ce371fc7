use crate::error::BookingResult;
use crate::types::{Booking, BookingStatus, Person};
use chrono::NaiveDate;
use uuid::Uuid;

/// Storage for booking records.
///
/// Implementations must reject an insert or status change that would leave two
/// active bookings on the same (restaurant, date, time) with
/// `BookingError::Conflict`, so the check in `slots::is_slot_taken` is not the
/// only guard against double booking.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    fn find_active_booking(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<Option<Booking>>;
    fn active_bookings(&self, restaurant_name: &str, date: NaiveDate)
        -> BookingResult<Vec<Booking>>;
    /// Newest first.
    fn bookings(&self) -> BookingResult<Vec<Booking>>;
    /// Newest first.
    fn customer_bookings(&self, customer_email: &str) -> BookingResult<Vec<Booking>>;
    fn booking(&self, booking_id: &str) -> BookingResult<Booking>;
    fn insert_booking(&self, booking: Booking) -> BookingResult<Booking>;
    fn update_status(&self, booking_id: &str, status: BookingStatus) -> BookingResult<Booking>;
}

pub trait PeopleBackend: Clone + Send + Sync + 'static {
    fn insert_person(&self, person: Person) -> BookingResult<Person>;
    fn person_by_email(&self, email: &str) -> BookingResult<Option<Person>>;
    fn people(&self) -> BookingResult<Vec<Person>>;
    fn person(&self, id: Uuid) -> BookingResult<Person>;
    fn update_person(
        &self,
        id: Uuid,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> BookingResult<Person>;
    fn remove_person(&self, id: Uuid) -> BookingResult<Person>;
}

pub trait Backend: BookingBackend + PeopleBackend {}

impl<T: BookingBackend + PeopleBackend> Backend for T {}
