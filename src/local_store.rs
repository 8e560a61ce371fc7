use crate::{
    backend::{BookingBackend, PeopleBackend},
    error::{BookingError, BookingResult},
    types::{Booking, BookingStatus, Person},
};
use chrono::{NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Records {
    /// Insertion order, oldest first.
    bookings: Vec<Booking>,
    people: HashMap<Uuid, Person>,
}

/// Impersistent store used when no database is configured.
///
/// Every operation runs under one mutex, so the active-slot check and the
/// write that depends on it cannot interleave with another request.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    records: Arc<Mutex<Records>>,
}

impl LocalStore {
    fn records(&self) -> BookingResult<MutexGuard<'_, Records>> {
        self.records.lock().map_err(|err| {
            error!(%err, "Local store lock poisoned");
            BookingError::StoreUnavailable("local store lock poisoned".into())
        })
    }
}

impl Records {
    fn occupant(&self, restaurant_name: &str, date: NaiveDate, time: &str) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|booking| booking.occupies(restaurant_name, date, time))
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.people
            .values()
            .any(|person| person.email == email && Some(person.id) != except)
    }
}

impl BookingBackend for LocalStore {
    fn find_active_booking(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<Option<Booking>> {
        Ok(self
            .records()?
            .occupant(restaurant_name, date, time)
            .cloned())
    }

    fn active_bookings(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        Ok(self
            .records()?
            .bookings
            .iter()
            .filter(|booking| {
                booking.status.is_active()
                    && booking.restaurant.name == restaurant_name
                    && booking.date == date
            })
            .cloned()
            .collect())
    }

    fn bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.records()?.bookings.iter().rev().cloned().collect())
    }

    fn customer_bookings(&self, customer_email: &str) -> BookingResult<Vec<Booking>> {
        Ok(self
            .records()?
            .bookings
            .iter()
            .rev()
            .filter(|booking| booking.customer_email == customer_email)
            .cloned()
            .collect())
    }

    fn booking(&self, booking_id: &str) -> BookingResult<Booking> {
        self.records()?
            .bookings
            .iter()
            .find(|booking| booking.booking_id == booking_id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound("Booking not found".into()))
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<Booking> {
        let mut records = self.records()?;
        if records
            .bookings
            .iter()
            .any(|existing| existing.booking_id == booking.booking_id)
        {
            return Err(BookingError::Conflict(format!(
                "Booking ID {} already exists",
                booking.booking_id
            )));
        }
        if booking.status.is_active()
            && records
                .occupant(&booking.restaurant.name, booking.date, &booking.time)
                .is_some()
        {
            return Err(BookingError::slot_taken());
        }

        info!(booking_id = %booking.booking_id, "Booking stored");
        records.bookings.push(booking.clone());
        Ok(booking)
    }

    fn update_status(&self, booking_id: &str, status: BookingStatus) -> BookingResult<Booking> {
        let mut records = self.records()?;
        let index = records
            .bookings
            .iter()
            .position(|booking| booking.booking_id == booking_id)
            .ok_or_else(|| BookingError::NotFound("Booking not found".into()))?;

        let current = &records.bookings[index];
        if status.is_active() && !current.status.is_active() {
            let (name, date, time) = (&current.restaurant.name, current.date, &current.time);
            if records.occupant(name, date, time).is_some() {
                return Err(BookingError::slot_taken());
            }
        }

        let booking = &mut records.bookings[index];
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}

impl PeopleBackend for LocalStore {
    fn insert_person(&self, person: Person) -> BookingResult<Person> {
        let mut records = self.records()?;
        if records.email_taken(&person.email, None) {
            return Err(BookingError::Conflict("Email is already registered".into()));
        }
        records.people.insert(person.id, person.clone());
        Ok(person)
    }

    fn person_by_email(&self, email: &str) -> BookingResult<Option<Person>> {
        Ok(self
            .records()?
            .people
            .values()
            .find(|person| person.email == email)
            .cloned())
    }

    fn people(&self) -> BookingResult<Vec<Person>> {
        let mut people: Vec<Person> = self.records()?.people.values().cloned().collect();
        people.sort_unstable_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(people)
    }

    fn person(&self, id: Uuid) -> BookingResult<Person> {
        self.records()?
            .people
            .get(&id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))
    }

    fn update_person(
        &self,
        id: Uuid,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> BookingResult<Person> {
        let mut records = self.records()?;
        if !records.people.contains_key(&id) {
            return Err(BookingError::NotFound("Person not found".into()));
        }
        if let Some(email) = &email {
            if records.email_taken(email, Some(id)) {
                return Err(BookingError::Conflict("Email is already registered".into()));
            }
        }

        let person = records
            .people
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))?;
        if let Some(email) = email {
            person.email = email;
        }
        if let Some(password_hash) = password_hash {
            person.password_hash = password_hash;
        }
        person.updated_at = Utc::now();
        Ok(person.clone())
    }

    fn remove_person(&self, id: Uuid) -> BookingResult<Person> {
        self.records()?
            .people
            .remove(&id)
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))
    }
}
