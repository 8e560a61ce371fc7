use crate::{
    backend::{BookingBackend, PeopleBackend},
    configuration::Configuration,
    error::{BookingError, BookingResult},
    types::{Booking, BookingRequest, BookingStatus, Person, Restaurant},
};
use chrono::{NaiveDate, Utc};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct TestConfiguration {
    admin_password: String,
}

impl TestConfiguration {
    pub fn new(admin_password: &str) -> Self {
        Self {
            admin_password: admin_password.into(),
        }
    }
}

impl Configuration for TestConfiguration {
    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn port(&self) -> String {
        "0".into()
    }
}

pub fn restaurant(name: &str) -> Restaurant {
    Restaurant {
        name: name.into(),
        location: "Main Street 1".into(),
        price: "$$".into(),
    }
}

pub fn booking(restaurant_name: &str, date: NaiveDate, time: &str, status: BookingStatus) -> Booking {
    Booking {
        booking_id: format!("BK-{}", Uuid::new_v4().simple()),
        restaurant: restaurant(restaurant_name),
        date,
        time: time.into(),
        party_size: 2,
        customer_name: "Stefan".into(),
        customer_phone: "5551234567".into(),
        customer_email: "stefan@example.com".into(),
        special_requests: None,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn booking_request() -> BookingRequest {
    BookingRequest {
        booking_id: None,
        restaurant: restaurant("Bistro"),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        time: "06:00 PM".into(),
        party_size: 4,
        customer_name: "Stefan".into(),
        customer_phone: "(555) 123-4567".into(),
        customer_email: "Stefan@Example.com".into(),
        special_requests: None,
        status: None,
    }
}

pub fn person(email: &str) -> Person {
    Person {
        id: Uuid::new_v4(),
        email: email.into(),
        password_hash: "not-a-real-hash".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub struct MockBackendInner {
    pub success: AtomicBool,
    pub calls_to_find_active_booking: AtomicU64,
    pub calls_to_active_bookings: AtomicU64,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_insert_booking: AtomicU64,
    pub calls_to_update_status: AtomicU64,
    pub calls_to_people: AtomicU64,
    pub bookings: Mutex<Vec<Booking>>,
}

/// Backend that records calls and fails every operation with
/// `StoreUnavailable` while `success` is false.
#[derive(Clone)]
pub struct MockBackend(pub Arc<MockBackendInner>);

impl MockBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_find_active_booking: AtomicU64::default(),
            calls_to_active_bookings: AtomicU64::default(),
            calls_to_bookings: AtomicU64::default(),
            calls_to_insert_booking: AtomicU64::default(),
            calls_to_update_status: AtomicU64::default(),
            calls_to_people: AtomicU64::default(),
            bookings: Mutex::default(),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBackendInner::new()))
    }

    fn result(&self) -> BookingResult<()> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::StoreUnavailable("Supposed to fail".into())),
        }
    }
}

impl BookingBackend for MockBackend {
    fn find_active_booking(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<Option<Booking>> {
        self.0
            .calls_to_find_active_booking
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self
            .0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|booking| booking.occupies(restaurant_name, date, time))
            .cloned())
    }

    fn active_bookings(
        &self,
        _restaurant_name: &str,
        _date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        self.0.calls_to_active_bookings.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(vec![])
    }

    fn bookings(&self) -> BookingResult<Vec<Booking>> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.bookings.lock().unwrap().clone())
    }

    fn customer_bookings(&self, _customer_email: &str) -> BookingResult<Vec<Booking>> {
        self.result()?;
        Ok(vec![])
    }

    fn booking(&self, _booking_id: &str) -> BookingResult<Booking> {
        self.result()?;
        Err(BookingError::NotFound("Booking not found".into()))
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<Booking> {
        self.0.calls_to_insert_booking.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    fn update_status(&self, _booking_id: &str, _status: BookingStatus) -> BookingResult<Booking> {
        self.0.calls_to_update_status.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Err(BookingError::NotFound("Booking not found".into()))
    }
}

impl PeopleBackend for MockBackend {
    fn insert_person(&self, person: Person) -> BookingResult<Person> {
        self.result()?;
        Ok(person)
    }

    fn person_by_email(&self, _email: &str) -> BookingResult<Option<Person>> {
        self.result()?;
        Ok(None)
    }

    fn people(&self) -> BookingResult<Vec<Person>> {
        self.0.calls_to_people.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(vec![])
    }

    fn person(&self, _id: Uuid) -> BookingResult<Person> {
        self.result()?;
        Err(BookingError::NotFound("Person not found".into()))
    }

    fn update_person(
        &self,
        _id: Uuid,
        _email: Option<String>,
        _password_hash: Option<String>,
    ) -> BookingResult<Person> {
        self.result()?;
        Err(BookingError::NotFound("Person not found".into()))
    }

    fn remove_person(&self, _id: Uuid) -> BookingResult<Person> {
        self.result()?;
        Err(BookingError::NotFound("Person not found".into()))
    }
}
