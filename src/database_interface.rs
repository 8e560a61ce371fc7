use crate::{
    backend::{BookingBackend, PeopleBackend},
    error::{BookingError, BookingResult},
    schema::{bookings, people},
    types::{Booking, BookingStatus, Person, Restaurant},
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    ConnectionError, PgConnection,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;
use uuid::Uuid;

const ACTIVE_SLOT_INDEX: &str = "bookings_active_slot_idx";
const BOOKINGS_PKEY: &str = "bookings_pkey";
const PEOPLE_EMAIL_KEY: &str = "people_email_key";

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BookingRow {
    booking_id: String,
    restaurant_name: String,
    restaurant_location: String,
    restaurant_price: String,
    date: NaiveDate,
    time: String,
    party_size: i32,
    customer_name: String,
    customer_phone: String,
    customer_email: String,
    special_requests: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingRow {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id,
            restaurant_name: booking.restaurant.name,
            restaurant_location: booking.restaurant.location,
            restaurant_price: booking.restaurant.price,
            date: booking.date,
            time: booking.time,
            party_size: booking.party_size,
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            customer_email: booking.customer_email,
            special_requests: booking.special_requests,
            status: booking.status.as_str().into(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|err: String| {
            error!(booking_id = %row.booking_id, %err, "Stored booking has an unknown status");
            BookingError::StoreUnavailable(err)
        })?;
        Ok(Self {
            booking_id: row.booking_id,
            restaurant: Restaurant {
                name: row.restaurant_name,
                location: row.restaurant_location,
                price: row.restaurant_price,
            },
            date: row.date,
            time: row.time,
            party_size: row.party_size,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            special_requests: row.special_requests,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct PersonRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Person> for PersonRow {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            email: person.email,
            password_hash: person.password_hash,
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = people)]
struct PersonChanges {
    email: Option<String>,
    password_hash: Option<String>,
    updated_at: DateTime<Utc>,
}

fn store_error(err: DieselError) -> BookingError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
        return match info.constraint_name() {
            Some(ACTIVE_SLOT_INDEX) => BookingError::slot_taken(),
            Some(BOOKINGS_PKEY) => BookingError::Conflict("Booking ID already exists".into()),
            Some(PEOPLE_EMAIL_KEY) => BookingError::Conflict("Email is already registered".into()),
            _ => BookingError::Conflict(info.message().into()),
        };
    }
    error!(%err, "Database query failed");
    BookingError::StoreUnavailable(err.to_string())
}

fn into_bookings(rows: Vec<BookingRow>) -> BookingResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

fn active_statuses() -> [&'static str; 2] {
    BookingStatus::ACTIVE.map(|status| status.as_str())
}

#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = Self::establish_connection(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
        PgConnection::establish(database_url)
    }

    fn connection(&self) -> BookingResult<MutexGuard<'_, PgConnection>> {
        self.connection.lock().map_err(|err| {
            error!(%err, "Database connection lock poisoned");
            BookingError::StoreUnavailable("database connection lock poisoned".into())
        })
    }
}

impl BookingBackend for DatabaseInterface {
    fn find_active_booking(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<Option<Booking>> {
        let mut connection = self.connection()?;
        bookings::table
            .filter(bookings::restaurant_name.eq(restaurant_name))
            .filter(bookings::date.eq(date))
            .filter(bookings::time.eq(time))
            .filter(bookings::status.eq_any(active_statuses()))
            .select(BookingRow::as_select())
            .first(&mut *connection)
            .optional()
            .map_err(store_error)?
            .map(Booking::try_from)
            .transpose()
    }

    fn active_bookings(
        &self,
        restaurant_name: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        let mut connection = self.connection()?;
        let rows = bookings::table
            .filter(bookings::restaurant_name.eq(restaurant_name))
            .filter(bookings::date.eq(date))
            .filter(bookings::status.eq_any(active_statuses()))
            .select(BookingRow::as_select())
            .load(&mut *connection)
            .map_err(store_error)?;
        into_bookings(rows)
    }

    fn bookings(&self) -> BookingResult<Vec<Booking>> {
        let mut connection = self.connection()?;
        let rows = bookings::table
            .order(bookings::created_at.desc())
            .select(BookingRow::as_select())
            .load(&mut *connection)
            .map_err(store_error)?;
        into_bookings(rows)
    }

    fn customer_bookings(&self, customer_email: &str) -> BookingResult<Vec<Booking>> {
        let mut connection = self.connection()?;
        let rows = bookings::table
            .filter(bookings::customer_email.eq(customer_email))
            .order(bookings::created_at.desc())
            .select(BookingRow::as_select())
            .load(&mut *connection)
            .map_err(store_error)?;
        into_bookings(rows)
    }

    fn booking(&self, booking_id: &str) -> BookingResult<Booking> {
        let mut connection = self.connection()?;
        bookings::table
            .find(booking_id)
            .select(BookingRow::as_select())
            .first(&mut *connection)
            .optional()
            .map_err(store_error)?
            .ok_or_else(|| BookingError::NotFound("Booking not found".into()))
            .and_then(Booking::try_from)
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<Booking> {
        let mut connection = self.connection()?;
        diesel::insert_into(bookings::table)
            .values(BookingRow::from(booking))
            .returning(BookingRow::as_returning())
            .get_result(&mut *connection)
            .map_err(store_error)
            .and_then(Booking::try_from)
    }

    fn update_status(&self, booking_id: &str, status: BookingStatus) -> BookingResult<Booking> {
        let mut connection = self.connection()?;
        diesel::update(bookings::table.find(booking_id))
            .set((
                bookings::status.eq(status.as_str()),
                bookings::updated_at.eq(Utc::now()),
            ))
            .returning(BookingRow::as_returning())
            .get_result(&mut *connection)
            .optional()
            .map_err(store_error)?
            .ok_or_else(|| BookingError::NotFound("Booking not found".into()))
            .and_then(Booking::try_from)
    }
}

impl PeopleBackend for DatabaseInterface {
    fn insert_person(&self, person: Person) -> BookingResult<Person> {
        let mut connection = self.connection()?;
        diesel::insert_into(people::table)
            .values(PersonRow::from(person))
            .returning(PersonRow::as_returning())
            .get_result(&mut *connection)
            .map(Person::from)
            .map_err(store_error)
    }

    fn person_by_email(&self, email: &str) -> BookingResult<Option<Person>> {
        let mut connection = self.connection()?;
        people::table
            .filter(people::email.eq(email))
            .select(PersonRow::as_select())
            .first(&mut *connection)
            .optional()
            .map(|row| row.map(Person::from))
            .map_err(store_error)
    }

    fn people(&self) -> BookingResult<Vec<Person>> {
        let mut connection = self.connection()?;
        people::table
            .order(people::created_at.asc())
            .select(PersonRow::as_select())
            .load(&mut *connection)
            .map(|rows| rows.into_iter().map(Person::from).collect())
            .map_err(store_error)
    }

    fn person(&self, id: Uuid) -> BookingResult<Person> {
        let mut connection = self.connection()?;
        people::table
            .find(id)
            .select(PersonRow::as_select())
            .first(&mut *connection)
            .optional()
            .map_err(store_error)?
            .map(Person::from)
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))
    }

    fn update_person(
        &self,
        id: Uuid,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> BookingResult<Person> {
        let mut connection = self.connection()?;
        let changes = PersonChanges {
            email,
            password_hash,
            updated_at: Utc::now(),
        };
        diesel::update(people::table.find(id))
            .set(&changes)
            .returning(PersonRow::as_returning())
            .get_result(&mut *connection)
            .optional()
            .map_err(store_error)?
            .map(Person::from)
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))
    }

    fn remove_person(&self, id: Uuid) -> BookingResult<Person> {
        let mut connection = self.connection()?;
        diesel::delete(people::table.find(id))
            .returning(PersonRow::as_returning())
            .get_result(&mut *connection)
            .optional()
            .map_err(store_error)?
            .map(Person::from)
            .ok_or_else(|| BookingError::NotFound("Person not found".into()))
    }
}
