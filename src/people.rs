use crate::{
    backend::PeopleBackend,
    error::{BookingError, BookingResult},
    types::{Credentials, Person, PersonUpdate},
    validation::{normalize_email, validate_credentials, validate_person_update},
};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

fn hash_password(password: &str) -> BookingResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            error!(%err, "Failed to hash password");
            BookingError::StoreUnavailable("password hashing failed".into())
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn register<T: PeopleBackend>(backend: &T, mut credentials: Credentials) -> BookingResult<Person> {
    validate_credentials(&mut credentials)?;

    let now = Utc::now();
    let person = backend.insert_person(Person {
        id: Uuid::new_v4(),
        email: credentials.email,
        password_hash: hash_password(&credentials.password)?,
        created_at: now,
        updated_at: now,
    })?;
    info!(id = %person.id, "Person registered");
    Ok(person)
}

/// Unknown email and wrong password are reported the same way.
pub fn login<T: PeopleBackend>(backend: &T, credentials: Credentials) -> BookingResult<Person> {
    let email = normalize_email(&credentials.email);
    match backend.person_by_email(&email)? {
        Some(person) if verify_password(&credentials.password, &person.password_hash) => {
            Ok(person)
        }
        _ => Err(BookingError::InvalidCredentials),
    }
}

pub fn update<T: PeopleBackend>(
    backend: &T,
    id: Uuid,
    mut update: PersonUpdate,
) -> BookingResult<Person> {
    validate_person_update(&mut update)?;
    let password_hash = update
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;
    backend.update_person(id, update.email, password_hash)
}
