//! Field normalization and validation for incoming requests.
//!
//! Everything here is free of store access, so requests are rejected before
//! any backend call is made.

use crate::{
    error::{BookingError, BookingResult},
    slots::TIME_SLOTS,
    types::{BookingRequest, Credentials, PersonUpdate},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

lazy_static! {
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_digits(phone).len() == 10 {
        return Ok(());
    }
    Err(ValidationError::new("phone")
        .with_message(Cow::from("Please enter a valid 10-digit phone number")))
}

pub fn validate_time_slot(time: &str) -> Result<(), ValidationError> {
    if TIME_SLOTS.contains(&time) {
        return Ok(());
    }
    Err(ValidationError::new("time_slot")
        .with_message(Cow::from(format!("{time} is not a bookable time slot"))))
}

/// Trims and lowercases the request fields in place the way they are stored.
pub fn normalize_booking_request(request: &mut BookingRequest) {
    request.restaurant.name = request.restaurant.name.trim().to_string();
    request.restaurant.location = request.restaurant.location.trim().to_string();
    request.restaurant.price = request.restaurant.price.trim().to_string();
    request.time = request.time.trim().to_string();
    request.customer_name = request.customer_name.trim().to_string();
    request.customer_email = normalize_email(&request.customer_email);
    request.special_requests = request
        .special_requests
        .take()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    request.booking_id = request
        .booking_id
        .take()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
}

pub fn validate_booking_request(request: &BookingRequest) -> BookingResult<()> {
    request.validate().map_err(into_booking_error)
}

pub fn validate_credentials(credentials: &mut Credentials) -> BookingResult<()> {
    credentials.email = normalize_email(&credentials.email);
    credentials.validate().map_err(into_booking_error)
}

pub fn validate_person_update(update: &mut PersonUpdate) -> BookingResult<()> {
    update.email = update.email.as_deref().map(normalize_email);
    update.validate().map_err(into_booking_error)
}

fn into_booking_error(errors: ValidationErrors) -> BookingError {
    let mut messages = vec![];
    collect_messages(&errors, &mut messages);
    messages.sort();
    BookingError::Validation(messages)
}

fn collect_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                messages.extend(field_errors.iter().map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::booking_request;
    use test_case::test_case;

    #[test]
    fn test_valid_booking_request() {
        let mut request = booking_request();
        normalize_booking_request(&mut request);
        validate_booking_request(&request).unwrap();
        assert_eq!(request.customer_email, "stefan@example.com");
    }

    #[test_case("5551234567", true)]
    #[test_case("555-123-4567", true)]
    #[test_case("555123456", false)]
    #[test_case("55512345678", false)]
    #[test_case("", false)]
    fn test_validate_phone(phone: &str, valid: bool) {
        assert_eq!(validate_phone(phone).is_ok(), valid);
    }

    #[test_case("guest@example.com", true)]
    #[test_case("guest@example", false)]
    #[test_case("guest example@example.com", false)]
    #[test_case("@example.com", false)]
    fn test_email_regex(email: &str, valid: bool) {
        assert_eq!(EMAIL_REGEX.is_match(email), valid);
    }

    #[test_case(0, false)]
    #[test_case(1, true)]
    #[test_case(20, true)]
    #[test_case(21, false)]
    fn test_party_size_bounds(party_size: i32, valid: bool) {
        let mut request = booking_request();
        request.party_size = party_size;
        assert_eq!(validate_booking_request(&request).is_ok(), valid);
    }

    #[test]
    fn test_unknown_time_slot() {
        let mut request = booking_request();
        request.time = "11:30 AM".into();
        let err = validate_booking_request(&request).unwrap_err();
        assert_eq!(
            err,
            BookingError::Validation(vec!["11:30 AM is not a bookable time slot".into()])
        );
    }

    #[test]
    fn test_collects_nested_and_field_messages() {
        let mut request = booking_request();
        request.restaurant.name = "   ".into();
        request.customer_name = " A ".into();
        request.special_requests = Some("x".repeat(501));
        normalize_booking_request(&mut request);

        let BookingError::Validation(messages) = validate_booking_request(&request).unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "Name must be at least 2 characters",
                "Restaurant name is required",
                "Special requests cannot exceed 500 characters",
            ]
        );
    }

    #[test]
    fn test_blank_special_requests_are_dropped() {
        let mut request = booking_request();
        request.special_requests = Some("   ".into());
        normalize_booking_request(&mut request);
        assert_eq!(request.special_requests, None);
    }

    #[test]
    fn test_credentials_are_normalized() {
        let mut credentials = Credentials {
            email: "  Guest@Example.COM ".into(),
            password: "123456".into(),
        };
        validate_credentials(&mut credentials).unwrap();
        assert_eq!(credentials.email, "guest@example.com");

        credentials.password = "12345".into();
        validate_credentials(&mut credentials).unwrap_err();
    }
}
