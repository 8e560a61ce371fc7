use crate::validation::{validate_phone, validate_time_slot, EMAIL_REGEX};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    /// Pending and confirmed bookings occupy their slot.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(BookingStatus::as_str).collect();
                format!("Invalid status. Must be one of: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Restaurant {
    #[validate(length(min = 1, message = "Restaurant name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Restaurant location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Restaurant price is required"))]
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub restaurant: Restaurant,
    pub date: NaiveDate,
    pub time: String,
    pub party_size: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn occupies(&self, restaurant_name: &str, date: NaiveDate, time: &str) -> bool {
        self.status.is_active()
            && self.restaurant.name == restaurant_name
            && self.date == date
            && self.time == time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub booking_id: Option<String>,
    #[validate(nested)]
    pub restaurant: Restaurant,
    pub date: NaiveDate,
    #[validate(custom(function = validate_time_slot))]
    pub time: String,
    #[validate(range(min = 1, max = 20, message = "Party size must be between 1 and 20"))]
    pub party_size: i32,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub customer_name: String,
    #[validate(custom(function = validate_phone))]
    pub customer_phone: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub customer_email: String,
    #[validate(length(max = 500, message = "Special requests cannot exceed 500 characters"))]
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PersonUpdate {
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[serde(default)]
    pub password: Option<String>,
}
