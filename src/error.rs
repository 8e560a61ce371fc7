use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const SLOT_TAKEN_MESSAGE: &str =
    "This time slot is already booked. Please choose a different time.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    InvalidStatus(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl BookingError {
    pub fn slot_taken() -> Self {
        BookingError::Conflict(SLOT_TAKEN_MESSAGE.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Validation(_)
            | BookingError::InvalidStatus(_)
            | BookingError::Conflict(_) => StatusCode::BAD_REQUEST,
            BookingError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Bodies that fail to deserialize are reported like any other invalid field.
impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::Validation(vec![rejection.body_text()])
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            BookingError::Validation(errors) => ErrorBody {
                success: false,
                message: "Validation failed".into(),
                errors: Some(errors),
            },
            BookingError::StoreUnavailable(detail) => {
                error!(%detail, "Request failed on the booking store");
                ErrorBody {
                    success: false,
                    message: "Internal server error".into(),
                    errors: None,
                }
            }
            other => ErrorBody {
                success: false,
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
