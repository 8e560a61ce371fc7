use crate::backend::Backend;
use crate::configuration::Configuration;
use crate::error::BookingResult;
use crate::types::{BookingRequest, Credentials, PersonUpdate, StatusUpdateRequest};
use crate::{bookings, people, slots};
use axum::extract::{rejection::JsonRejection, Path, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState<T: Backend> {
    pub backend: T,
    pub admin_password: Arc<str>,
}

pub fn create_app<T: Backend, C: Configuration>(backend: T, configuration: C) -> Router {
    let state = AppState {
        backend,
        admin_password: configuration.admin_password().into(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/bookings/create", post(create_booking::<T>))
        .route("/bookings/customer/{email}", get(get_customer_bookings::<T>))
        .route(
            "/bookings/availability/{restaurant_name}/{date}",
            get(get_availability::<T>),
        )
        .route(
            "/bookings/{booking_id}",
            get(get_booking::<T>).delete(cancel_booking::<T>),
        )
        .route("/people/create-people", post(register::<T>))
        .route("/people/login", post(login::<T>));

    let admin = Router::new()
        .route("/bookings", get(get_bookings::<T>))
        .route("/bookings/{booking_id}/status", put(update_booking_status::<T>))
        .route("/people", get(get_people::<T>))
        .route(
            "/people/update-people/{id}",
            get(get_person::<T>).put(update_person::<T>),
        )
        .route(
            "/people/delete-people/{id}",
            axum::routing::delete(delete_person::<T>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<T>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<T: Backend>(
    State(state): State<AppState<T>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let Some(auth_header) = request.headers().get("x-admin-password") else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    };
    if auth_header.to_str().unwrap_or("") != &*state.admin_password {
        warn!(path = %request.uri().path(), "Rejected admin request");
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
    }
    Ok(next.run(request).await)
}

async fn create_booking<T: Backend>(
    State(state): State<AppState<T>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> BookingResult<impl IntoResponse> {
    let Json(request) = payload?;
    let booking = bookings::create_booking(&state.backend, request)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Booking created successfully",
            "booking": booking,
        })),
    ))
}

async fn get_bookings<T: Backend>(
    State(state): State<AppState<T>>,
) -> BookingResult<impl IntoResponse> {
    let bookings = state.backend.bookings()?;
    Ok(Json(json!({ "success": true, "bookings": bookings })))
}

async fn get_customer_bookings<T: Backend>(
    State(state): State<AppState<T>>,
    Path(email): Path<String>,
) -> BookingResult<impl IntoResponse> {
    let bookings = bookings::customer_bookings(&state.backend, &email)?;
    Ok(Json(json!({ "success": true, "bookings": bookings })))
}

async fn get_booking<T: Backend>(
    State(state): State<AppState<T>>,
    Path(booking_id): Path<String>,
) -> BookingResult<impl IntoResponse> {
    let booking = state.backend.booking(&booking_id)?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

async fn update_booking_status<T: Backend>(
    State(state): State<AppState<T>>,
    Path(booking_id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> BookingResult<impl IntoResponse> {
    let Json(request) = payload?;
    let booking = bookings::change_status(&state.backend, &booking_id, &request.status)?;
    Ok(Json(json!({
        "success": true,
        "message": "Booking status updated successfully",
        "booking": booking,
    })))
}

async fn cancel_booking<T: Backend>(
    State(state): State<AppState<T>>,
    Path(booking_id): Path<String>,
) -> BookingResult<impl IntoResponse> {
    let booking = bookings::cancel_booking(&state.backend, &booking_id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Booking cancelled successfully",
        "booking": booking,
    })))
}

async fn get_availability<T: Backend>(
    State(state): State<AppState<T>>,
    Path((restaurant_name, date)): Path<(String, NaiveDate)>,
) -> BookingResult<impl IntoResponse> {
    let availability = slots::compute_availability(&state.backend, &restaurant_name, date)?;
    Ok(Json(json!({
        "success": true,
        "availableSlots": availability.available_slots,
        "bookedSlots": availability.booked_slots,
    })))
}

async fn register<T: Backend>(
    State(state): State<AppState<T>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> BookingResult<impl IntoResponse> {
    let Json(credentials) = payload?;
    let person = people::register(&state.backend, credentials)?;
    Ok((StatusCode::CREATED, Json(person)))
}

async fn login<T: Backend>(
    State(state): State<AppState<T>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> BookingResult<impl IntoResponse> {
    let Json(credentials) = payload?;
    let person = people::login(&state.backend, credentials)?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": person,
    })))
}

async fn get_people<T: Backend>(
    State(state): State<AppState<T>>,
) -> BookingResult<impl IntoResponse> {
    Ok(Json(state.backend.people()?))
}

async fn get_person<T: Backend>(
    State(state): State<AppState<T>>,
    Path(id): Path<Uuid>,
) -> BookingResult<impl IntoResponse> {
    Ok(Json(state.backend.person(id)?))
}

async fn update_person<T: Backend>(
    State(state): State<AppState<T>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PersonUpdate>, JsonRejection>,
) -> BookingResult<impl IntoResponse> {
    let Json(update) = payload?;
    Ok(Json(people::update(&state.backend, id, update)?))
}

async fn delete_person<T: Backend>(
    State(state): State<AppState<T>>,
    Path(id): Path<Uuid>,
) -> BookingResult<impl IntoResponse> {
    Ok(Json(state.backend.remove_person(id)?))
}
