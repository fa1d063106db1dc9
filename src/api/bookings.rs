use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::api::errors::ApiError;
use crate::app::AppState;
use crate::db::models::{Booking, BookingCreatedResponse, BookingRequest};
use crate::db::repository::BookingRepository;
use crate::error::AppError;

/// Core submission logic, separated from the HTTP layer for testability.
///
/// Builds a booking from the request (assigning `_id` and, when missing,
/// `createdAt`) and stores it. Nothing is retried.
pub async fn process_create_booking(
    repo: &dyn BookingRepository,
    request: BookingRequest,
) -> Result<BookingCreatedResponse, AppError> {
    let booking = request.into_booking(Utc::now());

    repo.insert(&booking).await?;

    tracing::info!(booking_id = %booking.id, "Booking saved");

    Ok(BookingCreatedResponse {
        message: "Booking saved successfully".to_string(),
        booking,
    })
}

/// Return every stored booking. An empty store yields an empty list.
pub async fn process_list_bookings(repo: &dyn BookingRepository) -> Result<Vec<Booking>, AppError> {
    let bookings = repo.list_all().await?;
    tracing::debug!(count = bookings.len(), "Listed bookings");
    Ok(bookings)
}

/// Axum handler for `POST /bookings`.
///
/// A body that fails to decode is reported the same way as a store failure.
pub async fn create_booking_handler(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::saving(AppError::Validation(rejection.body_text())))?;

    let response = process_create_booking(state.booking_repo.as_ref(), request)
        .await
        .map_err(ApiError::saving)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Axum handler for `GET /bookings`.
pub async fn list_bookings_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = process_list_bookings(state.booking_repo.as_ref())
        .await
        .map_err(ApiError::fetching)?;

    Ok(Json(bookings))
}
