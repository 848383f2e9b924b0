//! # REST API for Donations
//!
//! Recording donations against a donor and reading donation history.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::io::rest::error::{parse_id, ApiError};
use crate::io::rest::mappers::DonationMapper;
use crate::AppState;
use shared::CreateDonationRequest;

/// Donation history for a donor, newest first
pub async fn list_donations(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/donors/{}/donations", raw_id);
    let donor_id = parse_id(&raw_id)?;

    let donations = state.donation_service.list_donations_for_donor(donor_id).await?;
    Ok(Json(DonationMapper::to_list_dto(donations)))
}

pub async fn record_donation(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let donor_id = parse_id(&raw_id)?;
    let Json(request) = payload?;
    info!("POST /api/donors/{}/donations - request: {:?}", donor_id, request);

    let donation = state
        .donation_service
        .record_donation(donor_id, request, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(DonationMapper::to_dto(donation))))
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/donations/{}", raw_id);
    let donation_id = parse_id(&raw_id)?;

    let donation = state.donation_service.get_donation(donation_id).await?;
    Ok(Json(DonationMapper::to_dto(donation)))
}
