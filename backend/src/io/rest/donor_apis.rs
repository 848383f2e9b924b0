//! # REST API for Donor Management
//!
//! Endpoints for listing, creating, reading, updating and deleting donors.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::domain::DonorFilter;
use crate::io::rest::error::{parse_id, ApiError};
use crate::io::rest::mappers::DonorMapper;
use crate::AppState;
use shared::{CreateDonorRequest, DeleteDonorResponse, UpdateDonorRequest};

/// Query parameters for the donor list
#[derive(Debug, Default, Deserialize)]
pub struct DonorListQuery {
    /// Matches name, blood type or contact number
    pub q: Option<String>,
}

/// List donors, newest first
pub async fn list_donors(
    State(state): State<AppState>,
    Query(query): Query<DonorListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/donors - query: {:?}", query);

    let donors = state.donor_service.list_donors(DonorFilter::new(query.q)).await?;
    Ok(Json(DonorMapper::to_list_dto(donors)))
}

/// Register a new donor
pub async fn create_donor(
    State(state): State<AppState>,
    payload: Result<Json<CreateDonorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("POST /api/donors - request: {:?}", request);

    let donor = state.donor_service.create_donor(request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(DonorMapper::to_dto(donor))))
}

/// Donor detail with donation history, totals and eligibility
pub async fn get_donor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/donors/{}", raw_id);
    let donor_id = parse_id(&raw_id)?;

    let profile = state.donor_service.get_donor_profile(donor_id, Utc::now()).await?;
    Ok(Json(DonorMapper::to_profile_dto(profile)))
}

pub async fn update_donor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateDonorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let donor_id = parse_id(&raw_id)?;
    let Json(request) = payload?;
    info!("PATCH /api/donors/{} - request: {:?}", donor_id, request);

    let donor = state.donor_service.update_donor(donor_id, request, Utc::now()).await?;
    Ok(Json(DonorMapper::to_dto(donor)))
}

/// Delete a donor and every donation recorded for them
pub async fn delete_donor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("DELETE /api/donors/{}", raw_id);
    let donor_id = parse_id(&raw_id)?;

    state.donor_service.delete_donor(donor_id).await?;
    Ok(Json(DeleteDonorResponse {
        message: "Donor deleted successfully".to_string(),
    }))
}
