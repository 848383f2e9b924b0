//! # REST API
//!
//! JSON endpoints for donors and their donations. Handlers decode ids and
//! bodies, read the clock once per request, call a domain service and map
//! the result through `mappers`. Failures become `ApiError` responses.

pub mod donation_apis;
pub mod donor_apis;
pub mod error;
pub mod mappers;

use axum::{routing::get, Router};

use crate::AppState;

pub use error::ApiError;

/// Routes relative to the `/api` prefix
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/donors", get(donor_apis::list_donors).post(donor_apis::create_donor))
        .route(
            "/donors/:id",
            get(donor_apis::get_donor)
                .patch(donor_apis::update_donor)
                .delete(donor_apis::delete_donor),
        )
        .route(
            "/donors/:id/donations",
            get(donation_apis::list_donations).post(donation_apis::record_donation),
        )
        .route("/donations/:id", get(donation_apis::get_donation))
}
