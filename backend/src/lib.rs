//! # Blood Donor Backend
//!
//! REST service for a blood bank's donor registry.
//!
//! ```text
//! IO Layer (REST API, mappers, error translation)
//!     ↓
//! Domain Layer (validation, eligibility, donation statistics, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, CorsConfig};
use crate::domain::{DonationService, DonorService};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub donor_service: DonorService,
    pub donation_service: DonationService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            donor_service: DonorService::new(db.clone()),
            donation_service: DonationService::new(db),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::from_config(&config.database).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_config: &CorsConfig) -> Result<Router> {
    let origins = cors_config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .nest("/api", io::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
