//! SQLite implementations of the storage traits.

pub mod donation_repository;
pub mod donor_repository;

pub use donation_repository::DonationRepository;
pub use donor_repository::DonorRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Timestamps are stored as RFC 3339 text
pub(crate) fn parse_stored_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .with_context(|| format!("Corrupt timestamp in database: {}", value))
}
