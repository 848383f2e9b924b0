//! # Storage Module
//!
//! Persistence for donors, donations and inventory entries.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite-backed
//! repositories here implement them over a shared sqlx pool. Timestamps are
//! stored as fixed-width RFC 3339 text so they order correctly as strings.
//!
//! Deleting a donor and recording a donation each run inside a single SQL
//! transaction, so callers never observe half of either operation.

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{DonationRepository, DonorRepository};
pub use traits::{DonationStorage, DonorStorage};
