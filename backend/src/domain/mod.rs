//! # Domain Module
//!
//! Business rules for the blood donor registry.
//!
//! - **models**: donor and donation records plus request validation
//! - **eligibility**: when a donor may give blood again
//! - **donation_summary**: totals over a donor's history
//! - **donor_search**: free-text filtering of the donor list
//! - **donor_service** / **donation_service**: orchestration over storage
//!
//! Pure calculations take the current time as an argument, so only the IO
//! layer ever reads the clock.

pub mod dates;
pub mod donation_service;
pub mod donation_summary;
pub mod donor_search;
pub mod donor_service;
pub mod eligibility;
pub mod errors;
pub mod models;

pub use donation_service::DonationService;
pub use donation_summary::{aggregate, DonationSummary};
pub use donor_search::DonorFilter;
pub use donor_service::{DonorProfile, DonorService};
pub use eligibility::{compute_eligibility, Eligibility};
pub use errors::{DomainError, DomainResult};
