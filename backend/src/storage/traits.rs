//! # Storage Traits
//!
//! The record-store interface the domain services are written against.
//! `storage::repositories` provides the SQLite implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{Donation, Donor, DonorUpdate, NewDonation, NewDonor};

#[async_trait]
pub trait DonorStorage: Send + Sync {
    /// Insert a donor and return it with its assigned id
    async fn create_donor(&self, donor: &NewDonor) -> Result<Donor>;

    async fn find_donor_by_id(&self, donor_id: i64) -> Result<Option<Donor>>;

    /// All donors, newest first
    async fn list_donors(&self) -> Result<Vec<Donor>>;

    /// Write only the supplied columns in a single statement and return the
    /// stored donor. Returns None if the donor does not exist.
    async fn update_donor(&self, donor_id: i64, update: &DonorUpdate) -> Result<Option<Donor>>;

    /// Delete a donor with all of its donations and inventory entries in one transaction.
    /// Returns false if the donor does not exist.
    async fn delete_donor(&self, donor_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait DonationStorage: Send + Sync {
    /// Insert a donation with its inventory entries, advancing the donor's
    /// `last_donated` when the new donation is later. Runs in one transaction.
    async fn create_donation(&self, donation: &NewDonation) -> Result<Donation>;

    async fn find_donation_by_id(&self, donation_id: i64) -> Result<Option<Donation>>;

    /// Donations for a donor in no guaranteed order
    async fn list_donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>>;
}
