//! Donor management: create, read, update and delete donor profiles, and
//! assemble the donor detail view with donation statistics and eligibility.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::donation_summary::{aggregate, DonationSummary};
use crate::domain::donor_search::DonorFilter;
use crate::domain::eligibility::{compute_eligibility, Eligibility};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Donation, Donor, DonorUpdate, NewDonor};
use crate::storage::{DbConnection, DonationRepository, DonationStorage, DonorRepository, DonorStorage};
use shared::{CreateDonorRequest, UpdateDonorRequest};

/// Everything the donor detail page shows
#[derive(Debug, Clone, PartialEq)]
pub struct DonorProfile {
    pub donor: Donor,
    /// Newest first
    pub donations: Vec<Donation>,
    pub summary: DonationSummary,
    pub eligibility: Eligibility,
}

/// Service for managing donors
#[derive(Clone)]
pub struct DonorService {
    donors: Arc<dyn DonorStorage>,
    donations: Arc<dyn DonationStorage>,
}

impl DonorService {
    /// Create a DonorService backed by the SQLite repositories
    pub fn new(db: DbConnection) -> Self {
        Self::with_storage(
            Arc::new(DonorRepository::new(db.clone())),
            Arc::new(DonationRepository::new(db)),
        )
    }

    pub fn with_storage(donors: Arc<dyn DonorStorage>, donations: Arc<dyn DonationStorage>) -> Self {
        Self { donors, donations }
    }

    /// Validate and store a new donor
    pub async fn create_donor(&self, request: CreateDonorRequest, now: DateTime<Utc>) -> DomainResult<Donor> {
        info!("Creating donor: name={}, blood_type={}", request.name, request.blood_type);

        let new_donor = NewDonor::from_request(request, now)?;
        let donor = self.donors.create_donor(&new_donor).await?;

        info!("Created donor {} with ID: {}", donor.name, donor.id);
        Ok(donor)
    }

    pub async fn get_donor(&self, donor_id: i64) -> DomainResult<Donor> {
        info!("Getting donor: {}", donor_id);

        match self.donors.find_donor_by_id(donor_id).await? {
            Some(donor) => Ok(donor),
            None => {
                warn!("Donor not found: {}", donor_id);
                Err(DomainError::DonorNotFound(donor_id))
            }
        }
    }

    /// Donors newest first, narrowed by the filter
    pub async fn list_donors(&self, filter: DonorFilter) -> DomainResult<Vec<Donor>> {
        info!("Listing donors with filter: {:?}", filter);

        let donors = filter.apply(self.donors.list_donors().await?);

        info!("Found {} donors", donors.len());
        Ok(donors)
    }

    /// Apply a partial update to an existing donor. Only the supplied fields are written.
    pub async fn update_donor(
        &self,
        donor_id: i64,
        request: UpdateDonorRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Donor> {
        info!("Updating donor: {}", donor_id);

        let update = DonorUpdate::from_request(request, now)?;

        match self.donors.update_donor(donor_id, &update).await? {
            Some(donor) => {
                info!("Updated donor {} with ID: {}", donor.name, donor.id);
                Ok(donor)
            }
            None => {
                warn!("Donor not found for update: {}", donor_id);
                Err(DomainError::DonorNotFound(donor_id))
            }
        }
    }

    /// Delete a donor together with all of their donations
    pub async fn delete_donor(&self, donor_id: i64) -> DomainResult<()> {
        info!("Deleting donor: {}", donor_id);

        if !self.donors.delete_donor(donor_id).await? {
            warn!("Donor not found for deletion: {}", donor_id);
            return Err(DomainError::DonorNotFound(donor_id));
        }

        info!("Deleted donor with ID: {}", donor_id);
        Ok(())
    }

    /// Load a donor with donation history, totals and eligibility as of `now`.
    ///
    /// Eligibility is computed from the later of the donor's recorded
    /// `last_donated` and the most recent donation on file.
    pub async fn get_donor_profile(&self, donor_id: i64, now: DateTime<Utc>) -> DomainResult<DonorProfile> {
        info!("Getting donor profile: {}", donor_id);

        let donor = self.get_donor(donor_id).await?;
        let mut donations = self.donations.list_donations_for_donor(donor_id).await?;
        donations.sort_by(|a, b| b.donation_date.cmp(&a.donation_date).then(b.id.cmp(&a.id)));

        let summary = aggregate(&donations);
        let last_donation = donor.last_donated.max(summary.most_recent_donation_date);
        let eligibility = compute_eligibility(last_donation, now);

        info!(
            "Donor {} has {} donations ({} units), eligibility {:?}",
            donor_id, summary.total_donations, summary.total_units, eligibility.status
        );

        Ok(DonorProfile {
            donor,
            donations,
            summary,
            eligibility,
        })
    }
}
