use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Donation, Donor, NewDonation};
use crate::storage::{DbConnection, DonationRepository, DonationStorage, DonorRepository, DonorStorage};
use shared::CreateDonationRequest;

/// Records donations and serves donation history
#[derive(Clone)]
pub struct DonationService {
    donors: Arc<dyn DonorStorage>,
    donations: Arc<dyn DonationStorage>,
}

impl DonationService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            donors: Arc::new(DonorRepository::new(db.clone())),
            donations: Arc::new(DonationRepository::new(db)),
        }
    }

    async fn require_donor(&self, donor_id: i64) -> DomainResult<Donor> {
        self.donors.find_donor_by_id(donor_id).await?.ok_or_else(|| {
            warn!("Donor not found: {}", donor_id);
            DomainError::DonorNotFound(donor_id)
        })
    }

    /// Record a donation for an existing donor.
    ///
    /// The donor's `last_donated` moves forward when the new donation is the
    /// latest on file; a backdated donation leaves it alone.
    pub async fn record_donation(
        &self,
        donor_id: i64,
        request: CreateDonationRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Donation> {
        info!(
            "Recording donation for donor {}: quantity={}, inventory entries={}",
            donor_id,
            request.quantity,
            request.inventory_entries.len()
        );

        let donor = self.require_donor(donor_id).await?;
        let new_donation = NewDonation::from_request(donor.id, donor.blood_type, request, now)?;
        let donation = self.donations.create_donation(&new_donation).await?;

        info!(
            "Recorded donation {} for donor {} ({} tracked in inventory)",
            donation.id,
            donor_id,
            donation.inventory_tracked_count()
        );
        Ok(donation)
    }

    /// Donation history for a donor, newest first
    pub async fn list_donations_for_donor(&self, donor_id: i64) -> DomainResult<Vec<Donation>> {
        info!("Listing donations for donor: {}", donor_id);

        self.require_donor(donor_id).await?;
        let mut donations = self.donations.list_donations_for_donor(donor_id).await?;
        donations.sort_by(|a, b| b.donation_date.cmp(&a.donation_date).then(b.id.cmp(&a.id)));

        Ok(donations)
    }

    pub async fn get_donation(&self, donation_id: i64) -> DomainResult<Donation> {
        info!("Getting donation: {}", donation_id);

        match self.donations.find_donation_by_id(donation_id).await? {
            Some(donation) => Ok(donation),
            None => {
                warn!("Donation not found: {}", donation_id);
                Err(DomainError::DonationNotFound(donation_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewDonor, ValidationError};
    use chrono::{Duration, TimeZone};
    use shared::{BloodType, CreateInventoryEntryRequest};

    struct Fixture {
        service: DonationService,
        donors: DonorRepository,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        Fixture {
            service: DonationService::new(db.clone()),
            donors: DonorRepository::new(db),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
    }

    async fn create_donor(fixture: &Fixture, last_donated: Option<DateTime<Utc>>) -> Donor {
        fixture
            .donors
            .create_donor(&NewDonor {
                name: "Tomas Lind".to_string(),
                age: 41,
                blood_type: BloodType::BNegative,
                contact: "0701234567".to_string(),
                email: None,
                last_donated,
                created_at: now() - Duration::days(365),
            })
            .await
            .unwrap()
    }

    fn request(date: &str, quantity: i32) -> CreateDonationRequest {
        CreateDonationRequest {
            donation_date: Some(date.to_string()),
            quantity,
            inventory_entries: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_record_donation_defaults_date_to_now() {
        let fixture = setup_test().await;
        let donor = create_donor(&fixture, None).await;

        let donation = fixture
            .service
            .record_donation(
                donor.id,
                CreateDonationRequest {
                    donation_date: None,
                    quantity: 1,
                    inventory_entries: Vec::new(),
                },
                now(),
            )
            .await
            .unwrap();

        assert_eq!(donation.donor_id, donor.id);
        assert_eq!(donation.donation_date, now());
        assert_eq!(donation.inventory_tracked_count(), 0);

        let stored = fixture.donors.find_donor_by_id(donor.id).await.unwrap().unwrap();
        assert_eq!(stored.last_donated, Some(now()));
    }

    #[tokio::test]
    async fn test_record_donation_with_inventory() {
        let fixture = setup_test().await;
        let donor = create_donor(&fixture, None).await;

        let donation = fixture
            .service
            .record_donation(
                donor.id,
                CreateDonationRequest {
                    donation_date: Some("2025-03-09".to_string()),
                    quantity: 2,
                    inventory_entries: vec![
                        CreateInventoryEntryRequest {
                            blood_type: None,
                            units: 1,
                            expiry_date: "2025-04-13".to_string(),
                        },
                        CreateInventoryEntryRequest {
                            blood_type: Some(BloodType::ONegative),
                            units: 1,
                            expiry_date: "2025-04-13".to_string(),
                        },
                    ],
                },
                now(),
            )
            .await
            .unwrap();

        assert_eq!(donation.inventory_tracked_count(), 2);
        assert_eq!(donation.inventory_entries[0].blood_type, BloodType::BNegative);
        assert_eq!(donation.inventory_entries[1].blood_type, BloodType::ONegative);

        let fetched = fixture.service.get_donation(donation.id).await.unwrap();
        assert_eq!(fetched, donation);
    }

    #[tokio::test]
    async fn test_record_donation_for_missing_donor() {
        let fixture = setup_test().await;
        let err = fixture
            .service
            .record_donation(42, request("2025-03-01", 1), now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DonorNotFound(42)));
    }

    #[tokio::test]
    async fn test_record_donation_rejects_invalid_quantity() {
        let fixture = setup_test().await;
        let donor = create_donor(&fixture, None).await;

        let err = fixture
            .service
            .record_donation(donor.id, request("2025-03-01", 0), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::NonPositiveQuantity)
        ));

        let history = fixture.service.list_donations_for_donor(donor.id).await.unwrap();
        assert!(history.is_empty());
        let stored = fixture.donors.find_donor_by_id(donor.id).await.unwrap().unwrap();
        assert_eq!(stored.last_donated, None);
    }

    #[tokio::test]
    async fn test_backdated_donation_keeps_last_donated() {
        let fixture = setup_test().await;
        let recent = now() - Duration::days(3);
        let donor = create_donor(&fixture, Some(recent)).await;

        fixture
            .service
            .record_donation(donor.id, request("2024-12-01", 1), now())
            .await
            .unwrap();

        let stored = fixture.donors.find_donor_by_id(donor.id).await.unwrap().unwrap();
        assert_eq!(stored.last_donated, Some(recent));
    }

    #[tokio::test]
    async fn test_list_donations_newest_first() {
        let fixture = setup_test().await;
        let donor = create_donor(&fixture, None).await;

        for date in ["2024-11-02", "2025-02-20", "2024-06-15"] {
            fixture
                .service
                .record_donation(donor.id, request(date, 1), now())
                .await
                .unwrap();
        }

        let dates: Vec<String> = fixture
            .service
            .list_donations_for_donor(donor.id)
            .await
            .unwrap()
            .iter()
            .map(|d| d.donation_date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2025-02-20", "2024-11-02", "2024-06-15"]);
    }

    #[tokio::test]
    async fn test_list_donations_for_missing_donor() {
        let fixture = setup_test().await;
        let err = fixture.service.list_donations_for_donor(8).await.unwrap_err();
        assert!(matches!(err, DomainError::DonorNotFound(8)));
    }

    #[tokio::test]
    async fn test_get_missing_donation() {
        let fixture = setup_test().await;
        let err = fixture.service.get_donation(3).await.unwrap_err();
        assert!(matches!(err, DomainError::DonationNotFound(3)));
    }

    #[tokio::test]
    async fn test_out_of_range_donation_dates_are_rejected() {
        let fixture = setup_test().await;
        let donor = create_donor(&fixture, None).await;

        let err = fixture
            .service
            .record_donation(donor.id, request("+10000-01-01", 1), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::InvalidDate { field: "donationDate", .. })
        ));

        let err = fixture
            .service
            .record_donation(
                donor.id,
                CreateDonationRequest {
                    donation_date: None,
                    quantity: 1,
                    inventory_entries: vec![CreateInventoryEntryRequest {
                        blood_type: None,
                        units: 1,
                        expiry_date: "-0001-01-01".to_string(),
                    }],
                },
                now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::InvalidDate { field: "expiryDate", .. })
        ));

        assert!(fixture.service.list_donations_for_donor(donor.id).await.unwrap().is_empty());
    }
}
