//! Domain model for a donation and the inventory entries logged from it.

use chrono::{DateTime, Utc};
use shared::{BloodType, CreateDonationRequest};

use crate::domain::dates::parse_client_timestamp;
use crate::domain::models::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    pub id: i64,
    pub blood_type: BloodType,
    pub units: i32,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    pub donation_date: DateTime<Utc>,
    /// Units of blood, always positive
    pub quantity: i32,
    pub inventory_entries: Vec<InventoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    pub fn inventory_tracked_count(&self) -> usize {
        self.inventory_entries.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryEntry {
    pub blood_type: BloodType,
    pub units: i32,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub donor_id: i64,
    pub donation_date: DateTime<Utc>,
    pub quantity: i32,
    pub inventory_entries: Vec<NewInventoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl NewDonation {
    /// Validate a record-donation request for the given donor.
    /// Inventory entries without a blood type inherit the donor's.
    pub fn from_request(
        donor_id: i64,
        donor_blood_type: BloodType,
        request: CreateDonationRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if request.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        let donation_date = match request.donation_date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(value) => parse_client_timestamp("donationDate", value)?,
        };

        let inventory_entries = request
            .inventory_entries
            .into_iter()
            .map(|entry| {
                if entry.units <= 0 {
                    return Err(ValidationError::NonPositiveInventoryUnits);
                }
                Ok(NewInventoryEntry {
                    blood_type: entry.blood_type.unwrap_or(donor_blood_type),
                    units: entry.units,
                    expiry_date: parse_client_timestamp("expiryDate", &entry.expiry_date)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            donor_id,
            donation_date,
            quantity: request.quantity,
            inventory_entries,
            created_at: now,
        })
    }
}
