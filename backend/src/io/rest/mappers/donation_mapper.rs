use crate::domain::dates::format_timestamp;
use crate::domain::models::{Donation as DomainDonation, InventoryEntry as DomainInventoryEntry};
use shared::{Donation as SharedDonation, InventoryEntry as SharedInventoryEntry};

/// Converts domain donations into the wire DTOs.
pub struct DonationMapper;

impl DonationMapper {
    pub fn to_dto(domain: DomainDonation) -> SharedDonation {
        let inventory_tracked_count = domain.inventory_tracked_count();
        SharedDonation {
            id: domain.id,
            donor_id: domain.donor_id,
            donation_date: format_timestamp(&domain.donation_date),
            quantity: domain.quantity,
            inventory_entries: domain
                .inventory_entries
                .into_iter()
                .map(Self::to_inventory_dto)
                .collect(),
            inventory_tracked_count,
            created_at: format_timestamp(&domain.created_at),
        }
    }

    pub fn to_list_dto(donations: Vec<DomainDonation>) -> Vec<SharedDonation> {
        donations.into_iter().map(Self::to_dto).collect()
    }

    fn to_inventory_dto(entry: DomainInventoryEntry) -> SharedInventoryEntry {
        SharedInventoryEntry {
            id: entry.id,
            blood_type: entry.blood_type,
            units: entry.units,
            expiry_date: format_timestamp(&entry.expiry_date),
        }
    }
}
