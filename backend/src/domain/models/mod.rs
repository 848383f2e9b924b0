//! Domain models for donors and donations.

pub mod donation;
pub mod donor;

pub use donation::{Donation, InventoryEntry, NewDonation, NewInventoryEntry};
pub use donor::{Donor, DonorUpdate, NewDonor, ValidationError};
