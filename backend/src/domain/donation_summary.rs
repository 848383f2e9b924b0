//! Aggregate statistics over a donor's donation history.

use chrono::{DateTime, Utc};

use crate::domain::models::Donation;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationSummary {
    pub total_donations: usize,
    pub total_units: i64,
    pub most_recent_donation_date: Option<DateTime<Utc>>,
}

/// Summarise donations in any order. The most recent date is the maximum,
/// not the first element, so callers need not sort.
pub fn aggregate(donations: &[Donation]) -> DonationSummary {
    DonationSummary {
        total_donations: donations.len(),
        total_units: donations.iter().map(|d| i64::from(d.quantity)).sum(),
        most_recent_donation_date: donations.iter().map(|d| d.donation_date).max(),
    }
}
