//! Free-text filtering for the donor listing.

use crate::domain::models::Donor;

/// Matches a search term against name and blood type (case-insensitive)
/// and against the contact number (substring).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorFilter {
    query: Option<String>,
}

impl DonorFilter {
    pub fn new(query: Option<String>) -> Self {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        Self { query }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none()
    }

    pub fn matches(&self, donor: &Donor) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let lowered = query.to_lowercase();

        donor.name.to_lowercase().contains(&lowered)
            || donor.blood_type.as_str().to_lowercase().contains(&lowered)
            || donor.contact.contains(query.as_str())
    }

    /// Keeps the input order
    pub fn apply(&self, donors: Vec<Donor>) -> Vec<Donor> {
        if self.is_empty() {
            return donors;
        }
        donors.into_iter().filter(|d| self.matches(d)).collect()
    }
}
