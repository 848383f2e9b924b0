use crate::domain::models::ValidationError;

/// Failures surfaced by the donor and donation services
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Donor not found: {0}")]
    DonorNotFound(i64),
    #[error("Donation not found: {0}")]
    DonationNotFound(i64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
