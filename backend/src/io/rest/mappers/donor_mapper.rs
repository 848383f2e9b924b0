use crate::domain::dates::format_timestamp;
use crate::domain::donation_summary::DonationSummary as DomainSummary;
use crate::domain::eligibility::Eligibility as DomainEligibility;
use crate::domain::models::Donor as DomainDonor;
use crate::domain::DonorProfile;
use crate::io::rest::mappers::DonationMapper;
use shared::{
    DonationSummary as SharedSummary, Donor as SharedDonor, DonorProfileResponse,
    Eligibility as SharedEligibility,
};

/// Converts domain donors into the wire DTOs.
pub struct DonorMapper;

impl DonorMapper {
    pub fn to_dto(domain: DomainDonor) -> SharedDonor {
        SharedDonor {
            id: domain.id,
            name: domain.name,
            age: domain.age,
            blood_type: domain.blood_type,
            contact: domain.contact,
            email: domain.email,
            last_donated: domain.last_donated.as_ref().map(format_timestamp),
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
        }
    }

    pub fn to_list_dto(donors: Vec<DomainDonor>) -> Vec<SharedDonor> {
        donors.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_summary_dto(summary: DomainSummary) -> SharedSummary {
        SharedSummary {
            total_donations: summary.total_donations,
            total_units: summary.total_units,
            most_recent_donation_date: summary.most_recent_donation_date.as_ref().map(format_timestamp),
        }
    }

    pub fn to_eligibility_dto(eligibility: DomainEligibility) -> SharedEligibility {
        SharedEligibility {
            status: eligibility.status,
            days_since: eligibility.days_since,
            progress_fraction: eligibility.progress_fraction,
        }
    }

    pub fn to_profile_dto(profile: DonorProfile) -> DonorProfileResponse {
        DonorProfileResponse {
            donor: Self::to_dto(profile.donor),
            donations: DonationMapper::to_list_dto(profile.donations),
            summary: Self::to_summary_dto(profile.summary),
            eligibility: Self::to_eligibility_dto(profile.eligibility),
        }
    }
}
