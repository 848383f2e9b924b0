pub mod donation_mapper;
pub mod donor_mapper;

pub use donation_mapper::DonationMapper;
pub use donor_mapper::DonorMapper;
