use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// ABO/Rh blood group, serialized in its conventional short form ("A+", "O-", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = BloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        BloodType::ALL
            .iter()
            .copied()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| BloodTypeError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BloodTypeError {
    Unknown(String),
}

impl fmt::Display for BloodTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BloodTypeError::Unknown(value) => write!(f, "Unknown blood type: {}", value),
        }
    }
}

impl std::error::Error for BloodTypeError {}

/// A registered blood donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: i64,
    pub name: String,
    /// Age in whole years (18-65 inclusive)
    pub age: i32,
    pub blood_type: BloodType,
    /// Phone number or other contact, at least 10 characters
    pub contact: String,
    pub email: Option<String>,
    /// RFC 3339 timestamp of the last donation, absent if the donor never donated
    pub last_donated: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonorRequest {
    pub name: String,
    pub age: i32,
    pub blood_type: BloodType,
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    /// ISO date ("2024-05-01") or RFC 3339 timestamp
    #[serde(default)]
    pub last_donated: Option<String>,
}

/// Partial donor update. Absent fields are left untouched; `email` and
/// `lastDonated` may be sent as `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_donated: Option<Option<String>>,
}

/// Maps a present-but-null field to `Some(None)` so it can be told apart from an absent one
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Blood units from a donation that were logged into inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: i64,
    pub blood_type: BloodType,
    pub units: i32,
    /// RFC 3339
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    /// RFC 3339
    pub donation_date: String,
    /// Units of blood donated
    pub quantity: i32,
    pub inventory_entries: Vec<InventoryEntry>,
    /// Number of inventory entries; zero means the donation is not in inventory
    pub inventory_tracked_count: usize,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryEntryRequest {
    /// Defaults to the donor's blood type
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    pub units: i32,
    /// ISO date or RFC 3339 timestamp
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    /// ISO date or RFC 3339 timestamp; the current time when omitted
    #[serde(default)]
    pub donation_date: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub inventory_entries: Vec<CreateInventoryEntryRequest>,
}

/// Where a donor stands relative to the 56-day donation interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EligibilityStatus {
    /// No donation on record
    ReadyToDonate,
    /// Fewer than 14 days since the last donation
    RecentlyDonated,
    /// Between 14 and 56 days since the last donation
    NotYetEligible,
    /// More than 56 days since the last donation
    Eligible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub status: EligibilityStatus,
    pub days_since: Option<i64>,
    /// Progress toward the 56-day window, only set while not yet eligible
    pub progress_fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total_donations: usize,
    pub total_units: i64,
    /// RFC 3339
    pub most_recent_donation_date: Option<String>,
}

/// Donor detail view: the donor fields plus donation history and computed stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfileResponse {
    #[serde(flatten)]
    pub donor: Donor,
    /// Newest first
    pub donations: Vec<Donation>,
    pub summary: DonationSummary,
    pub eligibility: Eligibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteDonorResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Offending request field for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
