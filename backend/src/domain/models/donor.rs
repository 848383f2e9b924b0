//! Domain model for a blood donor, with the field rules enforced on create and update.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{BloodType, CreateDonorRequest, UpdateDonorRequest};

use crate::domain::dates::parse_client_timestamp;

pub const MIN_DONOR_AGE: i32 = 18;
pub const MAX_DONOR_AGE: i32 = 65;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MIN_CONTACT_LENGTH: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub blood_type: BloodType,
    pub contact: String,
    pub email: Option<String>,
    /// None means the donor has never donated
    pub last_donated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated donor fields that have not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonor {
    pub name: String,
    pub age: i32,
    pub blood_type: BloodType,
    pub contact: String,
    pub email: Option<String>,
    pub last_donated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must be at least 2 characters.")]
    NameTooShort,
    #[error("Name cannot exceed 100 characters.")]
    NameTooLong,
    #[error("Donor must be between 18 and 65 years old (got {0}).")]
    AgeOutOfRange(i32),
    #[error("Contact number must be at least 10 characters.")]
    ContactTooShort,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },
    #[error("Donation quantity must be a positive number of units.")]
    NonPositiveQuantity,
    #[error("Inventory units must be positive.")]
    NonPositiveInventoryUnits,
}

impl ValidationError {
    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameTooShort | ValidationError::NameTooLong => "name",
            ValidationError::AgeOutOfRange(_) => "age",
            ValidationError::ContactTooShort => "contact",
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidDate { field, .. } => *field,
            ValidationError::NonPositiveQuantity => "quantity",
            ValidationError::NonPositiveInventoryUnits => "inventoryEntries",
        }
    }
}

impl NewDonor {
    /// Validate and normalise a create request
    pub fn from_request(
        request: CreateDonorRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(&request.name)?;
        let age = validate_age(request.age)?;
        let contact = validate_contact(&request.contact)?;
        let email = normalize_email(request.email)?;
        let last_donated = parse_optional_date("lastDonated", request.last_donated)?;

        Ok(Self {
            name,
            age,
            blood_type: request.blood_type,
            contact,
            email,
            last_donated,
            created_at: now,
        })
    }
}

/// A validated partial update. `None` leaves a column as stored; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub blood_type: Option<BloodType>,
    pub contact: Option<String>,
    pub email: Option<Option<String>>,
    pub last_donated: Option<Option<DateTime<Utc>>>,
    pub updated_at: DateTime<Utc>,
}

impl DonorUpdate {
    /// Validate every supplied field of a patch request
    pub fn from_request(
        request: UpdateDonorRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: request.name.as_deref().map(validate_name).transpose()?,
            age: request.age.map(validate_age).transpose()?,
            blood_type: request.blood_type,
            contact: request.contact.as_deref().map(validate_contact).transpose()?,
            email: request.email.map(normalize_email).transpose()?,
            last_donated: request
                .last_donated
                .map(|value| parse_optional_date("lastDonated", value))
                .transpose()?,
            updated_at: now,
        })
    }
}

pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();

    if length < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort);
    }
    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    Ok(trimmed.to_string())
}

pub fn validate_age(age: i32) -> Result<i32, ValidationError> {
    if (MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(ValidationError::AgeOutOfRange(age))
    }
}

pub fn validate_contact(contact: &str) -> Result<String, ValidationError> {
    let trimmed = contact.trim();
    if trimmed.chars().count() < MIN_CONTACT_LENGTH {
        return Err(ValidationError::ContactTooShort);
    }
    Ok(trimmed.to_string())
}

/// Blank emails are treated as absent
pub fn normalize_email(email: Option<String>) -> Result<Option<String>, ValidationError> {
    match email.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if EMAIL_PATTERN.is_match(value) => Ok(Some(value.to_string())),
        Some(_) => Err(ValidationError::InvalidEmail),
    }
}

fn parse_optional_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_client_timestamp(field, value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn create_request(age: i32) -> CreateDonorRequest {
        CreateDonorRequest {
            name: "  Maria Lopez ".to_string(),
            age,
            blood_type: BloodType::ONegative,
            contact: "0712345678".to_string(),
            email: Some("maria@example.com".to_string()),
            last_donated: Some("2025-01-10".to_string()),
        }
    }

    #[test]
    fn test_age_boundaries_are_inclusive() {
        assert!(NewDonor::from_request(create_request(18), now()).is_ok());
        assert!(NewDonor::from_request(create_request(65), now()).is_ok());

        assert_eq!(
            NewDonor::from_request(create_request(17), now()),
            Err(ValidationError::AgeOutOfRange(17))
        );
        assert_eq!(
            NewDonor::from_request(create_request(66), now()),
            Err(ValidationError::AgeOutOfRange(66))
        );
    }

    #[test]
    fn test_create_normalises_fields() {
        let donor = NewDonor::from_request(create_request(30), now()).unwrap();

        assert_eq!(donor.name, "Maria Lopez");
        assert_eq!(donor.email.as_deref(), Some("maria@example.com"));
        assert_eq!(
            donor.last_donated,
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(donor.created_at, now());
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name(" J "), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name("Jo").unwrap(), "Jo");
        assert_eq!(
            validate_name(&"x".repeat(101)),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_contact_rules() {
        assert_eq!(validate_contact("123456789"), Err(ValidationError::ContactTooShort));
        assert_eq!(validate_contact(" 1234567890 ").unwrap(), "1234567890");
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(normalize_email(None).unwrap(), None);
        assert_eq!(normalize_email(Some("   ".to_string())).unwrap(), None);
        assert_eq!(
            normalize_email(Some(" a.b@c.org ".to_string())).unwrap().as_deref(),
            Some("a.b@c.org")
        );
        assert_eq!(
            normalize_email(Some("not-an-email".to_string())),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            normalize_email(Some("a@b".to_string())),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_invalid_last_donated_is_rejected() {
        let mut request = create_request(30);
        request.last_donated = Some("last tuesday".to_string());

        let err = NewDonor::from_request(request, now()).unwrap_err();
        assert_eq!(err.field(), "lastDonated");
    }

    #[test]
    fn test_update_keeps_only_supplied_fields() {
        let later = now() + chrono::Duration::hours(1);

        let update = DonorUpdate::from_request(
            UpdateDonorRequest {
                age: Some(31),
                contact: Some(" 0799000111 ".to_string()),
                last_donated: Some(Some("2025-02-01T09:00:00Z".to_string())),
                ..Default::default()
            },
            later,
        )
        .unwrap();

        assert_eq!(update.age, Some(31));
        assert_eq!(update.contact.as_deref(), Some("0799000111"));
        assert_eq!(update.name, None);
        assert_eq!(update.blood_type, None);
        assert_eq!(update.email, None);
        assert_eq!(
            update.last_donated,
            Some(Some(Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()))
        );
        assert_eq!(update.updated_at, later);
    }

    #[test]
    fn test_update_can_clear_nullable_fields() {
        let update = DonorUpdate::from_request(
            UpdateDonorRequest {
                email: Some(None),
                last_donated: Some(None),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        assert_eq!(update.email, Some(None));
        assert_eq!(update.last_donated, Some(None));
    }

    #[test]
    fn test_update_blank_email_clears_it() {
        let update = DonorUpdate::from_request(
            UpdateDonorRequest {
                email: Some(Some("  ".to_string())),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        assert_eq!(update.email, Some(None));
    }

    #[test]
    fn test_update_rejects_any_invalid_field() {
        let result = DonorUpdate::from_request(
            UpdateDonorRequest {
                name: Some("Maria L.".to_string()),
                age: Some(70),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(result, Err(ValidationError::AgeOutOfRange(70)));

        let result = DonorUpdate::from_request(
            UpdateDonorRequest {
                last_donated: Some(Some("+10000-01-01".to_string())),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(result.unwrap_err().field(), "lastDonated");
    }
}
