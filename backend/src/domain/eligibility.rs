//! Donor eligibility calculation.
//!
//! Classifies a donor by whole days elapsed since their last donation:
//!
//! | days since | status            |
//! |------------|-------------------|
//! | none       | `ReadyToDonate`   |
//! | 0..=13     | `RecentlyDonated` |
//! | 14..=56    | `NotYetEligible`  |
//! | 57..       | `Eligible`        |
//!
//! The evaluation instant is always passed in; nothing here reads the clock.

use chrono::{DateTime, Utc};
use shared::EligibilityStatus;

/// Days after a donation during which the donor counts as "recently donated"
pub const RECENT_DONATION_DAYS: i64 = 14;

/// Minimum interval between whole-blood donations
pub const DONATION_INTERVAL_DAYS: i64 = 56;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eligibility {
    pub status: EligibilityStatus,
    pub days_since: Option<i64>,
    /// Fraction of the 56-day window elapsed, only set for `NotYetEligible`
    pub progress_fraction: Option<f64>,
}

pub fn compute_eligibility(last_donated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Eligibility {
    let Some(last_donated) = last_donated else {
        return Eligibility {
            status: EligibilityStatus::ReadyToDonate,
            days_since: None,
            progress_fraction: None,
        };
    };

    // num_days truncates toward zero; a future date counts as donated today
    let days_since = (now - last_donated).num_days().max(0);

    let (status, progress_fraction) = if days_since < RECENT_DONATION_DAYS {
        (EligibilityStatus::RecentlyDonated, None)
    } else if days_since <= DONATION_INTERVAL_DAYS {
        let fraction = (days_since as f64 / DONATION_INTERVAL_DAYS as f64).clamp(0.0, 1.0);
        (EligibilityStatus::NotYetEligible, Some(fraction))
    } else {
        (EligibilityStatus::Eligible, None)
    };

    Eligibility {
        status,
        days_since: Some(days_since),
        progress_fraction,
    }
}
