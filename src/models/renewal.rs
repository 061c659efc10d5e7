//! Loan renewal form and its date rule

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::book_instance::BookInstance;

/// Librarians may push a due date at most this far ahead
pub const RENEWAL_WINDOW_DAYS: i64 = 28;

/// Why a proposed renewal date was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    #[error("Enter a valid date.")]
    Unparseable,
    #[error("Invalid date - renewal date in past")]
    InPast,
    #[error("Invalid date - renewal date too far in future (more than 4 weeks)")]
    TooFarInFuture,
}

/// Latest acceptable renewal date, also the form's initial value
pub fn max_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(RENEWAL_WINDOW_DAYS)
}

/// Accept `proposed` iff `today <= proposed <= today + 28 days`.
pub fn validate_renewal_date(
    proposed: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > max_renewal_date(today) {
        return Err(RenewalDateError::TooFarInFuture);
    }
    Ok(proposed)
}

/// Parse a submitted `YYYY-MM-DD` date
pub fn parse_renewal_date(raw: &str) -> Result<NaiveDate, RenewalDateError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RenewalDateError::Unparseable)
}

/// Renewal form as submitted by a librarian
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// Enter a date between now and 4 weeks (YYYY-MM-DD)
    #[serde(default)]
    pub renewal_date: String,
}

impl RenewBookForm {
    pub fn new(renewal_date: NaiveDate) -> Self {
        Self {
            renewal_date: renewal_date.to_string(),
        }
    }

    /// Parse the submitted date and check it against `today`
    pub fn clean(&self, today: NaiveDate) -> Result<NaiveDate, RenewalDateError> {
        parse_renewal_date(&self.renewal_date).and_then(|date| validate_renewal_date(date, today))
    }
}

/// Field errors of the renewal form
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RenewBookFormErrors {
    pub renewal_date: Vec<String>,
}

/// Renewal form state returned for display and after a rejected submit
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewBookFormState {
    pub book_instance: BookInstance,
    /// Field value as shown in the form, possibly not a valid date
    pub renewal_date: String,
    pub errors: RenewBookFormErrors,
}

impl RenewBookFormState {
    /// Blank form, pre-filled with the furthest allowed date
    pub fn initial(book_instance: BookInstance, today: NaiveDate) -> Self {
        Self {
            book_instance,
            renewal_date: max_renewal_date(today).to_string(),
            errors: RenewBookFormErrors::default(),
        }
    }

    /// Submitted form carrying the validation error
    pub fn rejected(book_instance: BookInstance, submitted: String, error: RenewalDateError) -> Self {
        Self {
            book_instance,
            renewal_date: submitted,
            errors: RenewBookFormErrors {
                renewal_date: vec![error.to_string()],
            },
        }
    }
}
