//! Field validation rules for films and users.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Maximum length of a film description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Earliest accepted release date: the first public film screening.
pub fn min_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

/// Returns true if `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Errors raised when an entity fails field validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Film name is empty or whitespace.
    #[error("Film name must not be blank")]
    BlankName,

    /// Film description exceeds the allowed length.
    #[error("Film description is {length} characters, at most {max} allowed")]
    DescriptionTooLong { length: usize, max: usize },

    /// Film release date precedes the first screening.
    #[error("Release date {date} is before {min}")]
    ReleaseDateTooEarly { date: NaiveDate, min: NaiveDate },

    /// Film duration is zero or negative.
    #[error("Film duration must be positive, got {0}")]
    NonPositiveDuration(i32),

    /// Email is not a well-formed address.
    #[error("Invalid email: {0:?}")]
    InvalidEmail(String),

    /// Login is empty or whitespace.
    #[error("Login must not be blank")]
    BlankLogin,

    /// Login contains whitespace.
    #[error("Login must not contain whitespace: {0:?}")]
    LoginContainsWhitespace(String),

    /// Birthday lies in the future.
    #[error("Birthday {0} is in the future")]
    BirthdayInFuture(NaiveDate),

    /// A user tried to befriend themselves.
    #[error("User {0} cannot befriend themselves")]
    SelfFriendship(i64),
}
