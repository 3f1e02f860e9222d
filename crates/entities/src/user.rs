//! User-related entity definitions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ValidationError, is_valid_email};

/// Status of one direction of a friendship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// Requested, not yet confirmed.
    #[default]
    Unconfirmed,
    /// Confirmed by both users.
    Confirmed,
}

impl FriendshipStatus {
    /// Converts the status to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfirmed => "UNCONFIRMED",
            Self::Confirmed => "CONFIRMED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNCONFIRMED" => Some(Self::Unconfirmed),
            "CONFIRMED" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store on creation.
    #[serde(default)]
    pub id: i64,
    /// Email address.
    pub email: String,
    /// Login handle.
    pub login: String,
    /// Display name. Falls back to the login when blank.
    #[serde(default)]
    pub name: String,
    /// Date of birth.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Friendship edges from this user, keyed by the other user's identifier.
    #[serde(default)]
    pub friends: BTreeMap<i64, FriendshipStatus>,
}

impl User {
    /// Creates a new, unsaved user.
    pub fn new(email: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            id: 0,
            email: email.into(),
            login: login.into(),
            name: String::new(),
            birthday: None,
            friends: BTreeMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the birthday.
    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Replaces a blank display name with the login.
    pub fn apply_default_name(&mut self) {
        if self.name.trim().is_empty() {
            self.name = self.login.clone();
        }
    }

    /// Checks the profile fields, treating `today` as the latest valid birthday.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }

        if self.login.trim().is_empty() {
            return Err(ValidationError::BlankLogin);
        }
        if self.login.chars().any(char::is_whitespace) {
            return Err(ValidationError::LoginContainsWhitespace(self.login.clone()));
        }

        if let Some(birthday) = self.birthday {
            if birthday > today {
                return Err(ValidationError::BirthdayInFuture(birthday));
            }
        }

        Ok(())
    }

    /// Returns the status of the edge towards `other`, if any.
    pub fn friendship_with(&self, other: i64) -> Option<FriendshipStatus> {
        self.friends.get(&other).copied()
    }
}
