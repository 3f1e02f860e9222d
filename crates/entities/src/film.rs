//! Film entity definitions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Genre, MAX_DESCRIPTION_LENGTH, MpaRating, ValidationError, min_release_date};

/// A film in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Unique identifier, assigned by the store on creation.
    #[serde(default)]
    pub id: i64,
    /// Film title.
    pub name: String,
    /// Optional synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Date of first release.
    #[serde(alias = "releaseDate")]
    pub release_date: NaiveDate,
    /// Running time in minutes.
    pub duration: i32,
    /// MPA rating classification.
    #[serde(default)]
    pub mpa: Option<MpaRating>,
    /// Genre tags, ordered by genre identifier.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Identifiers of the users who liked this film.
    #[serde(default)]
    pub likes: BTreeSet<i64>,
}

impl Film {
    /// Creates a new, unsaved film.
    pub fn new(name: impl Into<String>, release_date: NaiveDate, duration: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            release_date,
            duration,
            mpa: None,
            genres: Vec::new(),
            likes: BTreeSet::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the MPA rating.
    pub fn with_mpa(mut self, mpa: MpaRating) -> Self {
        self.mpa = Some(mpa);
        self
    }

    /// Sets the genre tags.
    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    /// Number of distinct users who liked this film.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Checks the descriptive fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }

        if let Some(description) = &self.description {
            let length = description.chars().count();
            if length > MAX_DESCRIPTION_LENGTH {
                return Err(ValidationError::DescriptionTooLong {
                    length,
                    max: MAX_DESCRIPTION_LENGTH,
                });
            }
        }

        let min = min_release_date();
        if self.release_date < min {
            return Err(ValidationError::ReleaseDateTooEarly {
                date: self.release_date,
                min,
            });
        }

        if self.duration <= 0 {
            return Err(ValidationError::NonPositiveDuration(self.duration));
        }

        Ok(())
    }
}
