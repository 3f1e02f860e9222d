//! Genre and MPA rating reference data.

use serde::{Deserialize, Serialize};

/// Genres every store is seeded with, keyed by identifier.
pub const GENRES: [(i64, &str); 6] = [
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Animation"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];

/// MPA ratings every store is seeded with, keyed by identifier.
pub const MPA_RATINGS: [(i64, &str); 5] = [
    (1, "G"),
    (2, "PG"),
    (3, "PG-13"),
    (4, "R"),
    (5, "NC-17"),
];

/// A film genre tag.
///
/// Clients may reference a genre by `id` alone; the name is filled in from
/// the reference table when a film is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Genre {
    /// Unique identifier.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Genre {
    /// Creates a genre.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a genre reference carrying only an identifier.
    pub fn with_id(id: i64) -> Self {
        Self::new(id, "")
    }

    /// Returns the seeded genre table, ordered by identifier.
    pub fn all() -> Vec<Genre> {
        GENRES.iter().map(|(id, name)| Genre::new(*id, *name)).collect()
    }
}

/// A Motion Picture Association rating classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MpaRating {
    /// Unique identifier.
    pub id: i64,
    /// Rating label, e.g. `PG-13`.
    #[serde(default)]
    pub name: String,
}

impl MpaRating {
    /// Creates a rating.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a rating reference carrying only an identifier.
    pub fn with_id(id: i64) -> Self {
        Self::new(id, "")
    }

    /// Returns the seeded rating table, ordered by identifier.
    pub fn all() -> Vec<MpaRating> {
        MPA_RATINGS
            .iter()
            .map(|(id, name)| MpaRating::new(*id, *name))
            .collect()
    }
}
