//! SQLite schema and row types.

use chrono::NaiveDate;
use entities::{Film, MpaRating, User};
use sqlx::FromRow;

use crate::{FilmStoreError, FilmStoreResult};

/// Schema applied on every connect. All statements are idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS mpa_ratings (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS films (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    release_date TEXT NOT NULL,
    duration INTEGER NOT NULL CHECK (duration > 0),
    mpa_id INTEGER REFERENCES mpa_ratings(id)
);

CREATE TABLE IF NOT EXISTS film_genres (
    film_id INTEGER NOT NULL REFERENCES films(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(id),
    PRIMARY KEY (film_id, genre_id)
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    login TEXT NOT NULL,
    name TEXT NOT NULL,
    birthday TEXT
);

CREATE TABLE IF NOT EXISTS film_likes (
    film_id INTEGER NOT NULL REFERENCES films(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (film_id, user_id)
);

CREATE TABLE IF NOT EXISTS friendships (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    friend_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status TEXT NOT NULL CHECK (status IN ('UNCONFIRMED', 'CONFIRMED')),
    PRIMARY KEY (user_id, friend_id)
);

CREATE INDEX IF NOT EXISTS idx_film_likes_film ON film_likes(film_id);
CREATE INDEX IF NOT EXISTS idx_friendships_friend ON friendships(friend_id);
"#;

/// Database row for Film, without genres and likes.
#[derive(Debug, FromRow)]
pub struct FilmRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub duration: i64,
    pub mpa_id: Option<i64>,
    pub mpa_name: Option<String>,
}

impl FilmRow {
    pub fn into_film(self) -> FilmStoreResult<Film> {
        let duration = i32::try_from(self.duration).map_err(|_| {
            FilmStoreError::Corrupt(format!("film {} has duration {}", self.id, self.duration))
        })?;

        Ok(Film {
            id: self.id,
            name: self.name,
            description: self.description,
            release_date: self.release_date,
            duration,
            mpa: self
                .mpa_id
                .map(|id| MpaRating::new(id, self.mpa_name.unwrap_or_default())),
            genres: Vec::new(),
            likes: Default::default(),
        })
    }
}

/// Database row for User, without friendships.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            login: row.login,
            name: row.name,
            birthday: row.birthday,
            friends: Default::default(),
        }
    }
}

/// Film-to-genre link with the genre name joined in.
#[derive(Debug, FromRow)]
pub struct FilmGenreRow {
    pub film_id: i64,
    pub genre_id: i64,
    pub name: String,
}

/// One direction of a friendship.
#[derive(Debug, FromRow)]
pub struct FriendshipRow {
    pub user_id: i64,
    pub friend_id: i64,
    pub status: String,
}
