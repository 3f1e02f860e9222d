//! SQLite-backed film store implementation.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use entities::{Film, FriendshipStatus, Genre, MpaRating, User, GENRES, MPA_RATINGS};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction,
};

use crate::schema::{FilmGenreRow, FilmRow, FriendshipRow, UserRow, SCHEMA_SQL};
use crate::{FilmStore, FilmStoreError, FilmStoreResult};

/// How long a connection waits for another writer to release the database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable film store backed by a SQLite connection pool.
///
/// Multi-statement reads run inside one transaction so a film's likes and a
/// user's friendships are read from the same snapshot as the record itself.
/// Write transactions open with a write statement, so concurrent writers
/// queue on the busy timeout instead of failing on a lock upgrade.
#[derive(Debug, Clone)]
pub struct SqliteFilmStore {
    pool: SqlitePool,
}

impl SqliteFilmStore {
    /// Connects to `database_url` and prepares the schema.
    pub async fn connect(database_url: &str) -> FilmStoreResult<Self> {
        let mut connect_options = SqliteConnectOptions::from_str(database_url)?
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        let mut pool_options = SqlitePoolOptions::new().max_connections(5);

        if database_url.contains(":memory:") {
            // Every connection to `:memory:` opens its own database.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = pool_options.connect_with(connect_options).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and prepares the schema.
    pub async fn from_pool(pool: SqlitePool) -> FilmStoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Creates missing tables and seeds the reference data.
    async fn run_migrations(&self) -> FilmStoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;

        for (id, name) in MPA_RATINGS {
            sqlx::query("INSERT OR IGNORE INTO mpa_ratings (id, name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&self.pool)
                .await?;
        }
        for (id, name) in GENRES {
            sqlx::query("INSERT OR IGNORE INTO genres (id, name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&self.pool)
                .await?;
        }

        tracing::debug!("SQLite schema ready");
        Ok(())
    }

    /// Writes `status` on both directions of a friendship in one transaction.
    async fn write_friendship(
        &self,
        user_id: i64,
        friend_id: i64,
        status: FriendshipStatus,
    ) -> FilmStoreResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;
        lock_user(&mut tx, friend_id).await?;

        for (from, to) in [(user_id, friend_id), (friend_id, user_id)] {
            sqlx::query(
                "INSERT INTO friendships (user_id, friend_id, status) VALUES (?, ?, ?)
                 ON CONFLICT (user_id, friend_id) DO UPDATE SET status = excluded.status",
            )
            .bind(from)
            .bind(to)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
}

/// Checks that a film exists with a no-op write. As the first statement of a
/// transaction it takes the write lock before anything is read.
async fn lock_film(conn: &mut SqliteConnection, id: i64) -> FilmStoreResult<()> {
    let result = sqlx::query("UPDATE films SET name = name WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FilmStoreError::not_found("Film", id));
    }
    Ok(())
}

/// Checks that a user exists with a no-op write. See [`lock_film`].
async fn lock_user(conn: &mut SqliteConnection, id: i64) -> FilmStoreResult<()> {
    let result = sqlx::query("UPDATE users SET login = login WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(FilmStoreError::not_found("User", id));
    }
    Ok(())
}

async fn require_user(conn: &mut SqliteConnection, id: i64) -> FilmStoreResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    found
        .map(|_| ())
        .ok_or_else(|| FilmStoreError::not_found("User", id))
}

async fn insert_genres(
    tx: &mut Transaction<'_, Sqlite>,
    film_id: i64,
    genres: &[Genre],
) -> FilmStoreResult<()> {
    for genre in genres {
        sqlx::query("INSERT OR IGNORE INTO film_genres (film_id, genre_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(genre.id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Attaches genres and likes to film rows, preserving row order.
async fn hydrate_films(
    conn: &mut SqliteConnection,
    rows: Vec<FilmRow>,
) -> FilmStoreResult<Vec<Film>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut films = rows
        .into_iter()
        .map(FilmRow::into_film)
        .collect::<FilmStoreResult<Vec<_>>>()?;
    let ids: Vec<i64> = films.iter().map(|f| f.id).collect();

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT fg.film_id, fg.genre_id, g.name FROM film_genres fg
         JOIN genres g ON g.id = fg.genre_id
         WHERE fg.film_id IN (",
    );
    push_id_list(&mut query, &ids);
    query.push(") ORDER BY fg.genre_id");
    let genre_rows = query
        .build_query_as::<FilmGenreRow>()
        .fetch_all(&mut *conn)
        .await?;

    let mut query =
        QueryBuilder::<Sqlite>::new("SELECT film_id, user_id FROM film_likes WHERE film_id IN (");
    push_id_list(&mut query, &ids);
    query.push(")");
    let like_rows = query
        .build_query_as::<(i64, i64)>()
        .fetch_all(&mut *conn)
        .await?;

    let mut genres: HashMap<i64, Vec<Genre>> = HashMap::new();
    for row in genre_rows {
        genres
            .entry(row.film_id)
            .or_default()
            .push(Genre::new(row.genre_id, row.name));
    }

    let mut likes: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for (film_id, user_id) in like_rows {
        likes.entry(film_id).or_default().insert(user_id);
    }

    for film in &mut films {
        film.genres = genres.remove(&film.id).unwrap_or_default();
        film.likes = likes.remove(&film.id).unwrap_or_default();
    }
    Ok(films)
}

/// Attaches friendship maps to user rows, preserving row order.
async fn hydrate_users(
    conn: &mut SqliteConnection,
    rows: Vec<UserRow>,
) -> FilmStoreResult<Vec<User>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut users: Vec<User> = rows.into_iter().map(User::from).collect();
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT user_id, friend_id, status FROM friendships WHERE user_id IN (",
    );
    push_id_list(&mut query, &ids);
    query.push(")");
    let friendship_rows = query
        .build_query_as::<FriendshipRow>()
        .fetch_all(&mut *conn)
        .await?;

    let mut friendships: HashMap<i64, Vec<(i64, FriendshipStatus)>> = HashMap::new();
    for row in friendship_rows {
        let status = FriendshipStatus::parse(&row.status).ok_or_else(|| {
            FilmStoreError::Corrupt(format!("unknown friendship status {:?}", row.status))
        })?;
        friendships
            .entry(row.user_id)
            .or_default()
            .push((row.friend_id, status));
    }

    for user in &mut users {
        if let Some(edges) = friendships.remove(&user.id) {
            user.friends = edges.into_iter().collect();
        }
    }
    Ok(users)
}

#[async_trait]
impl FilmStore for SqliteFilmStore {
    // =========================================================================
    // Film operations
    // =========================================================================

    async fn create_film(&self, film: Film) -> FilmStoreResult<Film> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO films (name, description, release_date, duration, mpa_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.as_ref().map(|m| m.id))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_genres(&mut tx, id, &film.genres).await?;
        tx.commit().await?;

        self.get_film(id)
            .await?
            .ok_or_else(|| FilmStoreError::not_found("Film", id))
    }

    async fn get_film(&self, id: i64) -> FilmStoreResult<Option<Film>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<FilmRow> = sqlx::query_as(
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.mpa_id,
                    m.name AS mpa_name
             FROM films f
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id
             WHERE f.id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let film = match row {
            Some(row) => hydrate_films(&mut tx, vec![row]).await?.pop(),
            None => None,
        };
        tx.commit().await?;
        Ok(film)
    }

    async fn list_films(&self) -> FilmStoreResult<Vec<Film>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<FilmRow> = sqlx::query_as(
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.mpa_id,
                    m.name AS mpa_name
             FROM films f
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id
             ORDER BY f.id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let films = hydrate_films(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(films)
    }

    async fn update_film(&self, film: Film) -> FilmStoreResult<Film> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE films SET name = ?, description = ?, release_date = ?, duration = ?, mpa_id = ?
             WHERE id = ?",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.as_ref().map(|m| m.id))
        .bind(film.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(FilmStoreError::not_found("Film", film.id));
        }

        sqlx::query("DELETE FROM film_genres WHERE film_id = ?")
            .bind(film.id)
            .execute(&mut *tx)
            .await?;
        insert_genres(&mut tx, film.id, &film.genres).await?;
        tx.commit().await?;

        self.get_film(film.id)
            .await?
            .ok_or_else(|| FilmStoreError::not_found("Film", film.id))
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_film(&mut tx, film_id).await?;
        require_user(&mut tx, user_id).await?;

        sqlx::query("INSERT OR IGNORE INTO film_likes (film_id, user_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> FilmStoreResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_film(&mut tx, film_id).await?;
        require_user(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM film_likes WHERE film_id = ? AND user_id = ?")
            .bind(film_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn popular_films(&self, count: usize) -> FilmStoreResult<Vec<Film>> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let mut tx = self.pool.begin().await?;

        let rows: Vec<FilmRow> = sqlx::query_as(
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.mpa_id,
                    m.name AS mpa_name
             FROM films f
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id
             LEFT JOIN film_likes fl ON fl.film_id = f.id
             GROUP BY f.id
             ORDER BY COUNT(fl.user_id) DESC, f.id ASC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let films = hydrate_films(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(films)
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> FilmStoreResult<User> {
        let id = sqlx::query("INSERT INTO users (email, login, name, birthday) VALUES (?, ?, ?, ?)")
            .bind(&user.email)
            .bind(&user.login)
            .bind(&user.name)
            .bind(user.birthday)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(User {
            id,
            friends: Default::default(),
            ..user
        })
    }

    async fn get_user(&self, id: i64) -> FilmStoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<UserRow> = sqlx::query_as(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u WHERE u.id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let user = match row {
            Some(row) => hydrate_users(&mut tx, vec![row]).await?.pop(),
            None => None,
        };
        tx.commit().await?;
        Ok(user)
    }

    async fn list_users(&self) -> FilmStoreResult<Vec<User>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u ORDER BY u.id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let users = hydrate_users(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(users)
    }

    async fn update_user(&self, user: User) -> FilmStoreResult<User> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, login = ?, name = ?, birthday = ? WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(FilmStoreError::not_found("User", user.id));
        }

        self.get_user(user.id)
            .await?
            .ok_or_else(|| FilmStoreError::not_found("User", user.id))
    }

    // =========================================================================
    // Friendship operations
    // =========================================================================

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        self.write_friendship(user_id, friend_id, FriendshipStatus::Unconfirmed)
            .await
    }

    async fn confirm_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        self.write_friendship(user_id, friend_id, FriendshipStatus::Confirmed)
            .await
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> FilmStoreResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;
        lock_user(&mut tx, friend_id).await?;

        sqlx::query(
            "DELETE FROM friendships
             WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)",
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(friend_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_friends(&self, user_id: i64) -> FilmStoreResult<Vec<User>> {
        let mut tx = self.pool.begin().await?;
        require_user(&mut tx, user_id).await?;

        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u
             JOIN friendships f ON f.friend_id = u.id
             WHERE f.user_id = ?
             ORDER BY u.id",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let users = hydrate_users(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(users)
    }

    async fn list_common_friends(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> FilmStoreResult<Vec<User>> {
        let mut tx = self.pool.begin().await?;
        require_user(&mut tx, user_id).await?;
        require_user(&mut tx, other_id).await?;

        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u
             JOIN friendships f1 ON f1.friend_id = u.id
             JOIN friendships f2 ON f2.friend_id = u.id
             WHERE f1.user_id = ? AND f2.user_id = ?
             ORDER BY u.id",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&mut *tx)
        .await?;

        let users = hydrate_users(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(users)
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    async fn list_genres(&self) -> FilmStoreResult<Vec<Genre>> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Genre::new(id, name))
            .collect())
    }

    async fn get_genre(&self, id: i64) -> FilmStoreResult<Option<Genre>> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT id, name FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, name)| Genre::new(id, name)))
    }

    async fn list_mpa_ratings(&self) -> FilmStoreResult<Vec<MpaRating>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM mpa_ratings ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| MpaRating::new(id, name))
            .collect())
    }

    async fn get_mpa_rating(&self, id: i64) -> FilmStoreResult<Option<MpaRating>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM mpa_ratings WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, name)| MpaRating::new(id, name)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;

    async fn store() -> SqliteFilmStore {
        SqliteFilmStore::connect("sqlite::memory:").await.unwrap()
    }

    fn film(name: &str) -> Film {
        Film::new(name, NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(), 136)
    }

    fn user(login: &str) -> User {
        User::new(format!("{login}@example.com"), login).with_name(login)
    }

    #[tokio::test]
    async fn test_film_round_trip() {
        let store = store().await;

        let created = store
            .create_film(
                film("The Matrix")
                    .with_description("Wake up, Neo")
                    .with_mpa(MpaRating::with_id(4))
                    .with_genres(vec![Genre::with_id(6), Genre::with_id(4), Genre::with_id(6)]),
            )
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.mpa, Some(MpaRating::new(4, "R")));
        assert_eq!(
            created.genres,
            vec![Genre::new(4, "Thriller"), Genre::new(6, "Action")]
        );

        let fetched = store.get_film(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get_film(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_film_replaces_genres_and_keeps_likes() {
        let store = store().await;
        let alice = store.create_user(user("alice")).await.unwrap();
        let created = store
            .create_film(film("The Matrix").with_genres(vec![Genre::with_id(6)]))
            .await
            .unwrap();
        store.add_like(created.id, alice.id).await.unwrap();

        let mut changed = created.clone();
        changed.genres = vec![Genre::with_id(2)];
        changed.mpa = Some(MpaRating::with_id(1));
        let updated = store.update_film(changed).await.unwrap();

        assert_eq!(updated.genres, vec![Genre::new(2, "Drama")]);
        assert_eq!(updated.mpa, Some(MpaRating::new(1, "G")));
        assert_eq!(updated.likes, BTreeSet::from([alice.id]));

        let mut ghost = film("Ghost");
        ghost.id = 42;
        assert!(store.update_film(ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_likes_and_popularity() {
        let store = store().await;
        let mut user_ids = Vec::new();
        for login in ["u1", "u2", "u3"] {
            user_ids.push(store.create_user(user(login)).await.unwrap().id);
        }
        let a = store.create_film(film("A")).await.unwrap();
        let b = store.create_film(film("B")).await.unwrap();
        let c = store.create_film(film("C")).await.unwrap();

        for user_id in &user_ids {
            store.add_like(c.id, *user_id).await.unwrap();
        }
        store.add_like(a.id, user_ids[0]).await.unwrap();
        store.add_like(a.id, user_ids[0]).await.unwrap();
        store.add_like(b.id, user_ids[1]).await.unwrap();

        let popular = store.popular_films(10).await.unwrap();
        let ids: Vec<i64> = popular.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
        assert_eq!(popular[0].like_count(), 3);
        assert_eq!(popular[1].like_count(), 1);

        store.remove_like(c.id, user_ids[0]).await.unwrap();
        store.remove_like(c.id, user_ids[0]).await.unwrap();
        let fetched = store.get_film(c.id).await.unwrap().unwrap();
        assert_eq!(fetched.like_count(), 2);

        assert_eq!(store.popular_films(1).await.unwrap().len(), 1);
        assert!(store.popular_films(0).await.unwrap().is_empty());
        assert!(store.add_like(99, user_ids[0]).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_likes_require_existing_user() {
        let store = store().await;
        let created = store.create_film(film("The Matrix")).await.unwrap();

        let err = store.add_like(created.id, 99).await.unwrap_err();
        assert!(matches!(err, FilmStoreError::NotFound { entity_type: "User", .. }));
        let err = store.remove_like(created.id, 99).await.unwrap_err();
        assert!(matches!(err, FilmStoreError::NotFound { entity_type: "User", .. }));

        let fetched = store.get_film(created.id).await.unwrap().unwrap();
        assert!(fetched.likes.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite:{}?mode=rwc",
            dir.path().join("reelmate.db").display()
        );
        let store = Arc::new(SqliteFilmStore::connect(&url).await.unwrap());

        let mut ids = Vec::new();
        for i in 0..10 {
            ids.push(store.create_user(user(&format!("user{i}"))).await.unwrap().id);
        }
        let film_id = store.create_film(film("The Matrix")).await.unwrap().id;

        let mut handles = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move { store.add_friend(a, b).await }));
            }
        }
        for &user_id in &ids {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.add_like(film_id, user_id).await }));
        }

        let mut errors = Vec::new();
        for handle in handles {
            if let Err(err) = handle.await.unwrap() {
                errors.push(err.to_string());
            }
        }
        assert!(errors.is_empty(), "concurrent writes failed: {errors:?}");

        let users = store.list_users().await.unwrap();
        for user in &users {
            assert_eq!(user.friends.len(), ids.len() - 1);
            for (&other, &status) in &user.friends {
                let other = users.iter().find(|u| u.id == other).unwrap();
                assert_eq!(other.friendship_with(user.id), Some(status));
            }
        }

        let fetched = store.get_film(film_id).await.unwrap().unwrap();
        assert_eq!(fetched.like_count(), ids.len());
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let store = store().await;
        let birthday = NaiveDate::from_ymd_opt(1990, 7, 14).unwrap();

        let created = store
            .create_user(user("alice").with_birthday(birthday))
            .await
            .unwrap();
        let fetched = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.birthday, Some(birthday));

        let mut changed = fetched.clone();
        changed.name = "Alice".to_string();
        let updated = store.update_user(changed).await.unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(store.list_users().await.unwrap().len(), 1);

        let mut ghost = user("ghost");
        ghost.id = 42;
        assert!(store.update_user(ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_friendship_lifecycle() {
        let store = store().await;
        let alice = store.create_user(user("alice")).await.unwrap();
        let bob = store.create_user(user("bob")).await.unwrap();

        store.add_friend(alice.id, bob.id).await.unwrap();
        let b = store.get_user(bob.id).await.unwrap().unwrap();
        assert_eq!(b.friendship_with(alice.id), Some(FriendshipStatus::Unconfirmed));

        store.confirm_friend(alice.id, bob.id).await.unwrap();
        let users = store.list_users().await.unwrap();
        assert_eq!(users[0].friendship_with(bob.id), Some(FriendshipStatus::Confirmed));
        assert_eq!(users[1].friendship_with(alice.id), Some(FriendshipStatus::Confirmed));

        let friends = store.list_friends(alice.id).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, bob.id);

        store.remove_friend(bob.id, alice.id).await.unwrap();
        assert!(store.list_friends(alice.id).await.unwrap().is_empty());
        assert!(store.list_friends(bob.id).await.unwrap().is_empty());

        assert!(store.add_friend(alice.id, 99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_common_friends() {
        let store = store().await;
        let mut ids = Vec::new();
        for login in ["a", "b", "c", "d", "e"] {
            ids.push(store.create_user(user(login)).await.unwrap().id);
        }

        store.add_friend(ids[0], ids[2]).await.unwrap();
        store.add_friend(ids[0], ids[3]).await.unwrap();
        store.add_friend(ids[1], ids[3]).await.unwrap();
        store.add_friend(ids[1], ids[4]).await.unwrap();

        let common = store.list_common_friends(ids[0], ids[1]).await.unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].id, ids[3]);
        // Friends of the common friend are loaded too.
        assert_eq!(common[0].friends.len(), 2);
    }

    #[tokio::test]
    async fn test_reference_data_seeded_once() {
        let store = store().await;
        store.run_migrations().await.unwrap();

        assert_eq!(store.list_genres().await.unwrap(), Genre::all());
        assert_eq!(store.list_mpa_ratings().await.unwrap(), MpaRating::all());
        assert_eq!(
            store.get_mpa_rating(5).await.unwrap(),
            Some(MpaRating::new(5, "NC-17"))
        );
        assert!(store.get_genre(0).await.unwrap().is_none());
    }
}
