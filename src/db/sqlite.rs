use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

const MOVIE_COLUMNS: &str = "id, user_id, name, director, year, poster_url";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        debug!("In-memory database initialized");

        Ok(repo)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl UserRepo for SqliteRepository {
    async fn create_user(&self, name: &str) -> DbResult<User> {
        let mut tx = self.pool.begin().await?;

        let done = sqlx::query("INSERT INTO users (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::AlreadyExists(format!("User name: {}", name))
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        tx.commit().await?;

        Ok(User {
            id: done.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn list_users(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get_user_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_name(&self, name: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        // Explicit so the cascade holds even on a connection without foreign keys.
        sqlx::query("DELETE FROM movies WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let done = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if done.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::NotFound(format!("User not found: {}", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn add_movie(&self, movie: &NewMovie) -> DbResult<Movie> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE id = ?")
            .bind(movie.user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if owner.is_none() {
            tx.rollback().await?;
            return Err(DbError::NotFound(format!("User not found: {}", movie.user_id)));
        }

        let done = sqlx::query(
            "INSERT INTO movies (user_id, name, director, year, poster_url)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(movie.user_id)
        .bind(&movie.name)
        .bind(&movie.director)
        .bind(&movie.year)
        .bind(&movie.poster_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Movie {
            id: done.last_insert_rowid(),
            user_id: movie.user_id,
            name: movie.name.clone(),
            director: movie.director.clone(),
            year: movie.year.clone(),
            poster_url: movie.poster_url.clone(),
        })
    }

    async fn get_movie(&self, id: i64) -> DbResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE id = ?",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn list_movies_by_user(&self, user_id: i64) -> DbResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE user_id = ? ORDER BY id",
            MOVIE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn update_movie(&self, id: i64, update: &MovieUpdate) -> DbResult<Movie> {
        let mut tx = self.pool.begin().await?;

        // Optional columns: a set-but-empty value is stored as NULL.
        let done = sqlx::query(
            "UPDATE movies SET
                name = COALESCE(?, name),
                director = CASE WHEN ? THEN NULLIF(?, '') ELSE director END,
                year = CASE WHEN ? THEN NULLIF(?, '') ELSE year END,
                poster_url = CASE WHEN ? THEN NULLIF(?, '') ELSE poster_url END
             WHERE id = ?",
        )
        .bind(&update.name)
        .bind(update.director.is_some())
        .bind(&update.director)
        .bind(update.year.is_some())
        .bind(&update.year)
        .bind(update.poster_url.is_some())
        .bind(&update.poster_url)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if done.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::NotFound(format!("Movie not found: {}", id)));
        }

        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE id = ?",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(movie)
    }

    async fn delete_movie(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let done = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if done.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::NotFound(format!("Movie not found: {}", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
