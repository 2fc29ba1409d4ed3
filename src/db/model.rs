use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub director: Option<String>,
    /// Release year exactly as the metadata source reported it.
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

/// A movie row that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub user_id: i64,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

/// Partial update of a movie.
///
/// `None` leaves the stored value alone. `Some(value)` overwrites it; for the
/// optional fields `Some(String::new())` clears the value to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MovieUpdate {
    pub name: Option<String>,
    pub director: Option<String>,
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

impl MovieUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.director.is_none()
            && self.year.is_none()
            && self.poster_url.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;
