//! Per-user movie catalog.
//!
//! `Catalog` combines the entity store with the metadata service. Every
//! mutating operation maps to one store transaction; lookups against the
//! metadata service always finish before that transaction starts.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::{DbError, Movie, MovieUpdate, NewMovie, Repository, User};
use crate::metadata::{MetadataError, MetadataProvider};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("User '{0}' already exists.")]
    DuplicateName(String),
    #[error("User {0} not found.")]
    UnknownUser(i64),
    #[error("Movie {0} not found.")]
    MovieNotFound(i64),
    #[error("Movie '{0}' not found in OMDb.")]
    MetadataNotFound(String),
    #[error("Could not look up movie: {0}")]
    Metadata(#[from] MetadataError),
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub struct Catalog {
    repo: Arc<dyn Repository>,
    metadata: Arc<dyn MetadataProvider>,
}

impl Catalog {
    pub fn new(repo: Arc<dyn Repository>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { repo, metadata }
    }

    pub async fn create_user(&self, name: &str) -> CatalogResult<User> {
        let name = required(name, "User name")?;

        match self.repo.create_user(name).await {
            Ok(user) => {
                info!(user_id = user.id, name = %user.name, "User created");
                Ok(user)
            }
            Err(DbError::AlreadyExists(_)) => {
                warn!(name = %name, "Rejected duplicate user name");
                Err(CatalogError::DuplicateName(name.to_string()))
            }
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn list_users(&self) -> CatalogResult<Vec<User>> {
        self.repo.list_users().await.map_err(storage)
    }

    pub async fn get_user_by_id(&self, id: i64) -> CatalogResult<Option<User>> {
        self.repo.get_user_by_id(id).await.map_err(storage)
    }

    pub async fn get_user_by_name(&self, name: &str) -> CatalogResult<Option<User>> {
        self.repo.get_user_by_name(name.trim()).await.map_err(storage)
    }

    /// Deletes the user and, in the same transaction, all of its movies.
    pub async fn delete_user(&self, id: i64) -> CatalogResult<User> {
        let user = self
            .repo
            .get_user_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(CatalogError::UnknownUser(id))?;

        match self.repo.delete_user(id).await {
            Ok(()) => {
                info!(user_id = id, name = %user.name, "User deleted");
                Ok(user)
            }
            Err(DbError::NotFound(_)) => Err(CatalogError::UnknownUser(id)),
            Err(e) => Err(storage(e)),
        }
    }

    /// Looks `title` up and stores the match in the user's list.
    pub async fn add_movie(&self, user_id: i64, title: &str) -> CatalogResult<Movie> {
        let title = required(title, "Movie title")?;

        if self.repo.get_user_by_id(user_id).await.map_err(storage)?.is_none() {
            warn!(user_id, title = %title, "Movie added for unknown user");
            return Err(CatalogError::UnknownUser(user_id));
        }

        let metadata = match self.metadata.fetch_metadata(title).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                warn!(user_id, title = %title, "No metadata found");
                return Err(CatalogError::MetadataNotFound(title.to_string()));
            }
            Err(e) => {
                error!(user_id, title = %title, error = %e, "Metadata lookup failed");
                return Err(CatalogError::Metadata(e));
            }
        };

        let new_movie = NewMovie {
            user_id,
            name: metadata.title,
            director: metadata.director,
            year: metadata.year,
            poster_url: metadata.poster_url,
        };

        match self.repo.add_movie(&new_movie).await {
            Ok(movie) => {
                info!(user_id, movie_id = movie.id, name = %movie.name, "Movie added");
                Ok(movie)
            }
            // The user was removed between the check and the insert.
            Err(DbError::NotFound(_)) => Err(CatalogError::UnknownUser(user_id)),
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn get_movie(&self, id: i64) -> CatalogResult<Option<Movie>> {
        self.repo.get_movie(id).await.map_err(storage)
    }

    /// Applies the fields set in `update`, leaving the others untouched.
    pub async fn update_movie(&self, movie_id: i64, update: &MovieUpdate) -> CatalogResult<Movie> {
        let mut update = update.clone();
        if let Some(name) = update.name.take() {
            update.name = Some(required(&name, "Movie name")?.to_string());
        }

        if update.is_empty() {
            return self
                .repo
                .get_movie(movie_id)
                .await
                .map_err(storage)?
                .ok_or(CatalogError::MovieNotFound(movie_id));
        }

        match self.repo.update_movie(movie_id, &update).await {
            Ok(movie) => {
                info!(movie_id, name = %movie.name, "Movie updated");
                Ok(movie)
            }
            Err(DbError::NotFound(_)) => {
                warn!(movie_id, "Update of unknown movie");
                Err(CatalogError::MovieNotFound(movie_id))
            }
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn rename_movie(&self, movie_id: i64, new_name: &str) -> CatalogResult<Movie> {
        self.update_movie(movie_id, &MovieUpdate::rename(new_name)).await
    }

    pub async fn delete_movie(&self, movie_id: i64) -> CatalogResult<()> {
        match self.repo.delete_movie(movie_id).await {
            Ok(()) => {
                info!(movie_id, "Movie deleted");
                Ok(())
            }
            Err(DbError::NotFound(_)) => {
                warn!(movie_id, "Delete of unknown movie");
                Err(CatalogError::MovieNotFound(movie_id))
            }
            Err(e) => Err(storage(e)),
        }
    }

    /// Movies owned by `user_id`. An unknown user yields an empty list,
    /// same as a user without movies.
    pub async fn get_movies_by_user(&self, user_id: i64) -> CatalogResult<Vec<Movie>> {
        self.repo.list_movies_by_user(user_id).await.map_err(storage)
    }
}

fn required<'a>(value: &'a str, what: &str) -> CatalogResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::InvalidInput(format!("{} cannot be empty.", what)));
    }
    Ok(value)
}

fn storage(e: DbError) -> CatalogError {
    error!(error = %e, "Storage operation failed");
    CatalogError::Storage(e)
}
