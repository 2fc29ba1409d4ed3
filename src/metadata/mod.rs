pub mod omdb;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;

pub use omdb::OmdbClient;

/// Movie details as reported by a metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieMetadata {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("movie service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("movie service answered with HTTP status {0}")]
    Status(u16),
    #[error("unexpected reply from movie service: {0}")]
    InvalidResponse(String),
    #[error("OMDB_API_KEY is not configured")]
    MissingApiKey,
}

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Looks up movies by title.
///
/// `Ok(None)` is the definitive "no such movie" answer; errors are reserved
/// for lookups that could not be completed.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_metadata(&self, title: &str) -> MetadataResult<Option<MovieMetadata>>;
}
