use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{MetadataError, MetadataProvider, MetadataResult, MovieMetadata};

/// In-process stand-in for OMDb.
#[derive(Default)]
pub struct StaticMetadata {
    movies: HashMap<String, MovieMetadata>,
    calls: AtomicUsize,
    failing_status: Option<u16>,
}

impl StaticMetadata {
    pub fn with(mut self, title: &str, director: Option<&str>, year: Option<&str>) -> Self {
        self.movies.insert(
            title.to_string(),
            MovieMetadata {
                title: title.to_string(),
                director: director.map(str::to_string),
                year: year.map(str::to_string),
                poster_url: None,
            },
        );
        self
    }

    /// Every lookup fails as if OMDb answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            failing_status: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StaticMetadata {
    async fn fetch_metadata(&self, title: &str) -> MetadataResult<Option<MovieMetadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.failing_status {
            return Err(MetadataError::Status(status));
        }
        Ok(self.movies.get(title).cloned())
    }
}
