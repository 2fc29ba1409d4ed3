use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{MetadataError, MetadataProvider, MetadataResult, MovieMetadata};
use crate::config::OmdbConfig;

/// OMDb fills fields it has no data for with this marker.
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbReply {
    response: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Builds a client, refusing to do so without an API key.
    pub fn new(config: &OmdbConfig) -> MetadataResult<Self> {
        let api_key = config
            .apikey
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(MetadataError::MissingApiKey)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn fetch_metadata(&self, title: &str) -> MetadataResult<Option<MovieMetadata>> {
        debug!(title = %title, "Querying OMDb");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(title = %title, status = status.as_u16(), "OMDb request failed");
            return Err(MetadataError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: OmdbReply = serde_json::from_str(&body)
            .map_err(|e| MetadataError::InvalidResponse(e.to_string()))?;

        parse_reply(reply, title)
    }
}

fn parse_reply(reply: OmdbReply, title: &str) -> MetadataResult<Option<MovieMetadata>> {
    if reply.response != "True" {
        debug!(
            title = %title,
            reason = reply.error.as_deref().unwrap_or("none given"),
            "OMDb has no match"
        );
        return Ok(None);
    }

    let found_title = present(reply.title).ok_or_else(|| {
        MetadataError::InvalidResponse(format!("match for '{}' has no title", title))
    })?;

    Ok(Some(MovieMetadata {
        title: found_title,
        director: present(reply.director),
        year: present(reply.year),
        poster_url: present(reply.poster),
    }))
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}
