use serde::Deserialize;
use std::path::Path;

pub const API_KEY_ENV: &str = "OMDB_API_KEY";
pub const DATABASE_ENV: &str = "MOVIWEB_DATABASE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_sqlite")]
    pub sqlite: SqliteConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite: default_sqlite(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbConfig {
    #[serde(default = "default_omdb_url")]
    pub url: String,
    #[serde(default)]
    pub apikey: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_omdb_timeout")]
    pub timeout: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            url: default_omdb_url(),
            apikey: None,
            timeout: default_omdb_timeout(),
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_sqlite() -> SqliteConfig {
    SqliteConfig {
        filename: "moviweb.db".to_string(),
    }
}

fn default_omdb_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_omdb_timeout() -> u64 {
    10
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    /// Reads `path` if given, otherwise the default file when it exists,
    /// otherwise built-in defaults. Environment overrides are applied last.
    pub fn load(path: Option<&str>, default_path: &str) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(default_path).exists() => Self::from_file(default_path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.omdb.apikey = Some(key);
        }
        if let Some(filename) = lookup(DATABASE_ENV).filter(|f| !f.is_empty()) {
            self.database.sqlite.filename = filename;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_key = self
            .omdb
            .apikey
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        if !has_key {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn get_database_path(&self) -> &str {
        &self.database.sqlite.filename
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No OMDb API key configured; set OMDB_API_KEY or omdb.apikey")]
    MissingApiKey,
}
