use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{DbError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    // `.batch` reports users strictly older than this
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default = "default_older_than")]
    pub older_than: u32,
}

fn default_db_path() -> PathBuf { PathBuf::from("users.db") }
fn default_page_size() -> usize { 100 }
fn default_batch_size() -> usize { 50 }
fn default_min_age() -> u32 { 25 }
fn default_older_than() -> u32 { 40 }

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            min_age: default_min_age(),
            older_than: default_older_than(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("PAGINATE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());
        let page_size = env_parse("PAGINATE_PAGE_SIZE").unwrap_or(default_page_size());
        let batch_size = env_parse("PAGINATE_BATCH_SIZE").unwrap_or(default_batch_size());
        let min_age = env_parse("PAGINATE_MIN_AGE").unwrap_or(default_min_age());
        let older_than = env_parse("PAGINATE_OLDER_THAN").unwrap_or(default_older_than());

        Self { db_path, page_size, batch_size, min_age, older_than }
    }

    pub fn from_json(src: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(src).map_err(|e| DbError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// JSON file named by `PAGINATE_CONFIG` if set, otherwise the environment.
    pub fn load() -> Result<Self> {
        match std::env::var("PAGINATE_CONFIG") {
            Ok(path) => Self::from_json(&std::fs::read_to_string(path)?),
            Err(_) => {
                let config = Self::from_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DbError::InvalidPageSize);
        }
        if self.batch_size == 0 {
            return Err(DbError::InvalidBatchSize);
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
