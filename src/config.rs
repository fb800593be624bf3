// src/config.rs
// =============================================================================
// Loads config.json.
//
// Example:
//   {
//     "cookie": "SUB=...",
//     "user_id_list": ["1669879400", 1223178222],
//     "user_num": 100
//   }
//
// Only `user_id_list` is required. Everything else has a default, see the
// field docs below. The file is read once at startup; a missing or broken
// file stops the program before any request is made.
// =============================================================================

use crate::error::CrawlError;
use crate::normalize::OutputCharset;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when a profile comes back with `ok: false`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidUserPolicy {
    /// Stop the whole crawl (the historical behaviour)
    #[default]
    Abort,
    /// Log it and move on to the next uid
    Skip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sent as the Cookie header on every request when present
    #[serde(default)]
    pub cookie: Option<String>,

    /// Seed uids, crawled in this order
    #[serde(deserialize_with = "uid_list")]
    pub user_id_list: Vec<String>,

    /// How many users to collect; defaults to the seed count
    #[serde(default)]
    pub user_num: Option<usize>,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default)]
    pub on_invalid_user: InvalidUserPolicy,

    /// Skip uids that already have a row in the dataset
    #[serde(default)]
    pub skip_recorded: bool,

    #[serde(default)]
    pub output_charset: OutputCharset,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("weibo").join("users.csv")
}

// uids show up both as strings and as bare numbers in hand-written configs
fn uid_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Uid {
        Text(String),
        Number(u64),
    }

    let raw = Vec::<Uid>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|uid| match uid {
            Uid::Text(s) => s.trim().to_string(),
            Uid::Number(n) => n.to_string(),
        })
        .collect())
}

impl Config {
    /// Reads and validates a config file
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        if !path.is_file() {
            return Err(CrawlError::ConfigMissing(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CrawlError::ConfigInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content).map_err(|e| match e {
            CrawlError::ConfigMalformed { source, .. } => CrawlError::ConfigMalformed {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates config JSON
    pub fn from_json(content: &str) -> Result<Self, CrawlError> {
        let config: Config =
            serde_json::from_str(content).map_err(|source| CrawlError::ConfigMalformed {
                path: PathBuf::new(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Number of users the crawl should collect
    pub fn population_target(&self) -> usize {
        self.user_num.unwrap_or(self.user_id_list.len())
    }

    fn validate(&self) -> Result<(), CrawlError> {
        if self.user_id_list.iter().any(|uid| uid.is_empty()) {
            return Err(CrawlError::ConfigInvalid(
                "user_id_list contains an empty uid".to_string(),
            ));
        }
        if self.user_id_list.is_empty() && self.population_target() > 0 {
            return Err(CrawlError::ConfigInvalid(
                "user_id_list is empty but user_num asks for users".to_string(),
            ));
        }
        Ok(())
    }
}
