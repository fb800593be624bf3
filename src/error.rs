// src/error.rs
// =============================================================================
// Typed errors for the crawler.
//
// Most plumbing code returns anyhow::Result and adds context as it goes.
// The errors below are the ones callers actually need to tell apart:
// - a bad config file stops us before any network traffic
// - an invalid user is handled by the configured failure policy
// - an unparseable count is recovered as 0 by the record builder
//
// A ban (non-200 on the profile call) is NOT an error here: it is a normal
// way for the crawl to end, see crawl::CrawlOutcome.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("config file {} is not valid JSON: {}", .path.display(), .source)]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config is invalid: {0}")]
    ConfigInvalid(String),

    /// The profile payload came back with `ok` false (or no user info at all)
    #[error("user {uid} is invalid or blocked")]
    InvalidUser { uid: String },

    /// A follower/status count we could not turn into a number
    #[error("cannot parse count {raw:?}")]
    Format { raw: String },
}

impl CrawlError {
    /// True for errors that happen before the crawl starts
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            CrawlError::ConfigMissing(_)
                | CrawlError::ConfigMalformed { .. }
                | CrawlError::ConfigInvalid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        assert!(CrawlError::ConfigMissing(PathBuf::from("config.json")).is_config());
        assert!(CrawlError::ConfigInvalid("empty".into()).is_config());
        assert!(!CrawlError::InvalidUser { uid: "1".into() }.is_config());
    }

    #[test]
    fn test_messages_name_the_culprit() {
        let err = CrawlError::InvalidUser { uid: "12345".into() };
        assert_eq!(err.to_string(), "user 12345 is invalid or blocked");

        let err = CrawlError::Format { raw: "abc万".into() };
        assert_eq!(err.to_string(), "cannot parse count \"abc万\"");
    }
}
