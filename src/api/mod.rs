// src/api/mod.rs
// =============================================================================
// Everything that talks to Weibo.
//
// Submodules:
// - client: the real HTTP client (m.weibo.cn JSON API + weibo.cn fans page)
// - followers: pulls follower uids out of the fans page HTML
//
// The crawl loop only sees the WeiboApi trait, so tests can script the
// responses instead of hitting the network.
// =============================================================================

mod client;
mod followers;

pub use client::WeiboClient;
pub use followers::extract_follower_uids;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A JSON payload together with the HTTP status it came with
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body, or Value::Null when the body wasn't JSON
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Any non-200 answer from the profile endpoint means we've been
    /// rate-limited or blocked
    pub fn is_ban_signal(&self) -> bool {
        self.status != 200
    }

    /// The API's own success flag (`"ok": 1` or `"ok": true`)
    pub fn is_ok(&self) -> bool {
        match self.body.get("ok") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }
}

/// The three calls the crawler makes per user
///
/// None of them retry. Transport errors come back as Err; HTTP-level
/// failures come back as an ApiResponse with the status set.
#[async_trait]
pub trait WeiboApi: Send + Sync {
    /// User container: screen name, counts, verification
    async fn fetch_profile(&self, uid: &str) -> Result<ApiResponse>;

    /// Info container: birthday, location, education... as cards
    async fn fetch_extended_info(&self, uid: &str) -> Result<ApiResponse>;

    /// First page of the user's fans, as uids in page order
    async fn fetch_followers(&self, uid: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ban_signal_is_any_non_200() {
        assert!(!ApiResponse::new(200, json!({"ok": 1})).is_ban_signal());
        assert!(ApiResponse::new(403, Value::Null).is_ban_signal());
        assert!(ApiResponse::new(418, Value::Null).is_ban_signal());
        assert!(ApiResponse::new(302, Value::Null).is_ban_signal());
    }

    #[test]
    fn test_ok_flag_accepts_number_and_bool() {
        assert!(ApiResponse::new(200, json!({"ok": 1})).is_ok());
        assert!(ApiResponse::new(200, json!({"ok": true})).is_ok());
        assert!(!ApiResponse::new(200, json!({"ok": 0})).is_ok());
        assert!(!ApiResponse::new(200, json!({"ok": false})).is_ok());
        assert!(!ApiResponse::new(200, json!({})).is_ok());
        assert!(!ApiResponse::new(200, Value::Null).is_ok());
    }
}
