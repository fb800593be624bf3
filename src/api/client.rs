// src/api/client.rs
// =============================================================================
// HTTP client for the two profile calls and the fans page.
//
// Endpoints:
// - GET https://m.weibo.cn/api/container/getIndex?containerid=100505{uid}
//     -> profile JSON (data.userInfo)
// - GET https://m.weibo.cn/api/container/getIndex?containerid=230283{uid}_-_INFO
//     -> extended info JSON (data.cards)
// - GET https://weibo.cn/{uid}/fans?page=1
//     -> fans page HTML (first page only)
//
// Every request carries a desktop browser User-Agent and, when configured,
// the Cookie header. Certificate verification is turned off because the
// legacy weibo.cn host has served broken chains in the past.
//
// No retries and no request timeout: a hung request blocks the crawl.
// =============================================================================

use super::{extract_follower_uids, ApiResponse, WeiboApi};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/86.0.4240.111 Safari/537.36";

const API_URL: &str = "https://m.weibo.cn/api/container/getIndex";
const FANS_BASE_URL: &str = "https://weibo.cn";

const PROFILE_CONTAINER_PREFIX: &str = "100505";
const INFO_CONTAINER_PREFIX: &str = "230283";
const INFO_CONTAINER_SUFFIX: &str = "_-_INFO";

pub struct WeiboClient {
    client: Client,
    api_url: String,
    fans_base_url: String,
}

impl WeiboClient {
    /// Builds a client for the public Weibo hosts
    pub fn new(cookie: Option<&str>) -> Result<Self> {
        Self::with_endpoints(cookie, API_URL, FANS_BASE_URL)
    }

    /// Same as new(), pointed at other hosts (e.g. a local mirror)
    pub fn with_endpoints(cookie: Option<&str>, api_url: &str, fans_base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(cookie)?)
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            fans_base_url: fans_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn profile_url(&self, uid: &str) -> Result<Url> {
        let container = format!("{}{}", PROFILE_CONTAINER_PREFIX, uid);
        Url::parse_with_params(&self.api_url, &[("containerid", container)])
            .with_context(|| format!("Invalid API URL '{}'", self.api_url))
    }

    fn info_url(&self, uid: &str) -> Result<Url> {
        let container = format!("{}{}{}", INFO_CONTAINER_PREFIX, uid, INFO_CONTAINER_SUFFIX);
        Url::parse_with_params(&self.api_url, &[("containerid", container)])
            .with_context(|| format!("Invalid API URL '{}'", self.api_url))
    }

    fn fans_url(&self, uid: &str) -> Result<Url> {
        let raw = format!("{}/{}/fans?page=1", self.fans_base_url, uid);
        Url::parse(&raw).with_context(|| format!("Invalid fans URL '{}'", raw))
    }

    // GET + lenient JSON parse: a ban page is usually HTML, and we still
    // want its status code
    async fn get_json(&self, url: Url) -> Result<ApiResponse> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(ApiResponse::new(status, body))
    }
}

fn default_headers(cookie: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    if let Some(cookie) = cookie.map(str::trim).filter(|c| !c.is_empty()) {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie).context("Cookie contains invalid header characters")?,
        );
    }

    Ok(headers)
}

#[async_trait]
impl WeiboApi for WeiboClient {
    async fn fetch_profile(&self, uid: &str) -> Result<ApiResponse> {
        let url = self.profile_url(uid)?;
        self.get_json(url).await
    }

    async fn fetch_extended_info(&self, uid: &str) -> Result<ApiResponse> {
        let url = self.info_url(uid)?;
        self.get_json(url).await
    }

    async fn fetch_followers(&self, uid: &str) -> Result<Vec<String>> {
        let url = self.fans_url(uid)?;
        debug!(%url, "GET");
        let html = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        Ok(extract_follower_uids(&html))
    }
}
