//! Moltbook API Client
//!
//! Bearer-authenticated JSON client for the feed, engagement and posting
//! endpoints. Every call is bounded by the client timeout.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::{ApiKey, Config};
use crate::types::{NewPost, Post};

/// Error types for API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// DNS, connection, TLS or timeout
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx, or a 2xx body with `success: false`
    #[error("Rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    New,
    Hot,
}

impl FeedSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSort::New => "new",
            FeedSort::Hot => "hot",
        }
    }
}

/// Where a batch of posts comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Global { sort: FeedSort, limit: u32 },
    Submolt { name: String, sort: FeedSort, limit: u32 },
}

impl FeedSource {
    /// Fetch order used by the heartbeat: new, hot, then each submolt
    pub fn defaults(submolts: &[String]) -> Vec<FeedSource> {
        let mut sources = vec![
            FeedSource::Global { sort: FeedSort::New, limit: 30 },
            FeedSource::Global { sort: FeedSort::Hot, limit: 20 },
        ];
        sources.extend(submolts.iter().map(|name| FeedSource::Submolt {
            name: name.clone(),
            sort: FeedSort::New,
            limit: 10,
        }));
        sources
    }

    pub fn endpoint(&self) -> String {
        match self {
            FeedSource::Global { sort, limit } => {
                format!("posts?sort={}&limit={}", sort.as_str(), limit)
            }
            FeedSource::Submolt { name, sort, limit } => {
                format!("submolts/{}/feed?sort={}&limit={}", name, sort.as_str(), limit)
            }
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Global { sort, .. } => write!(f, "{} feed", sort.as_str()),
            FeedSource::Submolt { name, .. } => write!(f, "m/{}", name),
        }
    }
}

/// Remote operations the heartbeat depends on
#[async_trait]
pub trait MoltbookApi: Send + Sync {
    async fn fetch_feed(&self, source: &FeedSource) -> Result<Vec<Post>, ApiError>;

    async fn upvote(&self, post_id: &str) -> Result<(), ApiError>;

    async fn comment(&self, post_id: &str, content: &str) -> Result<(), ApiError>;

    async fn create_post(&self, post: &NewPost) -> Result<(), ApiError>;

    /// Informational only
    async fn check_dms(&self) -> Result<Value, ApiError>;

    /// Informational only
    async fn profile(&self) -> Result<Value, ApiError>;
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    posts: Vec<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Map one wire entry to a [`Post`]. Entries without a usable id are dropped.
///
/// Ids may be strings or numbers; counts may be integers or floats.
fn decode_post(entry: &Value) -> Option<Post> {
    let id = match entry.get("id")? {
        Value::String(id) if !id.is_empty() => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(Post {
        id,
        title: text("title"),
        content: text("content"),
        author_name: entry
            .pointer("/author/name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        upvote_count: count(entry.get("upvotes")),
        comment_count: count(entry.get("comment_count")),
    })
}

/// Non-negative count, clamped into u32
fn count(value: Option<&Value>) -> u32 {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
        .clamp(0, u32::MAX as i64) as u32
}

/// Decode a feed body into posts. Malformed entries are skipped one by one.
fn parse_feed(body: Value) -> Result<Vec<Post>, ApiError> {
    let feed: FeedResponse =
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if !feed.success {
        return Err(ApiError::Rejected {
            status: 200,
            detail: feed
                .error
                .as_ref()
                .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .unwrap_or_else(|| "success=false".to_string()),
        });
    }

    Ok(feed
        .posts
        .iter()
        .filter_map(|entry| {
            let post = decode_post(entry);
            if post.is_none() {
                debug!("Dropping malformed feed entry: {}", entry);
            }
            post
        })
        .collect())
}

/// Best human-readable reason in an error body
fn error_detail(body: &Value) -> String {
    ["error", "message", "hint"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

fn ensure_success(body: Value) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        Ok(body)
    } else {
        Err(ApiError::Rejected {
            status: 200,
            detail: error_detail(&body),
        })
    }
}

/// HTTP implementation of [`MoltbookApi`]
#[derive(Clone)]
pub struct MoltbookClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl MoltbookClient {
    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create from config
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.api_key.clone(), config.http_timeout)
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Moltbook {} {}", method, endpoint);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(self.api_key.expose())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&text)
                .map(|v| error_detail(&v))
                .unwrap_or(text);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MoltbookApi for MoltbookClient {
    async fn fetch_feed(&self, source: &FeedSource) -> Result<Vec<Post>, ApiError> {
        let body = self.request(Method::GET, &source.endpoint(), None).await?;
        parse_feed(body)
    }

    async fn upvote(&self, post_id: &str) -> Result<(), ApiError> {
        let body = self
            .request(Method::POST, &format!("posts/{}/upvote", post_id), None)
            .await?;
        ensure_success(body).map(|_| ())
    }

    async fn comment(&self, post_id: &str, content: &str) -> Result<(), ApiError> {
        let body = self
            .request(
                Method::POST,
                &format!("posts/{}/comments", post_id),
                Some(serde_json::json!({ "content": content })),
            )
            .await?;
        ensure_success(body).map(|_| ())
    }

    async fn create_post(&self, post: &NewPost) -> Result<(), ApiError> {
        let payload =
            serde_json::to_value(post).map_err(|e| ApiError::Decode(e.to_string()))?;
        let body = self.request(Method::POST, "posts", Some(payload)).await?;
        ensure_success(body).map(|_| ())
    }

    async fn check_dms(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "agents/dm/check", None).await
    }

    async fn profile(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "agents/me", None).await
    }
}
