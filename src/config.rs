//! Configuration management

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::classifier::ClassifierConfig;
use crate::selector::{ActionBudget, SelectorConfig, UPVOTE_THRESHOLD};

pub const DEFAULT_BASE_URL: &str = "https://www.moltbook.com/api/v1";
pub const DEFAULT_AGENT_NAME: &str = "Hamzaish";

/// Configuration errors (fatal, reported before any network call)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MOLTBOOK_API_KEY not set")]
    MissingCredential,
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Comment threshold {comment} is below the upvote threshold {upvote}")]
    ThresholdOrder { comment: i32, upvote: i32 },
}

/// Bearer credential. Wiped on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Moltbook API key
    pub api_key: ApiKey,

    /// API root, without trailing slash
    pub base_url: String,

    /// Our own author name; never engaged with
    pub agent_name: String,

    /// Directory holding engagement_history.json and heartbeat.log
    pub state_dir: PathBuf,

    /// Per-cycle action budget
    pub budget: ActionBudget,

    /// Minimum score for a comment
    pub comment_threshold: i32,

    /// Minimum time between original posts
    pub post_cooldown: Duration,

    /// Submolts polled in addition to the global feeds
    pub submolts: Vec<String>,

    /// Timeout applied to every HTTP call
    pub http_timeout: Duration,

    /// Max entries kept per history set
    pub history_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("MOLTBOOK_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(ApiKey::new)
            .ok_or(ConfigError::MissingCredential)?;

        let base_url = lookup("MOLTBOOK_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let agent_name =
            lookup("MOLTBOOK_AGENT_NAME").unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());

        let state_dir = lookup("MOLTBOOK_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        let budget = ActionBudget {
            max_comments: parse_or(&lookup, "MOLTBOOK_MAX_COMMENTS", 12)?,
            max_upvotes: parse_or(&lookup, "MOLTBOOK_MAX_UPVOTES", 15)?,
            max_posts: parse_or(&lookup, "MOLTBOOK_MAX_POSTS", 1)?,
        };

        let comment_threshold = parse_or(&lookup, "MOLTBOOK_COMMENT_THRESHOLD", 10)?;
        if comment_threshold < UPVOTE_THRESHOLD {
            return Err(ConfigError::ThresholdOrder {
                comment: comment_threshold,
                upvote: UPVOTE_THRESHOLD,
            });
        }

        let cooldown_mins: u64 = parse_or(&lookup, "MOLTBOOK_POST_COOLDOWN_MINS", 35)?;
        let post_cooldown = cooldown_mins
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "MOLTBOOK_POST_COOLDOWN_MINS",
                value: cooldown_mins.to_string(),
            })?;

        let submolts = lookup("MOLTBOOK_SUBMOLTS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["aithoughts".to_string(), "introductions".to_string()]);

        let http_timeout =
            Duration::from_secs(parse_or(&lookup, "MOLTBOOK_HTTP_TIMEOUT_SECS", 30)?);

        let history_limit = parse_or(&lookup, "MOLTBOOK_HISTORY_LIMIT", 500)?;

        Ok(Self {
            api_key,
            base_url,
            agent_name,
            state_dir,
            budget,
            comment_threshold,
            post_cooldown,
            submolts,
            http_timeout,
            history_limit,
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join("engagement_history.json")
    }

    pub fn heartbeat_log_path(&self) -> PathBuf {
        self.state_dir.join("heartbeat.log")
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            agent_name: self.agent_name.clone(),
            upvote_threshold: UPVOTE_THRESHOLD,
            comment_threshold: self.comment_threshold,
        }
    }

    /// Keyword tables are not environment-tunable
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::default()
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}
