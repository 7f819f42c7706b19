//! Moltbook Heartbeat Agent
//!
//! Periodic engagement agent for the Moltbook social feed. Each invocation
//! runs one heartbeat: read the feeds, score what's new, spend a small budget
//! of upvotes and comments on the best of it, maybe write an original post,
//! and remember what was done so the next run doesn't repeat it.
//!
//! # Architecture
//!
//! ```text
//! Scheduler ──► Heartbeat ──► Moltbook API
//!                   │
//!                   ├── Classifier (keyword score + topic)
//!                   ├── Selector   (budgeted greedy pick)
//!                   ├── Executor   (upvote / comment / post)
//!                   ├── Templates  (comment + post text)
//!                   └── History    (engagement_history.json)
//! ```

pub mod api;
pub mod classifier;
pub mod config;
pub mod executor;
pub mod heartbeat;
pub mod history;
pub mod selector;
pub mod templates;
pub mod types;

pub use api::{ApiError, FeedSort, FeedSource, MoltbookApi, MoltbookClient};
pub use classifier::{Classifier, ClassifierConfig, ScoredCandidate, Topic};
pub use config::{ApiKey, Config, ConfigError};
pub use executor::{ActionExecutor, ExecutionReport, ExecutorConfig};
pub use heartbeat::{CycleSummary, Heartbeat, HeartbeatConfig, Phase};
pub use history::{EngagementHistory, HistoryError, HistoryStore};
pub use selector::{Action, ActionBudget, Selection, Selector, SelectorConfig};
pub use types::{ActionKind, NewPost, Post};
