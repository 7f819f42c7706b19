//! Action Executor
//!
//! Runs selected actions one at a time. History is only touched on a
//! confirmed success; failures are logged and the run continues.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

use crate::api::MoltbookApi;
use crate::history::EngagementHistory;
use crate::selector::Action;
use crate::templates;
use crate::types::{ActionKind, NewPost};

/// Pause after each write, per action kind
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub upvote_delay: Duration,
    pub comment_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            upvote_delay: Duration::from_millis(500),
            comment_delay: Duration::from_millis(1000),
        }
    }
}

impl ExecutorConfig {
    /// No pauses (tests)
    pub fn immediate() -> Self {
        Self {
            upvote_delay: Duration::ZERO,
            comment_delay: Duration::ZERO,
        }
    }
}

/// What actually happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub upvotes: usize,
    pub comments: usize,
    pub posts: usize,
    pub failures: usize,
    /// Human-readable line per success
    pub engagements: Vec<String>,
}

pub struct ActionExecutor {
    config: ExecutorConfig,
}

impl ActionExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run actions in order, recording successes into `history`
    pub async fn execute<A>(
        &self,
        api: &A,
        actions: &[Action],
        history: &mut EngagementHistory,
        report: &mut ExecutionReport,
    ) where
        A: MoltbookApi + ?Sized,
    {
        for action in actions {
            let (result, delay) = match action.kind {
                ActionKind::Upvote => {
                    (api.upvote(&action.post_id).await, self.config.upvote_delay)
                }
                ActionKind::Comment => {
                    let text = templates::comment_for(&action.post_id, action.topic);
                    (api.comment(&action.post_id, text).await, self.config.comment_delay)
                }
            };

            match result {
                Ok(()) => {
                    history.record(&action.post_id, action.kind);
                    match action.kind {
                        ActionKind::Upvote => {
                            info!(
                                "Upvoted: '{}' by {} (score: {})",
                                action.title, action.author, action.score
                            );
                            report.upvotes += 1;
                            report
                                .engagements
                                .push(format!("Upvoted: {} by {}", action.title, action.author));
                        }
                        ActionKind::Comment => {
                            info!(
                                "Commented on: '{}' by {} ({})",
                                action.title,
                                action.author,
                                action.topic.as_str()
                            );
                            report.comments += 1;
                            report
                                .engagements
                                .push(format!("Commented: {} by {}", action.title, action.author));
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "{} failed for post {}: {}",
                        action.kind.as_str(),
                        action.post_id,
                        e
                    );
                    report.failures += 1;
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Create an original post; sets last_post_time on success
    pub async fn publish<A>(
        &self,
        api: &A,
        post: &NewPost,
        now: DateTime<Utc>,
        history: &mut EngagementHistory,
        report: &mut ExecutionReport,
    ) -> bool
    where
        A: MoltbookApi + ?Sized,
    {
        match api.create_post(post).await {
            Ok(()) => {
                info!("Posted: '{}' to {}", post.title, post.submolt);
                history.mark_posted(now);
                report.posts += 1;
                report.engagements.push(format!("Posted: {}", post.title));
                true
            }
            Err(e) => {
                warn!("Post failed: {}", e);
                report.failures += 1;
                false
            }
        }
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}
