//! Heartbeat Controller
//!
//! One cycle, start to finish:
//!
//! ```text
//! FetchFeeds ─► MergeDedup ─► ClassifyScore ─► Select ─► Execute
//!                                                            │
//!                        Done ◄── Persist ◄── MaybeCreatePost ◄┘
//! ```
//!
//! Every phase degrades into the next with whatever it managed to produce.
//! Only history I/O is fatal.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{FeedSource, MoltbookApi};
use crate::classifier::{Classifier, ClassifierConfig, ScoredCandidate};
use crate::config::Config;
use crate::executor::{ActionExecutor, ExecutionReport, ExecutorConfig};
use crate::history::{EngagementHistory, HistoryStore, DEFAULT_HISTORY_LIMIT};
use crate::selector::{ActionBudget, Selector, SelectorConfig};
use crate::templates;
use crate::types::Post;

/// Cycle phases, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FetchFeeds,
    MergeDedup,
    ClassifyScore,
    Select,
    Execute,
    MaybeCreatePost,
    Persist,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FetchFeeds => "fetch_feeds",
            Phase::MergeDedup => "merge_dedup",
            Phase::ClassifyScore => "classify_score",
            Phase::Select => "select",
            Phase::Execute => "execute",
            Phase::MaybeCreatePost => "maybe_create_post",
            Phase::Persist => "persist",
            Phase::Done => "done",
        }
    }
}

/// Everything a cycle needs besides the API
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    pub history_path: PathBuf,
    pub history_limit: usize,
    /// Summary log; None disables the file sink
    pub log_path: Option<PathBuf>,
    pub sources: Vec<FeedSource>,
    pub budget: ActionBudget,
    pub post_cooldown: Duration,
    pub classifier: ClassifierConfig,
    pub selector: SelectorConfig,
    pub executor: ExecutorConfig,
}

impl HeartbeatConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            history_path: config.history_path(),
            history_limit: config.history_limit,
            log_path: Some(config.heartbeat_log_path()),
            sources: FeedSource::defaults(&config.submolts),
            budget: config.budget,
            post_cooldown: config.post_cooldown,
            classifier: config.classifier_config(),
            selector: config.selector_config(),
            executor: ExecutorConfig::default(),
        }
    }

    /// Defaults rooted at `state_dir`
    pub fn in_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            history_path: state_dir.join("engagement_history.json"),
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_path: Some(state_dir.join("heartbeat.log")),
            sources: FeedSource::defaults(&[
                "aithoughts".to_string(),
                "introductions".to_string(),
            ]),
            budget: ActionBudget::default(),
            post_cooldown: Duration::from_secs(35 * 60),
            classifier: ClassifierConfig::default(),
            selector: SelectorConfig::default(),
            executor: ExecutorConfig::default(),
        }
    }
}

/// Outcome of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub posts_analyzed: usize,
    pub candidates_considered: usize,
    pub upvotes_made: usize,
    pub comments_made: usize,
    pub posts_made: usize,
    pub failures: usize,
    pub engagements: Vec<String>,
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heartbeat complete.")?;
        writeln!(f, "- Posts analyzed: {}", self.posts_analyzed)?;
        writeln!(f, "- Posts worth considering: {}", self.candidates_considered)?;
        writeln!(f, "- Upvotes: {}", self.upvotes_made)?;
        writeln!(f, "- Comments: {}", self.comments_made)?;
        writeln!(f, "- Posts created: {}", self.posts_made)?;
        if self.failures > 0 {
            writeln!(f, "- Failed actions: {}", self.failures)?;
        }
        writeln!(f)?;
        writeln!(f, "Engagements:")?;
        if self.engagements.is_empty() {
            write!(f, "None this cycle")
        } else {
            write!(f, "{}", self.engagements.join("\n"))
        }
    }
}

/// Concatenate feeds, keeping the first copy of each post id
pub fn merge_feeds(batches: Vec<Vec<Post>>) -> Vec<Post> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|post| seen.insert(post.id.clone()))
        .collect()
}

/// Post when we never have, or the cooldown has fully elapsed
pub fn should_post(history: &EngagementHistory, now: DateTime<Utc>, cooldown: Duration) -> bool {
    match history.last_post_time() {
        None => true,
        Some(last) => match (now - last).to_std() {
            Ok(elapsed) => elapsed > cooldown,
            // last post in the future: clock skew, wait
            Err(_) => false,
        },
    }
}

pub struct Heartbeat<A> {
    api: A,
    store: HistoryStore,
    classifier: Classifier,
    selector: Selector,
    executor: ActionExecutor,
    config: HeartbeatConfig,
}

impl<A: MoltbookApi> Heartbeat<A> {
    pub fn new(api: A, config: HeartbeatConfig) -> Self {
        Self {
            store: HistoryStore::new(config.history_path.clone(), config.history_limit),
            classifier: Classifier::new(config.classifier.clone()),
            selector: Selector::new(config.selector.clone()),
            executor: ActionExecutor::new(config.executor.clone()),
            api,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run one cycle now
    pub async fn run(&self) -> Result<CycleSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run one cycle with a fixed clock
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<CycleSummary> {
        info!("Heartbeat starting at {}", now.to_rfc3339());

        let mut history = self
            .store
            .load()
            .with_context(|| format!("loading {}", self.store.path().display()))?;

        self.check_inbox().await;

        enter(Phase::FetchFeeds);
        let batches = self.fetch_feeds().await;

        enter(Phase::MergeDedup);
        let posts = merge_feeds(batches);
        info!("Total unique posts: {}", posts.len());

        enter(Phase::ClassifyScore);
        let candidates: Vec<ScoredCandidate> =
            posts.iter().map(|p| self.classifier.classify(p)).collect();

        enter(Phase::Select);
        let selection = self.selector.select(&candidates, &history, &self.config.budget);
        info!(
            "{} posts worth considering, {} actions selected",
            selection.considered,
            selection.actions.len()
        );

        enter(Phase::Execute);
        let mut report = ExecutionReport::default();
        self.executor
            .execute(&self.api, &selection.actions, &mut history, &mut report)
            .await;

        enter(Phase::MaybeCreatePost);
        self.maybe_create_post(&posts, now, &mut history, &mut report).await;

        enter(Phase::Persist);
        self.store
            .save(&history)
            .with_context(|| format!("saving {}", self.store.path().display()))?;

        enter(Phase::Done);
        let summary = CycleSummary {
            posts_analyzed: posts.len(),
            candidates_considered: selection.considered,
            upvotes_made: report.upvotes,
            comments_made: report.comments,
            posts_made: report.posts,
            failures: report.failures,
            engagements: report.engagements,
        };

        info!(
            "Heartbeat complete: analyzed={}, considered={}, upvotes={}, comments={}, posts={}",
            summary.posts_analyzed,
            summary.candidates_considered,
            summary.upvotes_made,
            summary.comments_made,
            summary.posts_made
        );
        self.append_log(now, &summary);

        Ok(summary)
    }

    /// DM and profile lookups; logged, never acted on
    async fn check_inbox(&self) {
        match self.api.check_dms().await {
            Ok(status) => info!("DM status: {}", status),
            Err(e) => warn!("DM check failed: {}", e),
        }
        match self.api.profile().await {
            Ok(profile) => debug!("Profile: {}", profile),
            Err(e) => warn!("Profile lookup failed: {}", e),
        }
    }

    async fn fetch_feeds(&self) -> Vec<Vec<Post>> {
        let mut batches = Vec::with_capacity(self.config.sources.len());
        for source in &self.config.sources {
            match self.api.fetch_feed(source).await {
                Ok(posts) => {
                    info!("{}: {} posts", source, posts.len());
                    batches.push(posts);
                }
                Err(e) => warn!("Failed to fetch {}: {}", source, e),
            }
        }
        batches
    }

    async fn maybe_create_post(
        &self,
        posts: &[Post],
        now: DateTime<Utc>,
        history: &mut EngagementHistory,
        report: &mut ExecutionReport,
    ) {
        if self.config.budget.max_posts == 0 {
            debug!("Post budget is zero, skipping post");
            return;
        }
        if !should_post(history, now, self.config.post_cooldown) {
            info!("Skipping post (cooldown active)");
            return;
        }

        let hot = templates::hot_topic(posts, &self.classifier.config().high);
        let post = templates::post_for(now, &hot);
        info!("Creating post '{}' (hot topic: {})", post.title, hot);
        self.executor
            .publish(&self.api, &post, now, history, report)
            .await;
    }

    fn append_log(&self, now: DateTime<Utc>, summary: &CycleSummary) {
        if let Some(path) = &self.config.log_path {
            if let Err(e) = append_summary(path, now, summary) {
                warn!("Failed to append heartbeat log {}: {}", path.display(), e);
            }
        }
    }
}

fn append_summary(path: &Path, now: DateTime<Utc>, summary: &CycleSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    write!(file, "\n[{}]\n{}\n", now.to_rfc3339(), summary)
}

fn enter(phase: Phase) {
    debug!(phase = phase.as_str(), "Heartbeat phase");
}
