//! Engagement History
//!
//! Durable record of posts already upvoted or commented on, plus the time of
//! our last original post. Stored as pretty JSON and replaced atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::types::ActionKind;

/// Default cap per history set
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// History errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt history file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Ids we've engaged with, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementHistory {
    #[serde(default)]
    commented: Vec<String>,
    #[serde(default)]
    upvoted: Vec<String>,
    #[serde(default, with = "timestamp")]
    last_post_time: Option<DateTime<Utc>>,
}

impl EngagementHistory {
    pub fn contains(&self, post_id: &str, kind: ActionKind) -> bool {
        self.set(kind).iter().any(|id| id == post_id)
    }

    /// Mark a post as engaged; no-op if already present
    pub fn record(&mut self, post_id: &str, kind: ActionKind) {
        if self.contains(post_id, kind) {
            return;
        }
        self.set_mut(kind).push(post_id.to_string());
    }

    pub fn mark_posted(&mut self, at: DateTime<Utc>) {
        self.last_post_time = Some(at);
    }

    pub fn last_post_time(&self) -> Option<DateTime<Utc>> {
        self.last_post_time
    }

    pub fn commented(&self) -> &[String] {
        &self.commented
    }

    pub fn upvoted(&self) -> &[String] {
        &self.upvoted
    }

    /// Drop oldest entries beyond `limit` in each set
    pub fn truncate(&mut self, limit: usize) {
        for set in [&mut self.commented, &mut self.upvoted] {
            if set.len() > limit {
                let excess = set.len() - limit;
                set.drain(..excess);
            }
        }
    }

    fn set(&self, kind: ActionKind) -> &Vec<String> {
        match kind {
            ActionKind::Upvote => &self.upvoted,
            ActionKind::Comment => &self.commented,
        }
    }

    fn set_mut(&mut self, kind: ActionKind) -> &mut Vec<String> {
        match kind {
            ActionKind::Upvote => &mut self.upvoted,
            ActionKind::Comment => &mut self.commented,
        }
    }

    /// Collapse duplicate ids left by older writers, keeping first occurrence
    fn dedup(&mut self) {
        for set in [&mut self.commented, &mut self.upvoted] {
            let mut seen = HashSet::new();
            set.retain(|id| seen.insert(id.clone()));
        }
    }
}

/// File-backed history store
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load history; a missing file yields an empty history
    pub fn load(&self) -> Result<EngagementHistory, HistoryError> {
        if !self.path.exists() {
            debug!("No history at {}, starting fresh", self.path.display());
            return Ok(EngagementHistory::default());
        }

        let data = std::fs::read_to_string(&self.path).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut history: EngagementHistory =
            serde_json::from_str(&data).map_err(|source| HistoryError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        history.dedup();

        debug!(
            "Loaded history: {} commented, {} upvoted",
            history.commented.len(),
            history.upvoted.len()
        );
        Ok(history)
    }

    /// Persist history, capped to the configured limit
    pub fn save(&self, history: &EngagementHistory) -> Result<(), HistoryError> {
        let mut capped = history.clone();
        capped.truncate(self.limit);

        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let data = serde_json::to_string_pretty(&capped)?;

        // Write atomically via temp file, flushed to disk before the rename
        let temp_path = self.path.with_extension("json.tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(data.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;

        Ok(())
    }
}

/// RFC 3339 on write; also accepts naive ISO-8601 (read as UTC)
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_some(&t.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            let parsed = parse(&s);
            if parsed.is_none() {
                warn!("Ignoring unparseable last_post_time: {}", s);
            }
            parsed
        }))
    }

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(s) {
            return Some(t.with_timezone(&Utc));
        }
        s.parse::<NaiveDateTime>().ok().map(|n| n.and_utc())
    }
}
