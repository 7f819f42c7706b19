//! Shared domain types

use serde::{Deserialize, Serialize};

/// A post as fetched from a feed. Read-only snapshot for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub upvote_count: u32,
    pub comment_count: u32,
}

impl Post {
    /// Title truncated for log and summary lines
    pub fn short_title(&self) -> String {
        self.title.chars().take(50).collect()
    }
}

/// Kind of engagement recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Upvote,
    Comment,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Upvote => "upvote",
            ActionKind::Comment => "comment",
        }
    }
}

/// Payload for creating an original post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub submolt: String,
    pub title: String,
    pub content: String,
}
