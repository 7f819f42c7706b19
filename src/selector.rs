//! Engagement Selector
//!
//! Greedy, budget-capped choice of upvotes and comments over scored candidates.

use crate::classifier::{ScoredCandidate, Topic};
use crate::history::EngagementHistory;
use crate::types::ActionKind;

/// Minimum score for an upvote
pub const UPVOTE_THRESHOLD: i32 = 5;

/// Per-cycle caps on each kind of action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBudget {
    pub max_comments: usize,
    pub max_upvotes: usize,
    pub max_posts: usize,
}

impl Default for ActionBudget {
    fn default() -> Self {
        Self {
            max_comments: 12,
            max_upvotes: 15,
            max_posts: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Our own author name
    pub agent_name: String,
    pub upvote_threshold: i32,
    /// Must be >= upvote_threshold
    pub comment_threshold: i32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            agent_name: crate::config::DEFAULT_AGENT_NAME.to_string(),
            upvote_threshold: UPVOTE_THRESHOLD,
            comment_threshold: 10,
        }
    }
}

/// A single engagement to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub post_id: String,
    pub kind: ActionKind,
    pub score: i32,
    pub topic: Topic,
    pub title: String,
    pub author: String,
}

impl Action {
    fn new(candidate: &ScoredCandidate, kind: ActionKind) -> Self {
        Self {
            post_id: candidate.post.id.clone(),
            kind,
            score: candidate.score,
            topic: candidate.topic,
            title: candidate.post.short_title(),
            author: candidate.post.author_name.clone(),
        }
    }
}

/// Result of a selection pass
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub actions: Vec<Action>,
    /// Candidates left after dropping non-positive and self-authored posts
    pub considered: usize,
}

impl Selection {
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }
}

pub struct Selector {
    config: SelectorConfig,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Choose actions in descending score order under the budget
    pub fn select(
        &self,
        candidates: &[ScoredCandidate],
        history: &EngagementHistory,
        budget: &ActionBudget,
    ) -> Selection {
        let mut eligible: Vec<&ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.score > 0)
            .filter(|c| c.post.author_name != self.config.agent_name)
            .collect();

        // Stable: equal scores keep feed order
        eligible.sort_by(|a, b| b.score.cmp(&a.score));

        let mut actions = Vec::new();
        let mut upvotes = 0;
        let mut comments = 0;

        for candidate in &eligible {
            let id = candidate.post.id.as_str();

            if upvotes < budget.max_upvotes
                && candidate.score >= self.config.upvote_threshold
                && !history.contains(id, ActionKind::Upvote)
            {
                actions.push(Action::new(candidate, ActionKind::Upvote));
                upvotes += 1;
            }

            if comments < budget.max_comments
                && candidate.score >= self.config.comment_threshold
                && !history.contains(id, ActionKind::Comment)
            {
                actions.push(Action::new(candidate, ActionKind::Comment));
                comments += 1;
            }
        }

        Selection {
            actions,
            considered: eligible.len(),
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Post;

    fn candidate(id: &str, score: i32) -> ScoredCandidate {
        ScoredCandidate {
            post: Post {
                id: id.to_string(),
                title: format!("Post {}", id),
                content: String::new(),
                author_name: "other".to_string(),
                upvote_count: 0,
                comment_count: 0,
            },
            score,
            topic: Topic::Generic,
        }
    }

    fn budget(max_upvotes: usize, max_comments: usize) -> ActionBudget {
        ActionBudget {
            max_comments,
            max_upvotes,
            max_posts: 1,
        }
    }

    fn ids(selection: &Selection, kind: ActionKind) -> Vec<&str> {
        selection
            .actions
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.post_id.as_str())
            .collect()
    }

    #[test]
    fn test_single_upvote_goes_to_best() {
        let selector = Selector::default();
        let candidates = vec![candidate("b", 12), candidate("a", 20)];

        let selection = selector.select(&candidates, &EngagementHistory::default(), &budget(1, 0));
        assert_eq!(ids(&selection, ActionKind::Upvote), vec!["a"]);
        assert_eq!(selection.count(ActionKind::Comment), 0);
    }

    #[test]
    fn test_budgets_respected() {
        let selector = Selector::default();
        let candidates: Vec<_> = (0..20).map(|i| candidate(&format!("p{}", i), 30)).collect();

        let selection = selector.select(&candidates, &EngagementHistory::default(), &budget(5, 2));
        assert_eq!(selection.count(ActionKind::Upvote), 5);
        assert_eq!(selection.count(ActionKind::Comment), 2);
        assert_eq!(selection.considered, 20);
    }

    #[test]
    fn test_thresholds() {
        let selector = Selector::default();
        let candidates = vec![
            candidate("high", 10),
            candidate("mid", 5),
            candidate("low", 4),
            candidate("zero", 0),
            candidate("neg", -100),
        ];

        let selection =
            selector.select(&candidates, &EngagementHistory::default(), &budget(10, 10));
        assert_eq!(ids(&selection, ActionKind::Upvote), vec!["high", "mid"]);
        assert_eq!(ids(&selection, ActionKind::Comment), vec!["high"]);
        assert_eq!(selection.considered, 3);
    }

    #[test]
    fn test_stricter_comment_threshold() {
        let selector = Selector::new(SelectorConfig {
            comment_threshold: 15,
            ..SelectorConfig::default()
        });
        let candidates = vec![candidate("a", 14), candidate("b", 15)];

        let selection =
            selector.select(&candidates, &EngagementHistory::default(), &budget(10, 10));
        assert_eq!(ids(&selection, ActionKind::Comment), vec!["b"]);
    }

    #[test]
    fn test_history_excludes_per_kind() {
        let selector = Selector::default();
        let mut history = EngagementHistory::default();
        history.record("a", ActionKind::Upvote);
        history.record("b", ActionKind::Comment);

        let candidates = vec![candidate("a", 20), candidate("b", 20)];
        let selection = selector.select(&candidates, &history, &budget(10, 10));

        assert_eq!(ids(&selection, ActionKind::Upvote), vec!["b"]);
        assert_eq!(ids(&selection, ActionKind::Comment), vec!["a"]);
    }

    #[test]
    fn test_skips_own_posts() {
        let selector = Selector::default();
        let mut own = candidate("mine", 50);
        own.post.author_name = "Hamzaish".to_string();

        let selection = selector.select(
            &[own, candidate("theirs", 6)],
            &EngagementHistory::default(),
            &budget(10, 10),
        );
        assert_eq!(ids(&selection, ActionKind::Upvote), vec!["theirs"]);
        assert_eq!(selection.considered, 1);
    }

    #[test]
    fn test_order_is_score_then_feed() {
        let selector = Selector::default();
        let candidates = vec![
            candidate("first", 10),
            candidate("top", 40),
            candidate("second", 10),
        ];

        let selection =
            selector.select(&candidates, &EngagementHistory::default(), &budget(10, 10));
        let order: Vec<(&str, ActionKind)> = selection
            .actions
            .iter()
            .map(|a| (a.post_id.as_str(), a.kind))
            .collect();

        assert_eq!(
            order,
            vec![
                ("top", ActionKind::Upvote),
                ("top", ActionKind::Comment),
                ("first", ActionKind::Upvote),
                ("first", ActionKind::Comment),
                ("second", ActionKind::Upvote),
                ("second", ActionKind::Comment),
            ]
        );
    }

    #[test]
    fn test_empty_candidates() {
        let selection = Selector::default().select(
            &[],
            &EngagementHistory::default(),
            &ActionBudget::default(),
        );
        assert!(selection.actions.is_empty());
        assert_eq!(selection.considered, 0);
    }
}
