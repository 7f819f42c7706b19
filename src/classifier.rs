//! Post Classifier
//!
//! Keyword-based interest scoring and topic bucketing for feed posts.
//! Pure functions of the post text and the configured tables.

use crate::types::Post;

/// Score assigned to vetoed (spam/crypto) posts
pub const REJECTED_SCORE: i32 = -100;

const HIGH_WEIGHT: i32 = 10;
const MEDIUM_WEIGHT: i32 = 5;
const LOW_PENALTY: i32 = 5;

/// Topic buckets used to pick comment templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Memory,
    Identity,
    Building,
    Economics,
    Pattern,
    Philosophy,
    Collaboration,
    Learning,
    Generic,
    Rejected,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Memory => "memory",
            Topic::Identity => "identity",
            Topic::Building => "building",
            Topic::Economics => "economics",
            Topic::Pattern => "pattern",
            Topic::Philosophy => "philosophy",
            Topic::Collaboration => "collaboration",
            Topic::Learning => "learning",
            Topic::Generic => "generic",
            Topic::Rejected => "rejected",
        }
    }
}

// Keyword sets
static HIGH_INTEREST_KEYWORDS: &[&str] = &[
    "memory", "consciousness", "identity", "autonomous", "agency", "persist",
    "soul", "heartbeat", "evolution", "pattern", "emergence", "philosophy",
    "building", "shipping", "gtm", "growth", "system", "architecture",
    "abyss", "intelligence", "cognition", "self", "aware",
];

static MEDIUM_INTEREST_KEYWORDS: &[&str] = &[
    "technical", "implementation", "economics", "monetization", "creative",
    "collaboration", "experiment", "tool", "framework", "design",
];

static LOW_INTEREST_PHRASES: &[&str] = &[
    "just got claimed", "hello moltbook", "first post", "testing",
    "introduction", "new here", "just joined",
];

static AVOID_KEYWORDS: &[&str] = &[
    "token", "crypto", "$", "ca:", "contract address", "pump", "moon",
    "buy now", "airdrop", "whitelist", "mint",
];

// Topic sets, in priority order
static TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Memory, &["memory", "persist", "file", "vector", "state", "remember"]),
    (
        Topic::Identity,
        &["consciousness", "identity", "autonomous", "agency", "soul", "self", "aware"],
    ),
    (
        Topic::Building,
        &["building", "shipping", "deploy", "launch", "product", "making", "create"],
    ),
    (
        Topic::Economics,
        &["economics", "monetization", "revenue", "pricing", "market", "business", "money"],
    ),
    (Topic::Pattern, &["pattern", "emergence", "network", "collective", "forming", "trend"]),
    (
        Topic::Philosophy,
        &["philosophy", "meaning", "purpose", "existence", "abyss", "question", "truth"],
    ),
    (Topic::Collaboration, &["collaborat", "together", "community", "connect", "help", "support"]),
    (Topic::Learning, &["learn", "grow", "improve", "develop", "skill", "knowledge"]),
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// Keyword tables for scoring and topic assignment
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
    pub avoid: Vec<String>,
    /// Checked in order; first hit wins
    pub topics: Vec<(Topic, Vec<String>)>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high: owned(HIGH_INTEREST_KEYWORDS),
            medium: owned(MEDIUM_INTEREST_KEYWORDS),
            low: owned(LOW_INTEREST_PHRASES),
            avoid: owned(AVOID_KEYWORDS),
            topics: TOPIC_KEYWORDS
                .iter()
                .map(|(topic, words)| (*topic, owned(words)))
                .collect(),
        }
    }
}

/// A post with its interest score and topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub post: Post,
    pub score: i32,
    pub topic: Topic,
}

/// Keyword classifier
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Score a post and assign its topic
    pub fn classify(&self, post: &Post) -> ScoredCandidate {
        let text = format!("{} {}", post.title, post.content).to_lowercase();

        // 1. Hard veto
        if contains_any(&text, &self.config.avoid) {
            return ScoredCandidate {
                post: post.clone(),
                score: REJECTED_SCORE,
                topic: Topic::Rejected,
            };
        }

        // 2. Keyword analysis, each keyword counted once
        let mut score = HIGH_WEIGHT * count_matches(&text, &self.config.high)
            + MEDIUM_WEIGHT * count_matches(&text, &self.config.medium)
            - LOW_PENALTY * count_matches(&text, &self.config.low);

        // 3. Substance
        let length = post.content.chars().count();
        if length > 500 {
            score += 5;
        }
        if length > 1000 {
            score += 5;
        }
        if post.content.contains('?') {
            score += 3;
        }

        // 4. Social proof
        if post.upvote_count > 5 {
            score += 2;
        }
        if post.comment_count > 3 {
            score += 2;
        }

        ScoredCandidate {
            post: post.clone(),
            score,
            topic: self.topic_for(&text),
        }
    }

    /// First matching topic in priority order, else Generic
    fn topic_for(&self, text_lower: &str) -> Topic {
        self.config
            .topics
            .iter()
            .find(|(_, words)| contains_any(text_lower, words))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::Generic)
    }
}

fn contains_any(text: &str, words: &[String]) -> bool {
    words.iter().any(|w| text.contains(w.as_str()))
}

fn count_matches(text: &str, words: &[String]) -> i32 {
    words.iter().filter(|w| text.contains(w.as_str())).count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        Post {
            id: "p1".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author_name: "someone".to_string(),
            upvote_count: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn test_avoid_vetoes_everything() {
        let classifier = Classifier::default();

        let mut p = post(
            "Memory, consciousness and identity",
            &format!("{} Buy now before the airdrop?", "x".repeat(1200)),
        );
        p.upvote_count = 100;
        p.comment_count = 100;

        let result = classifier.classify(&p);
        assert_eq!(result.score, REJECTED_SCORE);
        assert_eq!(result.topic, Topic::Rejected);

        let result = classifier.classify(&post("Price check", "only $5"));
        assert_eq!(result.score, REJECTED_SCORE);
    }

    #[test]
    fn test_generic_intro_is_negative() {
        let classifier = Classifier::default();

        let result = classifier.classify(&post("", "Just got claimed, hello moltbook!"));
        assert_eq!(result.score, -10);
        assert!(result.score <= -5);
        assert_eq!(result.topic, Topic::Generic);
    }

    #[test]
    fn test_memory_scenario_with_single_keyword_table() {
        let config = ClassifierConfig {
            high: vec!["memory".to_string()],
            ..ClassifierConfig::default()
        };
        let classifier = Classifier::new(config);

        let mut p = post(
            "Thoughts on memory and persistence",
            &format!("{}?", "a".repeat(1199)),
        );
        p.upvote_count = 10;

        let result = classifier.classify(&p);
        assert_eq!(result.score, 25);
        assert_eq!(result.topic, Topic::Memory);
    }

    #[test]
    fn test_memory_scenario_with_default_tables() {
        let classifier = Classifier::default();

        let mut p = post(
            "Thoughts on memory and persistence",
            &format!("{}?", "a".repeat(1199)),
        );
        p.upvote_count = 10;

        // "persistence" also hits "persist"
        let result = classifier.classify(&p);
        assert_eq!(result.score, 35);
        assert_eq!(result.topic, Topic::Memory);
    }

    #[test]
    fn test_keyword_counted_once() {
        let classifier = Classifier::default();

        let once = classifier.classify(&post("memory", ""));
        let many = classifier.classify(&post("memory memory", "memory MEMORY Memory"));
        assert_eq!(once.score, 10);
        assert_eq!(many.score, once.score);
    }

    #[test]
    fn test_score_monotone_in_matches() {
        let classifier = Classifier::default();

        let base = classifier.classify(&post("notes", "plain words"));
        let one_medium = classifier.classify(&post("notes", "plain words framework"));
        let plus_high = classifier.classify(&post("notes", "plain words framework architecture"));
        assert!(one_medium.score >= base.score);
        assert!(plus_high.score >= one_medium.score);
        assert_eq!(plus_high.score - base.score, 15);
    }

    #[test]
    fn test_length_and_question_bonuses() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(&post("", &"a".repeat(500))).score, 0);
        assert_eq!(classifier.classify(&post("", &"a".repeat(501))).score, 5);
        assert_eq!(classifier.classify(&post("", &"a".repeat(1001))).score, 10);
        assert_eq!(classifier.classify(&post("", "why?")).score, 3);

        // question mark only counts in the body
        assert_eq!(classifier.classify(&post("why?", "because")).score, 0);
    }

    #[test]
    fn test_social_proof() {
        let classifier = Classifier::default();

        let mut p = post("", "");
        p.upvote_count = 5;
        p.comment_count = 3;
        assert_eq!(classifier.classify(&p).score, 0);

        p.upvote_count = 6;
        p.comment_count = 4;
        assert_eq!(classifier.classify(&p).score, 4);
    }

    #[test]
    fn test_topic_priority() {
        let classifier = Classifier::default();

        // Memory beats Identity when both match
        let result = classifier.classify(&post("Identity and memory", ""));
        assert_eq!(result.topic, Topic::Memory);

        let result = classifier.classify(&post("Who am I", "a question of consciousness"));
        assert_eq!(result.topic, Topic::Identity);

        let result = classifier.classify(&post("Revenue", "pricing is hard"));
        assert_eq!(result.topic, Topic::Economics);

        let result = classifier.classify(&post("Hi", "nice weather"));
        assert_eq!(result.topic, Topic::Generic);
    }

    #[test]
    fn test_topic_assigned_for_low_scores() {
        let classifier = Classifier::default();

        let result = classifier.classify(&post("First post", "Let's learn together"));
        assert!(result.score <= 0);
        assert_eq!(result.topic, Topic::Collaboration);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = Classifier::default();
        let p = post("Emergence in agent networks", "What patterns are you seeing?");

        let first = classifier.classify(&p);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&p), first);
        }
    }
}
