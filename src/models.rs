use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a pain statement was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Post,
    Comment,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Post => "post",
            SourceType::Comment => "comment",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complexity rating for an MVP: XS < S < M.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MvpComplexity {
    #[serde(rename = "XS")]
    Xs,
    S,
    M,
}

/// The category of minimal app that would address a cluster's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Reminder,
    Checklist,
    Timer,
    Log,
    Note,
    Habit,
    Calculator,
    Reference,
    Utility,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Reminder => "reminder",
            ShapeType::Checklist => "checklist",
            ShapeType::Timer => "timer",
            ShapeType::Log => "log",
            ShapeType::Note => "note",
            ShapeType::Habit => "habit",
            ShapeType::Calculator => "calculator",
            ShapeType::Reference => "reference",
            ShapeType::Utility => "utility",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw Reddit post as supplied by the fetching collaborator.
///
/// Already filtered upstream by score/age/count policy; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub selftext: String,
    pub score: i64,
    pub created_utc: f64,
    pub url: String,
    pub num_comments: u32,
}

/// A raw Reddit comment as supplied by the fetching collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,
    pub post_id: String,
    pub subreddit: String,
    pub body: String,
    pub score: i64,
    pub created_utc: f64,
    pub permalink: String,
}

/// A single extracted pain statement.
///
/// Created once by the extractor and never mutated afterward. The id is a
/// deterministic hash of (parent id, source kind, sentence index), so the
/// same input always yields the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainItem {
    pub id: String,
    pub subreddit: String,
    pub source_type: SourceType,
    pub post_id: String,
    pub score: i64,
    pub created_utc: DateTime<Utc>,
    /// Normalized statement text; always at least `min_pain_length` chars.
    pub text: String,
    pub url: String,
    pub raw_text: String,
}

/// A non-empty group of pain statements expressing the same problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: String,
    pub label: String,
    pub count: usize,
    /// Up to 5 representative texts, highest-scored members first.
    pub example_texts: Vec<String>,
    /// All members, sorted by descending score.
    pub items: Vec<PainItem>,
    pub avg_score: f64,
    pub total_score: i64,
}

impl Cluster {
    /// Builds a cluster, sorting members by descending score and computing
    /// the derived count/score fields so they are never stale.
    pub fn new(cluster_id: String, label: String, mut items: Vec<PainItem>) -> Self {
        items.sort_by(|a, b| b.score.cmp(&a.score));

        let count = items.len();
        let total_score: i64 = items.iter().map(|item| item.score).sum();
        let avg_score = if count > 0 {
            total_score as f64 / count as f64
        } else {
            0.0
        };
        let example_texts = items
            .iter()
            .take(5)
            .map(|item| item.text.clone())
            .collect();

        Cluster {
            cluster_id,
            label,
            count,
            example_texts,
            items,
            avg_score,
            total_score,
        }
    }
}

/// Inferred solution shape for a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionShape {
    pub shape_type: ShapeType,
    /// Keywords that led to this shape, capped at 5.
    pub keywords: Vec<String>,
    pub requires_social: bool,
    pub requires_marketplace: bool,
    pub requires_realtime: bool,
    pub requires_ai: bool,
    pub estimated_screens: u32,
    pub estimated_actions: u32,
    /// True iff none of the four disqualifying signals matched.
    pub solvable_locally: bool,
}

/// Outcome of running the core filter over one cluster.
///
/// Rejection is a first-class, explained result, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResult {
    pub cluster: Cluster,
    pub solution_shape: SolutionShape,
    pub passed: bool,
    pub rejection_reasons: Vec<String>,
}

/// Evidence backing a generated idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub count: usize,
    pub total_score: i64,
    /// Average member score, rounded to one decimal place.
    pub avg_score: f64,
    /// Up to 5 distinct URLs, highest-scored members first.
    pub example_urls: Vec<String>,
}

/// A synthesized app idea. Immutable after creation; the pipeline sorts the
/// idea collection externally and never mutates individual ideas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppIdea {
    pub idea_name: String,
    pub problem_statement: String,
    pub target_user: String,
    pub core_functions: Vec<String>,
    pub screens: Vec<String>,
    pub local_data: Vec<String>,
    pub minimal_notifications: Vec<String>,
    pub mvp_complexity: MvpComplexity,
    pub evidence: Evidence,
    pub cluster: Cluster,
}
