//! Configuration for the mining pipeline.
//!
//! Loaded from a TOML file; every section has documented defaults so a
//! partial file is valid. Credentials, network, and throttling settings
//! belong to the fetching client and are not modeled here — the core treats
//! its configuration as immutable input for one run.

use crate::error::{MinerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Subreddits the fetching client should mine.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    #[serde(default)]
    pub filters: FiltersConfig,

    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub core_filter: CoreFilterConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// One subreddit query, consumed by the fetching client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,

    #[serde(default = "default_period_days")]
    pub period_days: u32,

    #[serde(default = "default_min_upvotes")]
    pub min_upvotes: i64,

    #[serde(default = "default_max_posts")]
    pub max_posts: u32,

    #[serde(default = "default_max_comments_per_post")]
    pub max_comments_per_post: u32,
}

/// Pain detection phrase filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Case-insensitive substrings a sentence must contain. Empty = keep all.
    #[serde(default)]
    pub include_phrases: Vec<String>,

    /// Case-insensitive substrings that discard a sentence, or the whole
    /// post/comment when matched against its raw text.
    #[serde(default)]
    pub exclude_phrases: Vec<String>,

    /// Minimum character length for a pain statement, before and after
    /// normalization.
    #[serde(default = "default_min_pain_length")]
    pub min_pain_length: usize,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        FiltersConfig {
            include_phrases: Vec::new(),
            exclude_phrases: Vec::new(),
            min_pain_length: default_min_pain_length(),
        }
    }
}

/// Clustering strategy selection and bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Either "tfidf_kmeans" or "simple_hash".
    #[serde(default = "default_clustering_method")]
    pub method: String,

    #[serde(default = "default_k_min")]
    pub k_min: usize,

    #[serde(default = "default_k_max")]
    pub k_max: usize,

    /// Seed for the k-means strategy; fixes the partitioning for a run.
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            method: default_clustering_method(),
            k_min: default_k_min(),
            k_max: default_k_max(),
            random_state: default_random_state(),
        }
    }
}

/// Rules that reject a cluster when the matching disqualifying signal is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRules {
    #[serde(default = "default_true")]
    pub requires_social_network: bool,

    #[serde(default = "default_true")]
    pub requires_marketplace: bool,

    #[serde(default = "default_true")]
    pub requires_realtime_sync: bool,

    #[serde(default = "default_true")]
    pub requires_ai_for_value: bool,
}

impl Default for RejectRules {
    fn default() -> Self {
        RejectRules {
            requires_social_network: true,
            requires_marketplace: true,
            requires_realtime_sync: true,
            requires_ai_for_value: true,
        }
    }
}

/// Thresholds a cluster must stay within to be accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptRules {
    #[serde(default = "default_true")]
    pub solvable_locally: bool,

    #[serde(default = "default_max_screens")]
    pub max_screens: u32,

    #[serde(default = "default_max_user_actions")]
    pub max_user_actions: u32,

    /// Product bar: the value proposition should be explainable this fast.
    /// Informational; no filter rule consumes it yet.
    #[serde(default = "default_value_explained_seconds")]
    pub value_explained_seconds: u32,
}

impl Default for AcceptRules {
    fn default() -> Self {
        AcceptRules {
            solvable_locally: true,
            max_screens: default_max_screens(),
            max_user_actions: default_max_user_actions(),
            value_explained_seconds: default_value_explained_seconds(),
        }
    }
}

/// Core scope filter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreFilterConfig {
    #[serde(default)]
    pub reject_if: RejectRules,

    #[serde(default)]
    pub accept_if: AcceptRules,
}

/// Report sizing, consumed by the output writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_top_clusters")]
    pub top_clusters: usize,

    #[serde(default = "default_examples_per_cluster")]
    pub include_examples_per_cluster: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            top_clusters: default_top_clusters(),
            include_examples_per_cluster: default_examples_per_cluster(),
        }
    }
}

fn default_period_days() -> u32 {
    30
}

fn default_min_upvotes() -> i64 {
    10
}

fn default_max_posts() -> u32 {
    200
}

fn default_max_comments_per_post() -> u32 {
    50
}

fn default_min_pain_length() -> usize {
    12
}

fn default_clustering_method() -> String {
    "tfidf_kmeans".to_string()
}

fn default_k_min() -> usize {
    5
}

fn default_k_max() -> usize {
    20
}

fn default_random_state() -> u64 {
    42
}

fn default_true() -> bool {
    true
}

fn default_max_screens() -> u32 {
    3
}

fn default_max_user_actions() -> u32 {
    3
}

fn default_value_explained_seconds() -> u32 {
    10
}

fn default_top_clusters() -> usize {
    15
}

fn default_examples_per_cluster() -> usize {
    3
}

impl MinerConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            MinerError::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;

        let config: MinerConfig = toml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn check(&self) -> Result<()> {
        match self.clustering.method.as_str() {
            "tfidf_kmeans" | "simple_hash" => {}
            other => return Err(MinerError::UnknownClusteringMethod(other.to_string())),
        }

        if self.clustering.k_min == 0 {
            return Err(MinerError::Config(
                "clustering.k_min must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns non-fatal warnings about questionable settings.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for source in &self.sources {
            if source.max_posts > 500 {
                warnings.push(format!(
                    "Subreddit {}: max_posts={} is high, may take a long time to fetch",
                    source.name, source.max_posts
                ));
            }
            if source.period_days > 90 {
                warnings.push(format!(
                    "Subreddit {}: period_days={} is very long, search may not return accurate results",
                    source.name, source.period_days
                ));
            }
        }

        if self.clustering.k_max < self.clustering.k_min {
            warnings.push(format!(
                "clustering.k_max ({}) < k_min ({}), will use k_min",
                self.clustering.k_max, self.clustering.k_min
            ));
        }

        warnings
    }
}
