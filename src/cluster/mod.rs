//! Clustering of pain statements.
//!
//! Two interchangeable strategies group extracted [`PainItem`]s into
//! [`Cluster`]s: a deterministic hash grouping over action patterns, and
//! TF-IDF vectorization with k-means. Both produce the same output shape and
//! ordering guarantees, so downstream stages never care which ran.

pub mod hash;
#[cfg(feature = "kmeans")]
pub mod kmeans;
#[cfg(test)]
mod tests;

pub use hash::cluster_simple_hash;
#[cfg(feature = "kmeans")]
pub use kmeans::cluster_tfidf_kmeans;

use tracing::debug;

use crate::config::ClusteringConfig;
use crate::error::{MinerError, Result};
use crate::models::{Cluster, PainItem};
use crate::util::{extract_keywords, to_pascal_case};
use crate::TARGET_CLUSTER;

/// Maximum number of keywords in a generated cluster label.
const MAX_LABEL_WORDS: usize = 4;

/// Label used when a cluster's members yield no usable keywords.
const FALLBACK_LABEL: &str = "MiscellaneousIssues";

/// Clusters pain items with the configured method.
///
/// Returns an empty vector for empty input. Fails on an unknown method
/// name, or when the k-means strategy was compiled out.
pub fn cluster_pain_items(items: Vec<PainItem>, config: &ClusteringConfig) -> Result<Vec<Cluster>> {
    match config.method.as_str() {
        "simple_hash" => Ok(cluster_simple_hash(items)),
        "tfidf_kmeans" => {
            #[cfg(feature = "kmeans")]
            {
                kmeans::cluster_tfidf_kmeans(items, config)
            }
            #[cfg(not(feature = "kmeans"))]
            {
                Err(MinerError::KmeansUnavailable)
            }
        }
        other => Err(MinerError::UnknownClusteringMethod(other.to_string())),
    }
}

/// Configured clusterer, for callers that hold the config once and cluster
/// repeatedly.
pub struct Clusterer {
    config: ClusteringConfig,
}

impl Clusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Clusterer { config }
    }

    pub fn cluster(&self, items: Vec<PainItem>) -> Result<Vec<Cluster>> {
        cluster_pain_items(items, &self.config)
    }
}

/// Generates a short PascalCase label from the most frequent member
/// keywords. Ties keep first-seen order, so the label is deterministic.
pub(crate) fn generate_cluster_label(items: &[PainItem]) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        for keyword in extract_keywords(&item.text) {
            match counts.iter_mut().find(|(kw, _)| *kw == keyword) {
                Some((_, count)) => *count += 1,
                None => counts.push((keyword, 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let top: Vec<&str> = counts
        .iter()
        .take(MAX_LABEL_WORDS)
        .map(|(kw, _)| kw.as_str())
        .collect();

    if top.is_empty() {
        return FALLBACK_LABEL.to_string();
    }

    let label = to_pascal_case(&top.join(" "));
    if label.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        label
    }
}

/// Sorts clusters by descending member count. The sort is stable, so
/// equal-count clusters keep their id order.
pub(crate) fn sort_by_count_desc(clusters: &mut [Cluster]) {
    clusters.sort_by(|a, b| b.count.cmp(&a.count));
}

pub(crate) fn log_cluster_summary(method: &str, clusters: &[Cluster]) {
    debug!(
        target: TARGET_CLUSTER,
        "{} produced {} clusters over {} items",
        method,
        clusters.len(),
        clusters.iter().map(|c| c.count).sum::<usize>()
    );
}
