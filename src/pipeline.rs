//! End-to-end pipeline orchestration.
//!
//! Runs extraction, clustering, feasibility filtering, and idea synthesis
//! over already-fetched Reddit content, in that order. Empty intermediate
//! results are warnings, not errors: the run completes with whatever made
//! it through.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cluster::cluster_pain_items;
use crate::config::MinerConfig;
use crate::core_filter::CoreFilter;
use crate::error::Result;
use crate::extract::PainExtractor;
use crate::ideas::{rank_ideas, IdeaGenerator};
use crate::models::{AppIdea, Cluster, RawComment, RawPost};
use crate::{TARGET_CLUSTER, TARGET_EXTRACT, TARGET_FILTER, TARGET_IDEAS};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub pain_item_count: usize,
    /// All clusters, including ones the feasibility filter rejected.
    pub clusters: Vec<Cluster>,
    /// Ranked ideas from the passing clusters, best-evidenced first.
    pub ideas: Vec<AppIdea>,
}

/// Runs the full mining pipeline over fetched posts and comments.
pub fn run_pipeline(
    posts: &[RawPost],
    comments: &[RawComment],
    config: &MinerConfig,
) -> Result<PipelineOutput> {
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let extractor = PainExtractor::new(&config.filters)?;
    let pain_items = extractor.extract_all(posts, comments);
    info!(target: TARGET_EXTRACT, "Extracted {} pain statements", pain_items.len());

    if pain_items.is_empty() {
        warn!(
            target: TARGET_EXTRACT,
            "No pain statements extracted. Try adjusting include_phrases or min_pain_length."
        );
        return Ok(PipelineOutput {
            pain_item_count: 0,
            clusters: Vec::new(),
            ideas: Vec::new(),
        });
    }

    let pain_item_count = pain_items.len();

    let clusters = cluster_pain_items(pain_items, &config.clustering)?;
    info!(target: TARGET_CLUSTER, "Created {} clusters", clusters.len());

    if clusters.is_empty() {
        warn!(target: TARGET_CLUSTER, "No clusters created.");
        return Ok(PipelineOutput {
            pain_item_count,
            clusters,
            ideas: Vec::new(),
        });
    }

    info!(target: TARGET_FILTER, "Filtering clusters for feasibility...");
    let core_filter = CoreFilter::new(config.core_filter.clone());
    let passing = core_filter.get_passing_clusters(clusters.clone());
    info!(target: TARGET_FILTER, "{} clusters passed filters", passing.len());

    info!(target: TARGET_IDEAS, "Generating app ideas...");
    let mut ideas = IdeaGenerator::new().generate_all(passing);
    rank_ideas(&mut ideas);
    info!(target: TARGET_IDEAS, "Generated {} app ideas", ideas.len());

    Ok(PipelineOutput {
        pain_item_count,
        clusters,
        ideas,
    })
}
