//! Deterministic hash-based clustering.
//!
//! Groups items by a key derived from pain-related action words found in
//! the normalized text. No randomness anywhere, so the same input always
//! produces the same clusters.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::{Cluster, PainItem};
use crate::util::extract_keywords;

use super::{generate_cluster_label, log_cluster_summary, sort_by_count_desc};

lazy_static! {
    /// Action words commonly found in pain statements. Each pattern captures
    /// the matched form; the first alternative that matches wins.
    static ref ACTION_PATTERNS: Vec<Regex> = [
        r"(?i)\b(struggle|struggling)\b",
        r"(?i)\b(forget|forgetting|forgot)\b",
        r"(?i)\b(wish|wishing)\b",
        r"(?i)\b(need|needing)\b",
        r"(?i)\b(want|wanting)\b",
        r"(?i)\b(cant|cannot|can't)\b",
        r"(?i)\b(hard|difficult)\b",
        r"(?i)\b(problem|issue)\b",
        r"(?i)\b(help|helping)\b",
        r"(?i)\b(track|tracking)\b",
        r"(?i)\b(remember|remembering)\b",
        r"(?i)\b(organize|organizing)\b",
        r"(?i)\b(manage|managing)\b",
        r"(?i)\b(focus|focusing)\b",
        r"(?i)\b(procrastinate|procrastinating)\b",
        r"(?i)\b(overwhelm|overwhelming|overwhelmed)\b",
        r"(?i)\b(anxiety|anxious)\b",
        r"(?i)\b(motivation|motivate)\b",
        r"(?i)\b(schedule|scheduling)\b",
        r"(?i)\b(routine|routines)\b",
        r"(?i)\b(habit|habits)\b",
        r"(?i)\b(task|tasks)\b",
        r"(?i)\b(time|timing)\b",
        r"(?i)\b(sleep|sleeping)\b",
        r"(?i)\b(medication|meds)\b",
        r"(?i)\b(reminder|reminders)\b",
        r"(?i)\b(list|lists)\b",
        r"(?i)\b(note|notes)\b",
        r"(?i)\b(app|apps)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Derives the grouping key for one normalized pain statement.
///
/// Matched action words are deduplicated and sorted; the first three join
/// with `_`. When no pattern matches, the first three extracted keywords
/// stand in, and `misc` catches texts with neither.
pub(crate) fn simple_hash_key(text: &str) -> String {
    let mut matches: Vec<String> = ACTION_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].to_lowercase())
        .collect();

    matches.sort();
    matches.dedup();

    if matches.is_empty() {
        let mut keywords: Vec<String> = extract_keywords(text).into_iter().take(3).collect();
        keywords.sort();
        matches = keywords;
    }

    if matches.is_empty() {
        return "misc".to_string();
    }

    matches.truncate(3);
    matches.join("_")
}

/// Clusters pain items by shared hash key.
///
/// Cluster ids are `hash_NNN`, numbered in ascending key order before the
/// final count-descending sort.
pub fn cluster_simple_hash(items: Vec<PainItem>) -> Vec<Cluster> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<String, Vec<PainItem>> = BTreeMap::new();
    for item in items {
        let key = simple_hash_key(&item.text);
        groups.entry(key).or_default().push(item);
    }

    let mut clusters: Vec<Cluster> = groups
        .into_values()
        .enumerate()
        .map(|(i, group)| {
            let label = generate_cluster_label(&group);
            Cluster::new(format!("hash_{:03}", i), label, group)
        })
        .collect();

    sort_by_count_desc(&mut clusters);
    log_cluster_summary("simple_hash", &clusters);

    clusters
}
