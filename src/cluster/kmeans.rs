//! TF-IDF + k-means clustering.
//!
//! Vectorizes normalized pain statements into a TF-IDF matrix over unigrams
//! and bigrams, picks k from a silhouette search around sqrt(n), and runs
//! seeded k-means so a fixed `random_state` reproduces the partitioning.

use lazy_static::lazy_static;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::config::ClusteringConfig;
use crate::error::{MinerError, Result};
use crate::models::{Cluster, PainItem};
use crate::util::is_stop_word;
use crate::TARGET_CLUSTER;

use super::{generate_cluster_label, log_cluster_summary, sort_by_count_desc};

/// Cap on vocabulary size, keeping the most frequent terms.
const MAX_FEATURES: usize = 1000;

/// Terms present in more than this share of documents are dropped.
const MAX_DF_RATIO: f64 = 0.95;

/// How many candidate k values the silhouette search tries above k_min.
const SILHOUETTE_SEARCH_WIDTH: usize = 5;

const KMEANS_MAX_ITERATIONS: u64 = 300;
const KMEANS_RUNS: usize = 10;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Clusters pain items with TF-IDF vectors and seeded k-means.
///
/// Cluster ids are `km_NNN` from the k-means label, before the final
/// count-descending sort.
pub fn cluster_tfidf_kmeans(
    items: Vec<PainItem>,
    config: &ClusteringConfig,
) -> Result<Vec<Cluster>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
    let matrix = vectorize(&texts)?;

    let n_samples = items.len();
    let k = select_k(&matrix, n_samples, config)?;

    debug!(target: TARGET_CLUSTER, "running k-means with k={} over {} samples", k, n_samples);

    let labels = fit_predict(&matrix, k, config.random_state)?;

    let mut groups: BTreeMap<usize, Vec<PainItem>> = BTreeMap::new();
    for (item, label) in items.into_iter().zip(labels.iter()) {
        groups.entry(*label).or_default().push(item);
    }

    let mut clusters: Vec<Cluster> = groups
        .into_iter()
        .map(|(label_id, group)| {
            let label = generate_cluster_label(&group);
            Cluster::new(format!("km_{:03}", label_id), label, group)
        })
        .collect();

    sort_by_count_desc(&mut clusters);
    log_cluster_summary("tfidf_kmeans", &clusters);

    Ok(clusters)
}

/// Chooses k: sqrt(n) clamped into the configured bounds, refined by a
/// bounded silhouette search when the corpus is large enough.
fn select_k(matrix: &Array2<f64>, n_samples: usize, config: &ClusteringConfig) -> Result<usize> {
    let mut k_min = config.k_min.min(n_samples);
    let mut k_max = config.k_max.min(n_samples);

    if k_min >= n_samples {
        k_min = 2.max(n_samples / 2);
    }
    if k_max >= n_samples {
        k_max = k_min.max(n_samples / 2);
    }

    let k_heuristic = (n_samples as f64).sqrt() as usize;
    let mut k_optimal = k_min.max(k_max.min(k_heuristic));

    if n_samples >= 20 && k_max > k_min {
        let mut best_score = -1.0;
        let mut best_k = k_optimal;

        for k in k_min..(k_max + 1).min(k_min + SILHOUETTE_SEARCH_WIDTH) {
            if k >= n_samples {
                break;
            }

            let labels = fit_predict(matrix, k, config.random_state)?;
            let distinct: HashSet<usize> = labels.iter().copied().collect();
            if distinct.len() < 2 {
                continue;
            }

            if let Some(score) = silhouette_score(matrix, labels.as_slice().unwrap_or(&[])) {
                debug!(target: TARGET_CLUSTER, "silhouette for k={}: {:.4}", k, score);
                if score > best_score {
                    best_score = score;
                    best_k = k;
                }
            }
        }

        k_optimal = best_k;
    }

    Ok(k_optimal)
}

fn fit_predict(matrix: &Array2<f64>, k: usize, seed: u64) -> Result<Array1<usize>> {
    let rng = Xoshiro256Plus::seed_from_u64(seed);
    let dataset = DatasetBase::from(matrix.clone());

    let model = KMeans::params_with_rng(k, rng)
        .max_n_iterations(KMEANS_MAX_ITERATIONS)
        .n_runs(KMEANS_RUNS)
        .fit(&dataset)
        .map_err(|e| MinerError::Clustering(format!("k-means fit failed for k={}: {}", k, e)))?;

    Ok(model.predict(matrix))
}

/// Builds a row-normalized TF-IDF matrix over unigrams and bigrams.
///
/// Terms must appear in at least 2 documents; when that leaves an empty
/// vocabulary the threshold relaxes to 1 before giving up.
fn vectorize(texts: &[&str]) -> Result<Array2<f64>> {
    let doc_terms: Vec<Vec<String>> = texts.iter().map(|text| terms_of(text)).collect();

    if let Some(matrix) = build_matrix(&doc_terms, 2) {
        return Ok(matrix);
    }
    if let Some(matrix) = build_matrix(&doc_terms, 1) {
        return Ok(matrix);
    }

    Err(MinerError::Clustering(
        "empty vocabulary, texts contain only stop words".to_string(),
    ))
}

/// Unigrams plus bigrams of the non-stop-word tokens, in document order.
fn terms_of(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    for window in tokens.windows(2) {
        terms.push(format!("{} {}", window[0], window[1]));
    }

    terms
}

fn build_matrix(doc_terms: &[Vec<String>], min_df: usize) -> Option<Array2<f64>> {
    let n_docs = doc_terms.len();

    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    let mut term_freq: HashMap<&str, usize> = HashMap::new();

    for terms in doc_terms {
        let distinct: HashSet<&str> = terms.iter().map(String::as_str).collect();
        for term in distinct {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
        for term in terms {
            *term_freq.entry(term).or_insert(0) += 1;
        }
    }

    let max_df_count = MAX_DF_RATIO * n_docs as f64;
    let mut candidates: Vec<(&str, usize)> = doc_freq
        .iter()
        .filter(|(_, &df)| df >= min_df && df as f64 <= max_df_count)
        .map(|(&term, _)| (term, term_freq[term]))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    // Most frequent terms first; ties broken alphabetically for stability.
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    candidates.truncate(MAX_FEATURES);

    let mut vocab: Vec<&str> = candidates.iter().map(|(term, _)| *term).collect();
    vocab.sort_unstable();

    let index: HashMap<&str, usize> = vocab
        .iter()
        .enumerate()
        .map(|(j, &term)| (term, j))
        .collect();

    let mut matrix = Array2::<f64>::zeros((n_docs, vocab.len()));
    for (i, terms) in doc_terms.iter().enumerate() {
        for term in terms {
            if let Some(&j) = index.get(term.as_str()) {
                matrix[[i, j]] += 1.0;
            }
        }
    }

    // Smoothed idf, then l2 row normalization.
    for (&term, &j) in &index {
        let df = doc_freq[term] as f64;
        let idf = ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0;
        matrix.column_mut(j).mapv_inplace(|tf| tf * idf);
    }

    for mut row in matrix.rows_mut() {
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }

    Some(matrix)
}

/// Mean silhouette coefficient over all samples, with euclidean distances.
///
/// Samples alone in their cluster score 0. Returns `None` when fewer than
/// two clusters are present.
fn silhouette_score(matrix: &Array2<f64>, labels: &[usize]) -> Option<f64> {
    let n = labels.len();
    let distinct: HashSet<usize> = labels.iter().copied().collect();
    if distinct.len() < 2 || n < 2 {
        return None;
    }

    let mut cluster_sizes: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *cluster_sizes.entry(label).or_insert(0) += 1;
    }

    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(matrix, i, j);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if cluster_sizes[&own] == 1 {
            continue;
        }

        let mut intra_sum = 0.0;
        let mut inter_sums: HashMap<usize, f64> = HashMap::new();
        for j in 0..n {
            if i == j {
                continue;
            }
            if labels[j] == own {
                intra_sum += distances[i][j];
            } else {
                *inter_sums.entry(labels[j]).or_insert(0.0) += distances[i][j];
            }
        }

        let a = intra_sum / (cluster_sizes[&own] - 1) as f64;
        let b = inter_sums
            .iter()
            .map(|(label, sum)| sum / cluster_sizes[label] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Some(total / n as f64)
}

fn euclidean(matrix: &Array2<f64>, i: usize, j: usize) -> f64 {
    matrix
        .row(i)
        .iter()
        .zip(matrix.row(j).iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}
