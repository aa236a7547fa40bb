use chrono::Utc;

use super::hash::simple_hash_key;
use super::*;
use crate::config::ClusteringConfig;
use crate::models::{PainItem, SourceType};

fn item(id: &str, score: i64, text: &str) -> PainItem {
    PainItem {
        id: id.to_string(),
        subreddit: "ADHD".to_string(),
        source_type: SourceType::Post,
        post_id: format!("p{}", id),
        score,
        created_utc: Utc::now(),
        text: text.to_string(),
        url: format!("http://example.com/{}", id),
        raw_text: text.to_string(),
    }
}

fn sample_items() -> Vec<PainItem> {
    vec![
        item("1", 50, "i struggle with focus at work"),
        item("2", 30, "i struggle with concentration"),
        item("3", 20, "i keep forgetting my appointments"),
        item("4", 40, "forgetting tasks happens to me daily"),
        item("5", 15, "i wish there was a reminder app"),
    ]
}

mod hash_key {
    use super::*;

    #[test]
    fn detects_struggle() {
        let key = simple_hash_key("i struggle with staying focused");
        assert!(key.contains("struggle"));
    }

    #[test]
    fn detects_inflected_forms() {
        let key = simple_hash_key("i keep forgetting my appointments");
        assert!(key.contains("forgetting"));
    }

    #[test]
    fn joins_multiple_matches_sorted() {
        let key = simple_hash_key("managing tasks is hard for me");
        // "hard", "managing", "tasks" match; sorted and joined.
        assert_eq!(key, "hard_managing_tasks");
    }

    #[test]
    fn caps_key_at_three_words() {
        let key = simple_hash_key("i struggle and forget tasks on my schedule and lists");
        assert!(key.split('_').count() <= 3);
    }

    #[test]
    fn is_deterministic() {
        let text = "i struggle with focus and motivation";
        assert_eq!(simple_hash_key(text), simple_hash_key(text));
    }

    #[test]
    fn falls_back_to_keywords() {
        let key = simple_hash_key("the weather is nice today");
        assert!(!key.is_empty());
        assert!(key.contains("weather") || key.contains("nice") || key.contains("today"));
    }

    #[test]
    fn stop_words_only_is_misc() {
        assert_eq!(simple_hash_key("the and of it"), "misc");
    }
}

mod labels {
    use super::*;

    #[test]
    fn label_from_common_keywords() {
        let items = vec![
            item("1", 10, "i struggle with focus and concentration"),
            item("2", 20, "focusing on tasks is really hard for me"),
        ];
        let label = generate_cluster_label(&items);
        assert!(!label.is_empty());
        assert_ne!(label, "MiscellaneousIssues");
    }

    #[test]
    fn empty_items_get_fallback_label() {
        assert_eq!(generate_cluster_label(&[]), "MiscellaneousIssues");
    }

    #[test]
    fn label_is_pascal_case() {
        let items = vec![item("1", 10, "focus concentration attention")];
        let label = generate_cluster_label(&items);
        assert!(!label.contains(' '));
        assert!(label.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn label_keyword_ties_keep_first_seen_order() {
        let items = vec![item("1", 10, "alpha beta gamma delta epsilon")];
        // All count 1; label takes the first four in encounter order.
        assert_eq!(generate_cluster_label(&items), "AlphaBetaGammaDelta");
    }
}

mod simple_hash {
    use super::*;

    #[test]
    fn creates_clusters() {
        let clusters = cluster_simple_hash(sample_items());
        assert!(!clusters.is_empty());
    }

    #[test]
    fn covers_all_items() {
        let items = sample_items();
        let n = items.len();
        let clusters = cluster_simple_hash(items);
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), n);
    }

    #[test]
    fn shared_action_words_group_together() {
        let items = vec![
            item("1", 10, "i struggle with homework"),
            item("2", 20, "i struggle with concentration"),
            item("3", 30, "i keep forgetting appointments"),
        ];
        let clusters = cluster_simple_hash(items);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), 3);
        // The two struggle statements share a key; forgetting stands alone.
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].count, 1);
    }

    #[test]
    fn is_deterministic() {
        let first = cluster_simple_hash(sample_items());
        let second = cluster_simple_hash(sample_items());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.cluster_id, b.cluster_id);
            assert_eq!(a.count, b.count);
            assert_eq!(a.label, b.label);
        }
    }

    #[test]
    fn sorted_by_count_descending() {
        let clusters = cluster_simple_hash(sample_items());
        for pair in clusters.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn clusters_have_examples_and_labels() {
        for cluster in cluster_simple_hash(sample_items()) {
            assert!(!cluster.example_texts.is_empty());
            assert!(!cluster.label.is_empty());
        }
    }

    #[test]
    fn members_sorted_by_score() {
        for cluster in cluster_simple_hash(sample_items()) {
            for pair in cluster.items.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(cluster_simple_hash(Vec::new()).is_empty());
    }

    #[test]
    fn ids_are_numbered_hash_prefixed() {
        for cluster in cluster_simple_hash(sample_items()) {
            assert!(cluster.cluster_id.starts_with("hash_"));
            assert_eq!(cluster.cluster_id.len(), "hash_000".len());
        }
    }
}

#[cfg(feature = "kmeans")]
mod tfidf_kmeans {
    use super::*;

    fn kmeans_items() -> Vec<PainItem> {
        let texts = [
            "i struggle with focus at work",
            "i struggle with concentration daily",
            "focusing is hard for me",
            "i keep forgetting appointments",
            "forgetting tasks is my problem",
            "i forget everything",
            "i wish there was an app for reminders",
            "reminder apps dont work for me",
            "i need better reminders",
            "tracking habits is difficult",
            "habit tracking apps are confusing",
            "how do you track habits",
        ];
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| item(&i.to_string(), 10 + i as i64, text))
            .collect()
    }

    fn kmeans_config() -> ClusteringConfig {
        ClusteringConfig {
            method: "tfidf_kmeans".to_string(),
            k_min: 2,
            k_max: 5,
            random_state: 42,
        }
    }

    #[test]
    fn creates_clusters() {
        let clusters = cluster_tfidf_kmeans(kmeans_items(), &kmeans_config()).unwrap();
        assert!(!clusters.is_empty());
    }

    #[test]
    fn covers_all_items() {
        let items = kmeans_items();
        let n = items.len();
        let clusters = cluster_tfidf_kmeans(items, &kmeans_config()).unwrap();
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), n);
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let first = cluster_tfidf_kmeans(kmeans_items(), &kmeans_config()).unwrap();
        let second = cluster_tfidf_kmeans(kmeans_items(), &kmeans_config()).unwrap();

        assert_eq!(first.len(), second.len());
        let mut counts1: Vec<usize> = first.iter().map(|c| c.count).collect();
        let mut counts2: Vec<usize> = second.iter().map(|c| c.count).collect();
        counts1.sort_unstable();
        counts2.sort_unstable();
        assert_eq!(counts1, counts2);
    }

    #[test]
    fn respects_k_max() {
        let config = kmeans_config();
        let clusters = cluster_tfidf_kmeans(kmeans_items(), &config).unwrap();
        assert!(clusters.len() <= config.k_max);
    }

    #[test]
    fn sorted_by_count_descending() {
        let clusters = cluster_tfidf_kmeans(kmeans_items(), &kmeans_config()).unwrap();
        for pair in clusters.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn ids_are_km_prefixed() {
        for cluster in cluster_tfidf_kmeans(kmeans_items(), &kmeans_config()).unwrap() {
            assert!(cluster.cluster_id.starts_with("km_"));
        }
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        let clusters = cluster_tfidf_kmeans(Vec::new(), &kmeans_config()).unwrap();
        assert!(clusters.is_empty());
    }
}

mod dispatch {
    use super::*;
    use crate::error::MinerError;

    #[test]
    fn simple_hash_method_routes() {
        let config = ClusteringConfig {
            method: "simple_hash".to_string(),
            ..ClusteringConfig::default()
        };
        let clusters = cluster_pain_items(sample_items(), &config).unwrap();
        assert!(!clusters.is_empty());
    }

    #[cfg(feature = "kmeans")]
    #[test]
    fn tfidf_kmeans_method_routes() {
        let config = ClusteringConfig {
            method: "tfidf_kmeans".to_string(),
            k_min: 1,
            k_max: 2,
            ..ClusteringConfig::default()
        };
        let clusters = cluster_pain_items(sample_items(), &config).unwrap();
        assert!(!clusters.is_empty());
    }

    #[test]
    fn unknown_method_is_an_error() {
        let config = ClusteringConfig {
            method: "agglomerative".to_string(),
            ..ClusteringConfig::default()
        };
        let err = cluster_pain_items(sample_items(), &config).unwrap_err();
        assert!(matches!(err, MinerError::UnknownClusteringMethod(_)));
    }

    #[test]
    fn clusterer_wraps_config() {
        let clusterer = Clusterer::new(ClusteringConfig {
            method: "simple_hash".to_string(),
            ..ClusteringConfig::default()
        });
        let clusters = clusterer.cluster(sample_items()).unwrap();
        assert!(!clusters.is_empty());
    }
}
