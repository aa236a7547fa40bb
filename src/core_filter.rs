//! Feasibility filtering of clusters.
//!
//! Infers the minimal app shape that would address each cluster's problem,
//! flags signals that put it out of reach of a small local-only app, and
//! applies the configured accept/reject rules. Rejection is an explained
//! result, never an error, so a report can show why a cluster dropped out.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::config::CoreFilterConfig;
use crate::models::{Cluster, FilterResult, ShapeType, SolutionShape};
use crate::util::extract_keywords;
use crate::TARGET_FILTER;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

lazy_static! {
    /// Shape vocabularies, in priority order. When shapes tie on match
    /// count, the earlier entry wins.
    static ref SHAPE_PATTERNS: Vec<(ShapeType, Vec<Regex>)> = vec![
        (
            ShapeType::Reminder,
            compile_all(&[
                r"(?i)\bremind(er|ers|ing)?\b",
                r"(?i)\bnotif(y|ication|ications)\b",
                r"(?i)\balert(s)?\b",
                r"(?i)\bdon't forget\b",
                r"(?i)\bforget(ting)?\b",
            ]),
        ),
        (
            ShapeType::Checklist,
            compile_all(&[
                r"(?i)\blist(s)?\b",
                r"(?i)\bchecklist(s)?\b",
                r"(?i)\btodo(s)?\b",
                r"(?i)\bto-do(s)?\b",
                r"(?i)\btask(s)?\b",
                r"(?i)\btrack(ing)?\b",
            ]),
        ),
        (
            ShapeType::Timer,
            compile_all(&[
                r"(?i)\btimer(s)?\b",
                r"(?i)\btime(r|rs)?\b",
                r"(?i)\bpomodoro\b",
                r"(?i)\bcountdown\b",
                r"(?i)\bstopwatch\b",
                r"(?i)\bbreak(s)?\b",
            ]),
        ),
        (
            ShapeType::Log,
            compile_all(&[
                r"(?i)\blog(s|ging)?\b",
                r"(?i)\bjournal(ing)?\b",
                r"(?i)\bdiary\b",
                r"(?i)\btrack(ing)?\b",
                r"(?i)\brecord(ing)?\b",
                r"(?i)\bmonitor(ing)?\b",
            ]),
        ),
        (
            ShapeType::Note,
            compile_all(&[
                r"(?i)\bnote(s)?\b",
                r"(?i)\bquick note\b",
                r"(?i)\bjot down\b",
                r"(?i)\bwrite down\b",
                r"(?i)\bcapture\b",
            ]),
        ),
        (
            ShapeType::Habit,
            compile_all(&[
                r"(?i)\bhabit(s)?\b",
                r"(?i)\broutine(s)?\b",
                r"(?i)\bdaily\b",
                r"(?i)\bstreak(s)?\b",
                r"(?i)\bconsisten(t|cy)\b",
            ]),
        ),
        (
            ShapeType::Calculator,
            compile_all(&[
                r"(?i)\bcalculat(e|or|ion)\b",
                r"(?i)\bconvert(er|ing)?\b",
                r"(?i)\bmath\b",
                r"(?i)\bbudget(ing)?\b",
            ]),
        ),
        (
            ShapeType::Reference,
            compile_all(&[
                r"(?i)\breference\b",
                r"(?i)\blookup\b",
                r"(?i)\bquick access\b",
                r"(?i)\binfo(rmation)?\b",
            ]),
        ),
    ];

    static ref SOCIAL_SIGNALS: Vec<Regex> = compile_all(&[
        r"(?i)\bshare\b",
        r"(?i)\bsharing\b",
        r"(?i)\bsocial\b",
        r"(?i)\bfriend(s)?\b",
        r"(?i)\bfollow(er|ers|ing)?\b",
        r"(?i)\bpost(ing)?\b",
        r"(?i)\bfeed\b",
        r"(?i)\bcommunity\b",
        r"(?i)\bgroup(s)?\b",
        r"(?i)\bmessag(e|es|ing)\b",
        r"(?i)\bchat(ting)?\b",
        r"(?i)\bnetwork(ing)?\b",
    ]);

    static ref MARKETPLACE_SIGNALS: Vec<Regex> = compile_all(&[
        r"(?i)\bmarketplace\b",
        r"(?i)\bbuy(ing)?\b",
        r"(?i)\bsell(ing)?\b",
        r"(?i)\bpurchase\b",
        r"(?i)\bpayment(s)?\b",
        r"(?i)\btransaction(s)?\b",
        r"(?i)\bstore\b",
        r"(?i)\bshop(ping)?\b",
        r"(?i)\border(s|ing)?\b",
    ]);

    static ref REALTIME_SIGNALS: Vec<Regex> = compile_all(&[
        r"(?i)\breal-?time\b",
        r"(?i)\blive\b",
        r"(?i)\bstream(ing)?\b",
        r"(?i)\bsync(ing|hroniz)?\b",
        r"(?i)\bcollaborat(e|ion|ive)\b",
        r"(?i)\bmultiplayer\b",
        r"(?i)\binstant\b",
    ]);

    static ref AI_SIGNALS: Vec<Regex> = compile_all(&[
        r"(?i)\bai\b",
        r"(?i)\bartificial intelligence\b",
        r"(?i)\bmachine learning\b",
        r"(?i)\bml\b",
        r"(?i)\bgpt\b",
        r"(?i)\bchatgpt\b",
        r"(?i)\bllm\b",
        r"(?i)\bsmart suggest(ion)?\b",
        r"(?i)\bpredict(ion|ive)?\b",
        r"(?i)\brecommend(ation)?\b",
        r"(?i)\banalyz(e|ing|is)\b",
    ]);
}

fn matches_any(text: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

fn screen_estimate(shape: ShapeType) -> u32 {
    match shape {
        ShapeType::Timer | ShapeType::Calculator | ShapeType::Reference => 1,
        _ => 2,
    }
}

fn action_estimate(shape: ShapeType) -> u32 {
    match shape {
        ShapeType::Timer | ShapeType::Note | ShapeType::Calculator | ShapeType::Reference => 1,
        _ => 2,
    }
}

/// Infers the solution shape for a cluster from its member texts.
///
/// Total over all clusters: a cluster matching no shape vocabulary becomes
/// a `utility` with its plain keywords.
pub fn detect_solution_shape(cluster: &Cluster) -> SolutionShape {
    let mut all_text = cluster
        .items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    all_text.push(' ');
    all_text.push_str(&cluster.example_texts.join(" "));

    let mut best: Option<(ShapeType, usize, Vec<String>)> = None;

    for (shape, patterns) in SHAPE_PATTERNS.iter() {
        let mut score = 0;
        let mut matched: Vec<String> = Vec::new();

        for pattern in patterns {
            for m in pattern.find_iter(&all_text) {
                score += 1;
                let text = m.as_str().to_lowercase();
                if !matched.contains(&text) {
                    matched.push(text);
                }
            }
        }

        if score > 0 {
            let is_better = match &best {
                Some((_, best_score, _)) => score > *best_score,
                None => true,
            };
            if is_better {
                matched.truncate(5);
                best = Some((*shape, score, matched));
            }
        }
    }

    let (shape_type, keywords) = match best {
        Some((shape, _, keywords)) => (shape, keywords),
        None => {
            let keywords = extract_keywords(&all_text).into_iter().take(5).collect();
            (ShapeType::Utility, keywords)
        }
    };

    let requires_social = matches_any(&all_text, &SOCIAL_SIGNALS);
    let requires_marketplace = matches_any(&all_text, &MARKETPLACE_SIGNALS);
    let requires_realtime = matches_any(&all_text, &REALTIME_SIGNALS);
    let requires_ai = matches_any(&all_text, &AI_SIGNALS);

    let mut estimated_screens = screen_estimate(shape_type);
    let mut estimated_actions = action_estimate(shape_type);

    if requires_social || requires_marketplace {
        estimated_screens += 2;
        estimated_actions += 2;
    }
    if requires_realtime {
        estimated_screens += 1;
        estimated_actions += 1;
    }

    let solvable_locally =
        !(requires_social || requires_marketplace || requires_realtime || requires_ai);

    SolutionShape {
        shape_type,
        keywords,
        requires_social,
        requires_marketplace,
        requires_realtime,
        requires_ai,
        estimated_screens,
        estimated_actions,
        solvable_locally,
    }
}

/// Applies accept/reject rules to clusters.
pub struct CoreFilter {
    config: CoreFilterConfig,
}

impl CoreFilter {
    pub fn new(config: CoreFilterConfig) -> Self {
        CoreFilter { config }
    }

    /// Evaluates one cluster against the configured rules.
    pub fn filter_cluster(&self, cluster: Cluster) -> FilterResult {
        let shape = detect_solution_shape(&cluster);

        let mut rejection_reasons: Vec<String> = Vec::new();

        let reject = &self.config.reject_if;
        if reject.requires_social_network && shape.requires_social {
            rejection_reasons.push("Requires social network features".to_string());
        }
        if reject.requires_marketplace && shape.requires_marketplace {
            rejection_reasons.push("Requires marketplace features".to_string());
        }
        if reject.requires_realtime_sync && shape.requires_realtime {
            rejection_reasons.push("Requires real-time synchronization".to_string());
        }
        if reject.requires_ai_for_value && shape.requires_ai {
            rejection_reasons.push("Requires AI for core value".to_string());
        }

        let accept = &self.config.accept_if;
        if accept.solvable_locally && !shape.solvable_locally {
            rejection_reasons.push("Cannot be solved with local-only data".to_string());
        }
        if shape.estimated_screens > accept.max_screens {
            rejection_reasons.push(format!(
                "Estimated {} screens exceeds max {}",
                shape.estimated_screens, accept.max_screens
            ));
        }
        if shape.estimated_actions > accept.max_user_actions {
            rejection_reasons.push(format!(
                "Estimated {} actions exceeds max {}",
                shape.estimated_actions, accept.max_user_actions
            ));
        }

        let passed = rejection_reasons.is_empty();

        debug!(
            target: TARGET_FILTER,
            "cluster {} ({}): shape={}, passed={}, reasons={:?}",
            cluster.cluster_id,
            cluster.label,
            shape.shape_type,
            passed,
            rejection_reasons
        );

        FilterResult {
            cluster,
            solution_shape: shape,
            passed,
            rejection_reasons,
        }
    }

    /// Evaluates clusters in order, keeping one result per cluster.
    pub fn filter_clusters(&self, clusters: Vec<Cluster>) -> Vec<FilterResult> {
        clusters
            .into_iter()
            .map(|cluster| self.filter_cluster(cluster))
            .collect()
    }

    /// Returns only the passing clusters with their inferred shapes, in
    /// input order.
    pub fn get_passing_clusters(&self, clusters: Vec<Cluster>) -> Vec<(Cluster, SolutionShape)> {
        self.filter_clusters(clusters)
            .into_iter()
            .filter(|result| result.passed)
            .map(|result| (result.cluster, result.solution_shape))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PainItem, SourceType};
    use chrono::Utc;

    fn item(id: &str, text: &str) -> PainItem {
        PainItem {
            id: id.to_string(),
            subreddit: "ADHD".to_string(),
            source_type: SourceType::Post,
            post_id: format!("p{}", id),
            score: 10,
            created_utc: Utc::now(),
            text: text.to_string(),
            url: format!("http://example.com/{}", id),
            raw_text: text.to_string(),
        }
    }

    fn cluster_of(texts: &[&str]) -> Cluster {
        let items = texts
            .iter()
            .enumerate()
            .map(|(i, text)| item(&i.to_string(), text))
            .collect();
        Cluster::new("hash_000".to_string(), "Test".to_string(), items)
    }

    #[test]
    fn detects_reminder_shape() {
        let cluster = cluster_of(&[
            "i keep forgetting my appointments",
            "i need a reminder for my meds",
            "wish something would remind me",
        ]);
        let shape = detect_solution_shape(&cluster);
        assert_eq!(shape.shape_type, ShapeType::Reminder);
        assert!(!shape.keywords.is_empty());
        assert!(shape.keywords.len() <= 5);
    }

    #[test]
    fn detects_habit_shape() {
        let cluster = cluster_of(&[
            "building a daily habit is hard",
            "my routine falls apart and streaks reset",
            "habits never stick for me",
        ]);
        let shape = detect_solution_shape(&cluster);
        assert_eq!(shape.shape_type, ShapeType::Habit);
    }

    #[test]
    fn no_vocabulary_match_falls_back_to_utility() {
        let cluster = cluster_of(&["the weather is gloomy here"]);
        let shape = detect_solution_shape(&cluster);
        assert_eq!(shape.shape_type, ShapeType::Utility);
        assert_eq!(shape.estimated_screens, 2);
        assert_eq!(shape.estimated_actions, 2);
    }

    #[test]
    fn empty_cluster_is_total() {
        let cluster = cluster_of(&[]);
        let shape = detect_solution_shape(&cluster);
        assert_eq!(shape.shape_type, ShapeType::Utility);
        assert!(shape.solvable_locally);
    }

    #[test]
    fn social_signals_are_detected() {
        let cluster = cluster_of(&["i want to share my progress with friends in the community"]);
        let shape = detect_solution_shape(&cluster);
        assert!(shape.requires_social);
        assert!(!shape.solvable_locally);
        // +2 screens and actions over the base estimate.
        assert!(shape.estimated_screens >= 3);
    }

    #[test]
    fn ai_signals_are_detected() {
        let cluster = cluster_of(&["i need ai to predict what i should do next"]);
        let shape = detect_solution_shape(&cluster);
        assert!(shape.requires_ai);
        assert!(!shape.solvable_locally);
    }

    #[test]
    fn clean_reminder_cluster_passes() {
        let filter = CoreFilter::new(CoreFilterConfig::default());
        let cluster = cluster_of(&[
            "i keep forgetting my appointments",
            "i need reminders for everything",
        ]);
        let result = filter.filter_cluster(cluster);
        assert!(result.passed);
        assert!(result.rejection_reasons.is_empty());
    }

    #[test]
    fn social_cluster_is_rejected_with_reasons() {
        let filter = CoreFilter::new(CoreFilterConfig::default());
        let cluster = cluster_of(&[
            "i forget to share updates with my friends and followers constantly",
        ]);
        let result = filter.filter_cluster(cluster);
        assert!(!result.passed);
        assert!(result
            .rejection_reasons
            .contains(&"Requires social network features".to_string()));
        assert!(result
            .rejection_reasons
            .contains(&"Cannot be solved with local-only data".to_string()));
        assert!(result
            .rejection_reasons
            .iter()
            .any(|r| r.contains("screens exceeds max")));
    }

    #[test]
    fn disabled_reject_rule_skips_its_reason() {
        let mut config = CoreFilterConfig::default();
        config.reject_if.requires_ai_for_value = false;
        config.accept_if.solvable_locally = false;
        let filter = CoreFilter::new(config);

        let cluster = cluster_of(&["i need ai help with reminders"]);
        let result = filter.filter_cluster(cluster);
        assert!(!result
            .rejection_reasons
            .contains(&"Requires AI for core value".to_string()));
        assert!(!result
            .rejection_reasons
            .contains(&"Cannot be solved with local-only data".to_string()));
    }

    #[test]
    fn get_passing_clusters_preserves_order() {
        let filter = CoreFilter::new(CoreFilterConfig::default());
        let clusters = vec![
            cluster_of(&["i keep forgetting my appointments"]),
            cluster_of(&["i want to share everything with friends on a feed"]),
            cluster_of(&["tracking my tasks on a list helps"]),
        ];
        let passing = filter.get_passing_clusters(clusters);
        assert_eq!(passing.len(), 2);
        assert_eq!(passing[0].1.shape_type, ShapeType::Reminder);
    }

    #[test]
    fn tie_between_shapes_prefers_earlier_vocabulary() {
        // One reminder match and one checklist match; reminder is listed
        // first and wins.
        let cluster = cluster_of(&["an alert about my list"]);
        let shape = detect_solution_shape(&cluster);
        assert_eq!(shape.shape_type, ShapeType::Reminder);
    }
}
