//! App idea synthesis.
//!
//! Turns each passing cluster and its inferred shape into a concrete,
//! buildable app idea: a name, a problem statement backed by a real quote,
//! and shape-specific functions, screens, and data. Ranking puts the
//! most-reported problems first.

use tracing::debug;

use crate::models::{AppIdea, Cluster, Evidence, MvpComplexity, ShapeType, SolutionShape};
use crate::util::{extract_keywords, to_pascal_case, truncate_text};
use crate::TARGET_IDEAS;

/// Maximum characters in a generated app name.
const MAX_NAME_LENGTH: usize = 25;

/// Maximum evidence URLs per idea.
const MAX_EVIDENCE_URLS: usize = 5;

/// Build blueprint shared by all ideas of one shape.
struct ShapeTemplate {
    core_functions: &'static [&'static str],
    screens: &'static [&'static str],
    local_data: &'static [&'static str],
    notifications: &'static [&'static str],
}

fn template_for(shape: ShapeType) -> &'static ShapeTemplate {
    match shape {
        ShapeType::Reminder => &ShapeTemplate {
            core_functions: &[
                "Set one-tap reminders with custom times",
                "Receive push notifications at scheduled times",
                "Quick reschedule with swipe gestures",
            ],
            screens: &["ReminderList", "AddReminder", "Settings"],
            local_data: &["Reminders with timestamps", "Notification preferences"],
            notifications: &["Scheduled reminder alerts"],
        },
        ShapeType::Checklist => &ShapeTemplate {
            core_functions: &[
                "Create and manage task lists",
                "Check off completed items",
                "Organize tasks by category or priority",
            ],
            screens: &["TaskList", "AddTask", "Categories"],
            local_data: &["Tasks with completion status", "Categories"],
            notifications: &["Optional task reminders"],
        },
        ShapeType::Timer => &ShapeTemplate {
            core_functions: &[
                "Start/stop countdown or stopwatch",
                "Save timer presets for quick access",
                "Background timer with alerts",
            ],
            screens: &["TimerView", "Presets"],
            local_data: &["Timer presets", "Session history"],
            notifications: &["Timer completion alert"],
        },
        ShapeType::Log => &ShapeTemplate {
            core_functions: &[
                "Quick entry logging with timestamps",
                "View history in chronological order",
                "Export or share log data",
            ],
            screens: &["LogList", "AddEntry", "History"],
            local_data: &["Log entries with timestamps", "Export format preferences"],
            notifications: &["Optional daily logging reminder"],
        },
        ShapeType::Note => &ShapeTemplate {
            core_functions: &[
                "Quick capture of text notes",
                "Search through notes",
                "Organize with tags or folders",
            ],
            screens: &["NoteList", "NoteEditor"],
            local_data: &["Notes with metadata", "Tags/folders"],
            notifications: &[],
        },
        ShapeType::Habit => &ShapeTemplate {
            core_functions: &[
                "Define daily habits to track",
                "Mark habits complete each day",
                "View streak and progress stats",
            ],
            screens: &["HabitList", "AddHabit", "Progress"],
            local_data: &["Habits with daily completion records", "Streak counts"],
            notifications: &["Daily habit reminders"],
        },
        ShapeType::Calculator => &ShapeTemplate {
            core_functions: &[
                "Perform quick calculations",
                "Save calculation history",
                "Custom formulas or conversions",
            ],
            screens: &["Calculator"],
            local_data: &["Calculation history", "Custom formulas"],
            notifications: &[],
        },
        ShapeType::Reference => &ShapeTemplate {
            core_functions: &[
                "Quick access to reference information",
                "Search and filter content",
                "Bookmark frequently used items",
            ],
            screens: &["ReferenceList", "Detail"],
            local_data: &["Reference data", "Bookmarks"],
            notifications: &[],
        },
        ShapeType::Utility => &ShapeTemplate {
            core_functions: &[
                "Single-purpose utility function",
                "Quick access from home screen",
                "Minimal configuration needed",
            ],
            screens: &["MainView", "Settings"],
            local_data: &["User preferences"],
            notifications: &[],
        },
    }
}

/// Derives a short PascalCase app name from the cluster label, falling back
/// to shape keywords. The shape word is appended when missing, and the
/// result is hard-capped at 25 characters.
fn generate_app_name(cluster: &Cluster, shape: &SolutionShape) -> String {
    let mut name = if cluster.label.len() > 3 {
        cluster.label.clone()
    } else if !shape.keywords.is_empty() {
        shape.keywords[..shape.keywords.len().min(2)].join(" ")
    } else {
        extract_keywords(&cluster.example_texts.join(" "))
            .into_iter()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    };

    if !name.to_lowercase().contains(shape.shape_type.as_str()) {
        let word = shape.shape_type.as_str();
        let mut suffix = String::new();
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            suffix.extend(first.to_uppercase());
            suffix.push_str(chars.as_str());
        }
        name = format!("{} {}", name, suffix);
    }

    let mut pascal: String = to_pascal_case(&name);
    if pascal.chars().count() > MAX_NAME_LENGTH {
        pascal = pascal.chars().take(MAX_NAME_LENGTH).collect();
    }

    if pascal.is_empty() {
        "SimpleHelper".to_string()
    } else {
        pascal
    }
}

fn generate_problem_statement(cluster: &Cluster) -> String {
    match cluster.example_texts.first() {
        Some(example) => format!("Users report: \"{}\"", truncate_text(example, 150)),
        None => "Users struggle with a common problem that needs a simple solution.".to_string(),
    }
}

fn generate_target_user(cluster: &Cluster, shape: &SolutionShape) -> String {
    let mut subreddits: Vec<&str> = cluster
        .items
        .iter()
        .map(|item| item.subreddit.as_str())
        .collect();
    subreddits.sort_unstable();
    subreddits.dedup();

    if subreddits.is_empty() {
        format!("Anyone who needs a simple {} tool", shape.shape_type)
    } else {
        let subs = subreddits[..subreddits.len().min(3)].join(", ");
        format!(
            "People interested in {} topics who need {} functionality",
            subs, shape.shape_type
        )
    }
}

fn determine_complexity(shape: &SolutionShape) -> MvpComplexity {
    match shape.estimated_screens + shape.estimated_actions {
        0..=2 => MvpComplexity::Xs,
        3..=4 => MvpComplexity::S,
        _ => MvpComplexity::M,
    }
}

/// Collects the evidence backing an idea: member counts, score stats, and
/// up to 5 distinct source URLs from the highest-scored members.
fn gather_evidence(cluster: &Cluster) -> Evidence {
    let mut example_urls: Vec<String> = Vec::new();

    // Members are already sorted by descending score.
    for item in &cluster.items {
        if !example_urls.contains(&item.url) {
            example_urls.push(item.url.clone());
            if example_urls.len() >= MAX_EVIDENCE_URLS {
                break;
            }
        }
    }

    Evidence {
        count: cluster.count,
        total_score: cluster.total_score,
        avg_score: (cluster.avg_score * 10.0).round() / 10.0,
        example_urls,
    }
}

/// Synthesizes one app idea from a passing cluster and its shape.
pub fn generate_idea(cluster: Cluster, shape: &SolutionShape) -> AppIdea {
    let template = template_for(shape.shape_type);

    let idea_name = generate_app_name(&cluster, shape);
    let problem_statement = generate_problem_statement(&cluster);
    let target_user = generate_target_user(&cluster, shape);
    let mvp_complexity = determine_complexity(shape);
    let evidence = gather_evidence(&cluster);

    debug!(
        target: TARGET_IDEAS,
        "cluster {} -> idea {} ({:?})", cluster.cluster_id, idea_name, mvp_complexity
    );

    AppIdea {
        idea_name,
        problem_statement,
        target_user,
        core_functions: to_strings(&template.core_functions[..template.core_functions.len().min(3)]),
        screens: to_strings(&template.screens[..template.screens.len().min(3)]),
        local_data: to_strings(template.local_data),
        minimal_notifications: to_strings(template.notifications),
        mvp_complexity,
        evidence,
        cluster,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Generates ideas for filtered clusters.
#[derive(Default)]
pub struct IdeaGenerator;

impl IdeaGenerator {
    pub fn new() -> Self {
        IdeaGenerator
    }

    pub fn generate(&self, cluster: Cluster, shape: &SolutionShape) -> AppIdea {
        generate_idea(cluster, shape)
    }

    /// Generates one idea per (cluster, shape) pair, in input order.
    pub fn generate_all(&self, clusters_with_shapes: Vec<(Cluster, SolutionShape)>) -> Vec<AppIdea> {
        clusters_with_shapes
            .into_iter()
            .map(|(cluster, shape)| self.generate(cluster, &shape))
            .collect()
    }
}

/// Ranks ideas by evidence volume, then average score. The sort is stable,
/// so fully tied ideas keep generation order.
pub fn rank_ideas(ideas: &mut [AppIdea]) {
    ideas.sort_by(|a, b| {
        b.cluster
            .count
            .cmp(&a.cluster.count)
            .then_with(|| b.evidence.avg_score.total_cmp(&a.evidence.avg_score))
    });
}
