//! Pain statement extraction.
//!
//! Splits post/comment bodies into sentences and keeps those passing the
//! configured length and include/exclude phrase filters.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::config::FiltersConfig;
use crate::error::Result;
use crate::models::{PainItem, RawComment, RawPost, SourceType};
use crate::util::{generate_id, normalize_text, split_sentences};
use crate::TARGET_EXTRACT;

/// Extracts pain statements from Reddit content.
///
/// Phrase filters are compiled once, as escaped case-insensitive patterns.
pub struct PainExtractor {
    min_pain_length: usize,
    include_patterns: Vec<Regex>,
    exclude_patterns: Vec<Regex>,
}

impl PainExtractor {
    pub fn new(filters: &FiltersConfig) -> Result<Self> {
        let include_patterns = compile_phrases(&filters.include_phrases)?;
        let exclude_patterns = compile_phrases(&filters.exclude_phrases)?;

        Ok(PainExtractor {
            min_pain_length: filters.min_pain_length,
            include_patterns,
            exclude_patterns,
        })
    }

    /// An empty include set means every sentence passes this check.
    fn contains_include_phrase(&self, text: &str) -> bool {
        if self.include_patterns.is_empty() {
            return true;
        }
        self.include_patterns.iter().any(|p| p.is_match(text))
    }

    fn contains_exclude_phrase(&self, text: &str) -> bool {
        self.exclude_patterns.iter().any(|p| p.is_match(text))
    }

    /// Returns the sentences of `text` passing length and phrase filters,
    /// in original order.
    fn pain_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return Vec::new();
        }

        split_sentences(text)
            .into_iter()
            .map(str::trim)
            .filter(|sentence| sentence.chars().count() >= self.min_pain_length)
            .filter(|sentence| self.contains_include_phrase(sentence))
            .filter(|sentence| !self.contains_exclude_phrase(sentence))
            .collect()
    }

    /// Extracts pain statements from a post's combined title and body.
    ///
    /// An exclude-phrase match anywhere in the raw combined text discards
    /// the whole post, with no partial extraction.
    pub fn extract_from_post(&self, post: &RawPost) -> Vec<PainItem> {
        let full_text = format!("{}. {}", post.title, post.selftext);

        if self.contains_exclude_phrase(&full_text) {
            debug!(
                target: TARGET_EXTRACT,
                "Discarding post {} entirely: exclude phrase matched", post.id
            );
            return Vec::new();
        }

        self.pain_sentences(&full_text)
            .iter()
            .enumerate()
            .filter_map(|(i, sentence)| {
                self.build_item(
                    sentence,
                    &post.id,
                    SourceType::Post,
                    &post.subreddit,
                    &post.id,
                    post.score,
                    post.created_utc,
                    post.url.clone(),
                    i,
                )
            })
            .collect()
    }

    /// Extracts pain statements from a comment body.
    pub fn extract_from_comment(&self, comment: &RawComment) -> Vec<PainItem> {
        if self.contains_exclude_phrase(&comment.body) {
            debug!(
                target: TARGET_EXTRACT,
                "Discarding comment {} entirely: exclude phrase matched", comment.id
            );
            return Vec::new();
        }

        let url = format!("https://reddit.com{}", comment.permalink);

        self.pain_sentences(&comment.body)
            .iter()
            .enumerate()
            .filter_map(|(i, sentence)| {
                self.build_item(
                    sentence,
                    &comment.id,
                    SourceType::Comment,
                    &comment.subreddit,
                    &comment.post_id,
                    comment.score,
                    comment.created_utc,
                    url.clone(),
                    i,
                )
            })
            .collect()
    }

    /// Extracts from all posts, then all comments, preserving input order
    /// within each group.
    pub fn extract_all(&self, posts: &[RawPost], comments: &[RawComment]) -> Vec<PainItem> {
        let mut items: Vec<PainItem> = Vec::new();

        for post in posts {
            items.extend(self.extract_from_post(post));
        }

        for comment in comments {
            items.extend(self.extract_from_comment(comment));
        }

        debug!(
            target: TARGET_EXTRACT,
            "Extracted {} pain statements from {} posts and {} comments",
            items.len(),
            posts.len(),
            comments.len()
        );

        items
    }

    #[allow(clippy::too_many_arguments)]
    fn build_item(
        &self,
        sentence: &str,
        parent_id: &str,
        source_type: SourceType,
        subreddit: &str,
        post_id: &str,
        score: i64,
        created_utc: f64,
        url: String,
        sentence_index: usize,
    ) -> Option<PainItem> {
        let normalized = normalize_text(sentence);

        // Normalization can shorten a sentence below the threshold.
        if normalized.chars().count() < self.min_pain_length {
            return None;
        }

        let id = generate_id(&[parent_id, source_type.as_str(), &sentence_index.to_string()]);

        Some(PainItem {
            id,
            subreddit: subreddit.to_string(),
            source_type,
            post_id: post_id.to_string(),
            score,
            created_utc: timestamp_to_datetime(created_utc),
            text: normalized,
            url,
            raw_text: sentence.to_string(),
        })
    }
}

fn compile_phrases(phrases: &[String]) -> Result<Vec<Regex>> {
    phrases
        .iter()
        .map(|phrase| {
            RegexBuilder::new(&regex::escape(phrase))
                .case_insensitive(true)
                .build()
                .map_err(Into::into)
        })
        .collect()
}

fn timestamp_to_datetime(timestamp: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default()
}
