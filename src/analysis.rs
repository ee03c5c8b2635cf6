//! # Transcript Analysis
//!
//! Pure functions that derive presentation fields from a raw transcript:
//! a truncated summary, a subject category, and a list of key points.
//!
//! None of these results are persisted except the summary — category and
//! key points are recomputed from the stored transcript on every read, so
//! adjusting a keyword list retroactively changes all historical records
//! without a migration.

use serde::Serialize;

/// Maximum number of characters kept in a stored summary before truncation.
pub const SUMMARY_LIMIT: usize = 200;

/// Maximum number of key points extracted for a lecture.
pub const MAX_KEY_POINTS: usize = 5;

/// Subject categories a transcript can be filed under.
///
/// Ordering matters: `categorize` tests the keyword sets in declaration
/// order and the first match wins, so a transcript mentioning both "war"
/// and "economy" is History, not Business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Mathematics,
    Science,
    Business,
    History,
    Psychology,
    General,
}

/// Keyword sets checked by `categorize`, in priority order.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Mathematics, &["math", "algebra", "equation"]),
    (Category::Science, &["biology", "cell", "evolution"]),
    (Category::Business, &["business", "market", "economy"]),
    (Category::History, &["history", "war", "revolution"]),
    (Category::Psychology, &["psychology", "cognitive"]),
];

/// A single extracted key point.
///
/// Importance is constant for now; the field exists so the response shape
/// doesn't change if a smarter ranking is added later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPoint {
    pub point: String,
    pub importance: &'static str,
}

/// Guess a subject category from keyword presence in the transcript.
///
/// The text is lower-cased and each fixed keyword set is tested with a
/// plain substring check, in priority order (Mathematics > Science >
/// Business > History > Psychology). Falls back to `General`.
pub fn categorize(text: &str) -> Category {
    let lowered = text.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *category;
        }
    }

    Category::General
}

/// Extract up to `max_points` sentence fragments as key points.
///
/// Whitespace runs (newlines included) are flattened to single spaces,
/// then the text is split on the period character. Fragments are trimmed
/// and empty ones dropped; the first `max_points` survivors are returned
/// in original order.
///
/// This splitter is deliberately naive: it has no abbreviation or decimal
/// awareness and will split inside "e.g." or "3.14".
pub fn extract_key_points(text: &str, max_points: usize) -> Vec<KeyPoint> {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");

    flattened
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .take(max_points)
        .map(|fragment| KeyPoint {
            point: fragment.to_string(),
            importance: "normal",
        })
        .collect()
}

/// Truncate a transcript to `limit` characters, appending `...` when cut.
///
/// Texts at or under the limit come back unchanged. Truncation counts
/// characters, not bytes, so multi-byte text never splits a code point.
pub fn summarize(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Mathematics => "Mathematics",
            Category::Science => "Science",
            Category::Business => "Business",
            Category::History => "History",
            Category::Psychology => "Psychology",
            Category::General => "General",
        };
        write!(f, "{}", name)
    }
}
