//! Regex-based free-text task parser (spec.md §9 "Free-text → tasks").
//!
//! The real parser is an LLM living outside the engine (spec.md §1); this is
//! the degraded-mode fallback used when that collaborator is unavailable.
//! It only recognizes a duration phrase per comma/semicolon/newline-separated
//! segment and a best-effort category guess — good enough to keep `chat`
//! usable, not a substitute for the LLM.

use once_cell::sync::Lazy;
use regex::Regex;

use cogscheduler_domain::Task;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours?|hrs?|h|minutes?|mins?|m)\b").unwrap());

const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("calculus", "math"),
    ("algebra", "math"),
    ("math", "math"),
    ("code", "programming"),
    ("coding", "programming"),
    ("programming", "programming"),
    ("assignment", "programming"),
    ("physics", "science"),
    ("chemistry", "science"),
    ("biology", "science"),
    ("science", "science"),
    ("reading", "reading"),
    ("read", "reading"),
    ("review", "review"),
    ("revise", "review"),
];

fn guess_category(title: &str) -> String {
    let lower = title.to_ascii_lowercase();
    for (keyword, category) in CATEGORY_KEYWORDS {
        if lower.contains(keyword) {
            return category.to_string();
        }
    }
    "general".to_string()
}

fn clean_title(segment: &str, whole_match: &str) -> String {
    let without_duration = segment.replacen(whole_match, "", 1);
    let trimmed = without_duration.trim();
    let trimmed = trimmed.strip_suffix("for").unwrap_or(trimmed).trim();
    let trimmed = trimmed.trim_matches(|c: char| c == '-' || c == ':');
    let trimmed = trimmed.trim();
    if trimmed.is_empty() {
        "Untitled task".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_segment(segment: &str) -> Option<Task> {
    let caps = DURATION_RE.captures(segment)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();
    let whole_match = caps.get(0)?.as_str();
    let minutes = if unit.starts_with('h') {
        (amount * 60.0).round() as u32
    } else {
        amount.round() as u32
    };
    let title = clean_title(segment, whole_match);
    let category = guess_category(&title);

    Some(Task {
        title,
        category,
        difficulty: 5.0,
        duration_minutes: minutes.max(1),
        cognitive_load: None,
    })
}

/// Parse a free-text message into a list of tasks. Segments without a
/// recognizable duration phrase are silently dropped — there is no way to
/// schedule a task of unknown length.
pub fn parse_free_text(message: &str) -> Vec<Task> {
    message
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(parse_segment)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes_phrases() {
        let tasks = parse_free_text("Graph Theory for 2 hours, Chem Review for 45 minutes");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Graph Theory");
        assert_eq!(tasks[0].duration_minutes, 120);
        assert_eq!(tasks[1].title, "Chem Review");
        assert_eq!(tasks[1].duration_minutes, 45);
    }

    #[test]
    fn guesses_category_from_keywords() {
        let tasks = parse_free_text("ML Assignment for 90 min");
        assert_eq!(tasks[0].category, "programming");
    }

    #[test]
    fn drops_segments_without_a_duration() {
        let tasks = parse_free_text("just thinking out loud, Read chapter 4 for 30 min");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Read chapter 4");
    }

    #[test]
    fn empty_message_yields_no_tasks() {
        assert!(parse_free_text("").is_empty());
    }
}
