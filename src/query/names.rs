//! Heuristic player-name extraction.
//!
//! Scans free text for runs of two or more consecutive capitalized words, the
//! conservative proper-noun heuristic. This is not a named-entity recognizer:
//! it over-matches capitalized non-name phrases and under-matches single-word
//! nicknames. Callers treat the output as advisory and reconcile it against
//! an explicit `filters.players` field, which always takes precedence.

use std::sync::LazyLock;

use regex::Regex;

/// Consecutive capitalized words ("Stephen Curry", "Karl-Anthony Towns").
static PROPER_NOUN_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][A-Za-z'’\-]+(?:\s+[A-Z][A-Za-z'’\-]+)+").expect("Invalid regex")
});

/// Domain nouns that masquerade as name words when capitalized.
const STOPWORDS: &[&str] = &["nba", "stats", "season", "league", "team", "teams"];

/// Extract candidate full names: deduplicated, order-preserving.
pub fn extract_player_names(question: &str) -> Vec<String> {
    let mut names = Vec::new();

    for m in PROPER_NOUN_RUN.find_iter(question) {
        let candidate = strip_possessive(m.as_str());
        let Some(name) = trim_stopwords(candidate) else {
            continue;
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
}

/// Remove extracted names that collide with a college name (equal to,
/// containing, or contained in one). Proper-noun college names otherwise
/// masquerade as player names.
pub fn drop_college_collisions(names: Vec<String>, colleges: &[String]) -> Vec<String> {
    if colleges.is_empty() {
        return names;
    }
    names
        .into_iter()
        .filter(|name| {
            let name_lower = name.to_lowercase();
            !colleges.iter().any(|college| {
                let college_lower = college.to_lowercase();
                name_lower == college_lower
                    || name_lower.contains(&college_lower)
                    || college_lower.contains(&name_lower)
            })
        })
        .collect()
}

fn strip_possessive(candidate: &str) -> &str {
    candidate
        .strip_suffix("'s")
        .or_else(|| candidate.strip_suffix("’s"))
        .unwrap_or(candidate)
}

/// Drop leading/trailing stopword tokens; keep the candidate only if at
/// least two words survive.
fn trim_stopwords(candidate: &str) -> Option<String> {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    let is_stop = |w: &&str| STOPWORDS.contains(&w.to_lowercase().as_str());

    let start = words.iter().position(|w| !is_stop(w))?;
    let end = words.iter().rposition(|w| !is_stop(w))?;
    let kept = &words[start..=end];

    if kept.len() < 2 {
        return None;
    }
    Some(kept.join(" "))
}

// ============================================================================
// Tests
// ============================================================================
