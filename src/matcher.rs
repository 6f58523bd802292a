//! Fuzzy name matching for the query engine
//!
//! Contract: `score` maps a candidate/query pair onto 0..=100, where 0 means
//! no match at all. `filter` keeps candidates scoring at or above
//! `min_score` and returns them best-first, input order breaking ties.
//! Scoring is case-insensitive, best-effort string work, not a search
//! engine: exact > prefix > substring > subsequence, with scattered
//! subsequences decaying below any sensible threshold.

use std::cmp::Ordering;

/// Threshold used by the query engine; repos below it are excluded
pub const MIN_SCORE: f64 = 30.0;

/// Score a candidate against a query on a 0..=100 scale
pub fn score(candidate: &str, query: &str) -> f64 {
    let candidate = candidate.to_lowercase();
    let query = query.to_lowercase();

    if candidate.is_empty() || query.is_empty() {
        return 0.0;
    }

    let coverage = query.chars().count() as f64 / candidate.chars().count() as f64;

    if candidate == query {
        return 100.0;
    }

    if candidate.starts_with(&query) {
        return 90.0 + 9.0 * coverage;
    }

    if let Some(pos) = candidate.find(&query) {
        let position_penalty = (pos as f64).min(20.0);
        return 60.0 + 20.0 * coverage - position_penalty;
    }

    let Some(positions) = subsequence_positions(&candidate, &query) else {
        return 0.0;
    };

    // Contiguous runs were caught above, so there is at least one gap;
    // the more scattered the match, the faster it falls under MIN_SCORE.
    let span = positions[positions.len() - 1] - positions[0] + 1;
    let gaps = span.saturating_sub(positions.len()) as f64;
    let start_penalty = positions[0] as f64 * 0.5;

    (50.0 - 6.0 * gaps - start_penalty + 10.0 * coverage).clamp(0.0, 59.0)
}

/// Filter and rank items by a string key, best match first
pub fn filter<'a, T, F>(query: &str, items: &'a [T], key: F, min_score: f64) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut scored: Vec<(f64, usize, &T)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let s = score(key(item), query);
            (s >= min_score).then_some((s, index, item))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    scored.into_iter().map(|(_, _, item)| item).collect()
}

/// Char positions (by char index) of `needle` as a subsequence of `haystack`
fn subsequence_positions(haystack: &str, needle: &str) -> Option<Vec<usize>> {
    let hay: Vec<char> = haystack.chars().collect();
    let mut positions = Vec::with_capacity(needle.chars().count());
    let mut next = 0;

    for needle_char in needle.chars() {
        let offset = hay[next..].iter().position(|&c| c == needle_char)?;
        positions.push(next + offset);
        next += offset + 1;
    }

    Some(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_scores_highest() {
        assert_eq!(score("repos", "repos"), 100.0);
        assert_eq!(score("Repos", "repos"), 100.0);
    }

    #[test]
    fn test_prefix_beats_substring() {
        let prefix = score("reporadar", "repo");
        let substring = score("alfred-repos", "repo");
        assert!(prefix > substring);
        assert!(substring >= MIN_SCORE);
    }

    #[test]
    fn test_subsequence_matches_above_threshold() {
        // 'r', 'p', 'o' through "repo": one gap
        assert!(score("repo", "rpo") >= MIN_SCORE);
    }

    #[test]
    fn test_scattered_subsequence_falls_below_threshold() {
        assert!(score("xavier-zebra-archive", "xz") < MIN_SCORE);
    }

    #[test]
    fn test_no_subsequence_scores_zero() {
        assert_eq!(score("dotfiles", "zzz"), 0.0);
        assert_eq!(score("", "query"), 0.0);
        assert_eq!(score("candidate", ""), 0.0);
    }

    #[test]
    fn test_filter_excludes_and_ranks() {
        let names = vec![
            "dotfiles".to_string(),
            "alfred-repos".to_string(),
            "repos".to_string(),
            "reporadar".to_string(),
        ];

        let matched = filter("repos", &names, |n| n.as_str(), MIN_SCORE);
        let matched: Vec<&str> = matched.into_iter().map(|s| s.as_str()).collect();

        assert!(!matched.contains(&"dotfiles"));
        assert_eq!(matched[0], "repos", "exact match ranks first: {:?}", matched);
        assert!(matched.contains(&"alfred-repos"));
    }

    #[test]
    fn test_filter_ties_preserve_input_order() {
        let names = vec!["aaa-repo".to_string(), "bbb-repo".to_string()];
        let matched = filter("repo", &names, |n| n.as_str(), MIN_SCORE);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0], "aaa-repo");
    }
}
