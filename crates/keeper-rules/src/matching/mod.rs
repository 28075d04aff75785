//! String similarity for matching free text against canonical names.
//!
//! Players type "spot", "handgun", or "a .38 revolver"; the sheet and the
//! weapon catalog use "Spot Hidden", "Firearms (Handgun)", ".38 Revolver".
//! A [`SimilarityOracle`] scores how alike two strings are on a 0-100 scale and
//! the [`SkillResolver`] picks the best canonical key above a threshold.

pub mod resolver;

pub use resolver::{
    Resolved, ResolvedRating, SKILL_MATCH_THRESHOLD, SkillResolver, SkillSource,
    WEAPON_MATCH_THRESHOLD, base_chance, find_rating, resolve_rating,
};

use std::collections::BTreeSet;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Scores the similarity of two strings from 0 (unrelated) to 100 (same).
pub trait SimilarityOracle {
    /// Score `a` against `b`.
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Token-set ratio: compares the shared words and the leftovers separately,
/// so word order does not matter and a subset of words scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

/// Jaro-Winkler similarity on the lowercased strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl SimilarityOracle for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let left = tokens(a);
        let right = tokens(b);
        if left.is_empty() || right.is_empty() {
            return 0;
        }

        let common = join(left.intersection(&right));
        let only_left = join(left.difference(&right));
        let only_right = join(right.difference(&left));

        let with_left = join_nonempty(&common, &only_left);
        let with_right = join_nonempty(&common, &only_right);

        let mut best = ratio(&with_left, &with_right);
        if !common.is_empty() {
            best = best
                .max(ratio(&common, &with_left))
                .max(ratio(&common, &with_right));
        }
        best
    }
}

impl SimilarityOracle for JaroWinkler {
    fn score(&self, a: &str, b: &str) -> u8 {
        let score = jaro_winkler(&a.to_lowercase(), &b.to_lowercase());
        (score * 100.0).round() as u8
    }
}

/// Lowercased alphanumeric words. Punctuation separates words; leading and
/// trailing dots are dropped so ".38" reads as "38".
fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (normalized_levenshtein(a, b) * 100.0).round() as u8
}
