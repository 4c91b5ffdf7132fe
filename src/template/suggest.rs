//! "Did you mean" suggestions for unknown template identifiers.

use strsim::levenshtein;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of suggestions returned.
const MAX_SUGGESTIONS: usize = 3;

/// Find the names in `available` closest to `target`.
///
/// Returns at most three names whose edit distance is within half of the
/// target's length, closest first.
pub fn similar_names<'a, I>(target: &str, available: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<_> =
        available.into_iter().map(|name| (name, levenshtein(target, name))).collect();

    // Ties keep alphabetical order so output is stable
    scored.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    scored.dedup_by(|(a, _), (b, _)| a == b);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(MAX_SUGGESTIONS)
        .map(|(name, _)| name.to_string())
        .collect()
}
