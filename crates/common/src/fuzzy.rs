//! Edit-distance similarity on Unicode scalar values.
//!
//! Scores are integer percentages in `0..=100`, taken from
//! `strsim::normalized_levenshtein`.

use strsim::normalized_levenshtein;

/// Similarity of the shorter string against the best-aligned window of the
/// longer one.
///
/// 100 means the shorter string occurs verbatim in the longer one. Empty
/// input on either side scores 0 so that a blank query never matches
/// everything.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    if long.contains(short) {
        return 100;
    }

    let long: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    long.windows(width)
        .map(|w| {
            let window: String = w.iter().collect();
            percent(normalized_levenshtein(short, &window))
        })
        .max()
        .unwrap_or(0)
}

fn percent(similarity: f64) -> u32 {
    (similarity * 100.0).round() as u32
}
