use crate::core::taxonomy::StrategyTag;
use crate::models::LabelMatching;

/// LP interest labels that match at least one GP strategy label
///
/// Each LP label is reported at most once, in the LP's order. Blank labels
/// on either side never match.
pub fn overlapping_interests(
    strategies: &[String],
    interests: &[String],
    mode: LabelMatching,
) -> Vec<String> {
    match mode {
        LabelMatching::Substring => substring_overlap(strategies, interests),
        LabelMatching::Taxonomy => taxonomy_overlap(strategies, interests),
    }
}

#[inline]
fn substring_overlap(strategies: &[String], interests: &[String]) -> Vec<String> {
    let strategies: Vec<String> = strategies
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    interests
        .iter()
        .filter(|interest| {
            let interest = interest.trim().to_lowercase();
            !interest.is_empty()
                && strategies
                    .iter()
                    .any(|strategy| strategy.contains(&interest) || interest.contains(strategy.as_str()))
        })
        .map(|interest| interest.trim().to_string())
        .collect()
}

#[inline]
fn taxonomy_overlap(strategies: &[String], interests: &[String]) -> Vec<String> {
    let gp_tags: Vec<StrategyTag> = strategies
        .iter()
        .filter_map(|s| StrategyTag::from_label(s))
        .collect();

    let mut shared: Vec<StrategyTag> = Vec::new();
    for tag in interests.iter().filter_map(|i| StrategyTag::from_label(i)) {
        if gp_tags.contains(&tag) && !shared.contains(&tag) {
            shared.push(tag);
        }
    }

    shared.into_iter().map(|tag| tag.label().to_string()).collect()
}

/// Case-insensitive "contains any of"
#[inline]
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|needle| haystack.contains(&needle.to_lowercase()))
}
