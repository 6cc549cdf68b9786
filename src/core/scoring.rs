use crate::core::labels::{contains_any, overlapping_interests};
use crate::models::{GpRecord, LabelMatching, LpRecord, QualityBand, QualityThresholds, ScoringWeights};

/// Score for one GP/LP pair with the reasons that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Score a GP/LP pair with hand-coded point rules
///
/// Rules, in evaluation order:
/// 1. strategy overlap: `strategy_overlap` points per matching LP interest
/// 2. investor type x AUM: institutional/pension with 500M+/1B+, otherwise
///    family office/HNWI with anything below 1B+
/// 3. GP has a fund in market
/// 4. LP states a jurisdiction
///
/// Reasons follow the rule order and skip rules that scored nothing.
/// Configured weights can be arbitrarily large; the total saturates at
/// `u32::MAX`.
pub fn calculate_match_score(
    gp: &GpRecord,
    lp: &LpRecord,
    weights: &ScoringWeights,
    mode: LabelMatching,
) -> MatchScore {
    let mut result = MatchScore::default();

    // Rule 1: strategy overlap
    let shared = overlapping_interests(&gp.strategies, &lp.interests, mode);
    if !shared.is_empty() && weights.strategy_overlap > 0 {
        let count = u32::try_from(shared.len()).unwrap_or(u32::MAX);
        result.score = result.score.saturating_add(weights.strategy_overlap.saturating_mul(count));
        let noun = if count == 1 { "strategy" } else { "strategies" };
        result
            .reasons
            .push(format!("{} matching {}: {}", count, noun, shared.join(", ")));
    }

    // Rule 2: investor type x AUM, first matching branch only
    let (points, reason) = investor_fit(lp.investor_type.as_deref().unwrap_or(""), &gp.aum_bracket, weights);
    if points > 0 {
        result.score = result.score.saturating_add(points);
        result.reasons.push(reason.to_string());
    }

    // Rule 3: active fundraising
    if is_fundraising(gp.fund_in_market.as_deref()) && weights.active_fundraising > 0 {
        result.score = result.score.saturating_add(weights.active_fundraising);
        result.reasons.push("GP is actively fundraising".to_string());
    }

    // Rule 4: jurisdiction presence only, no geographic compatibility
    if let Some(jurisdiction) = lp.jurisdiction.as_deref().map(str::trim).filter(|j| !j.is_empty()) {
        if weights.jurisdiction > 0 {
            result.score = result.score.saturating_add(weights.jurisdiction);
            result.reasons.push(format!("Jurisdiction: {}", jurisdiction));
        }
    }

    result
}

/// Points and reason for the investor type x AUM heuristic
#[inline]
pub fn investor_fit(investor_type: &str, aum_bracket: &str, weights: &ScoringWeights) -> (u32, &'static str) {
    if contains_any(investor_type, &["institutional", "pension"])
        && contains_any(aum_bracket, &["500M+", "1B+"])
    {
        (
            weights.institutional_large_aum,
            "Institutional investor suited to a large fund",
        )
    } else if contains_any(investor_type, &["family", "hnwi"]) && !contains_any(aum_bracket, &["1B+"]) {
        (
            weights.family_office_small_aum,
            "Family office or HNWI suited to an emerging manager",
        )
    } else {
        (0, "")
    }
}

#[inline]
fn is_fundraising(fund_in_market: Option<&str>) -> bool {
    match fund_in_market.map(str::trim) {
        Some(fund) => !fund.is_empty() && !fund.eq_ignore_ascii_case("no"),
        None => false,
    }
}

/// Presentation band for a score, highest band first
#[inline]
pub fn quality_band(score: u32, thresholds: &QualityThresholds) -> QualityBand {
    if score >= thresholds.excellent {
        QualityBand::Excellent
    } else if score >= thresholds.very_good {
        QualityBand::VeryGood
    } else if score >= thresholds.good {
        QualityBand::Good
    } else {
        QualityBand::Fair
    }
}
