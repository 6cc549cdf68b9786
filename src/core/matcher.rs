use crate::core::scoring::{calculate_match_score, quality_band};
use crate::models::{GpRecord, LabelMatching, LpRecord, QualityThresholds, ScoredMatch, ScoringWeights};

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_pairs: usize,
}

/// Ranks every GP against every LP
///
/// # Pipeline
/// 1. Score the full GP x LP cross-product (GP outer, LP inner)
/// 2. Drop pairs scoring zero
/// 3. Stable sort by score, descending
/// 4. Attach the quality band
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    thresholds: QualityThresholds,
    label_matching: LabelMatching,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, thresholds: QualityThresholds, label_matching: LabelMatching) -> Self {
        Self {
            weights,
            thresholds,
            label_matching,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(
            ScoringWeights::default(),
            QualityThresholds::default(),
            LabelMatching::default(),
        )
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn label_matching(&self) -> LabelMatching {
        self.label_matching
    }

    /// Score and rank all pairs
    ///
    /// Ties keep encounter order, so two runs over the same input produce
    /// the same list.
    pub fn find_matches(&self, gps: &[GpRecord], lps: &[LpRecord]) -> MatchResult {
        let total_pairs = gps.len() * lps.len();

        let mut matches: Vec<ScoredMatch> = gps
            .iter()
            .flat_map(|gp| lps.iter().map(move |lp| (gp, lp)))
            .filter_map(|(gp, lp)| {
                let scored = calculate_match_score(gp, lp, &self.weights, self.label_matching);
                if scored.score == 0 {
                    return None;
                }

                Some(ScoredMatch {
                    gp_id: gp.id,
                    gp_name: gp.name.clone(),
                    gp_firm: gp.firm.clone(),
                    lp_id: lp.id,
                    lp_name: lp.name.clone(),
                    lp_organization: lp.organization.clone(),
                    score: scored.score,
                    reasons: scored.reasons,
                    quality: quality_band(scored.score, &self.thresholds),
                })
            })
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        MatchResult {
            matches,
            total_pairs,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
