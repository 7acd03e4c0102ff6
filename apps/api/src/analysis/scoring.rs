use crate::analysis::keywords::KeywordSet;

/// Points deducted from the similarity score per missing JD keyword.
pub const MISSING_KEYWORD_PENALTY: f64 = 1.5;
/// Lowest possible final score.
pub const SCORE_FLOOR: f64 = 0.0;

#[derive(Debug, Clone, Copy)]
pub struct ScoringPolicy {
    pub missing_keyword_penalty: f64,
    pub floor: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            missing_keyword_penalty: MISSING_KEYWORD_PENALTY,
            floor: SCORE_FLOOR,
        }
    }
}

impl ScoringPolicy {
    /// final = max(similarity - penalty * |missing|, floor), rounded to 2 decimals.
    pub fn score(&self, similarity: f64, missing: &KeywordSet) -> f64 {
        self.score_count(similarity, missing.len())
    }

    pub fn score_count(&self, similarity: f64, missing_count: usize) -> f64 {
        let penalty = missing_count as f64 * self.missing_keyword_penalty;
        round2((similarity - penalty).max(self.floor))
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
