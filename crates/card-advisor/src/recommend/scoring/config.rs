use serde::{Deserialize, Serialize};

/// Thresholds used by the base score rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Cashback rate (percent) at which the cashback score saturates.
    pub cashback_saturation_rate: f64,
    /// Paid fees at or below this amount (yen) still earn the low-fee score.
    pub low_fee_ceiling_yen: u64,
    /// Overseas travel coverage (10,000 yen units) that counts as generous.
    pub overseas_coverage_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cashback_saturation_rate: 2.0,
            low_fee_ceiling_yen: 2_200,
            overseas_coverage_floor: 3_000.0,
        }
    }
}
