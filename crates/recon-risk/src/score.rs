//! Weighted risk score.

use recon_model::round_to;

const QUERY_WEIGHT: f64 = 1.0;
const SAE_WEIGHT: f64 = 5.0;
const MAJOR_DEVIATION_WEIGHT: f64 = 3.0;
const MINOR_DEVIATION_WEIGHT: f64 = 1.0;
/// Applied when only a total deviation count is known.
const TOTAL_DEVIATION_WEIGHT: f64 = 2.0;

/// Protocol deviation counts in the most detailed form available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviationCounts {
    Split { major: f64, minor: f64 },
    Total(f64),
    Unknown,
}

impl DeviationCounts {
    pub fn score(self) -> f64 {
        match self {
            Self::Split { major, minor } => {
                major * MAJOR_DEVIATION_WEIGHT + minor * MINOR_DEVIATION_WEIGHT
            }
            Self::Total(total) => total * TOTAL_DEVIATION_WEIGHT,
            Self::Unknown => 0.0,
        }
    }
}

/// Summed counts for one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub queries: f64,
    pub saes: f64,
    pub deviations: DeviationCounts,
}

/// `queries*1 + SAEs*5 + deviation score`.
pub fn weighted_score(inputs: &ScoreInputs) -> f64 {
    inputs.queries * QUERY_WEIGHT + inputs.saes * SAE_WEIGHT + inputs.deviations.score()
}

/// Score per subject, rounded to two decimals; zero subjects count as one.
pub fn normalize_score(score: f64, subjects: f64) -> f64 {
    round_to(score / subjects.max(1.0), 2)
}
