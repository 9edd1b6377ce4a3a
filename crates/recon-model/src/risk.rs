//! Risk aggregation output types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Dimension a count table is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupLevel {
    Site,
    Subject,
    Country,
}

impl GroupLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Subject => "Subject",
            Self::Country => "Country",
        }
    }
}

impl fmt::Display for GroupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupLevel {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "site" => Ok(Self::Site),
            "subject" => Ok(Self::Subject),
            "country" => Ok(Self::Country),
            _ => Err(ReconError::InvalidGroupLevel(s.to_string())),
        }
    }
}

/// LOW/MEDIUM/HIGH classification of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Band cutoffs. Both bounds are exclusive: a score must exceed them.
///
/// Two named configurations exist and are never mixed: [`RiskThresholds::standard`]
/// for the weighted, subject-normalized score and [`RiskThresholds::monitoring_visit`]
/// for the monitoring visit report score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

impl RiskThresholds {
    pub const fn standard() -> Self {
        Self {
            high: 15.0,
            medium: 5.0,
        }
    }

    pub const fn monitoring_visit() -> Self {
        Self {
            high: 20.0,
            medium: 10.0,
        }
    }

    pub fn classify(&self, score: f64) -> RiskBand {
        if score > self.high {
            RiskBand::High
        } else if score > self.medium {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

/// Whether the score was divided by the subject count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMetric {
    #[serde(rename = "Score/Subject")]
    PerSubject,
    #[serde(rename = "Total Score")]
    Total,
}

impl ScoreMetric {
    pub fn label(self) -> &'static str {
        match self {
            Self::PerSubject => "Score/Subject",
            Self::Total => "Total Score",
        }
    }
}

/// Aggregated risk for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub group: String,
    /// Summed raw count columns, in source column order.
    pub aggregates: Vec<(String, f64)>,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub metric: ScoreMetric,
    pub band: RiskBand,
}

/// Output of the risk call: ranked records or a one-row error sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows")]
pub enum RiskTable {
    Records(Vec<RiskRecord>),
    Error(String),
}

impl RiskTable {
    pub fn records(&self) -> &[RiskRecord] {
        match self {
            Self::Records(records) => records,
            Self::Error(_) => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
