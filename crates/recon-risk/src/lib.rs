//! Risk signals derived from per-group count tables.
//!
//! [`analyze_risk`] ranks sites, subjects, or countries by a weighted,
//! subject-normalized score. [`monitoring_visit_report`] is the simpler
//! per-site score used for monitoring visit reports; it has its own
//! thresholds and is never mixed with the weighted ranking.

mod aggregator;
mod mvr;
mod score;

pub use aggregator::{RiskAggregator, analyze_risk};
pub use mvr::{MonitoringVisitReport, MvrMetrics, monitoring_visit_report};
pub use score::{DeviationCounts, ScoreInputs, normalize_score, weighted_score};
