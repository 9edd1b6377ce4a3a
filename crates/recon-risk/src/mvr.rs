//! Monitoring visit report scoring.

use std::fmt;

use recon_model::{RiskBand, RiskThresholds, format_numeric};
use serde::{Deserialize, Serialize};

const QUERY_WEIGHT: f64 = 2.0;
const SAE_WEIGHT: f64 = 5.0;

/// Site metrics collected for a monitoring visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MvrMetrics {
    /// Source data verification completed, in percent.
    pub sdv: f64,
    pub queries: f64,
    pub saes: f64,
}

/// Scored monitoring visit summary for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringVisitReport {
    pub site: String,
    pub metrics: MvrMetrics,
    pub score: f64,
    pub band: RiskBand,
}

impl MonitoringVisitReport {
    /// `queries*2 + SAEs*5`, banded with [`RiskThresholds::monitoring_visit`].
    pub fn new(site: impl Into<String>, metrics: MvrMetrics) -> Self {
        let score = metrics.queries * QUERY_WEIGHT + metrics.saes * SAE_WEIGHT;
        Self {
            site: site.into(),
            metrics,
            score,
            band: RiskThresholds::monitoring_visit().classify(score),
        }
    }
}

impl fmt::Display for MonitoringVisitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MVR for {}: score {} ({}), SDV {}%, {} queries, {} SAEs",
            self.site,
            format_numeric(self.score),
            self.band,
            format_numeric(self.metrics.sdv),
            format_numeric(self.metrics.queries),
            format_numeric(self.metrics.saes),
        )
    }
}

pub fn monitoring_visit_report(site: &str, metrics: MvrMetrics) -> MonitoringVisitReport {
    MonitoringVisitReport::new(site, metrics)
}
