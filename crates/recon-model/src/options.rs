//! Tunable constants for reconciliation runs.

use serde::{Deserialize, Serialize};

/// Suffixes appended to same-named columns when two datasets are joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSuffixes {
    pub left: String,
    pub right: String,
}

impl Default for JoinSuffixes {
    fn default() -> Self {
        Self {
            left: "_EDC".to_string(),
            right: "_EXT".to_string(),
        }
    }
}

impl JoinSuffixes {
    /// Suffixes for the swapped join order.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

/// Options controlling pillar thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconOptions {
    /// Largest tolerated gap in days between a visit date and a lab draw date.
    pub lab_date_window_days: i64,

    /// Open queries older than this many days are aging.
    pub aging_query_days: f64,

    /// Queries revised more often than this are ping-pong queries.
    pub ping_pong_revisions: f64,

    /// Share of all queries above which a form is a hotspot.
    pub form_hotspot_share: f64,

    pub join_suffixes: JoinSuffixes,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            lab_date_window_days: 2,
            aging_query_days: 30.0,
            ping_pong_revisions: 3.0,
            form_hotspot_share: 0.25,
            join_suffixes: JoinSuffixes::default(),
        }
    }
}

impl ReconOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lab_date_window(mut self, days: i64) -> Self {
        self.lab_date_window_days = days;
        self
    }

    #[must_use]
    pub fn with_aging_query_days(mut self, days: f64) -> Self {
        self.aging_query_days = days;
        self
    }

    #[must_use]
    pub fn with_join_suffixes(mut self, suffixes: JoinSuffixes) -> Self {
        self.join_suffixes = suffixes;
        self
    }
}
