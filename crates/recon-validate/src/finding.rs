//! Raw pillar output before formatting.

use recon_model::{Discrepancy, PillarKey};
use recon_transform::Role;
use thiserror::Error;

/// Placeholder for fields a pillar does not fill.
pub const PLACEHOLDER: &str = "-";

/// One inconsistency as emitted by a pillar; detail and action are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub subject: String,
    pub issue_type: String,
    pub detail: Option<String>,
    pub action: Option<String>,
}

impl Finding {
    pub fn new(subject: impl Into<String>, issue_type: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issue_type: issue_type.into(),
            detail: None,
            action: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Coerce into the fixed output shape, defaulting omitted fields to `-`.
    pub fn into_discrepancy(self, pillar: PillarKey) -> Discrepancy {
        Discrepancy {
            subject: self.subject,
            pillar: pillar.as_str().to_string(),
            issue_type: self.issue_type,
            detail: self.detail.unwrap_or_else(|| PLACEHOLDER.to_string()),
            action: self.action.unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

/// A per-row failure. The row is skipped for the check that raised it.
///
/// Raw cell values are kept out of the message; they are clinical data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row {row}: {role} is not a number")]
    NotNumeric { row: usize, role: Role },

    #[error("row {row}: {role} is not a date")]
    NotDate { row: usize, role: Role },
}
