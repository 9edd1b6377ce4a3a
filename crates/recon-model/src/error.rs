use thiserror::Error;

/// Errors raised while preparing a reconciliation or risk run.
///
/// These never escape the public entry points: they are rendered into a
/// one-row error table instead.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("dataset '{dataset}' has no column usable as {role}")]
    Schema { dataset: String, role: String },
    #[error("{pillar} requires a secondary dataset")]
    MissingDataset { pillar: String },
    #[error("unknown reconciliation mode '{0}'")]
    UnknownMode(String),
    #[error("invalid grouping level '{0}'")]
    InvalidGroupLevel(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
