//! Rule-based reconciliation of clinical extracts.
//!
//! A run resolves column roles on each dataset, hands both views to the
//! selected [`Pillar`], and formats its findings into the fixed
//! `Subject, Issue, Detail, Action` table with [`recon_model::Metrics`].
//!
//! ```
//! use recon_model::{Dataset, ReconOptions};
//! use recon_validate::run_recon;
//!
//! let queries = Dataset::from_text_rows(
//!     "queries",
//!     ["SubjectID", "QueryStatus", "DaysOpen", "FormOID"],
//!     [vec!["001", "Open", "45", "AE"]],
//! );
//! let outcome = run_recon(&queries, None, "Query_Recon", &ReconOptions::default());
//! assert_eq!(outcome.metrics.total, 1);
//! ```

mod context;
mod engine;
mod finding;
mod formatter;
pub mod pillars;
mod registry;

pub use context::{DatasetView, PillarContext};
pub use engine::{ReconEngine, run_recon};
pub use finding::{Finding, RowError};
pub use formatter::{TOP_SUBJECTS, breakdown, format_output};
pub use pillars::Pillar;
pub use registry::{PillarInfo, PillarRegistry};
