//! The eight reconciliation pillars.
//!
//! Each pillar is an independent strategy behind the [`Pillar`] trait and is
//! looked up by its [`PillarKey`] in the [`crate::PillarRegistry`].

pub mod ae_conmed;
pub mod coding;
pub mod death;
pub mod labs;
pub mod mh_conmed;
pub mod pd;
pub mod query;
pub mod sae;

pub use ae_conmed::AeConMedPillar;
pub use coding::CodingPillar;
pub use death::DeathPillar;
pub use labs::LabsPillar;
pub use mh_conmed::MhConMedPillar;
pub use pd::PdReconPillar;
pub use query::QueryReconPillar;
pub use sae::SaePillar;

use recon_model::PillarKey;
use recon_transform::Role;

use crate::context::PillarContext;
use crate::finding::Finding;

/// A reconciliation rule set.
pub trait Pillar: Send + Sync {
    fn key(&self) -> PillarKey;

    /// Human-readable name.
    fn label(&self) -> &'static str;

    /// What the primary dataset holds.
    fn primary_label(&self) -> &'static str;

    /// What the secondary dataset holds; `None` for single-dataset pillars.
    fn secondary_label(&self) -> Option<&'static str> {
        None
    }

    fn needs_secondary(&self) -> bool {
        self.secondary_label().is_some()
    }

    /// Roles resolved on the primary dataset (the subject identifier is implied).
    fn primary_roles(&self) -> &'static [Role];

    /// Roles resolved on the secondary dataset.
    fn secondary_roles(&self) -> &'static [Role] {
        &[]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding>;
}

/// All built-in pillars, in mode-key order.
pub fn builtin() -> Vec<Box<dyn Pillar>> {
    vec![
        Box::new(SaePillar),
        Box::new(LabsPillar),
        Box::new(DeathPillar),
        Box::new(CodingPillar),
        Box::new(AeConMedPillar),
        Box::new(MhConMedPillar),
        Box::new(QueryReconPillar),
        Box::new(PdReconPillar),
    ]
}

/// True when `text` contains any of `needles`.
fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Substring match in either direction; empty names never overlap.
fn names_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// An indication is explained when it appears inside any of the terms.
fn indication_explained<'t>(indication: &str, mut terms: impl Iterator<Item = &'t str>) -> bool {
    terms.any(|term| term.contains(indication))
}
