//! Reconciliation mode keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// The eight reconciliation pillars, addressed by their mode key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PillarKey {
    #[serde(rename = "SAE")]
    Sae,
    #[serde(rename = "Labs")]
    Labs,
    #[serde(rename = "Death")]
    Death,
    #[serde(rename = "Coding")]
    Coding,
    #[serde(rename = "AE_ConMed")]
    AeConMed,
    #[serde(rename = "MH_ConMed")]
    MhConMed,
    #[serde(rename = "Query_Recon")]
    QueryRecon,
    #[serde(rename = "PD_Recon")]
    PdRecon,
}

impl PillarKey {
    pub const ALL: [PillarKey; 8] = [
        PillarKey::Sae,
        PillarKey::Labs,
        PillarKey::Death,
        PillarKey::Coding,
        PillarKey::AeConMed,
        PillarKey::MhConMed,
        PillarKey::QueryRecon,
        PillarKey::PdRecon,
    ];

    /// Mode key as accepted by the dispatcher.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sae => "SAE",
            Self::Labs => "Labs",
            Self::Death => "Death",
            Self::Coding => "Coding",
            Self::AeConMed => "AE_ConMed",
            Self::MhConMed => "MH_ConMed",
            Self::QueryRecon => "Query_Recon",
            Self::PdRecon => "PD_Recon",
        }
    }

    /// Match a mode key case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for PillarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PillarKey {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ReconError::UnknownMode(s.to_string()))
    }
}
