//! Mode key to pillar lookup.

use std::collections::BTreeMap;

use recon_model::PillarKey;
use serde::Serialize;

use crate::pillars::{self, Pillar};

/// Catalogue entry describing one registered pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PillarInfo {
    pub key: PillarKey,
    pub label: &'static str,
    pub primary: &'static str,
    pub secondary: Option<&'static str>,
}

impl PillarInfo {
    pub fn needs_secondary(&self) -> bool {
        self.secondary.is_some()
    }
}

/// Registry of pillars indexed by mode key.
pub struct PillarRegistry {
    pillars: BTreeMap<PillarKey, Box<dyn Pillar>>,
}

impl Default for PillarRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PillarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            pillars: BTreeMap::new(),
        }
    }

    /// Registry holding the eight built-in pillars.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for pillar in pillars::builtin() {
            registry.register(pillar);
        }
        registry
    }

    /// Register a pillar, replacing any pillar with the same key.
    pub fn register(&mut self, pillar: Box<dyn Pillar>) {
        self.pillars.insert(pillar.key(), pillar);
    }

    pub fn get(&self, key: PillarKey) -> Option<&dyn Pillar> {
        self.pillars.get(&key).map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.pillars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pillars.is_empty()
    }

    /// Describe every registered pillar, in mode-key order.
    pub fn catalogue(&self) -> Vec<PillarInfo> {
        self.pillars
            .values()
            .map(|pillar| PillarInfo {
                key: pillar.key(),
                label: pillar.label(),
                primary: pillar.primary_label(),
                secondary: pillar.secondary_label(),
            })
            .collect()
    }
}
