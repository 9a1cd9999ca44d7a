//! Self-filling in-memory partnership resolver.

use dashmap::DashMap;

use crate::partnership::Partnership;

/// Resolves partnerships by name, auto-creating unknown ones from the
/// probe handed in. Purely in-memory; nothing survives the session.
#[derive(Debug, Default)]
pub struct SelfFillingPartnershipResolver {
    partnerships: DashMap<String, Partnership>,
}

impl SelfFillingPartnershipResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored partnership with the probe's name, storing
    /// the probe itself when the name is not yet known.
    pub fn resolve(&self, probe: &Partnership) -> Partnership {
        self.partnerships
            .entry(probe.name().to_owned())
            .or_insert_with(|| probe.clone())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.partnerships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partnerships.is_empty()
    }
}
