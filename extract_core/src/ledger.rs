//! Inventory ledger: units held per (material, quality).
//!
//! Entries are created lazily and only ever grow through `commit`. `seed`
//! exists for loading opening stock before any session starts.

use std::collections::BTreeMap;

use crate::material::MaterialId;
use crate::quality::Quality;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<(MaterialId, Quality), u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `units` to `(material, quality)` and return the new total.
    pub fn commit(&mut self, material: &MaterialId, quality: Quality, units: u32) -> u64 {
        let slot = self.entries.entry((material.clone(), quality)).or_insert(0);
        match slot.checked_add(u64::from(units)) {
            Some(total) => *slot = total,
            None => {
                tracing::warn!(%material, %quality, units, "ledger entry saturated; credit clipped");
                *slot = u64::MAX;
            }
        }
        *slot
    }

    /// Set an entry outright; used for opening stock.
    pub fn seed(&mut self, material: &MaterialId, quality: Quality, units: u32) {
        self.entries
            .insert((material.clone(), quality), u64::from(units));
    }

    /// Units for one key; absent keys read as zero.
    pub fn count(&self, material: &MaterialId, quality: Quality) -> u64 {
        self.entries
            .get(&(material.clone(), quality))
            .copied()
            .unwrap_or(0)
    }

    /// Units for a material across all tiers.
    pub fn total_for(&self, material: &MaterialId) -> u64 {
        Quality::ALL
            .into_iter()
            .map(|q| self.count(material, q))
            .fold(0u64, u64::saturating_add)
    }

    /// Materials with a positive count in any tier, each listed once, in id order.
    pub fn materials_in_stock(&self) -> Vec<MaterialId> {
        let mut out: Vec<MaterialId> = Vec::new();
        for ((id, _), units) in &self.entries {
            if *units > 0 && out.last() != Some(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// All entries in (material, quality) order.
    pub fn iter(&self) -> impl Iterator<Item = (&MaterialId, Quality, u64)> {
        self.entries.iter().map(|((id, q), n)| (id, *q, *n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
