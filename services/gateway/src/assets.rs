//! Static asset reference table

use rustc_hash::FxHashMap;

use pulse_common::Asset;

/// Immutable id -> code lookup, built once at startup
///
/// Shared read-only across every session and request; populated before the
/// first connection is accepted and never mutated afterwards, so concurrent
/// unsynchronized reads are safe behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AssetTable {
    by_id: FxHashMap<i64, String>,
    codes: Vec<String>,
}

impl AssetTable {
    /// Build the table from the loaded asset list
    #[must_use]
    pub fn new(assets: Vec<Asset>) -> Self {
        let mut by_id = FxHashMap::default();
        let mut codes = Vec::with_capacity(assets.len());
        for asset in assets {
            by_id.insert(asset.id, asset.code.clone());
            codes.push(asset.code);
        }
        codes.sort();
        Self { by_id, codes }
    }

    /// Display label for an asset id: its code when known, else the
    /// decimal form of the id
    #[must_use]
    pub fn label(&self, asset_id: i64) -> String {
        self.by_id
            .get(&asset_id)
            .cloned()
            .unwrap_or_else(|| asset_id.to_string())
    }

    /// All known codes, lexicographically sorted
    #[must_use]
    pub fn codes_sorted(&self) -> Vec<String> {
        self.codes.clone()
    }

    /// All known asset ids
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.by_id.keys().copied()
    }

    /// Number of tracked assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
