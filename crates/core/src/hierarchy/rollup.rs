//! Rollup of sub-threshold target slices into their ancestors.
//!
//! Small slices are awkward to target directly (they produce dust trades),
//! so slices below a threshold are folded into the nearest ancestor that is
//! itself big enough to stand alone.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::FRACTION_EPSILON;
use crate::hierarchy::AssetTree;
use crate::keys::AssetKey;

/// Result of collapsing a slice map against a hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupResult {
    /// Collapsed slices: surviving class -> own slice plus absorbed slices.
    pub slices: HashMap<AssetKey, f64>,
    /// Surviving class -> absorbed descendant classes, ascending by slice
    /// value with key-order tie-break.
    pub absorbed: HashMap<AssetKey, Vec<AssetKey>>,
}

/// Collapses `slices` so that every surviving entry is at least `threshold`.
///
/// A slice below the threshold cascades upward to the nearest ancestor whose
/// own slice meets the threshold; when no ancestor qualifies it lands on the
/// root. Slices for classes missing from the tree pass through unchanged.
pub fn rollup(
    tree: &AssetTree,
    slices: &HashMap<AssetKey, f64>,
    threshold: f64,
) -> RollupResult {
    let mut result = RollupResult::default();

    for (key, &value) in slices {
        if !tree.contains(key) {
            warn!("Asset class '{}' is not in the hierarchy, passing through", key);
            *result.slices.entry(key.clone()).or_insert(0.0) += value;
            continue;
        }
        if value >= threshold - FRACTION_EPSILON {
            *result.slices.entry(key.clone()).or_insert(0.0) += value;
            continue;
        }

        let target = tree
            .ancestors(key)
            .into_iter()
            .find(|ancestor| {
                slices.get(*ancestor).copied().unwrap_or(0.0) >= threshold - FRACTION_EPSILON
            })
            .unwrap_or_else(|| tree.root())
            .clone();

        *result.slices.entry(target.clone()).or_insert(0.0) += value;
        if target != *key {
            result.absorbed.entry(target).or_default().push(key.clone());
        }
    }

    for (target, absorbed) in result.absorbed.iter_mut() {
        absorbed.sort_by(|a, b| {
            let va = slices.get(a).copied().unwrap_or(0.0);
            let vb = slices.get(b).copied().unwrap_or(0.0);
            va.partial_cmp(&vb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        // A class absorbed into the root may not carry a slice of its own;
        // make sure the bucket still exists in the output.
        debug_assert!(result.slices.contains_key(target));
    }

    result
}
