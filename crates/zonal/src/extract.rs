//! Zone identifier extraction

use ndarray::ArrayView2;
use std::collections::HashSet;

/// Distinct zone identifiers present in a tile, excluding `nodata` values.
///
/// The tile is not mutated. Output is an unordered set; callers must not
/// rely on any iteration order.
pub fn unique_zones(zones: ArrayView2<'_, i32>, nodata: Option<&HashSet<i32>>) -> HashSet<i32> {
    let mut unique: HashSet<i32> = zones.iter().copied().collect();
    if let Some(excluded) = nodata {
        for zone in excluded {
            unique.remove(zone);
        }
    }
    unique
}
