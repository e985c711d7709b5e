//! Streaming zonal aggregation
//!
//! Single forward pass: pull tile pairs, extract the zones present in
//! each, fold masked reductions into the accumulator store, then derive
//! the requested statistics once all tiles are consumed.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, trace};

use crate::accumulate::AccumulatorStore;
use crate::extract::unique_zones;
use crate::stats::StatSelection;
use crate::table::ZonalTable;
use terrastat_core::io::MemorySource;
use terrastat_core::tiles::{TilePairs, TileRead};
use terrastat_core::{Error, Raster, Result};

#[cfg(feature = "gdal")]
use terrastat_core::io::GdalSource;
#[cfg(not(feature = "gdal"))]
use terrastat_core::io::TiffSource;

/// Parameters for zonal aggregation
#[derive(Debug, Clone, Default)]
pub struct ZonalParams {
    /// Statistics to emit (default: sum only)
    pub stats: StatSelection,
    /// Zone identifiers excluded from aggregation entirely
    pub zone_nodata: Option<HashSet<i32>>,
}

/// Aggregate an open tile-pair stream into a [`ZonalTable`].
///
/// This is the core entry point; the file and in-memory variants are thin
/// wrappers that construct the stream. Tiles are processed strictly in
/// stream order, but per-zone accumulation is commutative and
/// associative, so tiling does not affect the result.
///
/// An empty stream (no tiles, or every tile all-nodata) yields an empty
/// table, not an error.
pub fn zonal_statistics<V, Z>(pairs: TilePairs<V, Z>, params: &ZonalParams) -> Result<ZonalTable>
where
    V: TileRead<f64>,
    Z: TileRead<i32>,
{
    validate(params)?;

    let mut store = AccumulatorStore::new();
    let mut tiles = 0usize;

    for pair in pairs {
        let pair = pair?;
        let present = unique_zones(pair.zones.view(), params.zone_nodata.as_ref());
        trace!(
            row = pair.window.row_off,
            col = pair.window.col_off,
            zones = present.len(),
            "tile"
        );
        for zone in present {
            store.update_zone(zone, pair.values.view(), pair.zones.view());
        }
        tiles += 1;
    }

    debug!(tiles, zones = store.len(), "streamed tile pairs");
    finalize(store, &params.stats)
}

/// Aggregate two rasters already in memory.
///
/// Unlike the file variant, both shapes are in hand here, so a mismatch
/// is rejected up front instead of producing garbage.
pub fn zonal_statistics_rasters(
    values: &Raster<f64>,
    zones: &Raster<i32>,
    params: &ZonalParams,
) -> Result<ZonalTable> {
    check_shapes(values, zones)?;
    zonal_statistics(
        TilePairs::new(MemorySource::new(values), MemorySource::new(zones)),
        params,
    )
}

/// Aggregate two rasters on disk, streaming tile pairs block by block.
///
/// Both rasters must share dimensions, resolution and transform. This is
/// the caller's responsibility and is not verified; a mismatched pair
/// produces garbage statistics rather than an error.
#[cfg(feature = "gdal")]
pub fn zonal_statistics_files<P, Q>(
    value_path: P,
    zone_path: Q,
    params: &ZonalParams,
) -> Result<ZonalTable>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let values = GdalSource::open(value_path)?;
    let zones = GdalSource::open(zone_path)?;
    zonal_statistics(TilePairs::new(values, zones), params)
}

/// Aggregate two rasters on disk, streaming tile pairs block by block.
///
/// Both rasters must share dimensions, resolution and transform. This is
/// the caller's responsibility and is not verified; a mismatched pair
/// produces garbage statistics rather than an error.
#[cfg(not(feature = "gdal"))]
pub fn zonal_statistics_files<P, Q>(
    value_path: P,
    zone_path: Q,
    params: &ZonalParams,
) -> Result<ZonalTable>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let values: TiffSource<f64> = TiffSource::open(value_path)?;
    let zones: TiffSource<i32> = TiffSource::open(zone_path)?;
    zonal_statistics(TilePairs::new(values, zones), params)
}

/// Aggregate two in-memory rasters with windows partitioned across rayon
/// workers.
///
/// Each worker accumulates a private store over its windows; the partial
/// stores merge additively at the end, exactly as the final reduction of
/// the sequential pass combines per-tile contributions.
#[cfg(feature = "parallel")]
pub fn zonal_statistics_par(
    values: &Raster<f64>,
    zones: &Raster<i32>,
    block: (usize, usize),
    params: &ZonalParams,
) -> Result<ZonalTable> {
    use rayon::prelude::*;
    use terrastat_core::tiles::WindowIter;

    validate(params)?;
    check_shapes(values, zones)?;

    let (rows, cols) = values.shape();
    let value_source = MemorySource::new(values);
    let zone_source = MemorySource::new(zones);
    let nodata = values.nodata();

    let windows: Vec<_> = WindowIter::new(rows, cols, block.0, block.1).collect();
    let partials: Vec<Result<AccumulatorStore>> = windows
        .into_par_iter()
        .map(|window| {
            let mut tile = value_source.read_window(&window)?;
            if let Some(nd) = nodata {
                tile.mapv_inplace(|v| if v == nd { f64::NAN } else { v });
            }
            let zone_tile = zone_source.read_window(&window)?;

            let mut local = AccumulatorStore::new();
            for zone in unique_zones(zone_tile.view(), params.zone_nodata.as_ref()) {
                local.update_zone(zone, tile.view(), zone_tile.view());
            }
            Ok(local)
        })
        .collect();

    let mut store = AccumulatorStore::new();
    for partial in partials {
        store.merge(partial?);
    }

    debug!(zones = store.len(), "merged parallel partial stores");
    finalize(store, &params.stats)
}

/// Fail fast on an unusable configuration, before any tile is read
fn validate(params: &ZonalParams) -> Result<()> {
    if params.stats.is_empty() {
        return Err(Error::InvalidParameter {
            name: "stats",
            value: "[]".to_string(),
            reason: "at least one statistic must be requested".to_string(),
        });
    }
    Ok(())
}

fn check_shapes(values: &Raster<f64>, zones: &Raster<i32>) -> Result<()> {
    let (vr, vc) = values.shape();
    let (zr, zc) = zones.shape();
    if (vr, vc) != (zr, zc) {
        return Err(Error::SizeMismatch {
            er: vr,
            ec: vc,
            ar: zr,
            ac: zc,
        });
    }
    Ok(())
}

/// Final reduction: one record per zone, derived statistics in column
/// order.
///
/// A stored record with `count == 0` cannot happen through extraction
/// (a zone only enters the store with at least one contributing pixel);
/// hitting one means the store was corrupted and aggregation aborts.
fn finalize(store: AccumulatorStore, stats: &StatSelection) -> Result<ZonalTable> {
    let mut table = ZonalTable::new(stats.to_vec());

    for (zone, record) in store.into_sorted() {
        if record.count == 0 {
            return Err(Error::Aggregation(format!(
                "zone {zone} entered the store with no contributing pixels"
            )));
        }
        let row = stats.iter().map(|stat| record.value(stat)).collect();
        table.push_row(zone, row);
    }

    Ok(table)
}
