//! # Terrastat Zonal
//!
//! Streaming per-zone summary statistics for raster pairs too large to
//! hold in memory.
//!
//! A value raster and a co-registered integer zone raster are read block
//! by block in lock-step; each block updates a per-zone store of
//! sufficient statistics (sum, sum of squares, count, min, max), and a
//! final pass derives the requested statistics into a [`ZonalTable`].
//!
//! ```ignore
//! use terrastat_zonal::{zonal_statistics_files, StatSelection, ZonalParams};
//!
//! let params = ZonalParams {
//!     stats: StatSelection::parse(["sum", "count", "mean"])?,
//!     ..Default::default()
//! };
//! let table = zonal_statistics_files("population.tif", "districts.tif", &params)?;
//! ```

pub mod accumulate;
pub mod aggregate;
pub mod extract;
pub mod stats;
pub mod table;

pub use accumulate::{AccumulatorStore, ZoneAccumulator};
#[cfg(feature = "parallel")]
pub use aggregate::zonal_statistics_par;
pub use aggregate::{
    zonal_statistics, zonal_statistics_files, zonal_statistics_rasters, ZonalParams,
};
pub use extract::unique_zones;
pub use stats::{StatSelection, ZonalStatistic};
pub use table::{ZonalRow, ZonalTable};
