//! # Terrastat Core
//!
//! Core types and raster access for the terrastat zonal statistics engine.
//!
//! This crate provides:
//! - `Raster<T>`: generic in-memory raster grid
//! - `GeoTransform`: affine georeferencing metadata
//! - `Window` / `TilePairs`: block-wise streaming over co-registered raster pairs
//! - Raster source backends: GDAL (feature `gdal`), native TIFF, in-memory

pub mod error;
pub mod io;
pub mod raster;
pub mod tiles;

pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use tiles::{TilePair, TilePairs, TileRead, Window};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::tiles::{TilePair, TilePairs, TileRead, Window};
}
