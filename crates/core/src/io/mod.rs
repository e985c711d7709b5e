//! Raster source backends
//!
//! Each backend implements [`TileRead`](crate::tiles::TileRead):
//! - [`GdalSource`] (feature `gdal`): block-aligned windowed reads through GDAL
//! - [`TiffSource`]: native TIFF fallback, always available
//! - [`MemorySource`]: wraps an in-memory [`Raster`](crate::raster::Raster)

#[cfg(feature = "gdal")]
mod gdal_io;
mod memory;
mod native;

#[cfg(feature = "gdal")]
pub use gdal_io::GdalSource;
pub use memory::MemorySource;
pub use native::TiffSource;

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use crate::tiles::Window;
use ndarray::{s, Array2};

/// Copy one window out of an in-memory raster, bounds-checked.
pub(crate) fn window_array<T: RasterElement>(
    raster: &Raster<T>,
    window: &Window,
) -> Result<Array2<T>> {
    let (rows, cols) = raster.shape();
    if window.row_off + window.rows > rows || window.col_off + window.cols > cols {
        return Err(Error::WindowOutOfBounds {
            row_off: window.row_off,
            col_off: window.col_off,
            rows: window.rows,
            cols: window.cols,
        });
    }
    Ok(raster
        .view()
        .slice(s![
            window.row_off..window.row_off + window.rows,
            window.col_off..window.col_off + window.cols
        ])
        .to_owned())
}
