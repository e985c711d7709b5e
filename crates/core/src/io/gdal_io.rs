//! GDAL-backed raster source
//!
//! Streams windows straight from a GDAL dataset in its native block grid,
//! so a raster is never fully resident in memory. GDAL's process-wide
//! driver registration happens inside the `gdal` crate on first use and is
//! not managed here.

use crate::error::Result;
use crate::raster::RasterElement;
use crate::tiles::{TileRead, Window};
use gdal::raster::GdalType;
use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;

/// [`TileRead`] over band 1 of a GDAL dataset.
///
/// The dataset handle is closed when the source is dropped.
pub struct GdalSource {
    dataset: Dataset,
    shape: (usize, usize),
    block: (usize, usize),
    nodata: Option<f64>,
}

impl GdalSource {
    /// Open a raster file read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset = Dataset::open(path.as_ref())?;
        let (cols, rows) = dataset.raster_size();

        let band = dataset.rasterband(1)?;
        let (block_cols, block_rows) = band.block_size();
        let nodata = band.no_data_value();

        Ok(Self {
            dataset,
            shape: (rows, cols),
            block: (block_rows.max(1), block_cols.max(1)),
            nodata,
        })
    }
}

impl<T: RasterElement + GdalType + Copy> TileRead<T> for GdalSource {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn block_size(&self) -> (usize, usize) {
        self.block
    }

    fn nodata(&self) -> Option<T> {
        self.nodata.and_then(num_traits::cast)
    }

    fn read_window(&self, window: &Window) -> Result<Array2<T>> {
        let band = self.dataset.rasterband(1)?;
        let buffer = band.read_as::<T>(
            (window.col_off as isize, window.row_off as isize),
            (window.cols, window.rows),
            (window.cols, window.rows),
            None,
        )?;

        let array = Array2::from_shape_vec((window.rows, window.cols), buffer.data().to_vec())
            .map_err(|e| crate::error::Error::Other(e.to_string()))?;
        Ok(array)
    }
}
