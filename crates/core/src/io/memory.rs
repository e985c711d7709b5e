//! In-memory raster source

use crate::error::Result;
use crate::raster::{Raster, RasterElement};
use crate::tiles::{TileRead, Window};
use ndarray::Array2;

/// [`TileRead`] over a raster already resident in memory.
///
/// Borrows the raster, so building one is free. The default block size is
/// the whole raster (a single window); tests and callers that want to
/// exercise real tiling can shrink it with [`with_block_size`].
///
/// [`with_block_size`]: MemorySource::with_block_size
#[derive(Debug, Clone)]
pub struct MemorySource<'a, T: RasterElement> {
    raster: &'a Raster<T>,
    block: (usize, usize),
}

impl<'a, T: RasterElement> MemorySource<'a, T> {
    /// Wrap a raster, serving it as one single-window block
    pub fn new(raster: &'a Raster<T>) -> Self {
        let block = raster.shape();
        Self { raster, block }
    }

    /// Override the block size used for window iteration
    pub fn with_block_size(mut self, rows: usize, cols: usize) -> Self {
        self.block = (rows.max(1), cols.max(1));
        self
    }
}

impl<'a, T: RasterElement> TileRead<T> for MemorySource<'a, T> {
    fn shape(&self) -> (usize, usize) {
        self.raster.shape()
    }

    fn block_size(&self) -> (usize, usize) {
        self.block
    }

    fn nodata(&self) -> Option<T> {
        self.raster.nodata()
    }

    fn read_window(&self, window: &Window) -> Result<Array2<T>> {
        super::window_array(self.raster, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_window() {
        let raster = Raster::from_vec((0..12).collect(), 3, 4).unwrap();
        let source = MemorySource::new(&raster);

        let tile: Array2<i32> = source.read_window(&Window::new(1, 1, 2, 2)).unwrap();
        assert_eq!(tile[(0, 0)], 5);
        assert_eq!(tile[(1, 1)], 10);
    }

    #[test]
    fn test_read_window_out_of_bounds() {
        let raster: Raster<i32> = Raster::new(3, 3);
        let source = MemorySource::new(&raster);
        assert!(source.read_window(&Window::new(2, 2, 2, 2)).is_err());
    }

    #[test]
    fn test_default_block_is_whole_raster() {
        let raster: Raster<f64> = Raster::new(5, 9);
        assert_eq!(MemorySource::new(&raster).block_size(), (5, 9));
    }
}
