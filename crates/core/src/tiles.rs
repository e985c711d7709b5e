//! Block-wise streaming over co-registered raster pairs
//!
//! A [`TilePairs`] iterator reads one spatial block at a time from a value
//! raster and a zone raster at matching pixel offsets, so arbitrarily large
//! raster pairs can be aggregated without ever being resident in memory.

use crate::error::Result;
use crate::raster::RasterElement;
use ndarray::Array2;

/// A rectangular read window into a raster, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Row offset of the upper-left pixel
    pub row_off: usize,
    /// Column offset of the upper-left pixel
    pub col_off: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Window {
    /// Create a new window
    pub fn new(row_off: usize, col_off: usize, rows: usize, cols: usize) -> Self {
        Self {
            row_off,
            col_off,
            rows,
            cols,
        }
    }

    /// Window dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Iterator over block-aligned windows covering a raster.
///
/// Windows are emitted row-major and clamped at the right and bottom
/// edges, so every pixel is covered exactly once.
#[derive(Debug, Clone)]
pub struct WindowIter {
    total_rows: usize,
    total_cols: usize,
    block_rows: usize,
    block_cols: usize,
    current_row: usize,
    current_col: usize,
}

impl WindowIter {
    /// Iterate windows of `block_rows` x `block_cols` over a raster of
    /// `total_rows` x `total_cols`. Zero block dimensions are clamped to 1.
    pub fn new(total_rows: usize, total_cols: usize, block_rows: usize, block_cols: usize) -> Self {
        Self {
            total_rows,
            total_cols,
            block_rows: block_rows.max(1),
            block_cols: block_cols.max(1),
            current_row: 0,
            current_col: 0,
        }
    }
}

impl Iterator for WindowIter {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.total_rows || self.total_cols == 0 {
            return None;
        }

        let rows = self.block_rows.min(self.total_rows - self.current_row);
        let cols = self.block_cols.min(self.total_cols - self.current_col);
        let window = Window::new(self.current_row, self.current_col, rows, cols);

        self.current_col += self.block_cols;
        if self.current_col >= self.total_cols {
            self.current_col = 0;
            self.current_row += self.block_rows;
        }

        Some(window)
    }
}

/// Read access to one band of a raster, window by window.
///
/// This is the seam between the aggregation engine and whatever actually
/// decodes pixels: GDAL datasets, native TIFF files or in-memory grids all
/// implement it. Implementations must release any underlying handle when
/// dropped.
pub trait TileRead<T: RasterElement> {
    /// Raster dimensions as (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Native block size as (rows, cols); the preferred read granularity
    fn block_size(&self) -> (usize, usize);

    /// Declared nodata sentinel, if any
    fn nodata(&self) -> Option<T>;

    /// Read one window as a 2-D array of shape `window.shape()`
    fn read_window(&self, window: &Window) -> Result<Array2<T>>;
}

/// One spatial block read from a value/zone raster pair.
///
/// Invariant: `values.dim() == zones.dim()`. Declared value-raster nodata
/// has already been normalized to NaN when the pair is produced.
#[derive(Debug, Clone)]
pub struct TilePair {
    /// Value raster block
    pub values: Array2<f64>,
    /// Zone identifier block at the same pixel offsets
    pub zones: Array2<i32>,
    /// Position of the block within the rasters
    pub window: Window,
}

/// Lazy, single-pass iterator of [`TilePair`]s over two raster sources.
///
/// Blocks follow the value source's native block grid. A block whose value
/// pixels are all nodata is skipped without touching the zone raster; the
/// test is element-wise ("every pixel is nodata"), so partially-valid
/// blocks are always yielded. The iterator is not restartable: once
/// exhausted, open a fresh pair of sources to iterate again. Dropping it
/// drops the sources, which closes any underlying file handles.
///
/// The two rasters must share dimensions, resolution and transform. This
/// is not verified; a mismatched pair produces garbage statistics, not an
/// error.
pub struct TilePairs<V, Z> {
    values: V,
    zones: Z,
    windows: WindowIter,
    value_nodata: Option<f64>,
}

impl<V, Z> TilePairs<V, Z>
where
    V: TileRead<f64>,
    Z: TileRead<i32>,
{
    /// Open a tile-pair stream over a value source and a zone source
    pub fn new(values: V, zones: Z) -> Self {
        let (rows, cols) = values.shape();
        let (block_rows, block_cols) = values.block_size();
        let value_nodata = values.nodata();
        Self {
            values,
            zones,
            windows: WindowIter::new(rows, cols, block_rows, block_cols),
            value_nodata,
        }
    }

    fn all_nodata(&self, tile: &Array2<f64>) -> bool {
        tile.iter().all(|v| v.is_nodata(self.value_nodata))
    }
}

impl<V, Z> Iterator for TilePairs<V, Z>
where
    V: TileRead<f64>,
    Z: TileRead<i32>,
{
    type Item = Result<TilePair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let window = self.windows.next()?;

            let mut values = match self.values.read_window(&window) {
                Ok(tile) => tile,
                Err(e) => return Some(Err(e)),
            };

            if self.all_nodata(&values) {
                continue;
            }

            if let Some(nd) = self.value_nodata {
                values.mapv_inplace(|v| if v == nd { f64::NAN } else { v });
            }

            let zones = match self.zones.read_window(&window) {
                Ok(tile) => tile,
                Err(e) => return Some(Err(e)),
            };

            return Some(Ok(TilePair {
                values,
                zones,
                window,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::raster::Raster;

    fn value_raster(data: Vec<f64>, rows: usize, cols: usize, nodata: Option<f64>) -> Raster<f64> {
        let mut r = Raster::from_vec(data, rows, cols).unwrap();
        r.set_nodata(nodata);
        r
    }

    #[test]
    fn test_window_iter_covers_every_pixel_once() {
        let mut covered = vec![vec![0usize; 10]; 7];
        for w in WindowIter::new(7, 10, 3, 4) {
            for r in w.row_off..w.row_off + w.rows {
                for c in w.col_off..w.col_off + w.cols {
                    covered[r][c] += 1;
                }
            }
        }
        assert!(covered.iter().flatten().all(|&n| n == 1));
    }

    #[test]
    fn test_window_iter_clamps_edges() {
        let windows: Vec<_> = WindowIter::new(5, 5, 4, 4).collect();
        assert_eq!(windows.len(), 4);
        let last = windows.last().unwrap();
        assert_eq!(last.shape(), (1, 1));
    }

    #[test]
    fn test_window_iter_empty_raster() {
        assert_eq!(WindowIter::new(0, 10, 4, 4).count(), 0);
        assert_eq!(WindowIter::new(10, 0, 4, 4).count(), 0);
    }

    #[test]
    fn test_tile_pairs_shapes_match() {
        let values = value_raster((0..24).map(f64::from).collect(), 4, 6, None);
        let zones: Raster<i32> = Raster::filled(4, 6, 1);

        let pairs = TilePairs::new(
            MemorySource::new(&values).with_block_size(2, 3),
            MemorySource::new(&zones).with_block_size(2, 3),
        );

        let mut count = 0;
        for pair in pairs {
            let pair = pair.unwrap();
            assert_eq!(pair.values.dim(), pair.zones.dim());
            assert_eq!(pair.values.dim(), pair.window.shape());
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn test_all_nodata_tile_is_skipped() {
        // Left half nodata, right half valid: 2 of 4 blocks survive.
        let mut data = vec![-9999.0; 16];
        for r in 0..4 {
            for c in 2..4 {
                data[r * 4 + c] = 1.0;
            }
        }
        let values = value_raster(data, 4, 4, Some(-9999.0));
        let zones: Raster<i32> = Raster::filled(4, 4, 7);

        let pairs = TilePairs::new(
            MemorySource::new(&values).with_block_size(2, 2),
            MemorySource::new(&zones).with_block_size(2, 2),
        );
        assert_eq!(pairs.count(), 2);
    }

    #[test]
    fn test_partially_nodata_tile_is_kept() {
        // One nodata pixel must not drop the whole block.
        let mut data = vec![1.0; 16];
        data[0] = -9999.0;
        let values = value_raster(data, 4, 4, Some(-9999.0));
        let zones: Raster<i32> = Raster::filled(4, 4, 7);

        let pairs: Vec<_> = TilePairs::new(
            MemorySource::new(&values).with_block_size(4, 4),
            MemorySource::new(&zones).with_block_size(4, 4),
        )
        .collect();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_nodata_normalized_to_nan() {
        let values = value_raster(vec![-9999.0, 2.0, 3.0, 4.0], 2, 2, Some(-9999.0));
        let zones: Raster<i32> = Raster::filled(2, 2, 1);

        let pair = TilePairs::new(MemorySource::new(&values), MemorySource::new(&zones))
            .next()
            .unwrap()
            .unwrap();
        assert!(pair.values[(0, 0)].is_nan());
        assert_eq!(pair.values[(0, 1)], 2.0);
    }

    #[test]
    fn test_iterator_is_single_pass() {
        let values = value_raster(vec![1.0; 4], 2, 2, None);
        let zones: Raster<i32> = Raster::filled(2, 2, 1);

        let mut pairs = TilePairs::new(MemorySource::new(&values), MemorySource::new(&zones));
        assert!(pairs.next().is_some());
        assert!(pairs.next().is_none());
        assert!(pairs.next().is_none());
    }
}
