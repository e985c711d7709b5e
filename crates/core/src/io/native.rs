//! Native TIFF raster source (without GDAL dependency)
//!
//! Uses the `tiff` crate. The file is decoded once at open time and
//! windows are then served from memory in row strips; for files too large
//! for that, enable the `gdal` feature and use
//! [`GdalSource`](super::GdalSource), which reads block by block.
//!
//! Georeferencing tags are not interpreted. Aggregation works purely in
//! pixel space, and co-registration of the value and zone rasters is the
//! caller's responsibility either way.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use crate::tiles::{TileRead, Window};
use ndarray::Array2;
use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};

/// Default number of rows per served window
const STRIP_ROWS: usize = 256;

/// [`TileRead`] over a single-band TIFF file.
///
/// Samples are cast to `T`; a sample that cannot be represented becomes
/// `T::default_nodata()`.
#[derive(Debug, Clone)]
pub struct TiffSource<T: RasterElement> {
    raster: Raster<T>,
    block: (usize, usize),
}

impl<T: RasterElement> TiffSource<T> {
    /// Open and decode a TIFF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut decoder =
            Decoder::new(file).map_err(|e| Error::Other(format!("TIFF decode error: {e}")))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| Error::Other(format!("Cannot read TIFF dimensions: {e}")))?;
        let (rows, cols) = (height as usize, width as usize);

        let image = decoder
            .read_image()
            .map_err(|e| Error::Other(format!("Cannot read TIFF image data: {e}")))?;

        macro_rules! cast_buffer {
            ($buf:expr) => {
                $buf.iter()
                    .map(|&v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
                    .collect()
            };
        }

        let data: Vec<T> = match image {
            DecodingResult::U8(buf) => cast_buffer!(buf),
            DecodingResult::U16(buf) => cast_buffer!(buf),
            DecodingResult::U32(buf) => cast_buffer!(buf),
            DecodingResult::I8(buf) => cast_buffer!(buf),
            DecodingResult::I16(buf) => cast_buffer!(buf),
            DecodingResult::I32(buf) => cast_buffer!(buf),
            DecodingResult::F32(buf) => cast_buffer!(buf),
            DecodingResult::F64(buf) => cast_buffer!(buf),
            _ => {
                return Err(Error::UnsupportedDataType(
                    "unsupported TIFF pixel format".to_string(),
                ))
            }
        };

        let raster = Raster::from_vec(data, rows, cols)?;
        Ok(Self {
            raster,
            block: (STRIP_ROWS.min(rows.max(1)), cols.max(1)),
        })
    }
}

impl<T: RasterElement> TileRead<T> for TiffSource<T> {
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
        super::window_array(&self.raster, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use tiff::encoder::{colortype, TiffEncoder};

    fn write_f32_tiff(data: &[f32], width: u32, height: u32) -> NamedTempFile {
        let tmp = NamedTempFile::with_suffix(".tif").unwrap();
        let file = File::create(tmp.path()).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray32Float>(width, height, data)
            .unwrap();
        tmp
    }

    fn write_u32_tiff(data: &[u32], width: u32, height: u32) -> NamedTempFile {
        let tmp = NamedTempFile::with_suffix(".tif").unwrap();
        let file = File::create(tmp.path()).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray32>(width, height, data)
            .unwrap();
        tmp
    }

    #[test]
    fn test_open_float_tiff() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let tmp = write_f32_tiff(&data, 4, 3);

        let source: TiffSource<f64> = TiffSource::open(tmp.path()).unwrap();
        assert_eq!(source.shape(), (3, 4));

        let tile = source.read_window(&Window::new(0, 0, 3, 4)).unwrap();
        assert_eq!(tile[(0, 0)], 0.0);
        assert_eq!(tile[(2, 3)], 11.0);
    }

    #[test]
    fn test_open_integer_tiff_as_zones() {
        let data: Vec<u32> = vec![1, 1, 2, 2];
        let tmp = write_u32_tiff(&data, 2, 2);

        let source: TiffSource<i32> = TiffSource::open(tmp.path()).unwrap();
        let tile = source.read_window(&Window::new(0, 0, 2, 2)).unwrap();
        assert_eq!(tile[(0, 0)], 1);
        assert_eq!(tile[(1, 1)], 2);
    }

    #[test]
    fn test_block_is_row_strip() {
        let data: Vec<f32> = vec![0.0; 6];
        let tmp = write_f32_tiff(&data, 3, 2);
        let source: TiffSource<f64> = TiffSource::open(tmp.path()).unwrap();
        assert_eq!(source.block_size(), (2, 3));
    }
}
