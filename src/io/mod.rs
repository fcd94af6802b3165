//! Raster file I/O

#[cfg(feature = "gdal")]
pub mod geotiff;

#[cfg(feature = "gdal")]
pub use geotiff::{RasterReader, RasterWriter};
