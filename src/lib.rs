//! spectral-diversity: moving-window spectral diversity for multi-band rasters
//!
//! Loads multi-band imagery into a [`Raster`], normalizes per-band no-data
//! sentinels to NaN, derives vegetation indices and threshold masks, and
//! computes the local coefficient of variation over a square moving window.

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    Raster, RasterCube, BandImage, Sample, GeoTransform, BoundingBox,
    SpectralError, SpectralResult,
};

pub use core::{
    Window, WindowedStatistic, WindowedStatisticParams, LocalStatistic,
    SpectralIndex, BandMapping, MaskParams, Comparison,
};

#[cfg(feature = "gdal")]
pub use io::{RasterReader, RasterWriter};
