//! Core raster processing modules

pub mod window;
pub mod statistics;
pub mod moving_window;
pub mod nodata;
pub mod indices;
pub mod masking;

// Re-export main types
pub use window::Window;
pub use statistics::{LocalStatistic, BandSummary, band_summary, mean, population_std};
pub use moving_window::{WindowedStatistic, WindowedStatisticParams, compute, compute_sequential, coefficient_of_variation};
pub use nodata::{normalize_nodata, normalize_band};
pub use indices::{SpectralIndex, BandMapping, normalized_difference, ndvi};
pub use masking::{MaskParams, Comparison, threshold_mask, apply_mask, apply_mask_to_raster, mask_coverage};
