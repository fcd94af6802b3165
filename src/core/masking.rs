use crate::types::{BandImage, Raster, Sample, SpectralError, SpectralResult};
use ndarray::{Array2, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

/// How a pixel is compared against the mask threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
}

impl Comparison {
    fn passes(&self, value: Sample, threshold: Sample) -> bool {
        match self {
            Comparison::GreaterOrEqual => value >= threshold,
            Comparison::Greater => value > threshold,
            Comparison::LessOrEqual => value <= threshold,
            Comparison::Less => value < threshold,
        }
    }
}

impl std::str::FromStr for Comparison {
    type Err = SpectralError;

    /// Parses `">="`, `">"`, `"<="` or `"<"`
    fn from_str(s: &str) -> SpectralResult<Self> {
        match s.trim() {
            ">=" => Ok(Comparison::GreaterOrEqual),
            ">" => Ok(Comparison::Greater),
            "<=" => Ok(Comparison::LessOrEqual),
            "<" => Ok(Comparison::Less),
            other => Err(SpectralError::InvalidParameter(format!(
                "Unknown comparison operator '{}', expected one of >=, >, <=, <",
                other
            ))),
        }
    }
}

/// Threshold mask parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskParams {
    pub threshold: Sample,
    pub comparison: Comparison,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            threshold: 0.6, // dense vegetation NDVI
            comparison: Comparison::GreaterOrEqual,
        }
    }
}

/// Boolean mask, true where the pixel passes the threshold
///
/// NaN never passes.
pub fn threshold_mask(values: ArrayView2<'_, Sample>, params: &MaskParams) -> SpectralResult<Array2<bool>> {
    if params.threshold.is_nan() {
        return Err(SpectralError::InvalidParameter(
            "Mask threshold must not be NaN".to_string(),
        ));
    }

    let mask = values.mapv(|v| params.comparison.passes(v, params.threshold));
    log::debug!(
        "Threshold mask {:?} {} keeps {:.1}% of pixels",
        params.comparison,
        params.threshold,
        mask_coverage(mask.view()) * 100.0
    );
    Ok(mask)
}

/// Copy of `values` with NaN wherever the mask is false
pub fn apply_mask(values: ArrayView2<'_, Sample>, mask: ArrayView2<'_, bool>) -> SpectralResult<BandImage> {
    check_mask_shape(values.dim(), mask.dim())?;
    Ok(Zip::from(&values)
        .and(&mask)
        .map_collect(|&v, &keep| if keep { v } else { Sample::NAN }))
}

/// Copy of the raster with every band masked
pub fn apply_mask_to_raster(raster: &Raster, mask: ArrayView2<'_, bool>) -> SpectralResult<Raster> {
    let (_, rows, cols) = raster.shape();
    check_mask_shape((rows, cols), mask.dim())?;

    let mut masked = raster.clone();
    for mut band in masked.data_mut().axis_iter_mut(Axis(0)) {
        Zip::from(&mut band).and(&mask).for_each(|v, &keep| {
            if !keep {
                *v = Sample::NAN;
            }
        });
    }

    log::info!("Applied mask to {} bands", raster.band_count());
    Ok(masked)
}

/// Fraction of mask pixels that are true
pub fn mask_coverage(mask: ArrayView2<'_, bool>) -> f64 {
    if mask.is_empty() {
        return 0.0;
    }
    mask.iter().filter(|&&keep| keep).count() as f64 / mask.len() as f64
}

fn check_mask_shape(raster: (usize, usize), mask: (usize, usize)) -> SpectralResult<()> {
    if raster != mask {
        return Err(SpectralError::ShapeMismatch(format!(
            "Mask shape {:?} does not match raster shape {:?}",
            mask, raster
        )));
    }
    Ok(())
}
