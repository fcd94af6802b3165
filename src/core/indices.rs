//! Spectral vegetation and water indices
//!
//! All indices are normalized differences of two bands. Pixels where either
//! band is no-data, or where the bands sum to zero, come out as NaN.

use crate::types::{BandImage, Raster, Sample, SpectralError, SpectralResult};
use ndarray::{ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Supported normalized-difference indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectralIndex {
    /// (NIR - Red) / (NIR + Red)
    Ndvi,
    /// (Green - NIR) / (Green + NIR), McFeeters
    Ndwi,
    /// (NIR - Green) / (NIR + Green)
    Gndvi,
}

/// 1-based band positions of the sensor's channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMapping {
    pub green: Option<usize>,
    pub red: Option<usize>,
    pub nir: Option<usize>,
}

impl SpectralIndex {
    pub fn compute(&self, raster: &Raster, bands: &BandMapping) -> SpectralResult<BandImage> {
        log::info!("Computing {:?}", self);

        let (positive, negative) = match self {
            SpectralIndex::Ndvi => (require(bands.nir, "nir")?, require(bands.red, "red")?),
            SpectralIndex::Ndwi => (require(bands.green, "green")?, require(bands.nir, "nir")?),
            SpectralIndex::Gndvi => (require(bands.nir, "nir")?, require(bands.green, "green")?),
        };

        normalized_difference(raster.band(positive)?, raster.band(negative)?)
    }
}

fn require(band: Option<usize>, name: &str) -> SpectralResult<usize> {
    band.ok_or_else(|| SpectralError::InvalidParameter(format!("No {} band configured", name)))
}

/// `(a - b) / (a + b)`
pub fn normalized_difference(
    a: ArrayView2<'_, Sample>,
    b: ArrayView2<'_, Sample>,
) -> SpectralResult<BandImage> {
    if a.dim() != b.dim() {
        return Err(SpectralError::ShapeMismatch(format!(
            "Band shapes differ: {:?} vs {:?}",
            a.dim(),
            b.dim()
        )));
    }

    Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| {
        let sum = x + y;
        if !x.is_finite() || !y.is_finite() || sum == 0.0 {
            Sample::NAN
        } else {
            (x - y) / sum
        }
    }))
}

/// NDVI from 1-based red and near-infrared band indices
pub fn ndvi(raster: &Raster, red_band: usize, nir_band: usize) -> SpectralResult<BandImage> {
    SpectralIndex::Ndvi.compute(
        raster,
        &BandMapping {
            green: None,
            red: Some(red_band),
            nir: Some(nir_band),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, stack, Axis};

    fn two_band(red: BandImage, nir: BandImage) -> Raster {
        let data = stack(Axis(0), &[red.view(), nir.view()]).unwrap();
        Raster::new(data, vec![None, None]).unwrap()
    }

    #[test]
    fn test_ndvi_values() {
        let raster = two_band(array![[0.1, 0.2], [0.0, 0.3]], array![[0.5, 0.2], [0.0, f64::NAN]]);
        let result = ndvi(&raster, 1, 2).unwrap();

        assert_abs_diff_eq!(result[[0, 0]], 0.4 / 0.6, epsilon = 1e-12);
        assert_eq!(result[[0, 1]], 0.0);
        // zero denominator and missing NIR
        assert!(result[[1, 0]].is_nan());
        assert!(result[[1, 1]].is_nan());
    }

    #[test]
    fn test_ndvi_bad_band() {
        let raster = two_band(array![[1.0]], array![[1.0]]);
        assert!(matches!(
            ndvi(&raster, 1, 3),
            Err(SpectralError::BandOutOfRange { index: 3, count: 2 })
        ));
    }

    #[test]
    fn test_missing_band_mapping() {
        let raster = two_band(array![[1.0]], array![[2.0]]);
        let bands = BandMapping { green: None, red: Some(1), nir: Some(2) };
        assert!(matches!(
            SpectralIndex::Ndwi.compute(&raster, &bands),
            Err(SpectralError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = array![[1.0, 2.0]];
        let b = array![[1.0], [2.0]];
        assert!(matches!(
            normalized_difference(a.view(), b.view()),
            Err(SpectralError::ShapeMismatch(_))
        ));
    }
}
