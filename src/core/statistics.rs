use crate::types::Sample;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Reductions available for moving-window processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalStatistic {
    /// Population standard deviation divided by mean
    CoefficientOfVariation,
    /// Arithmetic mean
    Mean,
    /// Population standard deviation
    StandardDeviation,
    /// Population variance
    Variance,
    /// Number of finite samples
    Count,
}

impl LocalStatistic {
    /// Evaluate over a non-empty slice of finite samples
    pub fn evaluate(&self, values: &[Sample]) -> Sample {
        match self {
            LocalStatistic::CoefficientOfVariation => coefficient_of_variation(values),
            LocalStatistic::Mean => mean(values),
            LocalStatistic::StandardDeviation => population_std(values),
            LocalStatistic::Variance => population_variance(values),
            LocalStatistic::Count => values.len() as Sample,
        }
    }
}

impl Default for LocalStatistic {
    fn default() -> Self {
        LocalStatistic::CoefficientOfVariation
    }
}

/// Mean of the deviations from the first sample, and that first sample
///
/// Working relative to a sample in the data keeps constant input exact:
/// every deviation is 0, so mean and variance come out as `v` and `0`.
fn shifted_mean(values: &[Sample]) -> (Sample, Sample) {
    let shift = values[0];
    let offset = values.iter().map(|v| v - shift).sum::<Sample>() / values.len() as Sample;
    (shift, offset)
}

pub fn mean(values: &[Sample]) -> Sample {
    if values.is_empty() {
        return Sample::NAN;
    }
    let (shift, offset) = shifted_mean(values);
    shift + offset
}

/// Variance with divisor N
pub fn population_variance(values: &[Sample]) -> Sample {
    if values.is_empty() {
        return Sample::NAN;
    }
    let (shift, offset) = shifted_mean(values);
    values
        .iter()
        .map(|v| {
            let d = (v - shift) - offset;
            d * d
        })
        .sum::<Sample>()
        / values.len() as Sample
}

pub fn population_std(values: &[Sample]) -> Sample {
    population_variance(values).sqrt()
}

/// Population standard deviation over mean
///
/// A zero mean yields a non-finite value, which callers treat as no-data.
pub fn coefficient_of_variation(values: &[Sample]) -> Sample {
    population_std(values) / mean(values)
}

/// Summary of the finite samples in a band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub count: usize,
    pub min: Sample,
    pub max: Sample,
    pub mean: Sample,
    pub std: Sample,
}

/// Summarise finite samples; `None` when the band holds no valid data
pub fn band_summary(band: ArrayView2<'_, Sample>) -> Option<BandSummary> {
    let values: Vec<Sample> = band.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(Sample::INFINITY, Sample::min);
    let max = values.iter().copied().fold(Sample::NEG_INFINITY, Sample::max);

    Some(BandSummary {
        count: values.len(),
        min,
        max,
        mean: mean(&values),
        std: population_std(&values),
    })
}
