use crate::core::statistics::LocalStatistic;
use crate::core::window::Window;
use crate::types::{Raster, RasterCube, Sample, SpectralResult};
use ndarray::{s, Array3, ArrayView2, ArrayView3, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

/// Moving-window parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowedStatisticParams {
    /// Window width in pixels (must be odd)
    pub window_width: usize,
    /// Reduction applied to the finite samples of each window
    pub statistic: LocalStatistic,
}

impl Default for WindowedStatisticParams {
    fn default() -> Self {
        Self {
            window_width: 5,
            statistic: LocalStatistic::CoefficientOfVariation,
        }
    }
}

/// Why a cell was left as no-data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellError {
    /// No finite samples in the window
    EmptyNeighborhood,
    /// The statistic came back NaN or infinite
    UndefinedStatistic,
}

/// Per-band moving-window statistic over a multi-band raster
///
/// Border pixels, whose window would run off the raster, are left as NaN
/// rather than computed over a truncated window. NaN samples inside a
/// window are skipped.
pub struct WindowedStatistic {
    params: WindowedStatisticParams,
}

impl WindowedStatistic {
    /// Coefficient of variation over a 5x5 window
    pub fn new() -> Self {
        Self {
            params: WindowedStatisticParams::default(),
        }
    }

    pub fn with_params(params: WindowedStatisticParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WindowedStatisticParams {
        &self.params
    }

    /// Apply the configured statistic to every band of a raster
    ///
    /// No-data sentinels must already be normalized to NaN. The result keeps
    /// the input geotransform and records NaN as every band's no-data value.
    pub fn apply(&self, raster: &Raster) -> SpectralResult<Raster> {
        let statistic = self.params.statistic;
        let data = compute(raster.data().view(), self.params.window_width, |values| {
            statistic.evaluate(values)
        })?;

        let bands = raster.band_count();
        let result = Raster::new(data, vec![Some(Sample::NAN); bands])?;
        Ok(match raster.geo_transform() {
            Some(gt) => result.with_geo_transform(*gt),
            None => result,
        })
    }

    /// Apply a caller-supplied reduction instead of the configured statistic
    pub fn apply_with<F>(&self, raster: &Raster, statistic: F) -> SpectralResult<RasterCube>
    where
        F: Fn(&[Sample]) -> Sample + Sync,
    {
        compute(raster.data().view(), self.params.window_width, statistic)
    }
}

impl Default for WindowedStatistic {
    fn default() -> Self {
        Self::new()
    }
}

/// Moving-window coefficient of variation
pub fn coefficient_of_variation(
    data: ArrayView3<'_, Sample>,
    window_width: usize,
) -> SpectralResult<RasterCube> {
    compute(data, window_width, |values| {
        LocalStatistic::CoefficientOfVariation.evaluate(values)
    })
}

/// Moving-window reduction over a (band, row, col) cube
///
/// `statistic` only ever sees finite samples, and never an empty slice.
/// Bands are processed in parallel when the `parallel` feature is enabled;
/// the output is identical either way.
pub fn compute<F>(
    data: ArrayView3<'_, Sample>,
    window_width: usize,
    statistic: F,
) -> SpectralResult<RasterCube>
where
    F: Fn(&[Sample]) -> Sample + Sync,
{
    let window = Window::new(window_width)?;
    let (bands, rows, cols) = data.dim();

    log::info!(
        "Computing {}x{} moving-window statistic over {} bands of {}x{}",
        window.width(),
        window.width(),
        bands,
        rows,
        cols
    );

    let mut output = Array3::from_elem((bands, rows, cols), Sample::NAN);

    if window.interior(rows).is_empty() || window.interior(cols).is_empty() {
        log::warn!(
            "Window width {} exceeds raster size {}x{}, output is entirely no-data",
            window.width(),
            rows,
            cols
        );
        return Ok(output);
    }

    process_bands(data, &mut output, window, &statistic);

    log::info!("Moving-window statistic completed");
    Ok(output)
}

/// Same as [`compute`] but always single-threaded
pub fn compute_sequential<F>(
    data: ArrayView3<'_, Sample>,
    window_width: usize,
    statistic: F,
) -> SpectralResult<RasterCube>
where
    F: Fn(&[Sample]) -> Sample,
{
    let window = Window::new(window_width)?;
    let mut output = Array3::from_elem(data.raw_dim(), Sample::NAN);

    for (band, out) in data.outer_iter().zip(output.outer_iter_mut()) {
        process_band(band, out, window, &statistic);
    }

    Ok(output)
}

#[cfg(feature = "parallel")]
fn process_bands<F>(data: ArrayView3<'_, Sample>, output: &mut RasterCube, window: Window, statistic: &F)
where
    F: Fn(&[Sample]) -> Sample + Sync,
{
    use rayon::prelude::*;

    log::debug!("Processing {} bands in parallel", data.len_of(Axis(0)));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(data.axis_iter(Axis(0)).into_par_iter())
        .for_each(|(out, band)| process_band(band, out, window, statistic));
}

#[cfg(not(feature = "parallel"))]
fn process_bands<F>(data: ArrayView3<'_, Sample>, output: &mut RasterCube, window: Window, statistic: &F)
where
    F: Fn(&[Sample]) -> Sample + Sync,
{
    for (band, out) in data.axis_iter(Axis(0)).zip(output.axis_iter_mut(Axis(0))) {
        process_band(band, out, window, statistic);
    }
}

fn process_band<F>(
    band: ArrayView2<'_, Sample>,
    mut out: ArrayViewMut2<'_, Sample>,
    window: Window,
    statistic: &F,
) where
    F: Fn(&[Sample]) -> Sample,
{
    let (rows, cols) = band.dim();
    let mut samples = Vec::with_capacity(window.area());
    let mut empty = 0usize;
    let mut undefined = 0usize;

    for row in window.interior(rows) {
        for col in window.interior(cols) {
            out[[row, col]] = match evaluate_cell(band, row, col, window, &mut samples, statistic) {
                Ok(value) => value,
                Err(CellError::EmptyNeighborhood) => {
                    empty += 1;
                    Sample::NAN
                }
                Err(CellError::UndefinedStatistic) => {
                    log::trace!("Undefined statistic at ({}, {})", row, col);
                    undefined += 1;
                    Sample::NAN
                }
            };
        }
    }

    if empty > 0 || undefined > 0 {
        log::debug!(
            "Band left {} empty windows and {} undefined statistics as no-data",
            empty,
            undefined
        );
    }
}

fn evaluate_cell<F>(
    band: ArrayView2<'_, Sample>,
    row: usize,
    col: usize,
    window: Window,
    samples: &mut Vec<Sample>,
    statistic: &F,
) -> Result<Sample, CellError>
where
    F: Fn(&[Sample]) -> Sample,
{
    let b = window.buffer();
    let neighborhood = band.slice(s![row - b..=row + b, col - b..=col + b]);

    samples.clear();
    samples.extend(neighborhood.iter().copied().filter(|v| v.is_finite()));

    if samples.is_empty() {
        return Err(CellError::EmptyNeighborhood);
    }

    let value = statistic(samples);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CellError::UndefinedStatistic)
    }
}
