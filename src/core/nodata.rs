use crate::types::{Raster, Sample};
use ndarray::{ArrayViewMut2, Axis};

/// Replace each band's no-data sentinel with NaN
///
/// After normalization every band records NaN as its no-data value, so a
/// second call is a no-op. Bands without a sentinel are left untouched.
/// Returns the number of samples that were replaced.
pub fn normalize_nodata(raster: &mut Raster) -> usize {
    let sentinels: Vec<Option<Sample>> = raster.nodata().to_vec();
    let mut replaced = 0;

    for (index, (band, sentinel)) in raster
        .data_mut()
        .axis_iter_mut(Axis(0))
        .zip(sentinels.iter())
        .enumerate()
    {
        if let Some(value) = sentinel {
            let count = normalize_band(band, *value);
            log::debug!("Band {}: {} samples equal to {} set to NaN", index + 1, count, value);
            replaced += count;
        }
    }

    for sentinel in raster.nodata_mut().iter_mut() {
        if sentinel.is_some() {
            *sentinel = Some(Sample::NAN);
        }
    }

    log::info!("No-data normalization replaced {} samples", replaced);
    replaced
}

/// Set samples equal to `sentinel` to NaN; a NaN sentinel replaces nothing
pub fn normalize_band(mut band: ArrayViewMut2<'_, Sample>, sentinel: Sample) -> usize {
    if sentinel.is_nan() {
        return 0;
    }

    let mut count = 0;
    band.map_inplace(|v| {
        if *v == sentinel {
            *v = Sample::NAN;
            count += 1;
        }
    });
    count
}
