//! End-to-end spectral diversity workflow on a synthetic scene
//!
//! Run with `RUST_LOG=info cargo run --example workshop`.

use anyhow::Context;
use ndarray::{stack, Array2, Axis};
use spectral_diversity::core::{
    apply_mask_to_raster, band_summary, mask_coverage, ndvi, normalize_nodata, threshold_mask,
};
use spectral_diversity::{MaskParams, Raster, WindowedStatistic, WindowedStatisticParams};

const NODATA: f64 = -9999.0;
const RED_BAND: usize = 1;
const NIR_BAND: usize = 2;

fn synthetic_scene(rows: usize, cols: usize) -> anyhow::Result<Raster> {
    // A forest patch in the middle of bare ground, with a strip of missing data
    let forest = |r: usize, c: usize| {
        let dr = r as f64 - rows as f64 / 2.0;
        let dc = c as f64 - cols as f64 / 2.0;
        (dr * dr + dc * dc).sqrt() < rows.min(cols) as f64 / 3.0
    };

    let red = Array2::from_shape_fn((rows, cols), |(r, c)| {
        if forest(r, c) { 0.04 + 0.002 * ((r * c) % 7) as f64 } else { 0.25 }
    });
    let mut nir = Array2::from_shape_fn((rows, cols), |(r, c)| {
        if forest(r, c) { 0.45 + 0.01 * ((r + 2 * c) % 9) as f64 } else { 0.30 }
    });
    nir.column_mut(cols / 4).fill(NODATA);

    let data = stack(Axis(0), &[red.view(), nir.view()])?;
    Ok(Raster::new(data, vec![Some(NODATA), Some(NODATA)])?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut raster = synthetic_scene(60, 80).context("building synthetic scene")?;
    let replaced = normalize_nodata(&mut raster);
    println!("Normalized {} no-data samples", replaced);

    let index = ndvi(&raster, RED_BAND, NIR_BAND)?;
    let mask = threshold_mask(index.view(), &MaskParams::default())?;
    println!("Vegetation mask covers {:.1}% of the scene", mask_coverage(mask.view()) * 100.0);

    let masked = apply_mask_to_raster(&raster, mask.view())?;

    let processor = WindowedStatistic::with_params(WindowedStatisticParams {
        window_width: 5,
        ..WindowedStatisticParams::default()
    });
    let cov = processor.apply(&masked).context("computing coefficient of variation")?;

    for band in 1..=cov.band_count() {
        match band_summary(cov.band(band)?) {
            Some(s) => println!(
                "Band {} CoV: n={} min={:.4} max={:.4} mean={:.4} std={:.4}",
                band, s.count, s.min, s.max, s.mean, s.std
            ),
            None => println!("Band {} CoV: no valid pixels", band),
        }
    }

    Ok(())
}
