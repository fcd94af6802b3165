use crate::types::{GeoTransform, Raster, Sample, SpectralError, SpectralResult};
use gdal::{Dataset, DriverManager};
use ndarray::{Array3, Axis};
use std::path::Path;

/// Multi-band raster reader backed by GDAL
pub struct RasterReader;

impl RasterReader {
    /// Read every band as f64 together with its no-data value and geotransform
    pub fn read<P: AsRef<Path>>(path: P) -> SpectralResult<Raster> {
        log::info!("Reading raster from: {}", path.as_ref().display());

        let dataset = Dataset::open(path.as_ref())?;
        let (width, height) = dataset.raster_size();
        let band_count = dataset.raster_count() as usize;

        log::debug!("Raster size: {} bands of {}x{}", band_count, width, height);

        if band_count == 0 {
            return Err(SpectralError::Processing(format!(
                "{} contains no raster bands",
                path.as_ref().display()
            )));
        }

        let mut data = Array3::<Sample>::zeros((band_count, height, width));
        let mut nodata = Vec::with_capacity(band_count);

        for (index, mut slot) in data.axis_iter_mut(Axis(0)).enumerate() {
            let rasterband = dataset.rasterband(index as isize + 1)?;
            let buffer = rasterband.read_as::<Sample>((0, 0), (width, height), (width, height), None)?;
            let band = ndarray::Array2::from_shape_vec((height, width), buffer.data)?;
            slot.assign(&band);

            let value = rasterband.no_data_value();
            log::debug!("Band {} no-data value: {:?}", index + 1, value);
            nodata.push(value);
        }

        let raster = Raster::new(data, nodata)?;
        Ok(match dataset.geo_transform() {
            Ok(gt) => raster.with_geo_transform(GeoTransform::from_gdal(gt)),
            Err(e) => {
                log::warn!("No geotransform available: {}", e);
                raster
            }
        })
    }
}

/// GeoTIFF writer backed by GDAL
pub struct RasterWriter;

impl RasterWriter {
    /// Write all bands as Float64 with NaN recorded as no-data
    pub fn write<P: AsRef<Path>>(path: P, raster: &Raster) -> SpectralResult<()> {
        let (bands, height, width) = raster.shape();
        log::info!(
            "Writing {} bands of {}x{} to {}",
            bands,
            width,
            height,
            path.as_ref().display()
        );

        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut dataset = driver.create_with_band_type::<Sample, _>(
            path.as_ref(),
            width as isize,
            height as isize,
            bands as isize,
        )?;

        if let Some(gt) = raster.geo_transform() {
            dataset.set_geo_transform(&gt.to_gdal())?;
        }

        for (index, band) in raster.data().axis_iter(Axis(0)).enumerate() {
            let mut rasterband = dataset.rasterband(index as isize + 1)?;
            let flat_data: Vec<Sample> = band.iter().copied().collect();
            let buffer = gdal::raster::Buffer::new((width, height), flat_data);
            rasterband.write((0, 0), (width, height), &buffer)?;
            rasterband.set_no_data_value(Some(Sample::NAN))?;
        }

        Ok(())
    }
}
