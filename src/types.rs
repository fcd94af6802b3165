use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Real-valued raster sample
pub type Sample = f64;

/// 2D single-band array (row x col)
pub type BandImage = Array2<Sample>;

/// 3D multi-band array (band x row x col)
pub type RasterCube = Array3<Sample>;

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Geospatial transformation parameters (GDAL ordering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self {
            top_left_x: gt[0],
            pixel_width: gt[1],
            rotation_x: gt[2],
            top_left_y: gt[3],
            rotation_y: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }

    /// True when the transform has no rotation terms
    pub fn is_north_up(&self) -> bool {
        self.rotation_x == 0.0 && self.rotation_y == 0.0
    }

    /// Transform shifted so that pixel (row, col) becomes the new origin
    pub fn offset(&self, row: usize, col: usize) -> Self {
        Self {
            top_left_x: self.top_left_x + col as f64 * self.pixel_width + row as f64 * self.rotation_x,
            top_left_y: self.top_left_y + col as f64 * self.rotation_y + row as f64 * self.pixel_height,
            ..*self
        }
    }
}

/// Multi-band raster with one no-data sentinel per band
#[derive(Debug, Clone)]
pub struct Raster {
    data: RasterCube,
    nodata: Vec<Option<Sample>>,
    geo_transform: Option<GeoTransform>,
}

impl Raster {
    /// Create a raster from a (band, row, col) cube and its per-band no-data values
    pub fn new(data: RasterCube, nodata: Vec<Option<Sample>>) -> SpectralResult<Self> {
        let (bands, rows, cols) = data.dim();
        if bands == 0 || rows == 0 || cols == 0 {
            return Err(SpectralError::InvalidParameter(format!(
                "Raster must be non-empty, got shape {}x{}x{}",
                bands, rows, cols
            )));
        }
        if nodata.len() != bands {
            return Err(SpectralError::ShapeMismatch(format!(
                "{} no-data values supplied for {} bands",
                nodata.len(),
                bands
            )));
        }

        Ok(Self {
            data,
            nodata,
            geo_transform: None,
        })
    }

    /// Create a single-band raster
    pub fn from_band(band: BandImage, nodata: Option<Sample>) -> SpectralResult<Self> {
        Self::new(band.insert_axis(Axis(0)), vec![nodata])
    }

    pub fn with_geo_transform(mut self, geo_transform: GeoTransform) -> Self {
        self.geo_transform = Some(geo_transform);
        self
    }

    /// (bands, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn band_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn data(&self) -> &RasterCube {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut RasterCube {
        &mut self.data
    }

    pub fn nodata(&self) -> &[Option<Sample>] {
        &self.nodata
    }

    pub(crate) fn nodata_mut(&mut self) -> &mut [Option<Sample>] {
        &mut self.nodata
    }

    pub fn geo_transform(&self) -> Option<&GeoTransform> {
        self.geo_transform.as_ref()
    }

    /// Select a band by its 1-based index
    pub fn band(&self, index: usize) -> SpectralResult<ArrayView2<'_, Sample>> {
        let zero_based = self.band_offset(index)?;
        Ok(self.data.index_axis(Axis(0), zero_based))
    }

    fn band_offset(&self, index: usize) -> SpectralResult<usize> {
        let count = self.band_count();
        if index == 0 || index > count {
            return Err(SpectralError::BandOutOfRange { index, count });
        }
        Ok(index - 1)
    }

    /// Number of finite samples in a band (1-based)
    pub fn valid_count(&self, index: usize) -> SpectralResult<usize> {
        Ok(self.band(index)?.iter().filter(|v| v.is_finite()).count())
    }

    /// Pixel-window subset; the geotransform origin follows the window
    pub fn subset(&self, rows: Range<usize>, cols: Range<usize>) -> SpectralResult<Self> {
        let (_, height, width) = self.shape();
        if rows.start >= rows.end || cols.start >= cols.end || rows.end > height || cols.end > width {
            return Err(SpectralError::InvalidParameter(format!(
                "Subset {:?} x {:?} is empty or outside {}x{} raster",
                rows, cols, height, width
            )));
        }

        let data = self
            .data
            .slice(s![.., rows.start..rows.end, cols.start..cols.end])
            .to_owned();

        Ok(Self {
            data,
            nodata: self.nodata.clone(),
            geo_transform: self.geo_transform.map(|gt| gt.offset(rows.start, cols.start)),
        })
    }

    /// Coordinate subset using the raster's north-up geotransform
    ///
    /// Every pixel whose footprint intersects the box is kept.
    pub fn subset_bbox(&self, bbox: &BoundingBox) -> SpectralResult<Self> {
        let gt = self.geo_transform.ok_or_else(|| {
            SpectralError::InvalidParameter("Raster has no geotransform".to_string())
        })?;
        if !gt.is_north_up() || gt.pixel_width == 0.0 || gt.pixel_height == 0.0 {
            return Err(SpectralError::InvalidParameter(
                "Coordinate subsetting requires a north-up geotransform".to_string(),
            ));
        }
        if !(bbox.min_x < bbox.max_x && bbox.min_y < bbox.max_y) {
            return Err(SpectralError::InvalidParameter(format!(
                "Degenerate bounding box: {:?}",
                bbox
            )));
        }

        let (_, height, width) = self.shape();
        let cols = pixel_span(bbox.min_x, bbox.max_x, gt.top_left_x, gt.pixel_width, width);
        let rows = pixel_span(bbox.min_y, bbox.max_y, gt.top_left_y, gt.pixel_height, height);

        log::debug!("Bounding box {:?} maps to rows {:?}, cols {:?}", bbox, rows, cols);
        self.subset(rows, cols)
    }
}

/// Pixel index range covering [lo, hi] along one axis, clamped to [0, len)
fn pixel_span(lo: f64, hi: f64, origin: f64, step: f64, len: usize) -> Range<usize> {
    let a = (lo - origin) / step;
    let b = (hi - origin) / step;
    let (first, last) = if a <= b { (a, b) } else { (b, a) };
    let start = first.floor().max(0.0).min(len as f64) as usize;
    let end = last.ceil().max(0.0).min(len as f64) as usize;
    start..end
}

/// Error types for raster processing
#[derive(Debug, thiserror::Error)]
pub enum SpectralError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Band {index} out of range (raster has {count} bands)")]
    BandOutOfRange { index: usize, count: usize },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Processing error: {0}")]
    Processing(String),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type for raster operations
pub type SpectralResult<T> = Result<T, SpectralError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn ramp(bands: usize, rows: usize, cols: usize) -> Raster {
        let data = Array::from_shape_fn((bands, rows, cols), |(b, r, c)| {
            (b * 100 + r * 10 + c) as f64
        });
        Raster::new(data, vec![None; bands]).unwrap()
    }

    #[test]
    fn test_new_rejects_nodata_count_mismatch() {
        let data = Array3::<f64>::zeros((2, 3, 3));
        let err = Raster::new(data, vec![Some(-9999.0)]).unwrap_err();
        assert!(matches!(err, SpectralError::ShapeMismatch(_)));
    }

    #[test]
    fn test_new_rejects_empty() {
        let data = Array3::<f64>::zeros((1, 0, 3));
        assert!(matches!(
            Raster::new(data, vec![None]),
            Err(SpectralError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_band_selection_is_one_based() {
        let raster = ramp(3, 2, 2);
        assert_eq!(raster.band(1).unwrap()[[1, 1]], 11.0);
        assert_eq!(raster.band(3).unwrap()[[0, 1]], 201.0);
        assert!(matches!(
            raster.band(0),
            Err(SpectralError::BandOutOfRange { index: 0, count: 3 })
        ));
        assert!(raster.band(4).is_err());
    }

    #[test]
    fn test_subset_shifts_geotransform() {
        let gt = GeoTransform::from_gdal([100.0, 10.0, 0.0, 500.0, 0.0, -10.0]);
        let raster = ramp(2, 6, 8).with_geo_transform(gt);

        let sub = raster.subset(2..4, 3..7).unwrap();
        assert_eq!(sub.shape(), (2, 2, 4));
        assert_eq!(sub.band(1).unwrap()[[0, 0]], 23.0);
        assert_eq!(sub.band(2).unwrap()[[1, 3]], 136.0);

        let sub_gt = sub.geo_transform().unwrap();
        assert_eq!(sub_gt.top_left_x, 130.0);
        assert_eq!(sub_gt.top_left_y, 480.0);
    }

    #[test]
    fn test_subset_out_of_bounds() {
        let raster = ramp(1, 4, 4);
        assert!(raster.subset(0..5, 0..2).is_err());
        assert!(raster.subset(2..2, 0..2).is_err());
    }

    #[test]
    fn test_subset_bbox_north_up() {
        // 10 x 10 pixels of 1 unit, origin at (0, 10)
        let gt = GeoTransform::from_gdal([0.0, 1.0, 0.0, 10.0, 0.0, -1.0]);
        let raster = ramp(1, 10, 10).with_geo_transform(gt);

        // ymax=7 -> row 3, ymin=5 -> row 5; x from 2 to 4
        let bbox = BoundingBox { min_x: 2.0, max_x: 4.0, min_y: 5.0, max_y: 7.0 };
        let sub = raster.subset_bbox(&bbox).unwrap();
        assert_eq!(sub.shape(), (1, 2, 2));
        assert_eq!(sub.band(1).unwrap()[[0, 0]], 32.0);
    }

    #[test]
    fn test_subset_bbox_requires_transform() {
        let raster = ramp(1, 4, 4);
        let bbox = BoundingBox { min_x: 0.0, max_x: 1.0, min_y: 0.0, max_y: 1.0 };
        assert!(matches!(
            raster.subset_bbox(&bbox),
            Err(SpectralError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_valid_count_skips_nan() {
        let mut band = Array2::from_elem((3, 3), 1.0);
        band[[0, 0]] = f64::NAN;
        band[[2, 1]] = f64::NAN;
        let raster = Raster::from_band(band, None).unwrap();
        assert_eq!(raster.valid_count(1).unwrap(), 7);
    }
}
