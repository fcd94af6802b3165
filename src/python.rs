//! Python bindings (numpy in, numpy out)

use crate::core::{self, Comparison, MaskParams, Window};
use crate::types::SpectralError;
use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(e: SpectralError) -> PyErr {
    match e {
        SpectralError::InvalidParameter(_)
        | SpectralError::ShapeMismatch(_)
        | SpectralError::BandOutOfRange { .. } => PyValueError::new_err(format!("{}", e)),
        _ => PyRuntimeError::new_err(format!("{}", e)),
    }
}

/// Moving-window coefficient of variation over a (band, row, col) array
#[pyfunction]
fn coefficient_of_variation<'py>(
    py: Python<'py>,
    data: PyReadonlyArray3<f64>,
    window_width: i64,
) -> PyResult<&'py PyArray3<f64>> {
    let window = Window::from_signed(window_width).map_err(to_py_err)?;
    let result = core::coefficient_of_variation(data.as_array(), window.width()).map_err(to_py_err)?;
    Ok(result.into_pyarray(py))
}

/// (nir - red) / (nir + red)
#[pyfunction]
fn ndvi<'py>(
    py: Python<'py>,
    red: PyReadonlyArray2<f64>,
    nir: PyReadonlyArray2<f64>,
) -> PyResult<&'py PyArray2<f64>> {
    let result = core::normalized_difference(nir.as_array(), red.as_array()).map_err(to_py_err)?;
    Ok(result.into_pyarray(py))
}

/// Boolean mask, true where `values <comparison> threshold`
///
/// `comparison` is one of ">=" (default), ">", "<=" or "<". NaN never passes.
#[pyfunction]
#[pyo3(signature = (values, threshold, comparison = ">="))]
fn threshold_mask<'py>(
    py: Python<'py>,
    values: PyReadonlyArray2<f64>,
    threshold: f64,
    comparison: &str,
) -> PyResult<&'py PyArray2<bool>> {
    let params = MaskParams {
        threshold,
        comparison: comparison.parse::<Comparison>().map_err(to_py_err)?,
    };
    let mask = core::threshold_mask(values.as_array(), &params).map_err(to_py_err)?;
    Ok(mask.into_pyarray(py))
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(coefficient_of_variation, m)?)?;
    m.add_function(wrap_pyfunction!(ndvi, m)?)?;
    m.add_function(wrap_pyfunction!(threshold_mask, m)?)?;
    Ok(())
}
