use ndarray::{Array3, Axis};
use spectral_diversity::core::{coefficient_of_variation, compute};
use spectral_diversity::SpectralError;

fn pseudo_random_raster(bands: usize, rows: usize, cols: usize) -> Array3<f64> {
    // Deterministic values in [1, 10) with a sprinkling of no-data
    Array3::from_shape_fn((bands, rows, cols), |(b, r, c)| {
        let seed = (b * 7919 + r * 104729 + c * 1299709) % 1000;
        if seed % 13 == 0 {
            f64::NAN
        } else {
            1.0 + seed as f64 / 111.0
        }
    })
}

#[test]
fn test_shape_preserved_for_all_odd_widths() {
    let data = pseudo_random_raster(2, 9, 12);
    for width in [1, 3, 5, 7, 9, 11, 13] {
        let result = coefficient_of_variation(data.view(), width).unwrap();
        assert_eq!(result.dim(), data.dim(), "width {}", width);
    }
}

#[test]
fn test_border_ring_is_nodata() {
    let data = pseudo_random_raster(3, 10, 8);
    for width in [1usize, 3, 5, 7] {
        let b = (width - 1) / 2;
        let result = coefficient_of_variation(data.view(), width).unwrap();
        let (bands, rows, cols) = result.dim();

        for band in 0..bands {
            for row in 0..rows {
                for col in 0..cols {
                    let border = row < b || row >= rows - b || col < b || col >= cols - b;
                    if border {
                        assert!(
                            result[[band, row, col]].is_nan(),
                            "width {} cell ({}, {}, {})",
                            width, band, row, col
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_oversized_window_is_all_nodata() {
    let data = pseudo_random_raster(2, 6, 20);
    let result = coefficient_of_variation(data.view(), 7).unwrap();
    assert!(result.iter().all(|v| v.is_nan()));
}

#[test]
fn test_interior_values_are_finite_or_nodata() {
    let data = pseudo_random_raster(2, 12, 12);
    let result = coefficient_of_variation(data.view(), 3).unwrap();

    // All samples are positive, so every window with data has a finite CoV
    for band in 0..2 {
        for row in 1..11 {
            for col in 1..11 {
                let v = result[[band, row, col]];
                assert!(v.is_finite() && v >= 0.0, "({}, {}, {}) = {}", band, row, col, v);
            }
        }
    }
}

#[test]
fn test_matches_direct_computation() {
    let data = pseudo_random_raster(1, 7, 7);
    let result = coefficient_of_variation(data.view(), 5).unwrap();

    let (row, col) = (3, 4);
    let values: Vec<f64> = (row - 2..=row + 2)
        .flat_map(|r| (col - 2..=col + 2).map(move |c| (r, c)))
        .map(|(r, c)| data[[0, r, c]])
        .filter(|v| v.is_finite())
        .collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    approx::assert_relative_eq!(result[[0, row, col]], std / mean, max_relative = 1e-12);
}

#[test]
fn test_identity_statistic_reproduces_input() {
    let data = pseudo_random_raster(3, 5, 6);
    let result = compute(data.view(), 1, |v| v[0]).unwrap();

    for (input, output) in data.iter().zip(result.iter()) {
        if input.is_finite() {
            assert_eq!(input, output);
        } else {
            assert!(output.is_nan());
        }
    }
}

#[test]
fn test_constant_scenario_with_missing_centre() {
    let mut data = Array3::from_elem((1, 5, 5), 2.0);
    data[[0, 2, 2]] = f64::NAN;
    let result = coefficient_of_variation(data.view(), 3).unwrap();

    let band = result.index_axis(Axis(0), 0);
    for row in 0..5 {
        for col in 0..5 {
            if (1..=3).contains(&row) && (1..=3).contains(&col) {
                assert_eq!(band[[row, col]], 0.0);
            } else {
                assert!(band[[row, col]].is_nan());
            }
        }
    }
}

#[test]
fn test_even_width_rejected_before_work() {
    let data = pseudo_random_raster(1, 5, 5);
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let result = compute(data.view(), 4, |v| {
        calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        v[0]
    });

    assert!(matches!(result, Err(SpectralError::InvalidParameter(_))));
    assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 0);
}

#[test]
fn test_statistic_never_sees_empty_or_nan() {
    let data = pseudo_random_raster(2, 8, 8);
    let result = compute(data.view(), 3, |v| {
        assert!(!v.is_empty());
        assert!(v.iter().all(|x| x.is_finite()));
        v.len() as f64
    })
    .unwrap();
    assert!(result[[0, 4, 4]] >= 1.0);
}

#[test]
fn test_constant_non_dyadic_raster_has_zero_cov() {
    for v in [0.1, 0.7, 1.1] {
        for missing_centre in [false, true] {
            let mut data = Array3::from_elem((1, 5, 5), v);
            if missing_centre {
                data[[0, 2, 2]] = f64::NAN;
            }
            let result = coefficient_of_variation(data.view(), 3).unwrap();

            for row in 1..=3 {
                for col in 1..=3 {
                    assert_eq!(
                        result[[0, row, col]], 0.0,
                        "v={} missing_centre={} cell ({}, {})",
                        v, missing_centre, row, col
                    );
                }
            }
        }
    }
}
