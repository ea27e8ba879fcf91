//! Test: Parallel convolution coverage
//!
//! Validates that `convolve_parallel` produces output identical to the
//! sequential strategy, and handles edge cases (fewer rows than threads,
//! odd thread counts, failing stripes).

use gridconv::{
    convolve, convolve_parallel, ConvolveOptions, Element, Grid, GridError, KernelPreset, Rgb,
};

/// Deterministic pseudo-random color grid.
fn noisy_colors(width: usize, height: usize, mut seed: u32) -> Grid {
    let mut next = || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((seed >> 16) % 256) as i32
    };
    let cells = (0..width * height)
        .map(|_| Element::Color(Rgb::new(next(), next(), next())))
        .collect();
    Grid::from_elements(width, height, cells).unwrap()
}

fn float_ramp(width: usize, height: usize) -> Grid {
    let cells = (0..width * height)
        .map(|i| Element::Float((i % 17) as f32 * 0.37 - 2.0))
        .collect();
    Grid::from_elements(width, height, cells).unwrap()
}

#[test]
fn convolve_parallel_matches_sequential_on_colors() {
    let source = noisy_colors(50, 50, 7);
    for preset in KernelPreset::ALL {
        let kernel = preset.build().unwrap();
        let reference = convolve(&source, Some(&kernel)).unwrap();
        for threads in [2, 3, 4, 7, 8] {
            let out =
                convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(threads))
                    .unwrap();
            assert_eq!(out, reference, "{} with {} threads", preset, threads);
        }
    }
}

#[test]
fn convolve_parallel_matches_sequential_on_floats() {
    let source = float_ramp(33, 21);
    let kernel = Grid::from_rows(vec![
        vec![Element::Float(0.1), Element::Float(0.2), Element::Float(0.1)],
        vec![Element::Float(0.2), Element::Float(-0.4), Element::Float(0.2)],
        vec![Element::Float(0.1), Element::Float(0.2), Element::Float(0.1)],
    ])
    .unwrap();
    let reference = convolve(&source, Some(&kernel)).unwrap();
    let out = convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(5)).unwrap();
    assert_eq!(out, reference);
}

#[test]
fn more_threads_than_rows() {
    let source = noisy_colors(9, 3, 99);
    let kernel = KernelPreset::Gaussian.build().unwrap();
    let reference = convolve(&source, Some(&kernel)).unwrap();
    let out = convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(16)).unwrap();
    assert_eq!(out, reference);
}

#[test]
fn single_row_and_single_thread_fall_back() {
    let kernel = KernelPreset::BoxBlur.build().unwrap();

    let row = noisy_colors(12, 1, 3);
    let out = convolve_parallel(&row, Some(&kernel), ConvolveOptions::with_threads(4)).unwrap();
    assert_eq!(out, convolve(&row, Some(&kernel)).unwrap());

    let source = noisy_colors(10, 10, 5);
    for threads in [0, 1] {
        let out =
            convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(threads))
                .unwrap();
        assert_eq!(out, convolve(&source, Some(&kernel)).unwrap());
    }
}

#[test]
fn default_options_match_sequential() {
    let source = noisy_colors(40, 17, 11);
    let kernel = KernelPreset::Sharpen.build().unwrap();
    let out = convolve_parallel(&source, Some(&kernel), ConvolveOptions::default()).unwrap();
    assert_eq!(out, convolve(&source, Some(&kernel)).unwrap());
}

#[test]
fn failing_stripe_yields_error_not_grid() {
    let source = Grid::new(20, 20, gridconv::ElementKind::Integer).unwrap();
    let kernel = Grid::from_rows(vec![vec![Element::Color(Rgb::new(1, 1, 1))]]).unwrap();
    for threads in [2, 3, 4] {
        let result =
            convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(threads));
        assert!(
            matches!(result, Err(GridError::UnsupportedCombination { .. })),
            "{} threads",
            threads
        );
    }
}
