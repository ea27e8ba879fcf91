//! Contract tests for grids, element arithmetic and convolution, exercised
//! through the public API only.

use gridconv::image::{grid_from_image, image_from_grid, read_ppm, write_ppm, Image};
use gridconv::{
    convolve, convolve_parallel, ConvolveOptions, Element, ElementKind, Grid, GridError,
    KernelPreset, Rgb, Rgb8,
};
use std::cmp::Ordering;
use test_log::test;

fn colors(width: usize, height: usize) -> Grid {
    let cells = (0..width * height)
        .map(|i| {
            let v = (i * 37 % 256) as i32;
            Element::Color(Rgb::new(v, 255 - v, (v * 3) % 256))
        })
        .collect();
    Grid::from_elements(width, height, cells).unwrap()
}

// --- Elements ---

#[test]
fn zero_is_additive_identity() {
    for a in [i32::MIN, -1, 0, 42, i32::MAX] {
        let e = Element::Integer(a);
        assert_eq!(e.add(&ElementKind::Integer.zero()).unwrap(), e);
    }
    for a in [-3.5f32, 0.0, 1e-6, 12345.0] {
        let e = Element::Float(a);
        assert_eq!(e.add(&ElementKind::Float.zero()).unwrap(), e);
    }
    for c in [Rgb::new(0, 0, 0), Rgb::new(1, 2, 3), Rgb::new(255, 128, 0)] {
        let e = Element::Color(c);
        assert_eq!(e.add(&ElementKind::Color.zero()).unwrap(), e);
    }
}

#[test]
fn color_comparison_quirk() {
    let c = |r, g, b| Element::Color(Rgb::new(r, g, b));
    assert_eq!(c(1, 100, 1).compare(&c(2, 0, 0)).unwrap(), Ordering::Less);
    assert_eq!(c(1, 100, 1).compare(&c(0, 99, 0)).unwrap(), Ordering::Greater);
    assert_eq!(c(5, 6, 7).compare(&c(5, 6, 7)).unwrap(), Ordering::Equal);
}

#[test]
fn scalar_plus_color_is_unsupported() {
    let err = Element::Integer(1)
        .add(&Element::Color(Rgb::new(1, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, GridError::UnsupportedCombination { .. }));
    let err = Element::Color(Rgb::new(1, 1, 1))
        .compare(&Element::Float(1.0))
        .unwrap_err();
    assert!(matches!(err, GridError::Incomparable { .. }));
}

#[test]
fn absent_operand_is_unsupported() {
    let err = gridconv::arithmetic::resolve(gridconv::arithmetic::Op::Add, &Element::Integer(1), None)
        .unwrap_err();
    assert!(matches!(err, GridError::UnsupportedCombination { rhs: "absent", .. }));
}

// --- Grids ---

#[test]
fn sum_is_row_major_fold() {
    let g = colors(4, 3);
    let expected = g
        .iter()
        .skip(1)
        .try_fold(g.get(0, 0).unwrap(), |acc, e| acc.add(e))
        .unwrap();
    assert_eq!(g.sum().unwrap(), expected);
}

#[test]
fn adding_zero_grid_round_trips() {
    let g = colors(5, 2);
    let zero = Grid::new(5, 2, ElementKind::Color).unwrap();
    assert_eq!(g.add(&zero).unwrap(), g);
}

// --- Convolution ---

#[test]
fn output_shape_equals_source_shape() {
    let source = colors(11, 7);
    for preset in KernelPreset::ALL {
        let kernel = preset.build().unwrap();
        assert_eq!(convolve(&source, Some(&kernel)).unwrap().dimensions(), (11, 7));
    }
    let wide = Grid::new(5, 1, ElementKind::Integer).unwrap();
    assert_eq!(convolve(&source, Some(&wide)).unwrap().dimensions(), (11, 7));
}

#[test]
fn unit_kernel_is_identity() {
    let source = colors(6, 6);
    let unit = Grid::from_rows(vec![vec![Element::Integer(1)]]).unwrap();
    assert_eq!(convolve(&source, Some(&unit)).unwrap(), source);
}

#[test]
fn strategies_agree_on_fifty_by_fifty() {
    let source = colors(50, 50);
    let kernel = KernelPreset::Gaussian.build().unwrap();
    assert_eq!(
        convolve(&source, Some(&kernel)).unwrap(),
        convolve_parallel(&source, Some(&kernel), ConvolveOptions::with_threads(4)).unwrap()
    );
}

#[test]
fn zero_sum_kernel_does_not_divide() {
    let source = colors(8, 8);
    let edge = KernelPreset::Edge.build().unwrap();
    let out = convolve(&source, Some(&edge)).unwrap();
    assert_eq!(out.kind(), ElementKind::Color);
    // Floor at zero: no output cell compares below black.
    let zero = ElementKind::Color.zero();
    for cell in out.iter() {
        assert_ne!(cell.compare(&zero).unwrap(), Ordering::Less, "{}", cell);
    }
}

#[test]
fn missing_kernel_is_rejected() {
    assert!(matches!(convolve(&colors(2, 2), None), Err(GridError::MissingKernel)));
}

#[test]
fn unsupported_kinds_abort_convolution() {
    let source = Grid::new(3, 3, ElementKind::Float).unwrap();
    let kernel = Grid::from_rows(vec![vec![Element::Color(Rgb::new(2, 2, 2))]]).unwrap();
    assert!(matches!(
        convolve(&source, Some(&kernel)),
        Err(GridError::UnsupportedCombination { .. })
    ));
}

// --- Image boundary ---

#[test]
fn image_pipeline_round_trip() {
    let pixels = (0..12u8).map(|i| Rgb8::new(i * 20, 255 - i * 20, i)).collect();
    let image = Image::new(4, 3, pixels).unwrap();

    let mut ppm = Vec::new();
    write_ppm(&mut ppm, &image).unwrap();
    let decoded = read_ppm(ppm.as_slice()).unwrap();
    assert_eq!(decoded, image);

    let grid = grid_from_image(&decoded).unwrap();
    let identity = KernelPreset::Identity.build().unwrap();
    let out = convolve(&grid, Some(&identity)).unwrap();
    assert_eq!(image_from_grid(&out).unwrap(), image);
}
