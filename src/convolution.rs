// src/convolution.rs

//! # Convolution: Grid ⊛ Kernel → Grid
//!
//! Applies a small kernel grid at every position of a source grid and
//! reduces the weighted neighbourhood into a new grid of the source's shape.
//!
//! ## Per-cell algorithm
//!
//! ```text
//! acc = zero(output kind)
//! for i in 0..kh, j in 0..kw:
//!     (sc, sr) = (column + j - ax, row + i - ay)
//!     if (sc, sr) is outside the source: skip      // edge truncation
//!     acc = acc + source[sc, sr] * kernel[j, i]
//! if |weight| < KERNEL_SUM_EPSILON: acc, or zero if acc < zero
//! else:                              acc / Float(weight)
//! ```
//!
//! `weight` is the kernel sum, computed once per [`Convolution`]. `(ax, ay)`
//! is the [`Anchor`] offset; the reference anchor is one cell before the
//! target, which centres a 3x3 kernel exactly.
//!
//! ## Edges
//!
//! Terms that fall outside the source are dropped, so border cells receive
//! fewer contributions. There is no padding, clamping or wrapping, and the
//! output always has the same shape as the source.
//!
//! ## Output kind
//!
//! Color sources produce color grids. Scalar sources produce float grids,
//! since normalising divides by a float weight.
//!
//! ## Strategies
//!
//! [`Convolution::apply`] walks every row on the calling thread.
//! [`Convolution::apply_parallel`] (see [`parallel`]) hands disjoint row
//! stripes to scoped worker threads. Each cell is still reduced sequentially
//! by one thread, so both strategies give identical grids.

pub mod parallel;


use log::{debug, warn};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::element::{Element, ElementKind};
use crate::error::{GridError, Result};
use crate::grid::Grid;

pub use parallel::ConvolveOptions;

/// A kernel whose weight is smaller than this in magnitude does not
/// normalise its output.
pub const KERNEL_SUM_EPSILON: f32 = 0.001;

/// A half-open range of output rows `[start_row, end_row)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stripe {
    pub start_row: usize,
    pub end_row: usize,
}

impl Stripe {
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    pub fn is_empty(&self) -> bool {
        self.end_row <= self.start_row
    }
}

/// Where the kernel sits relative to the output cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// The kernel starts one cell before the target on both axes, whatever
    /// its size. Centres 3x3 kernels only; larger or even kernels are
    /// shifted towards the bottom-right. A 1x1 kernel sits on the target.
    #[default]
    Reference,
    /// The kernel starts `(extent - 1) / 2` cells before the target.
    Centered,
}

impl Anchor {
    /// `(column, row)` offset of the kernel's first tap for a `kw` x `kh`
    /// kernel.
    fn offsets(self, kw: usize, kh: usize) -> (isize, isize) {
        match self {
            Anchor::Reference if kw == 1 && kh == 1 => (0, 0),
            Anchor::Reference => (1, 1),
            Anchor::Centered => (((kw - 1) / 2) as isize, ((kh - 1) / 2) as isize),
        }
    }
}

/// A kernel prepared for convolution.
#[derive(Debug, Clone)]
pub struct Convolution<'k> {
    kernel: &'k Grid,
    weight: f32,
    anchor: Anchor,
}

impl<'k> Convolution<'k> {
    /// Prepares `kernel`, computing its weight once.
    ///
    /// Fails with [`GridError::MissingKernel`] when no kernel is given.
    pub fn new(kernel: Option<&'k Grid>) -> Result<Self> {
        let kernel = kernel.ok_or(GridError::MissingKernel)?;
        let weight = kernel_weight(&kernel.sum()?);
        if weight.abs() < KERNEL_SUM_EPSILON {
            warn!(
                "Kernel {}x{} sums to ~0 ({}); output will not be normalised",
                kernel.width(),
                kernel.height(),
                weight
            );
        }
        Ok(Convolution {
            kernel,
            weight,
            anchor: Anchor::default(),
        })
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn kernel(&self) -> &Grid {
        self.kernel
    }

    /// The kernel sum as a float.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Whether the kernel sums to (approximately) zero.
    pub fn is_degenerate(&self) -> bool {
        self.weight.abs() < KERNEL_SUM_EPSILON
    }

    /// The element kind produced for a source of kind `source`.
    pub fn output_kind(source: ElementKind) -> ElementKind {
        match source {
            ElementKind::Color => ElementKind::Color,
            ElementKind::Integer | ElementKind::Float => ElementKind::Float,
        }
    }

    /// Sequential strategy: every row on the calling thread.
    pub fn apply(&self, source: &Grid) -> Result<Grid> {
        let (width, height) = source.dimensions();
        let kind = Self::output_kind(source.kind());
        debug!(
            "Convolving {}x{} {} grid with {}x{} kernel (weight {}) sequentially",
            width,
            height,
            source.kind(),
            self.kernel.width(),
            self.kernel.height(),
            self.weight
        );

        let mut cells = vec![kind.zero(); width * height];
        let never = AtomicBool::new(false);
        self.execute_stripe(
            source,
            &mut cells,
            Stripe {
                start_row: 0,
                end_row: height,
            },
            &never,
        )?;
        debug!("Sequential convolution of {}x{} grid finished", width, height);
        Grid::from_elements(width, height, cells)
    }

    /// Fills `target` with the output rows of `stripe`.
    ///
    /// `target` holds exactly `stripe.len()` rows. Stops early, returning
    /// `Ok`, once `abort` is raised by another stripe.
    pub(crate) fn execute_stripe(
        &self,
        source: &Grid,
        target: &mut [Element],
        stripe: Stripe,
        abort: &AtomicBool,
    ) -> Result<()> {
        let width = source.width();
        debug_assert_eq!(target.len(), stripe.len() * width);

        for (row, out) in (stripe.start_row..stripe.end_row).zip(target.chunks_mut(width)) {
            if abort.load(AtomicOrdering::Relaxed) {
                return Ok(());
            }
            for (column, slot) in out.iter_mut().enumerate() {
                *slot = self.cell(source, column, row)?;
            }
        }
        Ok(())
    }

    /// Computes one output cell.
    fn cell(&self, source: &Grid, column: usize, row: usize) -> Result<Element> {
        let zero = Self::output_kind(source.kind()).zero();
        let (kw, kh) = self.kernel.dimensions();
        let (ax, ay) = self.anchor.offsets(kw, kh);
        let src = source.cells();
        let ker = self.kernel.cells();

        let mut acc = zero;
        for i in 0..kh {
            let sr = row as isize + i as isize - ay;
            for j in 0..kw {
                let sc = column as isize + j as isize - ax;
                if !source.contains(sc, sr) {
                    continue;
                }
                let sample = &src[sr as usize * source.width() + sc as usize];
                acc = acc.add(&sample.multiply(&ker[i * kw + j])?)?;
            }
        }

        if self.is_degenerate() {
            return Ok(match acc.compare(&zero)? {
                Ordering::Less => zero,
                _ => acc,
            });
        }
        acc.divide(&Element::Float(self.weight))
    }
}

/// The kernel sum as a float divisor. A color sum stands for the
/// integer-truncated mean of its channels.
fn kernel_weight(sum: &Element) -> f32 {
    match *sum {
        Element::Integer(i) => i as f32,
        Element::Float(f) => f,
        Element::Color(c) => c.mean() as f32,
    }
}

/// Convolves `source` with `kernel` on the calling thread.
pub fn convolve(source: &Grid, kernel: Option<&Grid>) -> Result<Grid> {
    Convolution::new(kernel)?.apply(source)
}

/// Convolves `source` with `kernel`, splitting rows across worker threads.
pub fn convolve_parallel(
    source: &Grid,
    kernel: Option<&Grid>,
    options: ConvolveOptions,
) -> Result<Grid> {
    Convolution::new(kernel)?.apply_parallel(source, options)
}

impl Grid {
    /// Sequential convolution of this grid with `kernel`.
    pub fn convolve(&self, kernel: Option<&Grid>) -> Result<Grid> {
        convolve(self, kernel)
    }
}
