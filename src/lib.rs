// src/lib.rs

//! gridconv library crate.
//!
//! Grids of numeric elements (integers, floats, color triples), the
//! arithmetic that mixes them, and 2-D convolution of a grid with a kernel
//! grid, sequentially or across worker threads.

pub mod arithmetic;
pub mod color;
pub mod config;
pub mod convolution;
pub mod element;
pub mod error;
pub mod grid;
pub mod image;
pub mod kernels;

pub use color::{Rgb, Rgb8};
pub use convolution::{convolve, convolve_parallel, Anchor, ConvolveOptions, Convolution};
pub use element::{Element, ElementKind};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use kernels::KernelPreset;
