// src/error.rs

//! Error type shared by every grid, element and convolution operation.
//!
//! All errors are reported synchronously to the caller of the operation that
//! detected them. Nothing here is retried; every operation is pure.

use thiserror::Error;

use crate::arithmetic::Op;

#[derive(Error, Debug)]
pub enum GridError {
    // --- Range ---
    #[error("Position ({column}, {row}) is outside a {width}x{height} grid")]
    OutOfRange {
        column: isize,
        row: isize,
        width: usize,
        height: usize,
    },

    // --- Unsupported combination ---
    #[error("Cannot {op} {lhs} with {rhs}")]
    UnsupportedCombination {
        op: Op,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("Cannot compare {lhs} with {rhs}")]
    Incomparable { lhs: &'static str, rhs: &'static str },
    #[error("Division by zero while dividing {lhs} by {rhs}")]
    DivisionByZero { lhs: &'static str, rhs: &'static str },

    // --- Shape mismatch ---
    #[error("Grid shapes differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    ShapeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    #[error("Expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("Grid data cannot be empty")]
    EmptyGrid,
    #[error("Row {row} has {got} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Element at ({column}, {row}) is {got}, grid holds {expected}")]
    MixedKinds {
        column: usize,
        row: usize,
        expected: &'static str,
        got: &'static str,
    },

    // --- Construction ---
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Unknown element kind {0:?}")]
    UnknownKind(String),
    #[error("Color channel {channel} = {value} is outside 0..=255")]
    ChannelOutOfRange { channel: &'static str, value: i32 },

    // --- Convolution ---
    #[error("Convolution requires a kernel")]
    MissingKernel,
    #[error("Unknown kernel preset {0:?}")]
    UnknownKernel(String),

    // --- Image adapters ---
    #[error("Cell ({column}, {row}) holds {got}, expected a color")]
    NotColor {
        column: usize,
        row: usize,
        got: &'static str,
    },
    #[error("Malformed image: {0}")]
    Image(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
