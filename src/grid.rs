// src/grid.rs

//! A fixed-size, row-major 2-D container of elements of one declared kind.
//!
//! Grids never change shape. Everything that transforms a grid (`add`,
//! `normalized`, convolution) builds a new one.

use std::cmp::Ordering;
use std::fmt;

use crate::element::{Element, ElementKind};
use crate::error::{GridError, Result};

/// Longest cell text shown in the `Display` output.
const DISPLAY_TEXT_WIDTH: usize = 9;
/// Width of one rendered non-final column in the `Display` output.
const DISPLAY_COLUMN_WIDTH: usize = 11;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    kind: ElementKind,
    /// Row-major: (column, row) lives at `row * width + column`.
    cells: Vec<Element>,
}

impl Grid {
    /// Creates a `width` x `height` grid with every cell set to the zero of
    /// `kind`.
    pub fn new(width: usize, height: usize, kind: ElementKind) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Grid {
            width,
            height,
            kind,
            cells: vec![kind.zero(); width * height],
        })
    }

    /// Builds a grid from nested rows. The kind is taken from the first
    /// element and every other element must share it.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::EmptyGrid);
        }
        let kind = rows[0][0].kind();

        let mut cells = Vec::with_capacity(width * height);
        for (row, data) in rows.into_iter().enumerate() {
            if data.len() != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    got: data.len(),
                });
            }
            for (column, element) in data.into_iter().enumerate() {
                if element.kind() != kind {
                    return Err(GridError::MixedKinds {
                        column,
                        row,
                        expected: kind.name(),
                        got: element.kind().name(),
                    });
                }
                cells.push(element);
            }
        }

        Ok(Grid {
            width,
            height,
            kind,
            cells,
        })
    }

    /// Builds a grid from a flat row-major buffer.
    pub fn from_elements(width: usize, height: usize, cells: Vec<Element>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if cells.len() != width * height {
            return Err(GridError::LengthMismatch {
                expected: width * height,
                got: cells.len(),
            });
        }
        let kind = cells[0].kind();
        if let Some(i) = cells.iter().position(|e| e.kind() != kind) {
            return Err(GridError::MixedKinds {
                column: i % width,
                row: i / width,
                expected: kind.name(),
                got: cells[i].kind().name(),
            });
        }
        Ok(Grid {
            width,
            height,
            kind,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The kind declared at construction.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Whether `(column, row)` lies inside the grid. Accepts signed
    /// coordinates so callers probing a neighbourhood can test negatives.
    pub fn contains(&self, column: isize, row: isize) -> bool {
        column >= 0 && row >= 0 && (column as usize) < self.width && (row as usize) < self.height
    }

    fn index(&self, column: usize, row: usize) -> Result<usize> {
        if column >= self.width || row >= self.height {
            return Err(GridError::OutOfRange {
                column: column as isize,
                row: row as isize,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + column)
    }

    pub fn get(&self, column: usize, row: usize) -> Result<Element> {
        let i = self.index(column, row)?;
        Ok(self.cells[i])
    }

    /// Replaces one cell. The value's kind is not checked against the grid's.
    pub fn set(&mut self, column: usize, row: usize, value: Element) -> Result<()> {
        let i = self.index(column, row)?;
        self.cells[i] = value;
        Ok(())
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.cells.iter()
    }

    /// The grid as a sequence of row slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Element]> {
        self.cells.chunks(self.width)
    }

    pub(crate) fn cells(&self) -> &[Element] {
        &self.cells
    }

    /// Left-to-right fold of every cell with `add`, seeded by the first cell.
    pub fn sum(&self) -> Result<Element> {
        let (first, rest) = self.split_first()?;
        rest.iter().try_fold(*first, |acc, e| acc.add(e))
    }

    /// The running maximum of one linear scan, seeded by the first cell.
    ///
    /// A cell replaces the current maximum when it compares `Greater`. For
    /// colors that order is not transitive, so the result depends on scan
    /// order.
    pub fn maximum(&self) -> Result<Element> {
        let (first, rest) = self.split_first()?;
        rest.iter().try_fold(*first, |max, e| {
            Ok(match e.compare(&max)? {
                Ordering::Greater => *e,
                _ => max,
            })
        })
    }

    /// Every cell divided by [`Grid::maximum`].
    pub fn normalized(&self) -> Result<Grid> {
        let max = self.maximum()?;
        self.map(|e| e.divide(&max))
    }

    /// Cell-wise `self[c, r] add other[c, r]`.
    pub fn add(&self, other: &Grid) -> Result<Grid> {
        if !self.same_shape(other) {
            return Err(GridError::ShapeMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Grid {
            cells,
            ..*self
        })
    }

    /// A same-shape, same-kind grid built by applying `f` to every cell.
    pub fn map(&self, f: impl FnMut(&Element) -> Result<Element>) -> Result<Grid> {
        let cells = self.cells.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Grid {
            cells,
            ..*self
        })
    }

    fn split_first(&self) -> Result<(&Element, &[Element])> {
        self.cells.split_first().ok_or(GridError::EmptyGrid)
    }
}

/// Renders each cell truncated to nine characters and padded into an
/// eleven-character column, one line per row. The last cell of a row is not
/// padded.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let last = row.len() - 1;
            for (j, element) in row.iter().enumerate() {
                let text: String = element
                    .to_string()
                    .chars()
                    .take(DISPLAY_TEXT_WIDTH)
                    .collect();
                if j == last {
                    writeln!(f, "{}", text)?;
                } else {
                    write!(f, "{:<width$}", text, width = DISPLAY_COLUMN_WIDTH)?;
                }
            }
        }
        Ok(())
    }
}
