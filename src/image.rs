// src/image.rs

//! Adapters between 8-bit RGB images and color grids, plus binary PPM (P6)
//! encoding for the command-line tool.
//!
//! Pixel `(x, y)` maps to grid cell `(column x, row y)`. Going back to an
//! image clamps every channel into 0..=255, since convolution output is an
//! unchecked color.

use log::debug;
use std::io::{Read, Write};

use crate::color::{Rgb, Rgb8};
use crate::element::Element;
use crate::error::{GridError, Result};
use crate::grid::Grid;

/// The only PPM maxval this module reads or writes.
const PPM_MAXVAL: usize = 255;

/// A row-major in-memory RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Rgb8>,
}

/// `width * height * channels`, or an error when it does not fit in `usize`.
fn checked_size(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| GridError::Image("image dimensions overflow".to_string()))
}

impl Image {
    pub fn new(width: usize, height: usize, data: Vec<Rgb8>) -> Result<Self> {
        let pixels = checked_size(width, height, 1)?;
        if data.len() != pixels {
            return Err(GridError::Image(format!(
                "{}x{} image needs {} pixels, got {}",
                width,
                height,
                pixels,
                data.len()
            )));
        }
        Ok(Image {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }
}

/// Builds a color grid with one cell per pixel.
pub fn grid_from_image(image: &Image) -> Result<Grid> {
    let cells = image
        .data
        .iter()
        .map(|&p| Element::Color(Rgb::from(p)))
        .collect();
    Grid::from_elements(image.width, image.height, cells)
}

/// Converts a color grid back into an image, clamping channels to 0..=255.
pub fn image_from_grid(grid: &Grid) -> Result<Image> {
    let (width, height) = grid.dimensions();
    let mut data = Vec::with_capacity(width * height);
    for (i, element) in grid.iter().enumerate() {
        let color = element.as_color().ok_or(GridError::NotColor {
            column: i % width,
            row: i / width,
            got: element.kind().name(),
        })?;
        data.push(color.to_rgb8());
    }
    Image::new(width, height, data)
}

/// Number of color cells with a channel outside 0..=255. Those cells are
/// altered by [`image_from_grid`].
pub fn out_of_range_cells(grid: &Grid) -> usize {
    grid.iter()
        .filter_map(Element::as_color)
        .filter(|c| !c.in_range())
        .count()
}

/// Writes `image` as binary PPM.
pub fn write_ppm<W: Write>(mut writer: W, image: &Image) -> Result<()> {
    // PPM header: P6 means binary RGB
    writeln!(writer, "P6")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "{}", PPM_MAXVAL)?;

    let mut bytes = Vec::with_capacity(image.data.len() * 3);
    for p in &image.data {
        bytes.extend_from_slice(&[p.r, p.g, p.b]);
    }
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Reads a binary PPM with maxval 255. Header comments are skipped.
pub fn read_ppm<R: Read>(mut reader: R) -> Result<Image> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut header = HeaderReader { bytes: &bytes, pos: 0 };
    let magic = header.token()?;
    if magic != "P6" {
        return Err(GridError::Image(format!("expected P6 magic, found {:?}", magic)));
    }
    let width = header.number("width")?;
    let height = header.number("height")?;
    let maxval = header.number("maxval")?;
    if maxval != PPM_MAXVAL {
        return Err(GridError::Image(format!("unsupported maxval {}", maxval)));
    }
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }

    // Exactly one whitespace byte separates the header from the raster.
    let start = header.pos + 1;
    let needed = checked_size(width, height, 3)?;
    let raster = bytes
        .get(start..)
        .filter(|r| r.len() >= needed)
        .ok_or_else(|| {
            GridError::Image(format!(
                "truncated raster: {}x{} needs {} bytes",
                width, height, needed
            ))
        })?;

    let data = raster[..needed]
        .chunks_exact(3)
        .map(|c| Rgb8::new(c[0], c[1], c[2]))
        .collect();
    debug!("Read {}x{} PPM image", width, height);
    Image::new(width, height, data)
}

struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn skip_blanks(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Result<&'a str> {
        self.skip_blanks();
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(GridError::Image("unexpected end of header".to_string()));
        }
        let bytes: &'a [u8] = self.bytes;
        std::str::from_utf8(&bytes[start..self.pos])
            .map_err(|_| GridError::Image("header is not ASCII".to_string()))
    }

    fn number(&mut self, field: &str) -> Result<usize> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| GridError::Image(format!("invalid {} {:?}", field, token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn sample() -> Image {
        Image::new(
            2,
            2,
            vec![
                Rgb8::new(255, 0, 0),
                Rgb8::new(0, 255, 0),
                Rgb8::new(0, 0, 255),
                Rgb8::new(10, 20, 30),
            ],
        )
        .unwrap()
    }

    #[test]
    fn pixels_map_to_cells_by_position() {
        let grid = grid_from_image(&sample()).unwrap();
        assert_eq!(grid.kind(), ElementKind::Color);
        assert_eq!(grid.get(1, 0).unwrap(), Element::Color(Rgb::new(0, 255, 0)));
        assert_eq!(grid.get(0, 1).unwrap(), Element::Color(Rgb::new(0, 0, 255)));
        assert_eq!(image_from_grid(&grid).unwrap(), sample());
    }

    #[test]
    fn image_from_grid_clamps_channels() {
        let grid = Grid::from_rows(vec![vec![
            Rgb::new(-20, 128, 400).into(),
            Rgb::new(1, 2, 3).into(),
        ]])
        .unwrap();
        assert_eq!(out_of_range_cells(&grid), 1);
        let image = image_from_grid(&grid).unwrap();
        assert_eq!(image.pixel(0, 0), Some(Rgb8::new(0, 128, 255)));
        assert_eq!(image.pixel(1, 0), Some(Rgb8::new(1, 2, 3)));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn image_from_grid_requires_colors() {
        let grid = Grid::from_rows(vec![vec![Element::Float(1.0), Element::Float(2.0)]]).unwrap();
        assert!(matches!(
            image_from_grid(&grid),
            Err(GridError::NotColor { column: 0, row: 0, got: "float" })
        ));
    }

    #[test]
    fn image_new_rejects_overflowing_dimensions() {
        assert!(matches!(
            Image::new(usize::MAX, 2, vec![]),
            Err(GridError::Image(ref m)) if m == "image dimensions overflow"
        ));
        assert!(matches!(Image::new(2, 2, vec![Rgb8::default()]), Err(GridError::Image(_))));
    }

    #[test]
    fn ppm_header_layout() {
        let mut out = Vec::new();
        write_ppm(&mut out, &sample()).unwrap();
        assert!(out.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(out.len(), b"P6\n2 2\n255\n".len() + 12);
        assert_eq!(read_ppm(out.as_slice()).unwrap(), sample());
    }

    #[test]
    fn ppm_header_comments_are_skipped() {
        let mut bytes = b"P6\n# made by hand\n1 1 # trailing\n255\n".to_vec();
        bytes.extend_from_slice(&[7, 8, 9]);
        let image = read_ppm(bytes.as_slice()).unwrap();
        assert_eq!(image.data, vec![Rgb8::new(7, 8, 9)]);
    }

    #[test]
    fn malformed_ppm_is_rejected() {
        assert!(matches!(read_ppm(&b"P3\n1 1\n255\n"[..]), Err(GridError::Image(_))));
        assert!(matches!(read_ppm(&b"P6\n1 x\n255\n"[..]), Err(GridError::Image(_))));
        assert!(matches!(read_ppm(&b"P6\n1 1\n65535\n"[..]), Err(GridError::Image(_))));
        assert!(matches!(read_ppm(&b"P6\n2 1\n255\n\x01\x02\x03"[..]), Err(GridError::Image(_))));
        assert!(matches!(read_ppm(&b"P6\n2"[..]), Err(GridError::Image(_))));
        let huge = format!("P6\n{} {}\n255\n\0", usize::MAX, usize::MAX);
        assert!(matches!(
            read_ppm(huge.as_bytes()),
            Err(GridError::Image(ref m)) if m == "image dimensions overflow"
        ));
        assert!(matches!(
            read_ppm(&b"P6\n0 1\n255\n"[..]),
            Err(GridError::InvalidDimensions { .. })
        ));
    }
}
