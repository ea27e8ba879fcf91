// src/kernels.rs

//! Named 3x3 kernels for common filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{GridError, Result};
use crate::grid::Grid;

const IDENTITY_3X3: [i32; 9] = [0, 0, 0, 0, 1, 0, 0, 0, 0];
const BOX_BLUR_3X3: [i32; 9] = [1, 1, 1, 1, 1, 1, 1, 1, 1];
const GAUSSIAN_3X3: [i32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];
const SHARPEN_3X3: [i32; 9] = [0, -1, 0, -1, 5, -1, 0, -1, 0];
/// 8-connectivity Laplacian. Sums to zero.
const EDGE_3X3: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];
const EMBOSS_3X3: [i32; 9] = [-2, -1, 0, -1, 1, 1, 0, 1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelPreset {
    Identity,
    #[default]
    BoxBlur,
    Gaussian,
    Sharpen,
    Edge,
    Emboss,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Identity,
        KernelPreset::BoxBlur,
        KernelPreset::Gaussian,
        KernelPreset::Sharpen,
        KernelPreset::Edge,
        KernelPreset::Emboss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KernelPreset::Identity => "identity",
            KernelPreset::BoxBlur => "box_blur",
            KernelPreset::Gaussian => "gaussian",
            KernelPreset::Sharpen => "sharpen",
            KernelPreset::Edge => "edge",
            KernelPreset::Emboss => "emboss",
        }
    }

    fn taps(self) -> &'static [i32; 9] {
        match self {
            KernelPreset::Identity => &IDENTITY_3X3,
            KernelPreset::BoxBlur => &BOX_BLUR_3X3,
            KernelPreset::Gaussian => &GAUSSIAN_3X3,
            KernelPreset::Sharpen => &SHARPEN_3X3,
            KernelPreset::Edge => &EDGE_3X3,
            KernelPreset::Emboss => &EMBOSS_3X3,
        }
    }

    /// The kernel as a 3x3 integer grid.
    pub fn build(self) -> Result<Grid> {
        let cells = self.taps().iter().map(|&v| Element::Integer(v)).collect();
        Grid::from_elements(3, 3, cells)
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelPreset {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        KernelPreset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| GridError::UnknownKernel(s.to_string()))
    }
}
