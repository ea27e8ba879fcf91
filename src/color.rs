// src/color.rs

//! Defines the color triple used as a grid element (`Rgb`) and the clamped
//! 8-bit pixel (`Rgb8`) exchanged with image adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GridError, Result};

/// Upper bound of a displayable color channel.
pub const CHANNEL_MAX: i32 = 255;

/// An unchecked color triple.
///
/// Channels are meant to lie in 0..=255 but nothing enforces it: arithmetic
/// may push them negative or past 255. Only addition clamps, and only the
/// upper bound (see `crate::arithmetic`). Use [`Rgb::checked`] for the
/// validated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Rgb {
    /// Black, the zero color.
    pub const ZERO: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Creates a color without validating the channel range.
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Rgb { r, g, b }
    }

    /// Creates a color, rejecting any channel outside 0..=255.
    pub fn checked(r: i32, g: i32, b: i32) -> Result<Self> {
        for (channel, value) in [("red", r), ("green", g), ("blue", b)] {
            if !(0..=CHANNEL_MAX).contains(&value) {
                return Err(GridError::ChannelOutOfRange { channel, value });
            }
        }
        Ok(Rgb { r, g, b })
    }

    /// Returns `true` when all three channels hold the same value.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Integer-truncated mean of the three channels.
    pub fn mean(&self) -> i32 {
        // i64 so that large unchecked channels can't overflow the sum.
        ((self.r as i64 + self.g as i64 + self.b as i64) / 3) as i32
    }

    /// Applies `f` to every channel.
    pub fn map(self, mut f: impl FnMut(i32) -> i32) -> Rgb {
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }

    /// Combines two colors channel by channel.
    pub fn zip_with(self, other: Rgb, mut f: impl FnMut(i32, i32) -> i32) -> Rgb {
        Rgb::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Fallible channel-wise combination; stops at the first failing channel.
    pub fn try_zip_with(
        self,
        other: Rgb,
        mut f: impl FnMut(i32, i32) -> Result<i32>,
    ) -> Result<Rgb> {
        Ok(Rgb::new(
            f(self.r, other.r)?,
            f(self.g, other.g)?,
            f(self.b, other.b)?,
        ))
    }

    /// Caps every channel at 255. The lower end is left alone.
    pub fn clamp_upper(self) -> Rgb {
        self.map(|c| c.min(CHANNEL_MAX))
    }

    /// Clamps every channel into 0..=255 for display.
    pub fn to_rgb8(self) -> Rgb8 {
        let clamp = |c: i32| c.clamp(0, CHANNEL_MAX) as u8;
        Rgb8 {
            r: clamp(self.r),
            g: clamp(self.g),
            b: clamp(self.b),
        }
    }

    /// Returns `true` when every channel already lies in 0..=255.
    pub fn in_range(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0..=CHANNEL_MAX).contains(c))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r:{} g:{} b:{}", self.r, self.g, self.b)
    }
}

/// A displayable 8-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb8 { r, g, b }
    }
}

impl From<Rgb8> for Rgb {
    fn from(p: Rgb8) -> Self {
        Rgb::new(p.r as i32, p.g as i32, p.b as i32)
    }
}
