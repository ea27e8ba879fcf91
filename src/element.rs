// src/element.rs

//! The closed set of numeric element kinds a grid can hold.
//!
//! An [`Element`] is a tagged value: a signed integer, a single-precision
//! float or a color triple. Elements are immutable values; the arithmetic in
//! [`crate::arithmetic`] always builds new ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::arithmetic::{self, Op};
use crate::color::Rgb;
use crate::error::{GridError, Result};

/// One numeric value of exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Integer(i32),
    Float(f32),
    Color(Rgb),
}

/// The kind tag of an [`Element`], used to declare a grid's element kind
/// and to build zero values without an existing element at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Integer,
    Float,
    Color,
}

impl ElementKind {
    /// The zero value of this kind: `0`, `0.0` or black.
    pub fn zero(self) -> Element {
        match self {
            ElementKind::Integer => Element::Integer(0),
            ElementKind::Float => Element::Float(0.0),
            ElementKind::Color => Element::Color(Rgb::ZERO),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Integer => "integer",
            ElementKind::Float => "float",
            ElementKind::Color => "color",
        }
    }

    /// Whether this is one of the scalar kinds.
    pub fn is_scalar(self) -> bool {
        !matches!(self, ElementKind::Color)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(ElementKind::Integer),
            "float" => Ok(ElementKind::Float),
            "color" | "rgb" => Ok(ElementKind::Color),
            _ => Err(GridError::UnknownKind(s.to_string())),
        }
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Integer(_) => ElementKind::Integer,
            Element::Float(_) => ElementKind::Float,
            Element::Color(_) => ElementKind::Color,
        }
    }

    /// The zero value of this element's own kind.
    pub fn zero(&self) -> Element {
        self.kind().zero()
    }

    pub fn add(&self, rhs: &Element) -> Result<Element> {
        arithmetic::resolve(Op::Add, self, Some(rhs))
    }

    pub fn multiply(&self, rhs: &Element) -> Result<Element> {
        arithmetic::resolve(Op::Multiply, self, Some(rhs))
    }

    pub fn divide(&self, rhs: &Element) -> Result<Element> {
        arithmetic::resolve(Op::Divide, self, Some(rhs))
    }

    /// Compares under the color-aware rule. See [`arithmetic::compare`].
    pub fn compare(&self, rhs: &Element) -> Result<std::cmp::Ordering> {
        arithmetic::compare(self, Some(rhs))
    }

    /// The value as a float, for scalar kinds only.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Element::Integer(i) => Some(i as f32),
            Element::Float(f) => Some(f),
            Element::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgb> {
        match *self {
            Element::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<i32> for Element {
    fn from(v: i32) -> Self {
        Element::Integer(v)
    }
}

impl From<f32> for Element {
    fn from(v: f32) -> Self {
        Element::Float(v)
    }
}

impl From<Rgb> for Element {
    fn from(v: Rgb) -> Self {
        Element::Color(v)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Integer(i) => write!(f, "{}", i),
            Element::Float(v) => write!(f, "{}", v),
            Element::Color(c) => write!(f, "{}", c),
        }
    }
}
