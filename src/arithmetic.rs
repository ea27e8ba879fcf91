// src/arithmetic.rs

//! Resolves arithmetic and comparison between two elements of possibly
//! different kinds.
//!
//! ## Resolution table
//!
//! | lhs \ rhs | Integer            | Float              | Color                    |
//! |-----------|--------------------|--------------------|--------------------------|
//! | Integer   | Integer            | Float              | Integer (divide only)    |
//! | Float     | Float              | Float              | Float (divide only)      |
//! | Color     | Color, per channel | Color, rounded     | Color, per channel       |
//!
//! Every color result of `add` has its channels capped at 255. Nothing caps
//! the lower end, and `multiply`/`divide` never clamp.
//!
//! A scalar divided by a color uses the shared channel value when all three
//! channels are equal, and the integer-truncated channel mean otherwise.
//! Color divided by color stays channel-wise.
//!
//! Every pairing outside the table, and any absent right operand, is an
//! unsupported combination.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::color::Rgb;
use crate::element::Element;
use crate::error::{GridError, Result};

/// Label used in errors for a missing right operand.
const ABSENT: &str = "absent";

/// A pairwise arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Add,
    Multiply,
    Divide,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Add => "add",
            Op::Multiply => "multiply",
            Op::Divide => "divide",
        })
    }
}

/// Applies `op` to `lhs` and `rhs`, picking the rule for their kinds.
pub fn resolve(op: Op, lhs: &Element, rhs: Option<&Element>) -> Result<Element> {
    let Some(rhs) = rhs else {
        return Err(GridError::UnsupportedCombination {
            op,
            lhs: lhs.kind().name(),
            rhs: ABSENT,
        });
    };

    match (*lhs, *rhs) {
        (Element::Integer(a), Element::Integer(b)) => integer_op(op, a, b).map(Element::Integer),
        (Element::Integer(a), Element::Float(b)) => Ok(Element::Float(float_op(op, a as f32, b))),
        (Element::Float(a), Element::Integer(b)) => Ok(Element::Float(float_op(op, a, b as f32))),
        (Element::Float(a), Element::Float(b)) => Ok(Element::Float(float_op(op, a, b))),

        (Element::Color(c), Element::Float(f)) => Ok(Element::Color(color_by_float(op, c, f))),
        (Element::Color(c), Element::Integer(i)) => color_by_integer(op, c, i).map(Element::Color),
        (Element::Color(a), Element::Color(b)) => color_by_color(op, a, b).map(Element::Color),

        (Element::Integer(a), Element::Color(c)) if op == Op::Divide => {
            let divisor = color_divisor(c);
            integer_op(Op::Divide, a, divisor).map(Element::Integer)
        }
        (Element::Float(a), Element::Color(c)) if op == Op::Divide => {
            Ok(Element::Float(a / color_divisor(c) as f32))
        }

        _ => Err(GridError::UnsupportedCombination {
            op,
            lhs: lhs.kind().name(),
            rhs: rhs.kind().name(),
        }),
    }
}

/// Orders two elements.
///
/// Scalars use the usual numeric order (integers are widened to float when
/// mixed with a float). Colors are equal when all channels match, `Less`
/// when *any* channel of `lhs` is below the same channel of `rhs`, and
/// `Greater` otherwise. The color order is deliberately not transitive:
/// `(1,100,1)` is less than `(2,0,0)` and `(2,0,0)` is less than `(1,100,1)`.
pub fn compare(lhs: &Element, rhs: Option<&Element>) -> Result<Ordering> {
    let Some(rhs) = rhs else {
        return Err(GridError::Incomparable {
            lhs: lhs.kind().name(),
            rhs: ABSENT,
        });
    };

    match (*lhs, *rhs) {
        (Element::Integer(a), Element::Integer(b)) => Ok(a.cmp(&b)),
        (Element::Float(a), Element::Float(b)) => Ok(a.total_cmp(&b)),
        (Element::Integer(a), Element::Float(b)) => Ok((a as f32).total_cmp(&b)),
        (Element::Float(a), Element::Integer(b)) => Ok(a.total_cmp(&(b as f32))),
        (Element::Color(a), Element::Color(b)) => Ok(compare_colors(a, b)),
        _ => Err(GridError::Incomparable {
            lhs: lhs.kind().name(),
            rhs: rhs.kind().name(),
        }),
    }
}

fn compare_colors(a: Rgb, b: Rgb) -> Ordering {
    if a == b {
        Ordering::Equal
    } else if a.r < b.r || a.g < b.g || a.b < b.b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

// --- Scalar rules ---

fn integer_op(op: Op, a: i32, b: i32) -> Result<i32> {
    match op {
        Op::Add => Ok(a.wrapping_add(b)),
        Op::Multiply => Ok(a.wrapping_mul(b)),
        Op::Divide if b == 0 => Err(GridError::DivisionByZero {
            lhs: "integer",
            rhs: "zero",
        }),
        Op::Divide => Ok(a.wrapping_div(b)),
    }
}

fn float_op(op: Op, a: f32, b: f32) -> f32 {
    match op {
        Op::Add => a + b,
        Op::Multiply => a * b,
        Op::Divide => a / b,
    }
}

// --- Color rules ---

/// Rounds half to even, then saturates into `i32`.
fn round_channel(v: f32) -> i32 {
    v.round_ties_even() as i32
}

fn color_by_float(op: Op, c: Rgb, f: f32) -> Rgb {
    let out = c.map(|ch| round_channel(float_op(op, ch as f32, f)));
    match op {
        Op::Add => out.clamp_upper(),
        _ => out,
    }
}

fn color_by_integer(op: Op, c: Rgb, i: i32) -> Result<Rgb> {
    match op {
        Op::Add => Ok(c.map(|ch| ch.wrapping_add(i)).clamp_upper()),
        Op::Multiply => Ok(c.map(|ch| ch.wrapping_mul(i))),
        Op::Divide if i == 0 => Err(GridError::DivisionByZero {
            lhs: "color",
            rhs: "zero",
        }),
        Op::Divide => Ok(c.map(|ch| ch.wrapping_div(i))),
    }
}

fn color_by_color(op: Op, a: Rgb, b: Rgb) -> Result<Rgb> {
    match op {
        Op::Add => Ok(a.zip_with(b, i32::wrapping_add).clamp_upper()),
        Op::Multiply => Ok(a.zip_with(b, i32::wrapping_mul)),
        Op::Divide => a.try_zip_with(b, |x, y| {
            if y == 0 {
                Err(GridError::DivisionByZero {
                    lhs: "color",
                    rhs: "color with a zero channel",
                })
            } else {
                Ok(x.wrapping_div(y))
            }
        }),
    }
}

/// The scalar a color stands for when it divides a scalar.
fn color_divisor(c: Rgb) -> i32 {
    if c.is_gray() {
        c.b
    } else {
        c.mean()
    }
}
