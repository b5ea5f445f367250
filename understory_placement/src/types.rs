// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement vocabulary: sides, alignments, axes, and `auto` requests.

use core::fmt;
use core::str::FromStr;

use kurbo::Vec2;

/// One of the two layout axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// The other axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// The component of `v` along this axis.
    #[inline]
    pub fn pick(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// `v` with its component along this axis replaced by `value`.
    #[inline]
    #[must_use]
    pub fn replace(self, v: Vec2, value: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(value, v.y),
            Self::Vertical => Vec2::new(v.x, value),
        }
    }
}

/// The side of the reference a floating node sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Placement {
    /// Above the reference.
    Top,
    /// To the right of the reference.
    Right,
    /// Below the reference.
    Bottom,
    /// To the left of the reference.
    Left,
}

impl Placement {
    /// All placements in declaration order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side across the reference from this one.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// The axis along which the node is pushed away from the reference.
    #[inline]
    pub const fn main_axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// The axis along which the node is aligned with the reference.
    #[inline]
    pub const fn cross_axis(self) -> Axis {
        self.main_axis().cross()
    }

    /// Lowercase name, as written to data attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment of the floating node along the placement's cross axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Position {
    /// Leading edges line up.
    Start,
    /// Centers line up.
    Center,
    /// Trailing edges line up.
    End,
}

impl Position {
    /// All positions in declaration order.
    pub const ALL: [Self; 3] = [Self::Start, Self::Center, Self::End];

    /// Lowercase name, as written to data attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// A requested value that may be left for the solver to choose.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Request<T> {
    /// Let the solver pick whatever fits best.
    Auto,
    /// Prefer this value; the solver may still reassign it when it does not fit.
    #[cfg_attr(feature = "serde", serde(untagged))]
    Exact(T),
}

impl<T: Copy> Request<T> {
    /// The concrete value, if one was requested.
    #[inline]
    pub fn exact(self) -> Option<T> {
        match self {
            Self::Auto => None,
            Self::Exact(v) => Some(v),
        }
    }

    /// Whether the solver is free to choose.
    #[inline]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl<T> From<T> for Request<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::Exact(value)
    }
}

/// Error returned when parsing a placement vocabulary word fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} value")]
pub struct ParseError {
    kind: &'static str,
}

impl ParseError {
    /// Which vocabulary was being parsed (`"placement"` or `"position"`).
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl FromStr for Placement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(ParseError { kind: "placement" })
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(ParseError { kind: "position" })
    }
}

impl<T: FromStr<Err = ParseError>> FromStr for Request<T> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Exact)
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room left between each reference edge and the matching edge of a bounding
/// box. Negative values mean the reference already pokes out on that side.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Room {
    /// Room above the reference.
    pub top: f64,
    /// Room to the right of the reference.
    pub right: f64,
    /// Room below the reference.
    pub bottom: f64,
    /// Room to the left of the reference.
    pub left: f64,
}

impl Room {
    /// Room on `side`.
    #[inline]
    pub fn on(&self, side: Placement) -> f64 {
        match side {
            Placement::Top => self.top,
            Placement::Right => self.right,
            Placement::Bottom => self.bottom,
            Placement::Left => self.left,
        }
    }

    /// Room before and after the reference along `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Horizontal => (self.left, self.right),
            Axis::Vertical => (self.top, self.bottom),
        }
    }
}
