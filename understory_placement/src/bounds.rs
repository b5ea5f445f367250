// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate-space tagged rectangles.

use core::fmt::Debug;
use core::marker::PhantomData;

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::Axis;

/// A coordinate space that [`Bounds`] can be expressed in.
///
/// Hosts measure nodes relative to the viewport; [`CoordSpace::from_viewport`]
/// is the single place where a measurement moves into another space.
pub trait CoordSpace: Copy + Debug + PartialEq {
    /// Convert a viewport measurement into this space, given the document's
    /// current scroll offset.
    fn from_viewport(bounds: Bounds<Viewport>, document_scroll: Vec2) -> Bounds<Self>;
}

/// Coordinates relative to the top-left corner of the visible viewport.
///
/// Used for fixed-position floating nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport;

/// Coordinates relative to the top-left corner of the document, i.e. viewport
/// coordinates with the document scroll offset added.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Document;

impl CoordSpace for Viewport {
    #[inline]
    fn from_viewport(bounds: Bounds<Viewport>, _document_scroll: Vec2) -> Bounds<Self> {
        bounds
    }
}

impl CoordSpace for Document {
    #[inline]
    fn from_viewport(bounds: Bounds<Viewport>, document_scroll: Vec2) -> Bounds<Self> {
        bounds.to_document(document_scroll)
    }
}

/// An axis-aligned box in the coordinate space `S`.
///
/// `right == left + width` and `bottom == top + height` hold by construction.
/// Two boxes can only be compared or combined when they share a space, so a
/// viewport measurement cannot silently leak into a document-relative
/// computation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<S> {
    rect: Rect,
    space: PhantomData<S>,
}

/// A box measured relative to the viewport.
pub type ViewportBounds = Bounds<Viewport>;

/// A box measured relative to the document.
pub type DocumentBounds = Bounds<Document>;

impl<S: CoordSpace> Bounds<S> {
    /// Create a box from its top-left corner and size.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_rect(Rect::from_origin_size((x, y), (width, height)))
    }

    /// Wrap a `kurbo` rectangle that is already expressed in `S`.
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect: rect.abs(),
            space: PhantomData,
        }
    }

    /// The underlying rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Left edge; alias of [`Bounds::left`].
    #[inline]
    pub fn x(&self) -> f64 {
        self.rect.x0
    }

    /// Top edge; alias of [`Bounds::top`].
    #[inline]
    pub fn y(&self) -> f64 {
        self.rect.y0
    }

    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        self.rect.origin()
    }

    /// Width and height.
    #[inline]
    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Leading edge along `axis` (left or top).
    #[inline]
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.rect.x0,
            Axis::Vertical => self.rect.y0,
        }
    }

    /// Trailing edge along `axis` (right or bottom).
    #[inline]
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.rect.x1,
            Axis::Vertical => self.rect.y1,
        }
    }

    /// Extent along `axis` (width or height).
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        self.end(axis) - self.start(axis)
    }

    /// Midpoint along `axis`.
    #[inline]
    pub fn center(&self, axis: Axis) -> f64 {
        (self.start(axis) + self.end(axis)) * 0.5
    }

    /// Tighten each edge to the innermost of `self` and `other`.
    ///
    /// Disjoint boxes collapse to an empty box rather than inverting.
    #[inline]
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::from_rect(self.rect.intersect(other.rect))
    }

    /// Move the box by `delta` without leaving its space.
    #[inline]
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self::from_rect(self.rect + delta)
    }
}

impl Bounds<Viewport> {
    /// Re-express a viewport measurement relative to the document.
    #[inline]
    pub fn to_document(self, document_scroll: Vec2) -> Bounds<Document> {
        Bounds::from_rect(self.rect + document_scroll)
    }
}

impl Bounds<Document> {
    /// Re-express a document measurement relative to the viewport.
    #[inline]
    pub fn to_viewport(self, document_scroll: Vec2) -> Bounds<Viewport> {
        Bounds::from_rect(self.rect - document_scroll)
    }
}
