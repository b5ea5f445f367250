// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow interface a document host provides to poppers.
//!
//! The popper core never touches a DOM directly. A host (a browser binding, a
//! retained-mode UI tree, or a synthetic tree in tests) implements four small
//! traits:
//!
//! - [`NodeTree`]: ancestry, attachment, and the per-node [`NodeTraits`]
//!   classifier used for ancestor searches.
//! - [`Geometry`]: viewport-relative measurements, scroll offsets, viewport
//!   size, and computed margins.
//! - [`StyleSink`]: typed style writes ([`Style`]) and data attributes.
//! - [`EventSource`]: resize/scroll listener and removal-watch bookkeeping,
//!   plus frame requests for debounced updates.
//!
//! Anything implementing all four is a [`Host`].

use alloc::format;
use alloc::string::String;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Size, Vec2};
use smallvec::{SmallVec, smallvec};
use understory_placement::{Axis, ViewportBounds};

bitflags::bitflags! {
    /// Computed-style facts about a node that matter for positioning.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeTraits: u8 {
        /// Computed `position` is `fixed`.
        const FIXED      = 0b0000_0001;
        /// Computed `overflow-x` or `overflow-y` is `auto` or `scroll`.
        const SCROLLABLE = 0b0000_0010;
        /// Computed `position` is `relative` (the node is an offset parent).
        const RELATIVE   = 0b0000_0100;
    }
}

impl Default for NodeTraits {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ancestry and classification of host nodes.
pub trait NodeTree {
    /// Host node handle. Poppers store these by value and never own the node.
    type Node: Copy + Eq + Hash + Debug;

    /// Parent of `node`, or `None` at the top of the tree.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether `node` is the boundary that ancestor searches stop at (the
    /// document body).
    fn is_root(&self, node: Self::Node) -> bool;

    /// Positioning-related computed style of `node`.
    fn traits_of(&self, node: Self::Node) -> NodeTraits;

    /// Whether `node` is currently part of the document.
    fn is_attached(&self, node: Self::Node) -> bool;
}

/// Measurements.
pub trait Geometry: NodeTree {
    /// Border box of `node` relative to the viewport.
    ///
    /// Hosts measuring a hidden node should make it visible for the duration
    /// of the measurement.
    fn viewport_rect(&self, node: Self::Node) -> ViewportBounds;

    /// Current scroll position of a scroll container.
    fn scroll_offset(&self, node: Self::Node) -> Vec2;

    /// Current scroll position of the document.
    fn document_scroll(&self) -> Vec2;

    /// Size of the visible viewport.
    fn viewport_size(&self) -> Size;

    /// Computed `margin-left` and `margin-top` of `node`.
    fn margin(&self, node: Self::Node) -> Vec2;
}

/// Style writes.
pub trait StyleSink: NodeTree {
    /// Apply `style` inline on `node`.
    fn set_style(&mut self, node: Self::Node, style: Style);

    /// Set a data attribute on `node`.
    fn set_data(&mut self, node: Self::Node, key: DataKey, value: &str);
}

/// Event subscriptions.
pub trait EventSource: NodeTree {
    /// Start delivering signals for `target` (see [`ListenTarget`]).
    fn listen(&mut self, target: ListenTarget<Self::Node>);

    /// Stop delivering signals for `target`.
    fn unlisten(&mut self, target: ListenTarget<Self::Node>);

    /// Report to the registry when `node` leaves the document.
    fn watch_removal(&mut self, node: Self::Node);

    /// Stop reporting removal of `node`.
    fn unwatch_removal(&mut self, node: Self::Node);

    /// Schedule a single registry flush for the next animation frame.
    fn request_frame(&mut self);
}

/// Everything a popper needs from its host.
pub trait Host: Geometry + StyleSink + EventSource {}

impl<T: Geometry + StyleSink + EventSource + ?Sized> Host for T {}

/// Something the registry listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenTarget<N> {
    /// Window `resize` and `scroll`.
    Window,
    /// `scroll` on a scroll container.
    Scroll(N),
}

/// The CSS `position` a floating node is switched to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PositionMode {
    /// `position: absolute`.
    Absolute,
    /// `position: fixed`.
    Fixed,
}

/// Data attributes recording a resolved layout, for CSS hooks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataKey {
    /// The resolved side.
    Placement,
    /// The resolved alignment.
    Position,
}

impl DataKey {
    /// Attribute name.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Placement => "data-placement",
            Self::Position => "data-position",
        }
    }
}

/// A single inline style write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Style {
    /// Set `position`.
    Mode(PositionMode),
    /// Zero `top` and `left` so later writes are pure offsets.
    ResetInset,
    /// Move with `transform: translate3d(x, y, 0)`.
    Translate(Vec2),
    /// Move with `margin-left` and `margin-top`.
    Margin(Vec2),
    /// Remove inline `left` and `top` from an arrow.
    ClearArrow,
    /// Offset an arrow along `axis` from the floating node's leading edge.
    Arrow {
        /// Axis the offset applies to.
        axis: Axis,
        /// Offset in pixels.
        offset: f64,
    },
}

impl Style {
    /// CSS property/value pairs for this write. An empty value removes the
    /// property, matching `CSSStyleDeclaration.setProperty(name, "")`.
    pub fn declarations(&self) -> SmallVec<[(&'static str, String); 2]> {
        match *self {
            Self::Mode(PositionMode::Absolute) => smallvec![("position", "absolute".into())],
            Self::Mode(PositionMode::Fixed) => smallvec![("position", "fixed".into())],
            Self::ResetInset => smallvec![("top", "0".into()), ("left", "0".into())],
            Self::Translate(v) => {
                smallvec![("transform", format!("translate3d({}px, {}px, 0)", v.x, v.y))]
            }
            Self::Margin(v) => smallvec![
                ("margin-left", format!("{}px", v.x)),
                ("margin-top", format!("{}px", v.y)),
            ],
            Self::ClearArrow => smallvec![("left", String::new()), ("top", String::new())],
            Self::Arrow { axis, offset } => {
                let property = match axis {
                    Axis::Horizontal => "left",
                    Axis::Vertical => "top",
                };
                smallvec![(property, format!("{offset}px"))]
            }
        }
    }
}

/// First proper ancestor of `node` carrying any of `wanted`, stopping at the
/// root.
pub fn closest_ancestor<T: NodeTree + ?Sized>(
    tree: &T,
    node: T::Node,
    wanted: NodeTraits,
) -> Option<T::Node> {
    let mut current = tree.parent_of(node);
    while let Some(n) = current {
        if tree.is_root(n) {
            return None;
        }
        if tree.traits_of(n).intersects(wanted) {
            return Some(n);
        }
        current = tree.parent_of(n);
    }
    None
}

/// Whether `node` is `ancestor` or lies inside it.
pub fn is_within<T: NodeTree + ?Sized>(tree: &T, node: T::Node, ancestor: T::Node) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = tree.parent_of(n);
    }
    false
}
