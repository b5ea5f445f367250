// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset arithmetic for a resolved placement and position.
//!
//! Offsets are expressed in the coordinate space of the floating node's
//! positioning context: the relative parent's top-left corner when there is
//! one, otherwise the origin of the boxes' own space. The functions are meant
//! to be chained in this order:
//!
//! 1. [`compute_offset`]
//! 2. [`apply_placement_offset`]
//! 3. [`apply_position_offset`]
//! 4. caller adjustments (for example subtracting the node's own margin)
//! 5. [`constrain_offset`]
//!
//! Scroll compensation, if any, is added by the caller after the constrain
//! step so the clamp sees the same space the boxes were measured in.

use kurbo::Vec2;

use crate::bounds::{Bounds, CoordSpace};
use crate::types::{Placement, Position};

/// The reference's top-left corner, relative to `relative` when given.
pub fn compute_offset<S: CoordSpace>(reference: &Bounds<S>, relative: Option<&Bounds<S>>) -> Vec2 {
    let origin = reference.origin().to_vec2();
    match relative {
        Some(parent) => origin - parent.origin().to_vec2(),
        None => origin,
    }
}

/// Push `offset` off the reference onto `placement`'s side, leaving a gap of
/// `spacing`.
#[must_use]
pub fn apply_placement_offset<S: CoordSpace>(
    offset: Vec2,
    node: &Bounds<S>,
    reference: &Bounds<S>,
    placement: Placement,
    spacing: f64,
) -> Vec2 {
    match placement {
        Placement::Top => Vec2::new(offset.x, offset.y - (node.height() + spacing)),
        Placement::Right => Vec2::new(offset.x + reference.width() + spacing, offset.y),
        Placement::Bottom => Vec2::new(offset.x, offset.y + reference.height() + spacing),
        Placement::Left => Vec2::new(offset.x - (node.width() + spacing), offset.y),
    }
}

/// Shift `offset` along the cross axis so the node lines up with the
/// reference as `position` asks.
#[must_use]
pub fn apply_position_offset<S: CoordSpace>(
    offset: Vec2,
    node: &Bounds<S>,
    reference: &Bounds<S>,
    placement: Placement,
    position: Position,
) -> Vec2 {
    let axis = placement.cross_axis();
    let delta = node.extent(axis) - reference.extent(axis);
    let shift = match position {
        Position::Start => return offset,
        Position::Center => delta * 0.5,
        Position::End => delta,
    };
    axis.replace(offset, axis.pick(offset) - shift)
}

/// Clamp `offset` along `placement`'s cross axis.
///
/// The node is first kept inside `minimum`, then kept overlapping the
/// reference by at least `min_contact` (capped at both extents). `None` keeps
/// the reference's full extent overlapped, or the node's whole extent when
/// the node is the smaller of the two. The overlap rule wins when the two
/// disagree. The main axis is never touched.
///
/// This is a pure clamp: applying it to its own output changes nothing.
#[must_use]
pub fn constrain_offset<S: CoordSpace>(
    offset: Vec2,
    node: &Bounds<S>,
    reference: &Bounds<S>,
    minimum: &Bounds<S>,
    relative: Option<&Bounds<S>>,
    placement: Placement,
    min_contact: Option<f64>,
) -> Vec2 {
    let axis = placement.cross_axis();
    let shift = relative.map_or(0.0, |parent| parent.start(axis));
    let node_extent = node.extent(axis);
    let reference_extent = reference.extent(axis);
    let reference_start = reference.start(axis) - shift;

    let inside_lo = minimum.start(axis) - shift;
    let inside_hi = minimum.end(axis) - shift - node_extent;

    let contact = min_contact
        .unwrap_or(reference_extent)
        .min(reference_extent)
        .min(node_extent)
        .max(0.0);
    let touch_lo = reference_start + contact - node_extent;
    let touch_hi = reference_start + reference_extent - contact;

    // `f64::clamp` panics on inverted ranges, which a cramped box produces.
    let v = axis.pick(offset).min(inside_hi).max(inside_lo);
    let v = v.min(touch_hi).max(touch_lo);
    axis.replace(offset, v)
}

/// Whether `reference` is so far outside `window` that the node could not
/// appear inside it on any side.
///
/// Each direction is checked on its own with the node's extent plus
/// `spacing` as slack.
pub fn is_unreachable<S: CoordSpace>(
    node: &Bounds<S>,
    reference: &Bounds<S>,
    window: &Bounds<S>,
    spacing: f64,
) -> bool {
    let slack_x = node.width() + spacing;
    let slack_y = node.height() + spacing;
    reference.bottom() < window.top() - slack_y
        || reference.top() > window.bottom() + slack_y
        || reference.right() < window.left() - slack_x
        || reference.left() > window.right() + slack_x
}

/// Cross-axis offset of an arrow, measured from the floating node's leading
/// edge, that points it at the reference's center.
///
/// The arrow stays within both the reference and the node. References
/// narrower than two arrows are treated as exactly two arrows wide, centered
/// on themselves, so tiny anchors still get a centered arrow. The node's
/// extent is always the final limit.
pub fn arrow_offset<S: CoordSpace>(
    node: &Bounds<S>,
    reference: &Bounds<S>,
    arrow: &Bounds<S>,
    placement: Placement,
) -> f64 {
    let axis = placement.cross_axis();
    let size = arrow.extent(axis);

    let mut reference_lo = reference.start(axis);
    let mut reference_hi = reference.end(axis);
    let shortfall = size * 2.0 - (reference_hi - reference_lo);
    if shortfall > 0.0 {
        reference_lo -= shortfall * 0.5;
        reference_hi += shortfall * 0.5;
    }

    let node_lo = node.start(axis);
    let node_hi = node.end(axis);

    let aimed = reference.center(axis) - size * 0.5;
    let v = aimed.min(reference_hi - size).max(reference_lo);
    let v = v.min(node_hi - size).max(node_lo);
    v - node_lo
}
