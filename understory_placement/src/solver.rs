// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side and alignment selection.
//!
//! Both resolvers only compare the floating node's size against the room the
//! reference leaves inside a bounding ("minimum") box. They never look at the
//! node's current position, so repeated calls with the same measurements
//! always agree.

use crate::bounds::{Bounds, CoordSpace};
use crate::types::{Placement, Position, Request, Room};

/// Side preference used when sides have equal room.
const TIE_ORDER: [Placement; 4] = [
    Placement::Bottom,
    Placement::Top,
    Placement::Right,
    Placement::Left,
];

/// Room between each edge of `reference` and the matching edge of `minimum`.
pub fn available_room<S: CoordSpace>(reference: &Bounds<S>, minimum: &Bounds<S>) -> Room {
    Room {
        top: reference.top() - minimum.top(),
        right: minimum.right() - reference.right(),
        bottom: minimum.bottom() - reference.bottom(),
        left: reference.left() - minimum.left(),
    }
}

/// Choose the side of `reference` that `node` should sit on.
///
/// An exact request is only flipped to the opposite side when the requested
/// side cannot hold the node plus `spacing` *and* the opposite side has
/// strictly more room; otherwise the request stands even if it overflows.
///
/// [`Request::Auto`] first tries the roomier side of the roomier axis
/// (vertical wins ties), accepting it when the node also fits across that
/// axis at some [`Position`]. Failing that it takes the roomiest side that can
/// hold the node, and finally falls back to [`Placement::Bottom`].
pub fn resolve_placement<S: CoordSpace>(
    node: &Bounds<S>,
    reference: &Bounds<S>,
    minimum: &Bounds<S>,
    requested: Request<Placement>,
    spacing: f64,
) -> Placement {
    let room = available_room(reference, minimum);
    let needed = |side: Placement| node.extent(side.main_axis()) + spacing;

    let side = match requested {
        Request::Exact(side) => side,
        Request::Auto => {
            let vertical = if room.bottom >= room.top {
                Placement::Bottom
            } else {
                Placement::Top
            };
            let horizontal = if room.right >= room.left {
                Placement::Right
            } else {
                Placement::Left
            };
            let preferred = if room.on(horizontal) > room.on(vertical) {
                horizontal
            } else {
                vertical
            };
            if room.on(preferred) >= needed(preferred)
                && fits_cross_axis(node, reference, &room, preferred)
            {
                return preferred;
            }

            let mut best: Option<Placement> = None;
            for side in TIE_ORDER {
                if room.on(side) < needed(side) {
                    continue;
                }
                if best.is_none_or(|b| room.on(side) > room.on(b)) {
                    best = Some(side);
                }
            }
            return best.unwrap_or(Placement::Bottom);
        }
    };

    let here = room.on(side);
    if here < needed(side) && room.on(side.opposite()) > here {
        side.opposite()
    } else {
        side
    }
}

/// Choose how `node` lines up with `reference` along `placement`'s cross axis.
///
/// An exact request is kept whenever it keeps the node inside `minimum`.
/// When it does not, the alternatives are tried (the center first for an end
/// alignment, the end with more room first for a centered one) and the first
/// that fits wins. If nothing fits, the request is kept.
///
/// [`Request::Auto`] picks whichever of center, start, and end overflows the
/// least, preferring them in that order on ties.
pub fn resolve_position<S: CoordSpace>(
    node: &Bounds<S>,
    reference: &Bounds<S>,
    minimum: &Bounds<S>,
    placement: Placement,
    requested: Request<Position>,
) -> Position {
    let axis = placement.cross_axis();
    let (before, after) = available_room(reference, minimum).along(axis);
    let delta = node.extent(axis) - reference.extent(axis);
    let overflow = |p: Position| alignment_overflow(p, before, after, delta);

    match requested {
        Request::Auto => {
            let mut best = Position::Center;
            let mut least = overflow(best);
            for p in [Position::Start, Position::End] {
                let o = overflow(p);
                if o < least {
                    best = p;
                    least = o;
                }
            }
            best
        }
        Request::Exact(wanted) => {
            if overflow(wanted) <= 0.0 {
                return wanted;
            }
            let alternatives = match wanted {
                Position::Start => [Position::Center, Position::End],
                Position::End => [Position::Center, Position::Start],
                Position::Center if after >= before => [Position::Start, Position::End],
                Position::Center => [Position::End, Position::Start],
            };
            alternatives
                .into_iter()
                .find(|p| overflow(*p) <= 0.0)
                .unwrap_or(wanted)
        }
    }
}

/// How far a node `delta` larger than its reference would poke out of the
/// bounding box when aligned with `position`, given the room `before` and
/// `after` the reference.
pub fn alignment_overflow(position: Position, before: f64, after: f64, delta: f64) -> f64 {
    match position {
        Position::Start => (delta - after).max(0.0),
        Position::End => (delta - before).max(0.0),
        Position::Center => {
            let half = delta * 0.5;
            (half - before).max(0.0) + (half - after).max(0.0)
        }
    }
}

/// Whether `node` fits across `placement`'s cross axis at any alignment.
pub fn fits_cross_axis<S: CoordSpace>(
    node: &Bounds<S>,
    reference: &Bounds<S>,
    room: &Room,
    placement: Placement,
) -> bool {
    let axis = placement.cross_axis();
    let (before, after) = room.along(axis);
    let delta = node.extent(axis) - reference.extent(axis);
    Position::ALL
        .into_iter()
        .any(|p| alignment_overflow(p, before, after, delta) <= 0.0)
}
