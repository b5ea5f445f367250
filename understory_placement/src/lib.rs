// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: pure geometry for floating UI elements.
//!
//! Tooltips, popovers, and dropdown menus all need the same answer: given the
//! box of a floating node, the box of the reference it belongs to, and the box
//! it has to stay inside, where should it go? This crate answers that with
//! side-effect free functions over coordinate-tagged boxes.
//!
//! - [`resolve_placement`] picks the side ([`Placement`]) and flips an exact
//!   request to the opposite side when it is cramped.
//! - [`resolve_position`] picks the cross-axis alignment ([`Position`]) and
//!   reassigns a request that would leave the bounding box.
//! - [`compute_offset`], [`apply_placement_offset`], [`apply_position_offset`],
//!   and [`constrain_offset`] turn the decision into a pixel offset.
//! - [`is_unreachable`] detects references so far off-screen that there is no
//!   point in positioning anything.
//! - [`arrow_offset`] aims an arrow at the reference.
//!
//! ## Coordinate spaces
//!
//! Every box is a [`Bounds<S>`](Bounds) tagged with the space it was measured
//! in: [`Viewport`] for fixed-position nodes, [`Document`] otherwise. All
//! functions are generic over the space but require every argument to share
//! it, so mixing a viewport measurement into a document computation does not
//! compile. [`Bounds::to_document`] is the explicit conversion.
//!
//! ## Minimal example
//!
//! A tooltip asked to sit above a button near the top of the page flips
//! below it:
//!
//! ```rust
//! use understory_placement::{
//!     DocumentBounds, Placement, Position, apply_placement_offset, apply_position_offset,
//!     compute_offset, resolve_placement, resolve_position,
//! };
//!
//! let window = DocumentBounds::new(0.0, 0.0, 500.0, 500.0);
//! let button = DocumentBounds::new(10.0, 10.0, 100.0, 20.0);
//! let tooltip = DocumentBounds::new(0.0, 0.0, 50.0, 30.0);
//!
//! let side = resolve_placement(&tooltip, &button, &window, Placement::Top.into(), 5.0);
//! assert_eq!(side, Placement::Bottom);
//!
//! let align = resolve_position(&tooltip, &button, &window, side, Position::Start.into());
//! let offset = compute_offset(&button, None);
//! let offset = apply_placement_offset(offset, &tooltip, &button, side, 5.0);
//! let offset = apply_position_offset(offset, &tooltip, &button, side, align);
//! assert_eq!((offset.x, offset.y), (10.0, 35.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` float math for `kurbo`.
//! - `serde`: derives `Serialize`/`Deserialize` for [`Placement`], [`Position`],
//!   and [`Request`] using lowercase names (`"auto"`, `"top"`, `"center"`, …).
//!
//! This crate is `no_std` and does not allocate. The `serde` feature enables
//! `serde/alloc`, which `Request` deserialization needs.

#![no_std]

mod bounds;
mod offset;
mod solver;
mod types;

pub use bounds::{Bounds, CoordSpace, Document, DocumentBounds, Viewport, ViewportBounds};
pub use offset::{
    apply_placement_offset, apply_position_offset, arrow_offset, compute_offset,
    constrain_offset, is_unreachable,
};
pub use solver::{
    alignment_overflow, available_room, fits_cross_axis, resolve_placement, resolve_position,
};
pub use types::{Axis, ParseError, Placement, Position, Request, Room};
