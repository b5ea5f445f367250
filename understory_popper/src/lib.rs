// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popper --heading-base-level=0

//! Understory Popper: keep floating nodes attached to their reference.
//!
//! A popper ties one floating node (tooltip, popover, dropdown) to one
//! reference node. Every update measures both, asks
//! [`understory_placement`] for a side and an alignment, and writes the
//! resulting offset back as a style. A [`PopperSet`] keeps every live popper
//! positioned while the window resizes and the page or its scroll containers
//! scroll.
//!
//! ## Host integration
//!
//! The crate never touches a document itself. The embedder implements the
//! traits in [`host`] ([`NodeTree`], [`Geometry`], [`StyleSink`],
//! [`EventSource`]) for its node handles and forwards events:
//!
//! - resize and scroll events go to [`PopperSet::notify`] as [`Signal`]s;
//! - the animation frame the set requests calls [`PopperSet::flush`];
//! - a floating node leaving the document calls [`PopperSet::node_removed`].
//!
//! ## API overview
//!
//! - [`PopperConfig`]: reference, optional container and arrow, requested
//!   placement and position, spacing, and write mode.
//! - [`Popper`]: one floating/reference pair; [`Popper::update`] returns an
//!   [`Update`] describing what was written.
//! - [`PopperSet`]: registry addressed by generational [`PopperId`]s, with
//!   shared listeners and per-frame coalescing through [`FrameScheduler`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size, Vec2};
//! use understory_placement::{Placement, ViewportBounds};
//! use understory_popper::{
//!     DataKey, EventSource, Geometry, ListenTarget, NodeTraits, NodeTree, PopperConfig,
//!     PopperSet, Signal, Style, StyleSink, Update,
//! };
//!
//! /// Two nodes under a body: a button (1) and its tooltip (2).
//! struct Page {
//!     rects: [Rect; 3],
//!     last: Option<Style>,
//! }
//!
//! impl NodeTree for Page {
//!     type Node = usize;
//!     fn parent_of(&self, node: usize) -> Option<usize> {
//!         (node != 0).then_some(0)
//!     }
//!     fn is_root(&self, node: usize) -> bool {
//!         node == 0
//!     }
//!     fn traits_of(&self, _: usize) -> NodeTraits {
//!         NodeTraits::empty()
//!     }
//!     fn is_attached(&self, _: usize) -> bool {
//!         true
//!     }
//! }
//!
//! impl Geometry for Page {
//!     fn viewport_rect(&self, node: usize) -> ViewportBounds {
//!         ViewportBounds::from_rect(self.rects[node])
//!     }
//!     fn scroll_offset(&self, _: usize) -> Vec2 {
//!         Vec2::ZERO
//!     }
//!     fn document_scroll(&self) -> Vec2 {
//!         Vec2::ZERO
//!     }
//!     fn viewport_size(&self) -> Size {
//!         self.rects[0].size()
//!     }
//!     fn margin(&self, _: usize) -> Vec2 {
//!         Vec2::ZERO
//!     }
//! }
//!
//! impl StyleSink for Page {
//!     fn set_style(&mut self, _: usize, style: Style) {
//!         self.last = Some(style);
//!     }
//!     fn set_data(&mut self, _: usize, _: DataKey, _: &str) {}
//! }
//!
//! impl EventSource for Page {
//!     fn listen(&mut self, _: ListenTarget<usize>) {}
//!     fn unlisten(&mut self, _: ListenTarget<usize>) {}
//!     fn watch_removal(&mut self, _: usize) {}
//!     fn unwatch_removal(&mut self, _: usize) {}
//!     fn request_frame(&mut self) {}
//! }
//!
//! let mut page = Page {
//!     rects: [
//!         Rect::new(0.0, 0.0, 500.0, 500.0),
//!         Rect::new(10.0, 10.0, 110.0, 30.0),
//!         Rect::new(0.0, 0.0, 50.0, 30.0),
//!     ],
//!     last: None,
//! };
//!
//! let mut poppers = PopperSet::new();
//! let config = PopperConfig::new(1).with_placement(Placement::Top).with_spacing(5.0);
//! let id = poppers.open(&mut page, 2, config).unwrap();
//!
//! // No room above the button, so the tooltip went below it, centered.
//! assert_eq!(page.last, Some(Style::Translate(Vec2::new(35.0, 35.0))));
//!
//! poppers.notify(&mut page, Signal::Scroll);
//! let report = poppers.flush(&mut page, |_, _, _, update| {
//!     assert!(matches!(update, Update::Positioned(_)));
//! });
//! assert_eq!(report.updated, 1);
//!
//! poppers.destroy(&mut page, id);
//! assert!(poppers.is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `understory_placement`.
//! - `libm`: `no_std` float math.
//!
//! Diagnostics are emitted through `tracing` at `trace` and `debug` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
pub mod host;
mod popper;
mod registry;
mod scheduler;

#[cfg(test)]
mod test_host;

pub use config::{ConfigError, PopperConfig};
pub use host::{
    DataKey, EventSource, Geometry, Host, ListenTarget, NodeTraits, NodeTree, PositionMode, Style,
    StyleSink,
};
pub use popper::{Layout, Popper, SAFETY_MARGIN, Update};
pub use registry::{FlushReport, PopperId, PopperSet};
pub use scheduler::{FrameScheduler, Pending, Signal};
