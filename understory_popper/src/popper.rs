// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single floating node kept next to its reference.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Vec2};
use understory_placement::{
    Bounds, CoordSpace, Document, Placement, Position, Request, Viewport, ViewportBounds,
    apply_placement_offset, apply_position_offset, arrow_offset, compute_offset,
    constrain_offset, is_unreachable, resolve_placement, resolve_position,
};

use crate::config::{ConfigError, PopperConfig};
use crate::host::{DataKey, Geometry, Host, NodeTraits, PositionMode, Style, closest_ancestor};

/// Extra room, in pixels, a side must have beyond `spacing` before the
/// solver keeps it.
pub const SAFETY_MARGIN: f64 = 2.0;

/// The layout an update wrote.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layout {
    /// Side the node was placed on.
    pub placement: Placement,
    /// Alignment along the cross axis.
    pub position: Position,
    /// Offset written to the node (transform or margin).
    pub offset: Vec2,
}

/// What [`Popper::update`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Update {
    /// The node was moved.
    Positioned(Layout),
    /// The reference is too far off-screen; the previous position was kept.
    Unreachable,
    /// The floating node is not in the document; nothing was touched.
    Detached,
}

impl Update {
    /// The written layout, if the node was moved.
    pub fn layout(&self) -> Option<&Layout> {
        match self {
            Self::Positioned(layout) => Some(layout),
            Self::Unreachable | Self::Detached => None,
        }
    }
}

/// Positions one floating node against one reference node.
///
/// Construction resolves everything that does not change while the node is
/// shown: whether the reference lives in a fixed-position subtree, the
/// nearest scroll container, and the nearest relatively positioned ancestor.
/// [`Popper::update`] then measures and writes a fresh layout each time it is
/// called.
///
/// A popper on its own never listens to anything; register it with a
/// [`PopperSet`](crate::PopperSet) to keep it positioned while the page
/// scrolls and resizes.
///
/// A popper is not `Clone`: registering the same floating node twice would
/// leave two entries fighting over its styles.
///
/// ```rust,compile_fail
/// fn duplicate<T: Clone>() {}
/// duplicate::<understory_popper::Popper<u32>>();
/// ```
#[derive(Debug)]
pub struct Popper<N> {
    node: N,
    reference: N,
    config: PopperConfig<N>,
    fixed: bool,
    scroll_parent: Option<N>,
    relative_parent: Option<N>,
}

impl<N: Copy + Eq + Hash + Debug> Popper<N> {
    /// Prepare `node` for positioning against `config.reference`.
    ///
    /// Switches the node to fixed or absolute positioning with a zero inset.
    /// Fails only when no reference was configured.
    pub fn new<H>(host: &mut H, node: N, config: PopperConfig<N>) -> Result<Self, ConfigError>
    where
        H: Host<Node = N> + ?Sized,
    {
        let reference = config.reference.ok_or(ConfigError::MissingReference)?;

        let fixed = host.traits_of(reference).contains(NodeTraits::FIXED)
            || closest_ancestor(&*host, reference, NodeTraits::FIXED).is_some();
        let scroll_parent = closest_ancestor(&*host, node, NodeTraits::SCROLLABLE);
        // No relative ancestor leaves offsets in the boxes' own space.
        let relative_parent = if fixed {
            None
        } else {
            closest_ancestor(&*host, node, NodeTraits::RELATIVE)
        };

        let mode = if fixed {
            PositionMode::Fixed
        } else {
            PositionMode::Absolute
        };
        host.set_style(node, Style::Mode(mode));
        host.set_style(node, Style::ResetInset);

        tracing::trace!(
            ?node,
            ?reference,
            fixed,
            ?scroll_parent,
            ?relative_parent,
            "popper prepared"
        );

        Ok(Self {
            node,
            reference,
            config,
            fixed,
            scroll_parent,
            relative_parent,
        })
    }

    /// The floating node.
    pub fn node(&self) -> N {
        self.node
    }

    /// The reference node.
    pub fn reference(&self) -> N {
        self.reference
    }

    /// The configuration this popper was built with.
    pub fn config(&self) -> &PopperConfig<N> {
        &self.config
    }

    /// Whether the reference lives in a fixed-position subtree, in which case
    /// everything is measured relative to the viewport.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Nearest scroll container above the floating node.
    pub fn scroll_parent(&self) -> Option<N> {
        self.scroll_parent
    }

    /// Nearest relatively positioned ancestor of the floating node, if the
    /// popper is not fixed.
    pub fn relative_parent(&self) -> Option<N> {
        self.relative_parent
    }

    /// Measure, solve, and write a new layout.
    ///
    /// Detached nodes and unreachable references are skipped without touching
    /// any style.
    pub fn update<H>(&self, host: &mut H) -> Update
    where
        H: Host<Node = N> + ?Sized,
    {
        if !host.is_attached(self.node) {
            tracing::trace!(node = ?self.node, "skipping detached popper");
            return Update::Detached;
        }
        if self.fixed {
            self.update_in::<Viewport, H>(host)
        } else {
            self.update_in::<Document, H>(host)
        }
    }

    fn update_in<S, H>(&self, host: &mut H) -> Update
    where
        S: CoordSpace,
        H: Host<Node = N> + ?Sized,
    {
        let config = &self.config;
        let node = measure::<S, H>(host, self.node);
        let reference = measure::<S, H>(host, self.reference);
        let viewport = ViewportBounds::from_rect(Rect::from_origin_size(
            Point::ZERO,
            host.viewport_size(),
        ));
        let window = S::from_viewport(viewport, host.document_scroll());

        if is_unreachable(&node, &reference, &window, config.spacing) {
            tracing::debug!(node = ?self.node, "reference out of reach, keeping last layout");
            return Update::Unreachable;
        }

        let mut minimum = window;
        if let Some(scroller) = self.scroll_parent {
            minimum = minimum.intersect(&measure::<S, H>(host, scroller));
        }
        if let Some(container) = config.container {
            minimum = minimum.intersect(&measure::<S, H>(host, container));
        }

        let placement = match config.placement {
            Request::Exact(side) if config.fixed => side,
            requested => resolve_placement(
                &node,
                &reference,
                &minimum,
                requested,
                config.spacing + SAFETY_MARGIN,
            ),
        };
        let position = resolve_position(&node, &reference, &minimum, placement, config.position);

        for target in [self.reference, self.node] {
            host.set_data(target, DataKey::Placement, placement.as_str());
            host.set_data(target, DataKey::Position, position.as_str());
        }

        let relative = self
            .relative_parent
            .map(|parent| measure::<S, H>(host, parent));
        let offset = compute_offset(&reference, relative.as_ref());
        let offset = apply_placement_offset(offset, &node, &reference, placement, config.spacing);
        let offset = apply_position_offset(offset, &node, &reference, placement, position);
        let offset = offset - host.margin(self.node);
        let mut offset = constrain_offset(
            offset,
            &node,
            &reference,
            &minimum,
            relative.as_ref(),
            placement,
            config.min_contact,
        );
        if let Some(scroller) = self.scroll_parent {
            offset += host.scroll_offset(scroller);
        }

        let write = if config.use_gpu {
            Style::Translate(offset)
        } else {
            Style::Margin(offset)
        };
        host.set_style(self.node, write);

        if let Some(arrow) = config.arrow {
            host.set_style(arrow, Style::ClearArrow);
            let placed = measure::<S, H>(host, self.node);
            let arrow_box = measure::<S, H>(host, arrow);
            let along = arrow_offset(&placed, &reference, &arrow_box, placement);
            host.set_style(
                arrow,
                Style::Arrow {
                    axis: placement.cross_axis(),
                    offset: along,
                },
            );
        }

        tracing::trace!(
            node = ?self.node,
            %placement,
            %position,
            x = offset.x,
            y = offset.y,
            "popper positioned"
        );
        Update::Positioned(Layout {
            placement,
            position,
            offset,
        })
    }
}

fn measure<S, H>(host: &H, node: H::Node) -> Bounds<S>
where
    S: CoordSpace,
    H: Geometry + ?Sized,
{
    S::from_viewport(host.viewport_rect(node), host.document_scroll())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::TestHost;
    use kurbo::Size;

    fn page() -> (TestHost, u32, u32) {
        let mut host = TestHost::new(Size::new(500.0, 500.0));
        let root = host.root();
        let reference = host.add(root, Rect::new(10.0, 10.0, 110.0, 30.0));
        let node = host.add(root, Rect::new(0.0, 0.0, 50.0, 30.0));
        (host, reference, node)
    }

    #[test]
    fn missing_reference_is_a_config_error() {
        let (mut host, _, node) = page();
        let err = Popper::new(&mut host, node, PopperConfig::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingReference);
        assert!(host.styles_of(node).is_empty(), "nothing may be written");
    }

    #[test]
    fn construction_prepares_the_node() {
        let (mut host, reference, node) = page();
        let popper = Popper::new(&mut host, node, PopperConfig::new(reference)).unwrap();
        assert!(!popper.is_fixed());
        assert_eq!(popper.scroll_parent(), None);
        assert_eq!(popper.relative_parent(), None);
        assert_eq!(
            host.styles_of(node),
            [Style::Mode(PositionMode::Absolute), Style::ResetInset]
        );
    }

    #[test]
    fn cramped_top_flips_below_the_reference() {
        let (mut host, reference, node) = page();
        let config = PopperConfig::new(reference)
            .with_placement(Placement::Top)
            .with_position(Position::Start)
            .with_spacing(5.0);
        let popper = Popper::new(&mut host, node, config).unwrap();
        let update = popper.update(&mut host);
        assert_eq!(
            update,
            Update::Positioned(Layout {
                placement: Placement::Bottom,
                position: Position::Start,
                offset: Vec2::new(10.0, 35.0),
            })
        );
        assert_eq!(
            host.last_style(node),
            Some(Style::Translate(Vec2::new(10.0, 35.0)))
        );
    }

    #[test]
    fn end_alignment_uses_the_size_delta() {
        let (mut host, reference, node) = page();
        let config = PopperConfig::new(reference)
            .with_placement(Placement::Bottom)
            .with_position(Position::End)
            .with_gpu(false);
        let popper = Popper::new(&mut host, node, config).unwrap();
        popper.update(&mut host);
        assert_eq!(
            host.last_style(node),
            Some(Style::Margin(Vec2::new(60.0, 30.0)))
        );
    }

    #[test]
    fn resolved_layout_is_recorded_on_both_nodes() {
        let (mut host, reference, node) = page();
        let config = PopperConfig::new(reference).with_placement(Placement::Top);
        let popper = Popper::new(&mut host, node, config).unwrap();
        popper.update(&mut host);
        for target in [reference, node] {
            assert_eq!(host.data(target, DataKey::Placement), Some("bottom"));
            assert_eq!(host.data(target, DataKey::Position), Some("center"));
        }
    }

    #[test]
    fn fixed_config_never_flips() {
        let (mut host, reference, node) = page();
        let config = PopperConfig::new(reference)
            .with_placement(Placement::Top)
            .with_position(Position::Start)
            .with_fixed(true);
        let popper = Popper::new(&mut host, node, config).unwrap();
        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.placement, Placement::Top);
        assert_eq!(layout.offset, Vec2::new(10.0, -20.0));
    }

    #[test]
    fn scroll_offset_is_added_after_the_clamp() {
        let mut host = TestHost::new(Size::new(500.0, 500.0));
        let root = host.root();
        let scroller = host.add(root, Rect::new(0.0, 0.0, 500.0, 500.0));
        host.set_traits(scroller, NodeTraits::SCROLLABLE);
        host.set_scroll(scroller, Vec2::new(0.0, 100.0));
        let reference = host.add(scroller, Rect::new(10.0, 400.0, 110.0, 420.0));
        let node = host.add(scroller, Rect::new(0.0, 0.0, 50.0, 80.0));

        let config = PopperConfig::new(reference)
            .with_placement(Placement::Right)
            .with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        assert_eq!(popper.scroll_parent(), Some(scroller));

        let layout = *popper.update(&mut host).layout().unwrap();
        // Clamped against the unscrolled box first (400 fits under 420),
        // then shifted by the container's scroll position.
        assert_eq!(layout.offset, Vec2::new(110.0, 500.0));
    }

    #[test]
    fn relative_parent_shifts_the_origin() {
        let mut host = TestHost::new(Size::new(500.0, 500.0));
        let root = host.root();
        let panel = host.add(root, Rect::new(100.0, 100.0, 400.0, 400.0));
        host.set_traits(panel, NodeTraits::RELATIVE);
        let reference = host.add(panel, Rect::new(150.0, 150.0, 200.0, 170.0));
        let node = host.add(panel, Rect::new(0.0, 0.0, 50.0, 30.0));

        let config = PopperConfig::new(reference).with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        assert_eq!(popper.relative_parent(), Some(panel));
        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.offset, Vec2::new(50.0, 70.0));
    }

    #[test]
    fn fixed_subtree_measures_in_the_viewport() {
        let mut host = TestHost::new(Size::new(500.0, 500.0));
        host.set_document_scroll(Vec2::new(0.0, 300.0));
        let root = host.root();
        let bar = host.add(root, Rect::new(0.0, 0.0, 500.0, 50.0));
        host.set_traits(bar, NodeTraits::FIXED | NodeTraits::RELATIVE);
        let reference = host.add(bar, Rect::new(10.0, 10.0, 110.0, 30.0));
        let node = host.add(root, Rect::new(0.0, 0.0, 50.0, 30.0));

        let config = PopperConfig::new(reference).with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        assert!(popper.is_fixed());
        assert_eq!(popper.relative_parent(), None);
        assert_eq!(host.styles_of(node)[0], Style::Mode(PositionMode::Fixed));

        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.offset, Vec2::new(10.0, 30.0));
    }

    #[test]
    fn document_scroll_moves_absolute_offsets() {
        let (mut host, reference, node) = page();
        host.set_document_scroll(Vec2::new(0.0, 300.0));
        let config = PopperConfig::new(reference).with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.offset, Vec2::new(10.0, 330.0));
    }

    #[test]
    fn own_margin_is_not_counted_twice() {
        let (mut host, reference, node) = page();
        host.set_margin(node, Vec2::new(0.0, 4.0));
        let config = PopperConfig::new(reference).with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.offset, Vec2::new(10.0, 26.0));
    }

    #[test]
    fn container_limits_the_minimum_box() {
        let (mut host, reference, node) = page();
        let root = host.root();
        // The container ends 20px right of the reference, too tight for a
        // start-aligned node 50px wider than it.
        let container = host.add(root, Rect::new(0.0, 0.0, 180.0, 500.0));
        host.set_rect(reference, Rect::new(60.0, 10.0, 160.0, 30.0));
        host.set_rect(node, Rect::new(0.0, 0.0, 150.0, 30.0));
        let config = PopperConfig::new(reference)
            .with_container(container)
            .with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        let layout = *popper.update(&mut host).layout().unwrap();
        assert_eq!(layout.position, Position::End);
    }

    #[test]
    fn unreachable_reference_keeps_the_last_layout() {
        let (mut host, reference, node) = page();
        let popper = Popper::new(&mut host, node, PopperConfig::new(reference)).unwrap();
        popper.update(&mut host);
        let written = host.styles_of(node).len();

        host.set_rect(reference, Rect::new(10.0, -300.0, 110.0, -280.0));
        assert_eq!(popper.update(&mut host), Update::Unreachable);
        assert_eq!(host.styles_of(node).len(), written);
    }

    #[test]
    fn detached_node_is_left_alone() {
        let (mut host, reference, node) = page();
        let popper = Popper::new(&mut host, node, PopperConfig::new(reference)).unwrap();
        host.detach(node);
        assert_eq!(popper.update(&mut host), Update::Detached);
        assert_eq!(host.styles_of(node).len(), 2);
    }

    #[test]
    fn arrow_points_at_the_reference() {
        let (mut host, reference, node) = page();
        host.set_rect(node, Rect::new(0.0, 0.0, 200.0, 50.0));
        let arrow = host.add(node, Rect::new(0.0, 0.0, 10.0, 5.0));
        let config = PopperConfig::new(reference)
            .with_arrow(arrow)
            .with_position(Position::Start);
        let popper = Popper::new(&mut host, node, config).unwrap();
        popper.update(&mut host);
        assert_eq!(
            host.styles_of(arrow),
            [
                Style::ClearArrow,
                Style::Arrow {
                    axis: understory_placement::Axis::Horizontal,
                    offset: 45.0,
                },
            ]
        );
    }
}
