// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popper configuration and construction errors.

use understory_placement::{Placement, Position, Request};

/// How a [`Popper`](crate::Popper) positions its floating node.
///
/// Build one with struct update syntax over [`Default`] or with
/// [`PopperConfig::new`] and the `with_*` helpers. The configuration is fixed
/// once the popper exists.
///
/// ```rust
/// use understory_placement::Request;
/// use understory_popper::PopperConfig;
///
/// let config = PopperConfig::new(7_u32)
///     .with_placement(Request::Auto)
///     .with_spacing(4.0);
/// assert_eq!(config.reference, Some(7));
/// assert!(config.placement.is_auto());
///
/// let same = PopperConfig {
///     reference: Some(7_u32),
///     placement: Request::Auto,
///     spacing: 4.0,
///     ..PopperConfig::default()
/// };
/// assert_eq!(config, same);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PopperConfig<N> {
    /// The node to position against. Required.
    pub reference: Option<N>,
    /// Optional node whose box further limits where the floating node may go.
    pub container: Option<N>,
    /// Optional arrow inside the floating node to aim at the reference.
    pub arrow: Option<N>,
    /// Requested side. Defaults to [`Placement::Bottom`].
    pub placement: Request<Placement>,
    /// Requested alignment. Defaults to [`Position::Center`].
    pub position: Request<Position>,
    /// Trust the requested side and never flip it.
    pub fixed: bool,
    /// Gap between the floating node and the reference, in pixels.
    pub spacing: f64,
    /// Minimum overlap kept with the reference when the node is pushed along
    /// the cross axis. `None` keeps the reference's full extent covered.
    pub min_contact: Option<f64>,
    /// Move the node with a `translate3d` transform instead of margins.
    pub use_gpu: bool,
}

impl<N> Default for PopperConfig<N> {
    fn default() -> Self {
        Self {
            reference: None,
            container: None,
            arrow: None,
            placement: Request::Exact(Placement::Bottom),
            position: Request::Exact(Position::Center),
            fixed: false,
            spacing: 0.0,
            min_contact: None,
            use_gpu: true,
        }
    }
}

impl<N> PopperConfig<N> {
    /// Default configuration positioned against `reference`.
    pub fn new(reference: N) -> Self {
        Self {
            reference: Some(reference),
            ..Self::default()
        }
    }

    /// Limit placement to the box of `container`.
    #[must_use]
    pub fn with_container(mut self, container: N) -> Self {
        self.container = Some(container);
        self
    }

    /// Aim `arrow` at the reference after every update.
    #[must_use]
    pub fn with_arrow(mut self, arrow: N) -> Self {
        self.arrow = Some(arrow);
        self
    }

    /// Request a side.
    #[must_use]
    pub fn with_placement(mut self, placement: impl Into<Request<Placement>>) -> Self {
        self.placement = placement.into();
        self
    }

    /// Request an alignment.
    #[must_use]
    pub fn with_position(mut self, position: impl Into<Request<Position>>) -> Self {
        self.position = position.into();
        self
    }

    /// Never flip the requested side.
    #[must_use]
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Gap between node and reference.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Minimum overlap kept with the reference.
    #[must_use]
    pub fn with_min_contact(mut self, min_contact: f64) -> Self {
        self.min_contact = Some(min_contact);
        self
    }

    /// Choose between transform (`true`) and margin (`false`) positioning.
    #[must_use]
    pub fn with_gpu(mut self, use_gpu: bool) -> Self {
        self.use_gpu = use_gpu;
        self
    }
}

/// A popper could not be constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// [`PopperConfig::reference`] was `None`.
    #[error("popper configuration has no reference node")]
    MissingReference,
}
