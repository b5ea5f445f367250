// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame coalescing of resize and scroll signals.
//!
//! Browsers deliver scroll events far more often than a popper needs to move.
//! The scheduler folds every signal that arrives before the next animation
//! frame into a single [`Pending`] batch, and reports only the first one so
//! the host asks for exactly one frame. Nothing here knows about time; the
//! host's frame callback decides when to [`take`](FrameScheduler::take) the
//! batch.

use smallvec::SmallVec;

/// Something that may have moved a reference or floating node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signal<N> {
    /// The window was resized.
    Resize,
    /// The document scrolled.
    Scroll,
    /// A scroll container scrolled.
    ContainerScroll(N),
}

/// Signals collected since the last frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending<N> {
    /// A window signal arrived; every popper needs an update.
    pub window: bool,
    /// Scroll containers that scrolled, in arrival order, each once. Empty
    /// whenever `window` is set.
    pub containers: SmallVec<[N; 4]>,
    /// Number of raw signals folded into this batch.
    pub signals: u32,
}

impl<N> Default for Pending<N> {
    fn default() -> Self {
        Self {
            window: false,
            containers: SmallVec::new(),
            signals: 0,
        }
    }
}

impl<N> Pending<N> {
    /// Whether the batch holds nothing to do.
    pub fn is_empty(&self) -> bool {
        !self.window && self.containers.is_empty()
    }
}

/// Folds signals into at most one pending batch.
///
/// ```rust
/// use understory_popper::{FrameScheduler, Signal};
///
/// let mut frames = FrameScheduler::<u32>::new();
/// assert!(frames.push(Signal::ContainerScroll(3)), "first signal asks for a frame");
/// assert!(!frames.push(Signal::ContainerScroll(3)));
/// assert!(!frames.push(Signal::Scroll));
///
/// let batch = frames.take();
/// assert!(batch.window);
/// assert!(batch.containers.is_empty());
/// assert_eq!(batch.signals, 3);
/// assert!(!frames.has_pending());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameScheduler<N> {
    pending: Pending<N>,
}

impl<N> Default for FrameScheduler<N> {
    fn default() -> Self {
        Self {
            pending: Pending::default(),
        }
    }
}

impl<N: Copy + Eq> FrameScheduler<N> {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `signal`. Returns `true` when this is the first signal since the
    /// last [`take`](Self::take) or [`discard`](Self::discard), i.e. when a
    /// frame has to be requested.
    pub fn push(&mut self, signal: Signal<N>) -> bool {
        let was_idle = !self.has_pending();
        self.pending.signals = self.pending.signals.saturating_add(1);
        match signal {
            Signal::Resize | Signal::Scroll => {
                self.pending.window = true;
                self.pending.containers.clear();
            }
            Signal::ContainerScroll(container) => {
                if !self.pending.window && !self.pending.containers.contains(&container) {
                    self.pending.containers.push(container);
                }
            }
        }
        was_idle
    }

    /// Whether a batch is waiting for a frame.
    pub fn has_pending(&self) -> bool {
        self.pending.signals > 0
    }

    /// Number of raw signals in the waiting batch.
    pub fn pending_count(&self) -> u32 {
        self.pending.signals
    }

    /// Peek at the waiting batch.
    pub fn pending(&self) -> &Pending<N> {
        &self.pending
    }

    /// Drain the waiting batch, leaving the scheduler idle.
    pub fn take(&mut self) -> Pending<N> {
        core::mem::take(&mut self.pending)
    }

    /// Drop the waiting batch without acting on it.
    pub fn discard(&mut self) {
        self.pending = Pending::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_signal_requests_a_frame() {
        let mut frames = FrameScheduler::<u32>::new();
        assert!(!frames.has_pending());
        assert!(frames.push(Signal::Resize));
        assert!(!frames.push(Signal::Resize));
        assert!(!frames.push(Signal::Scroll));
        assert_eq!(frames.pending_count(), 3);

        frames.take();
        assert!(frames.push(Signal::Scroll), "a new frame after draining");
    }

    #[test]
    fn containers_are_deduplicated_in_arrival_order() {
        let mut frames = FrameScheduler::new();
        frames.push(Signal::ContainerScroll(7_u32));
        frames.push(Signal::ContainerScroll(2));
        frames.push(Signal::ContainerScroll(7));
        let batch = frames.take();
        assert!(!batch.window);
        assert_eq!(batch.containers.as_slice(), [7, 2]);
        assert_eq!(batch.signals, 3);
    }

    #[test]
    fn window_signals_supersede_containers() {
        let mut frames = FrameScheduler::new();
        frames.push(Signal::ContainerScroll(1_u32));
        frames.push(Signal::Resize);
        frames.push(Signal::ContainerScroll(2));
        let batch = frames.take();
        assert!(batch.window);
        assert!(batch.containers.is_empty());
        assert!(!batch.is_empty());
    }

    #[test]
    fn discard_returns_to_idle() {
        let mut frames = FrameScheduler::new();
        frames.push(Signal::ContainerScroll(1_u32));
        frames.discard();
        assert!(!frames.has_pending());
        assert!(frames.pending().is_empty());
        assert!(frames.take().is_empty());
    }
}
