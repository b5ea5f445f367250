// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registry of live poppers and the listeners they share.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::{ConfigError, PopperConfig};
use crate::host::{Host, ListenTarget, is_within};
use crate::popper::{Popper, Update};
use crate::scheduler::{FrameScheduler, Signal};

/// Identifier for a popper in a [`PopperSet`] (generational).
///
/// Slots are reused after [`PopperSet::destroy`], but with a new generation,
/// so an id kept past its popper's lifetime never resolves to a newer one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PopperId(u32, u32);

impl PopperId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Counts from one [`PopperSet::flush`] or [`PopperSet::refresh`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Raw signals folded into the frame.
    pub signals: u32,
    /// Poppers that were moved.
    pub updated: usize,
    /// Poppers skipped because their reference was out of reach.
    pub unreachable: usize,
    /// Poppers skipped because their node was detached.
    pub detached: usize,
    /// Ids destroyed during the frame before their turn came.
    pub skipped: usize,
}

/// Every live popper, plus the window and scroll-container listeners they
/// need.
///
/// The set owns its poppers and hands out [`PopperId`]s. It keeps exactly one
/// window listener while anything is live, and one scroll listener per scroll
/// container that hosts at least one popper; listeners are torn down as soon
/// as nothing needs them.
///
/// Signals reach the set through [`notify`](Self::notify), which coalesces
/// them and asks the host for a single frame. The host's frame callback then
/// calls [`flush`](Self::flush).
///
/// ```rust
/// # use understory_popper::PopperSet;
/// let set = PopperSet::<u32>::new();
/// assert!(set.is_empty());
/// assert!(!set.is_listening());
/// ```
pub struct PopperSet<N> {
    /// slots
    poppers: Vec<Option<Popper<N>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// registration order
    live: Vec<PopperId>,
    overflow: HashMap<N, SmallVec<[PopperId; 4]>>,
    listening: bool,
    frames: FrameScheduler<N>,
}

impl<N: Copy + Eq> Debug for PopperSet<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PopperSet")
            .field("live", &self.live.len())
            .field("slots_total", &self.poppers.len())
            .field("free_list", &self.free_list.len())
            .field("containers", &self.overflow.len())
            .field("listening", &self.listening)
            .field("pending_signals", &self.frames.pending_count())
            .finish_non_exhaustive()
    }
}

impl<N: Copy + Eq + Hash + Debug> Default for PopperSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash + Debug> PopperSet<N> {
    /// Create an empty set that listens to nothing.
    pub fn new() -> Self {
        Self {
            poppers: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            live: Vec::new(),
            overflow: HashMap::new(),
            listening: false,
            frames: FrameScheduler::new(),
        }
    }

    /// Construct a popper for `node` and [`add`](Self::add) it.
    pub fn open<H>(
        &mut self,
        host: &mut H,
        node: N,
        config: PopperConfig<N>,
    ) -> Result<PopperId, ConfigError>
    where
        H: Host<Node = N> + ?Sized,
    {
        let popper = Popper::new(host, node, config)?;
        Ok(self.add(host, popper))
    }

    /// Register `popper` and position it once.
    ///
    /// Starts the window listener if this is the first live popper, joins the
    /// popper's scroll container, and asks the host to report when the
    /// floating node leaves the document.
    pub fn add<H>(&mut self, host: &mut H, popper: Popper<N>) -> PopperId
    where
        H: Host<Node = N> + ?Sized,
    {
        let node = popper.node();
        let scroll_parent = popper.scroll_parent();
        let id = self.insert(popper);
        self.live.push(id);

        if !self.listening {
            host.listen(ListenTarget::Window);
            self.listening = true;
            tracing::debug!("window listener attached");
        }
        if let Some(container) = scroll_parent {
            self.add_overflow(host, container, id);
        }
        host.watch_removal(node);
        tracing::trace!(?id, ?node, live = self.live.len(), "popper registered");

        self.update(host, id);
        id
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "PopperId uses 32-bit indices by design."
    )]
    fn insert(&mut self, popper: Popper<N>) -> PopperId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.poppers[idx] = Some(popper);
            PopperId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.poppers.push(Some(popper));
            self.generations.push(generation);
            PopperId::new((self.poppers.len() - 1) as u32, generation)
        }
    }

    /// Register `id` under the scroll `container`, listening to it if it is
    /// the first.
    fn add_overflow<H>(&mut self, host: &mut H, container: N, id: PopperId)
    where
        H: Host<Node = N> + ?Sized,
    {
        let ids = self.overflow.entry(container).or_default();
        if ids.is_empty() {
            host.listen(ListenTarget::Scroll(container));
            tracing::debug!(?container, "scroll listener attached");
        }
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// Drop `id` from the live list. The window listener goes away with the
    /// last entry.
    fn remove<H>(&mut self, host: &mut H, id: PopperId)
    where
        H: Host<Node = N> + ?Sized,
    {
        self.live.retain(|live| *live != id);
        if self.live.is_empty() && self.listening {
            host.unlisten(ListenTarget::Window);
            self.listening = false;
            tracing::debug!("window listener detached");
        }
    }

    /// Drop `id` from `container`'s list. The container's listener goes away
    /// with the last entry.
    fn remove_overflow<H>(&mut self, host: &mut H, container: N, id: PopperId)
    where
        H: Host<Node = N> + ?Sized,
    {
        let Some(ids) = self.overflow.get_mut(&container) else {
            return;
        };
        ids.retain(|entry| *entry != id);
        if ids.is_empty() {
            self.overflow.remove(&container);
            host.unlisten(ListenTarget::Scroll(container));
            tracing::debug!(?container, "scroll listener detached");
        }
    }

    /// Unregister and return the popper behind `id`.
    ///
    /// Stale ids are ignored, so destroying twice is harmless. The node keeps
    /// whatever styles were last written to it.
    pub fn destroy<H>(&mut self, host: &mut H, id: PopperId) -> Option<Popper<N>>
    where
        H: Host<Node = N> + ?Sized,
    {
        if !self.contains(id) {
            return None;
        }
        let popper = self.poppers[id.idx()].take()?;
        self.free_list.push(id.idx());

        self.remove(host, id);
        let containers: SmallVec<[N; 4]> = self
            .overflow
            .iter()
            .filter(|(_, ids)| ids.contains(&id))
            .map(|(container, _)| *container)
            .collect();
        for container in containers {
            self.remove_overflow(host, container, id);
        }
        host.unwatch_removal(popper.node());
        tracing::trace!(?id, node = ?popper.node(), live = self.live.len(), "popper destroyed");
        Some(popper)
    }

    /// Reposition one popper now, bypassing the frame scheduler.
    pub fn update<H>(&self, host: &mut H, id: PopperId) -> Option<Update>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.get(id).map(|popper| popper.update(host))
    }

    /// Record a resize or scroll. The first signal of a frame asks the host
    /// for one.
    pub fn notify<H>(&mut self, host: &mut H, signal: Signal<N>)
    where
        H: Host<Node = N> + ?Sized,
    {
        if self.frames.push(signal) {
            host.request_frame();
        }
    }

    /// Whether signals are waiting for [`flush`](Self::flush).
    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    /// Run the frame: update every popper the pending signals touch.
    ///
    /// A window signal updates every live popper. A container signal updates
    /// the poppers registered under that container whose node lies inside it.
    /// Each popper is updated at most once, and `react` sees every result.
    /// `react` may add or destroy poppers; ids destroyed before their turn
    /// are counted as skipped.
    pub fn flush<H, F>(&mut self, host: &mut H, react: F) -> FlushReport
    where
        H: Host<Node = N> + ?Sized,
        F: FnMut(&mut Self, &mut H, PopperId, Update),
    {
        let batch = self.frames.take();
        let mut report = FlushReport {
            signals: batch.signals,
            ..FlushReport::default()
        };
        if batch.is_empty() {
            return report;
        }

        let targets = if batch.window {
            self.live.clone()
        } else {
            let mut targets = Vec::new();
            for container in &batch.containers {
                let Some(ids) = self.overflow.get(container) else {
                    continue;
                };
                for &id in ids {
                    if targets.contains(&id) {
                        continue;
                    }
                    if self
                        .get(id)
                        .is_some_and(|popper| is_within(&*host, popper.node(), *container))
                    {
                        targets.push(id);
                    }
                }
            }
            targets
        };

        self.run(host, &targets, react, &mut report);
        tracing::debug!(
            signals = report.signals,
            updated = report.updated,
            unreachable = report.unreachable,
            detached = report.detached,
            skipped = report.skipped,
            "frame flushed"
        );
        report
    }

    /// Drop any pending signals and update every live popper now.
    pub fn refresh<H>(&mut self, host: &mut H) -> FlushReport
    where
        H: Host<Node = N> + ?Sized,
    {
        self.frames.discard();
        let targets = self.live.clone();
        let mut report = FlushReport::default();
        self.run(host, &targets, |_, _, _, _| {}, &mut report);
        report
    }

    fn run<H, F>(&mut self, host: &mut H, targets: &[PopperId], mut react: F, report: &mut FlushReport)
    where
        H: Host<Node = N> + ?Sized,
        F: FnMut(&mut Self, &mut H, PopperId, Update),
    {
        for &id in targets {
            let Some(update) = self.update(&mut *host, id) else {
                report.skipped += 1;
                continue;
            };
            match update {
                Update::Positioned(_) => report.updated += 1,
                Update::Unreachable => report.unreachable += 1,
                Update::Detached => report.detached += 1,
            }
            react(&mut *self, &mut *host, id, update);
        }
    }

    /// The host reports that `node` left the document. Every popper floating
    /// on it is destroyed; returns how many.
    pub fn node_removed<H>(&mut self, host: &mut H, node: N) -> usize
    where
        H: Host<Node = N> + ?Sized,
    {
        let doomed: SmallVec<[PopperId; 4]> = self
            .slots()
            .filter(|(_, popper)| popper.node() == node)
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.destroy(host, id);
        }
        doomed.len()
    }

    /// Every occupied slot, registered in `live` or not.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "PopperId uses 32-bit indices by design."
    )]
    fn slots(&self) -> impl Iterator<Item = (PopperId, &Popper<N>)> + '_ {
        self.poppers.iter().enumerate().filter_map(|(idx, slot)| {
            let popper = slot.as_ref()?;
            Some((PopperId::new(idx as u32, self.generations[idx]), popper))
        })
    }

    /// Returns `true` if `id` refers to a live popper.
    pub fn contains(&self, id: PopperId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1)
            && self.poppers.get(id.idx()).is_some_and(Option::is_some)
    }

    /// The popper behind `id`, if it is still live.
    pub fn get(&self, id: PopperId) -> Option<&Popper<N>> {
        if !self.contains(id) {
            return None;
        }
        self.poppers.get(id.idx())?.as_ref()
    }

    /// Live poppers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PopperId, &Popper<N>)> + '_ {
        self.live
            .iter()
            .filter_map(|&id| self.get(id).map(|popper| (id, popper)))
    }

    /// Number of live poppers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no popper is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Whether the window listener is attached.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Number of scroll containers currently listened to.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Poppers registered under the scroll `container`.
    pub fn overflow_of(&self, container: N) -> &[PopperId] {
        self.overflow.get(&container).map_or(&[], |ids| ids.as_slice())
    }
}
