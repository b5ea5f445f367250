// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document used by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};
use understory_placement::ViewportBounds;

use crate::host::{
    DataKey, EventSource, Geometry, ListenTarget, NodeTraits, NodeTree, Style, StyleSink,
};

#[derive(Clone, Debug)]
struct TestNode {
    parent: Option<u32>,
    rect: Rect,
    traits: NodeTraits,
    attached: bool,
    scroll: Vec2,
    margin: Vec2,
}

/// A flat node table rooted at a body node (id 0).
///
/// Rects are viewport relative. Every write is recorded so tests can assert
/// on it. A `Translate` write also moves the node, so later measurements see
/// the new position.
#[derive(Clone, Debug)]
pub(crate) struct TestHost {
    nodes: Vec<TestNode>,
    viewport: Size,
    document_scroll: Vec2,
    styles: Vec<(u32, Style)>,
    data: Vec<(u32, DataKey, String)>,
    pub(crate) listeners: Vec<ListenTarget<u32>>,
    pub(crate) watched: Vec<u32>,
    pub(crate) frames_requested: u32,
}

impl TestHost {
    pub(crate) fn new(viewport: Size) -> Self {
        let body = TestNode {
            parent: None,
            rect: Rect::from_origin_size((0.0, 0.0), viewport),
            traits: NodeTraits::empty(),
            attached: true,
            scroll: Vec2::ZERO,
            margin: Vec2::ZERO,
        };
        Self {
            nodes: alloc::vec![body],
            viewport,
            document_scroll: Vec2::ZERO,
            styles: Vec::new(),
            data: Vec::new(),
            listeners: Vec::new(),
            watched: Vec::new(),
            frames_requested: 0,
        }
    }

    pub(crate) fn root(&self) -> u32 {
        0
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Test documents stay tiny."
    )]
    pub(crate) fn add(&mut self, parent: u32, rect: Rect) -> u32 {
        self.nodes.push(TestNode {
            parent: Some(parent),
            rect,
            traits: NodeTraits::empty(),
            attached: true,
            scroll: Vec2::ZERO,
            margin: Vec2::ZERO,
        });
        (self.nodes.len() - 1) as u32
    }

    fn node_mut(&mut self, node: u32) -> &mut TestNode {
        &mut self.nodes[node as usize]
    }

    fn node(&self, node: u32) -> &TestNode {
        &self.nodes[node as usize]
    }

    pub(crate) fn set_traits(&mut self, node: u32, traits: NodeTraits) {
        self.node_mut(node).traits = traits;
    }

    pub(crate) fn set_rect(&mut self, node: u32, rect: Rect) {
        self.node_mut(node).rect = rect;
    }

    pub(crate) fn set_scroll(&mut self, node: u32, scroll: Vec2) {
        self.node_mut(node).scroll = scroll;
    }

    pub(crate) fn set_margin(&mut self, node: u32, margin: Vec2) {
        self.node_mut(node).margin = margin;
    }

    pub(crate) fn set_document_scroll(&mut self, scroll: Vec2) {
        self.document_scroll = scroll;
    }

    pub(crate) fn detach(&mut self, node: u32) {
        self.node_mut(node).attached = false;
    }

    pub(crate) fn styles_of(&self, node: u32) -> Vec<Style> {
        self.styles
            .iter()
            .filter(|(n, _)| *n == node)
            .map(|(_, s)| *s)
            .collect()
    }

    pub(crate) fn last_style(&self, node: u32) -> Option<Style> {
        self.styles
            .iter()
            .rev()
            .find(|(n, _)| *n == node)
            .map(|(_, s)| *s)
    }

    pub(crate) fn data(&self, node: u32, key: DataKey) -> Option<&str> {
        self.data
            .iter()
            .rev()
            .find(|(n, k, _)| *n == node && *k == key)
            .map(|(_, _, v)| v.as_str())
    }

    pub(crate) fn listener_count(&self, target: ListenTarget<u32>) -> usize {
        self.listeners.iter().filter(|t| **t == target).count()
    }
}

impl NodeTree for TestHost {
    type Node = u32;

    fn parent_of(&self, node: u32) -> Option<u32> {
        self.node(node).parent
    }

    fn is_root(&self, node: u32) -> bool {
        node == 0
    }

    fn traits_of(&self, node: u32) -> NodeTraits {
        self.node(node).traits
    }

    fn is_attached(&self, node: u32) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if !self.node(n).attached {
                return false;
            }
            current = self.node(n).parent;
        }
        true
    }
}

impl Geometry for TestHost {
    fn viewport_rect(&self, node: u32) -> ViewportBounds {
        ViewportBounds::from_rect(self.node(node).rect)
    }

    fn scroll_offset(&self, node: u32) -> Vec2 {
        self.node(node).scroll
    }

    fn document_scroll(&self) -> Vec2 {
        self.document_scroll
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn margin(&self, node: u32) -> Vec2 {
        self.node(node).margin
    }
}

impl StyleSink for TestHost {
    fn set_style(&mut self, node: u32, style: Style) {
        if let Style::Translate(offset) = style {
            let scroll = self.document_scroll;
            let rect = &mut self.node_mut(node).rect;
            *rect = rect.with_origin((offset - scroll).to_point());
        }
        self.styles.push((node, style));
    }

    fn set_data(&mut self, node: u32, key: DataKey, value: &str) {
        self.data.push((node, key, value.into()));
    }
}

impl EventSource for TestHost {
    fn listen(&mut self, target: ListenTarget<u32>) {
        self.listeners.push(target);
    }

    fn unlisten(&mut self, target: ListenTarget<u32>) {
        if let Some(i) = self.listeners.iter().position(|t| *t == target) {
            self.listeners.remove(i);
        }
    }

    fn watch_removal(&mut self, node: u32) {
        self.watched.push(node);
    }

    fn unwatch_removal(&mut self, node: u32) {
        self.watched.retain(|n| *n != node);
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }
}
