// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tooltip and a dropdown kept in place while a page scrolls.
//!
//! This example shows how to:
//! - implement the popper host traits over a tiny in-memory document,
//! - register poppers in a `PopperSet`,
//! - feed scroll signals and flush them once per frame.
//!
//! Run:
//! - `cargo run -p understory_demos --example popper_basics`

use std::collections::HashMap;

use kurbo::{Rect, Size, Vec2};
use understory_placement::{Placement, Position, Request, ViewportBounds};
use understory_popper::{
    DataKey, EventSource, Geometry, ListenTarget, NodeTraits, NodeTree, PopperConfig, PopperSet,
    Signal, Style, StyleSink, Update,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeKey(u32);

struct Element {
    name: &'static str,
    parent: Option<NodeKey>,
    rect: Rect,
    traits: NodeTraits,
    scroll: Vec2,
}

/// Document state plus the CSS we would have written.
#[derive(Default)]
struct Document {
    elements: HashMap<NodeKey, Element>,
    next: u32,
    viewport: Size,
    scroll: Vec2,
    css: HashMap<NodeKey, Vec<(&'static str, String)>>,
    frame_requested: bool,
}

impl Document {
    fn new(viewport: Size) -> Self {
        let mut doc = Self {
            viewport,
            ..Self::default()
        };
        doc.insert("body", None, Rect::from_origin_size((0.0, 0.0), viewport));
        doc
    }

    fn body(&self) -> NodeKey {
        NodeKey(0)
    }

    fn insert(&mut self, name: &'static str, parent: Option<NodeKey>, rect: Rect) -> NodeKey {
        let key = NodeKey(self.next);
        self.next += 1;
        self.elements.insert(
            key,
            Element {
                name,
                parent,
                rect,
                traits: NodeTraits::empty(),
                scroll: Vec2::ZERO,
            },
        );
        key
    }

    fn element(&self, node: NodeKey) -> &Element {
        &self.elements[&node]
    }

    /// Scroll the page: every element moves up in the viewport.
    fn scroll_page(&mut self, dy: f64) {
        self.scroll.y += dy;
        for element in self.elements.values_mut() {
            if element.parent.is_some() && !element.traits.contains(NodeTraits::FIXED) {
                element.rect = element.rect - Vec2::new(0.0, dy);
            }
        }
    }
}

impl NodeTree for Document {
    type Node = NodeKey;

    fn parent_of(&self, node: NodeKey) -> Option<NodeKey> {
        self.element(node).parent
    }

    fn is_root(&self, node: NodeKey) -> bool {
        node == self.body()
    }

    fn traits_of(&self, node: NodeKey) -> NodeTraits {
        self.element(node).traits
    }

    fn is_attached(&self, node: NodeKey) -> bool {
        self.elements.contains_key(&node)
    }
}

impl Geometry for Document {
    fn viewport_rect(&self, node: NodeKey) -> ViewportBounds {
        ViewportBounds::from_rect(self.element(node).rect)
    }

    fn scroll_offset(&self, node: NodeKey) -> Vec2 {
        self.element(node).scroll
    }

    fn document_scroll(&self) -> Vec2 {
        self.scroll
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn margin(&self, _: NodeKey) -> Vec2 {
        Vec2::ZERO
    }
}

impl StyleSink for Document {
    fn set_style(&mut self, node: NodeKey, style: Style) {
        if let Style::Translate(offset) = style {
            let scroll = self.scroll;
            if let Some(element) = self.elements.get_mut(&node) {
                element.rect = element.rect.with_origin((offset - scroll).to_point());
            }
        }
        self.css
            .entry(node)
            .or_default()
            .extend(style.declarations());
    }

    fn set_data(&mut self, node: NodeKey, key: DataKey, value: &str) {
        println!(
            "  {}[{}=\"{value}\"]",
            self.element(node).name,
            key.attribute()
        );
    }
}

impl EventSource for Document {
    fn listen(&mut self, target: ListenTarget<NodeKey>) {
        println!("listen {target:?}");
    }

    fn unlisten(&mut self, target: ListenTarget<NodeKey>) {
        println!("unlisten {target:?}");
    }

    fn watch_removal(&mut self, node: NodeKey) {
        println!("watching {} for removal", self.element(node).name);
    }

    fn unwatch_removal(&mut self, node: NodeKey) {
        println!("no longer watching {node:?}");
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}

fn main() {
    let mut doc = Document::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let button = doc.insert("button", Some(body), Rect::new(20.0, 20.0, 140.0, 52.0));
    let tooltip = doc.insert("tooltip", Some(body), Rect::new(0.0, 0.0, 160.0, 40.0));
    let select = doc.insert("select", Some(body), Rect::new(600.0, 500.0, 780.0, 530.0));
    let menu = doc.insert("menu", Some(body), Rect::new(0.0, 0.0, 180.0, 200.0));

    let mut poppers = PopperSet::new();

    // Asked to sit above a button at the top of the page: flips below.
    let tooltip_id = poppers
        .open(
            &mut doc,
            tooltip,
            PopperConfig::new(button)
                .with_placement(Placement::Top)
                .with_spacing(8.0),
        )
        .expect("reference is set");

    // Let the solver choose for a select near the bottom right corner.
    let menu_id = poppers
        .open(
            &mut doc,
            menu,
            PopperConfig::new(select)
                .with_placement(Request::Auto)
                .with_position(Position::End)
                .with_spacing(4.0),
        )
        .expect("reference is set");

    for id in [tooltip_id, menu_id] {
        let popper = poppers.get(id).expect("just opened");
        println!(
            "{} -> {:?}",
            doc.element(popper.node()).name,
            doc.css.get(&popper.node())
        );
    }

    // A burst of scroll events costs a single frame.
    for _ in 0..5 {
        doc.scroll_page(10.0);
        poppers.notify(&mut doc, Signal::Scroll);
    }
    assert!(doc.frame_requested);
    doc.frame_requested = false;

    let report = poppers.flush(&mut doc, |_, _, _, update| {
        if let Update::Positioned(layout) = update {
            println!(
                "frame: {} {} at {:?}",
                layout.placement, layout.position, layout.offset
            );
        } else {
            println!("frame: {update:?}");
        }
    });
    println!("{report:?}");

    poppers.destroy(&mut doc, tooltip_id);
    poppers.destroy(&mut doc, menu_id);
    println!("{poppers:?}");
}
