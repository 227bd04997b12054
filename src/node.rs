//! Node model and store.
//!
//! A node is a positioned, sized, styled box carrying a line of text. The
//! store keeps nodes in insertion order, which is also the draw order: later
//! nodes render above earlier ones and win hit tests.
//!
//! The root node (id `"root"`) is never removed by the store. Sizes never go
//! below the minimums in [`crate::consts`], and text is never blank.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{
    DEFAULT_NODE_COLOR, DEFAULT_NODE_FONT_SIZE, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_TEXT, DEFAULT_NODE_TEXT_COLOR,
    DEFAULT_NODE_WIDTH, MIN_NODE_HEIGHT, MIN_NODE_WIDTH, ROOT_COLOR, ROOT_FONT_SIZE, ROOT_HEIGHT, ROOT_ID, ROOT_TEXT,
    ROOT_WIDTH, ROOT_X, ROOT_Y,
};
use crate::geometry::{Rect, ResizeHandle, Size, resize_rect};

/// Stable, immutable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// The id of the root node.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_ID.to_owned())
    }

    /// A fresh collision-free id for a new node.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("node-{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A mind-map node as stored in memory and in persisted snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    /// Left edge in document coordinates.
    pub x: f64,
    /// Top edge in document coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    /// Fill color as a CSS color string.
    pub color: String,
    pub text_color: String,
    pub font_size: f64,
    #[serde(default)]
    pub is_root: bool,
}

impl Node {
    /// The root node every fresh diagram starts with.
    #[must_use]
    pub fn root() -> Self {
        Self {
            id: NodeId::root(),
            x: ROOT_X,
            y: ROOT_Y,
            width: ROOT_WIDTH,
            height: ROOT_HEIGHT,
            text: ROOT_TEXT.to_owned(),
            color: ROOT_COLOR.to_owned(),
            text_color: DEFAULT_NODE_TEXT_COLOR.to_owned(),
            font_size: ROOT_FONT_SIZE,
            is_root: true,
        }
    }

    /// A default-styled node whose visual center is `center`.
    #[must_use]
    pub fn centered_at(id: NodeId, center: Point, text: &str) -> Self {
        Self {
            id,
            x: center.x - DEFAULT_NODE_WIDTH / 2.0,
            y: center.y - DEFAULT_NODE_HEIGHT / 2.0,
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            text: text.to_owned(),
            color: DEFAULT_NODE_COLOR.to_owned(),
            text_color: DEFAULT_NODE_TEXT_COLOR.to_owned(),
            font_size: DEFAULT_NODE_FONT_SIZE,
            is_root: false,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn apply(&mut self, patch: &NodePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width.max(MIN_NODE_WIDTH);
        }
        if let Some(height) = patch.height {
            self.height = height.max(MIN_NODE_HEIGHT);
        }
        if let Some(text) = patch.text.as_deref().and_then(clean_text) {
            self.text = text;
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(text_color) = &patch.text_color {
            self.text_color.clone_from(text_color);
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
    }
}

/// Sparse update for a node. Only present fields are applied.
///
/// `id` and `isRoot` are immutable and have no patch field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Trimmed before applying; blank text is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl NodePatch {
    /// Patch covering a node's full geometry.
    #[must_use]
    pub fn geometry(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }
}

/// Trim `raw`; `None` when nothing is left.
#[must_use]
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

/// Ordered collection of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the root node.
    #[must_use]
    pub fn with_root() -> Self {
        Self { nodes: vec![Node::root()] }
    }

    /// Replace every node, e.g. when restoring a snapshot.
    pub fn replace_all(&mut self, nodes: Vec<Node>) {
        self.nodes.clear();
        for node in nodes {
            self.insert(node);
        }
    }

    /// Insert a node, replacing any existing node with the same id in place.
    pub fn insert(&mut self, node: Node) {
        if let Some(existing) = self.get_mut(&node.id) {
            *existing = node;
        } else {
            self.nodes.push(node);
        }
    }

    /// Create a default-styled node centered on `center` and return it.
    ///
    /// Blank or missing text falls back to the default label.
    pub fn create_node(&mut self, center: Point, text: Option<&str>) -> Node {
        let text = text.and_then(clean_text).unwrap_or_else(|| DEFAULT_NODE_TEXT.to_owned());
        let node = Node::centered_at(NodeId::generate(), center, &text);
        self.nodes.push(node.clone());
        node
    }

    /// Merge `patch` into the node. Returns `false` if the id is unknown.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.apply(patch);
        true
    }

    /// Remove a node. The root node is never removed.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        if id.is_root() {
            debug!(%id, "ignoring root node removal");
            return None;
        }
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        Some(self.nodes.remove(index))
    }

    /// Resize from `handle` by a document-space delta measured from the
    /// gesture start. Returns the new geometry.
    pub fn resize(
        &mut self,
        id: &NodeId,
        handle: ResizeHandle,
        dx: f64,
        dy: f64,
        start_size: Size,
        start_pos: Point,
    ) -> Option<Rect> {
        let node = self.get_mut(id)?;
        let rect = resize_rect(handle, Rect::from_parts(start_pos, start_size), dx, dy);
        node.x = rect.x;
        node.y = rect.y;
        node.width = rect.width;
        node.height = rect.height;
        Some(rect)
    }

    /// Set trimmed text. Blank input is rejected and the old text kept.
    pub fn set_text(&mut self, id: &NodeId, text: &str) -> bool {
        let Some(clean) = clean_text(text) else {
            debug!(%id, "rejecting blank node text");
            return false;
        };
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.text = clean;
        true
    }

    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root)
    }

    /// Topmost node whose box contains `pt`.
    #[must_use]
    pub fn topmost_at(&self, pt: Point) -> Option<&Node> {
        self.nodes.iter().rev().find(|n| n.rect().contains(pt))
    }

    /// Nodes in draw order.
    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
