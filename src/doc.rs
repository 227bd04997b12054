//! Document model: the node and connection stores plus the rules that span them.
//!
//! `Diagram` owns both stores and is the only place that deletes nodes, so
//! incident connections are always removed in the same call. `DiagramSnapshot`
//! is the serializable form of a diagram together with its viewport, used by
//! the autosave record and by saved maps.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Point, Viewport};
use crate::connection::{Connection, ConnectionId, ConnectionStore, ConnectionStyle};
use crate::node::{Node, NodeId, NodeStore};

/// Nodes and connections of the working diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub nodes: NodeStore,
    pub connections: ConnectionStore,
}

impl Default for Diagram {
    fn default() -> Self {
        Self { nodes: NodeStore::with_root(), connections: ConnectionStore::new() }
    }
}

/// What a node deletion removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub node: Node,
    pub connections: Vec<ConnectionId>,
}

impl Diagram {
    /// A diagram holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete a node and every connection touching it.
    ///
    /// The root node and unknown ids are ignored.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Removed> {
        let node = self.nodes.remove(id)?;
        let connections = self.connections.remove_incident(id);
        Some(Removed { node, connections })
    }

    /// Connect two existing nodes. Unknown endpoints, self-links and
    /// already-linked pairs are rejected.
    pub fn connect(&mut self, from: &NodeId, to: &NodeId, style: &ConnectionStyle) -> Option<Connection> {
        if !self.nodes.contains(from) || !self.nodes.contains(to) {
            return None;
        }
        self.connections.create_connection(from, to, style)
    }

    /// Replace the whole diagram. Connections with missing endpoints are dropped.
    pub fn load(&mut self, nodes: Vec<Node>, connections: Vec<Connection>) {
        self.nodes.replace_all(nodes);
        self.connections.replace_all(connections);
        let nodes = &self.nodes;
        self.connections.retain_endpoints(|id| nodes.contains(id));
    }

    /// Back to the single-root diagram.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Line endpoints of a connection: the centers of its two nodes.
    #[must_use]
    pub fn endpoints(&self, conn: &Connection) -> Option<(Point, Point)> {
        let from = self.nodes.get(&conn.from)?;
        let to = self.nodes.get(&conn.to)?;
        Some((from.center(), to.center()))
    }

    /// Midpoint of a connection line, where its delete handle sits.
    #[must_use]
    pub fn midpoint(&self, conn: &Connection) -> Option<Point> {
        let (a, b) = self.endpoints(conn)?;
        Some(Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0))
    }
}

fn default_zoom() -> f64 {
    1.0
}

/// Serializable diagram plus viewport: `{ nodes, connections, zoom, pan }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub pan: Point,
}

impl Default for DiagramSnapshot {
    fn default() -> Self {
        Self::capture(&Diagram::default(), &Viewport::default())
    }
}

impl DiagramSnapshot {
    #[must_use]
    pub fn capture(diagram: &Diagram, viewport: &Viewport) -> Self {
        Self {
            nodes: diagram.nodes.as_slice().to_vec(),
            connections: diagram.connections.as_slice().to_vec(),
            zoom: viewport.zoom,
            pan: viewport.pan,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
