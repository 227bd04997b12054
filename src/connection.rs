//! Connection model and store.
//!
//! Connections are stored with a direction (`from` → `to`), which only
//! affects how the arrowhead is drawn. Uniqueness is checked on the
//! unordered pair: once `a → b` exists, neither `a → b` nor `b → a` can be
//! added again. Self-connections are rejected.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::consts::{DASHED_PATTERN, DEFAULT_CONNECTION_COLOR, DEFAULT_CONNECTION_WIDTH, DOTTED_PATTERN};
use crate::node::NodeId;

/// Stable, immutable connection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// A fresh collision-free id for a new connection.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("conn-{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Stroke pattern of a connection line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Dash/gap lengths for the renderer; `None` for a continuous stroke.
    #[must_use]
    pub fn dash_pattern(self) -> Option<[f64; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(DASHED_PATTERN),
            Self::Dotted => Some(DOTTED_PATTERN),
        }
    }
}

/// Styling copied onto every newly created connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStyle {
    pub color: String,
    pub width: f64,
    pub style: LineStyle,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self { color: DEFAULT_CONNECTION_COLOR.to_owned(), width: DEFAULT_CONNECTION_WIDTH, style: LineStyle::Solid }
    }
}

/// A directed, styled edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    pub color: String,
    pub width: f64,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default)]
    pub animated: bool,
}

impl Connection {
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, style: &ConnectionStyle) -> Self {
        Self {
            id: ConnectionId::generate(),
            from,
            to,
            color: style.color.clone(),
            width: style.width,
            style: style.style,
            animated: false,
        }
    }

    /// Whether this connection joins `a` and `b` in either direction.
    #[must_use]
    pub fn links(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// Whether either endpoint is `node`.
    #[must_use]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.from == node || &self.to == node
    }

    fn apply(&mut self, patch: &ConnectionPatch) {
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(animated) = patch.animated {
            self.animated = animated;
        }
    }
}

/// Sparse style update for a connection. Endpoints cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
}

/// Ordered collection of connections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every connection, dropping self-links and duplicate pairs.
    pub fn replace_all(&mut self, connections: Vec<Connection>) {
        self.connections.clear();
        for conn in connections {
            if self.accepts(&conn.from, &conn.to) {
                self.connections.push(conn);
            } else {
                debug!(id = %conn.id, "dropping invalid restored connection");
            }
        }
    }

    /// Whether a new `from` → `to` connection would be allowed.
    #[must_use]
    pub fn accepts(&self, from: &NodeId, to: &NodeId) -> bool {
        from != to && self.linking(from, to).is_none()
    }

    /// Add `from` → `to` styled with `style`.
    ///
    /// Returns `None` for a self-connection or when the pair is already linked.
    pub fn create_connection(&mut self, from: &NodeId, to: &NodeId, style: &ConnectionStyle) -> Option<Connection> {
        if !self.accepts(from, to) {
            debug!(%from, %to, "rejecting self or duplicate connection");
            return None;
        }
        let conn = Connection::new(from.clone(), to.clone(), style);
        self.connections.push(conn.clone());
        Some(conn)
    }

    pub fn delete(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Merge `patch` into the connection. Returns `false` if the id is unknown.
    pub fn update(&mut self, id: &ConnectionId, patch: &ConnectionPatch) -> bool {
        let Some(conn) = self.connections.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        conn.apply(patch);
        true
    }

    /// Remove every connection incident to `node` and return their ids.
    pub fn remove_incident(&mut self, node: &NodeId) -> Vec<ConnectionId> {
        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.touches(node) {
                removed.push(c.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Drop connections whose endpoints fail `exists`.
    pub fn retain_endpoints(&mut self, exists: impl Fn(&NodeId) -> bool) {
        self.connections.retain(|c| exists(&c.from) && exists(&c.to));
    }

    /// The connection joining `a` and `b`, in either direction.
    #[must_use]
    pub fn linking(&self, a: &NodeId, b: &NodeId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.links(a, b))
    }

    #[must_use]
    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Connection] {
        &self.connections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
