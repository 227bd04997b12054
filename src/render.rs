//! Render model: a read-only description of what the canvas should draw.
//!
//! The host draws the scene however it likes (SVG, DOM, Canvas2D). This module
//! only resolves everything the drawing needs from engine state: node flags,
//! connection endpoints and stroke styling, the selected connection's delete
//! handle, arrowheads, and the live preview line of a pending connection. It
//! never mutates state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use crate::camera::{Point, Viewport};
use crate::connection::Connection;
use crate::consts::SELECTED_CONNECTION_COLOR;
use crate::doc::Diagram;
use crate::geometry::Rect;
use crate::input::{InputState, UiState};
use crate::node::Node;

/// Arrowhead length in document units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// A node plus the interaction flags that affect its appearance.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<'a> {
    pub node: &'a Node,
    /// Text to display: the edit draft while editing, otherwise the node text.
    pub text: &'a str,
    pub selected: bool,
    pub dragging: bool,
    pub editing: bool,
    /// Source of the pending connection.
    pub connection_source: bool,
    /// Whether the corner resize handles are shown.
    pub show_handles: bool,
}

/// A connection resolved to drawable geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionView<'a> {
    pub connection: &'a Connection,
    pub from: Point,
    pub to: Point,
    pub stroke: &'a str,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
    pub selected: bool,
    /// Delete handle position, present only while selected.
    pub delete_handle: Option<Point>,
    /// Arrowhead triangle at the `to` end: tip, then the two barbs.
    pub arrow: [Point; 3],
}

/// Everything to draw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView<'a> {
    pub zoom: f64,
    pub pan: Point,
    /// Connections, drawn first (beneath nodes).
    pub connections: Vec<ConnectionView<'a>>,
    /// Nodes in draw order.
    pub nodes: Vec<NodeView<'a>>,
    /// Pending connection preview from the source center to the pointer.
    pub preview: Option<(Point, Point)>,
}

/// Build the scene for the current state.
#[must_use]
pub fn build_scene<'a>(
    diagram: &'a Diagram,
    viewport: &Viewport,
    ui: &'a UiState,
    input: &InputState,
) -> SceneView<'a> {
    let connections = diagram
        .connections
        .iter()
        .filter_map(|conn| {
            let (from, to) = diagram.endpoints(conn)?;
            let target = diagram.nodes.get(&conn.to)?.rect();
            let selected = ui.selection.connection() == Some(&conn.id);
            Some(ConnectionView {
                connection: conn,
                from,
                to,
                stroke: if selected { SELECTED_CONNECTION_COLOR } else { conn.color.as_str() },
                width: if selected { conn.width + 1.0 } else { conn.width },
                dash: conn.style.dash_pattern(),
                selected,
                delete_handle: if selected { diagram.midpoint(conn) } else { None },
                arrow: arrowhead(from, &target),
            })
        })
        .collect();

    let nodes = diagram
        .nodes
        .iter()
        .map(|node| {
            let editing = ui.is_editing(&node.id);
            let selected = ui.selection.node() == Some(&node.id);
            let dragging = matches!(input, InputState::DraggingNode { id, .. } if id == &node.id);
            let text = match &ui.edit {
                Some(edit) if editing => edit.draft.as_str(),
                _ => node.text.as_str(),
            };
            NodeView {
                node,
                text,
                selected,
                dragging,
                editing,
                connection_source: ui.pending.as_ref().is_some_and(|p| p.from == node.id),
                show_handles: selected && !dragging && !editing,
            }
        })
        .collect();

    let preview = ui.pending.as_ref().and_then(|pending| {
        let source = diagram.nodes.get(&pending.from)?;
        Some((source.center(), pending.preview?))
    });

    SceneView { zoom: viewport.zoom, pan: viewport.pan, connections, nodes, preview }
}

/// Arrowhead for a line from `from` into `target`, tipped on the target's border.
fn arrowhead(from: Point, target: &Rect) -> [Point; 3] {
    let tip = border_point(target, from);
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let barb = |offset: f64| {
        Point::new(tip.x - ARROW_SIZE * (angle + offset).cos(), tip.y - ARROW_SIZE * (angle + offset).sin())
    };
    [tip, barb(ARROW_ANGLE), barb(-ARROW_ANGLE)]
}

/// Where the segment from `rect`'s center toward `toward` crosses the rect border.
fn border_point(rect: &Rect, toward: Point) -> Point {
    let c = rect.center();
    let dx = toward.x - c.x;
    let dy = toward.y - c.y;
    if dx == 0.0 && dy == 0.0 {
        return c;
    }
    let sx = if dx == 0.0 { f64::INFINITY } else { (rect.width / 2.0) / dx.abs() };
    let sy = if dy == 0.0 { f64::INFINITY } else { (rect.height / 2.0) / dy.abs() };
    let t = sx.min(sy).min(1.0);
    Point::new(c.x + dx * t, c.y + dy * t)
}
