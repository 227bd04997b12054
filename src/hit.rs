#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Viewport};
use crate::connection::ConnectionId;
use crate::consts::{CONNECTION_HIT_SLOP_PX, DELETE_HANDLE_RADIUS, HANDLE_RADIUS_PX};
use crate::doc::Diagram;
use crate::geometry::{ResizeHandle, distance_to_segment};
use crate::input::UiState;
use crate::node::NodeId;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// The midpoint delete handle of the selected connection.
    DeleteHandle(ConnectionId),
    /// A corner handle of the selected node.
    ResizeHandle { node: NodeId, handle: ResizeHandle },
    /// The body of a node.
    Node(NodeId),
    /// The stroke of a connection line.
    Connection(ConnectionId),
}

/// Test what is under `world_pt`.
///
/// Handles of the current selection are checked first, then nodes from
/// topmost down, then connection lines, which are drawn beneath nodes.
/// `None` means the canvas background.
#[must_use]
pub fn hit_test(world_pt: Point, diagram: &Diagram, viewport: &Viewport, ui: &UiState) -> Option<Hit> {
    if let Some(id) = ui.selection.connection() {
        if let Some(mid) = diagram.connections.get(id).and_then(|c| diagram.midpoint(c)) {
            let radius = DELETE_HANDLE_RADIUS + viewport.screen_dist_to_document(CONNECTION_HIT_SLOP_PX);
            if world_pt.distance(mid) <= radius {
                return Some(Hit::DeleteHandle(id.clone()));
            }
        }
    }

    if let Some(id) = ui.selection.node() {
        if !ui.is_editing(id) {
            if let Some(node) = diagram.nodes.get(id) {
                let radius = viewport.screen_dist_to_document(HANDLE_RADIUS_PX);
                let rect = node.rect();
                if let Some(handle) = ResizeHandle::ALL.into_iter().find(|h| world_pt.distance(rect.corner(*h)) <= radius)
                {
                    return Some(Hit::ResizeHandle { node: id.clone(), handle });
                }
            }
        }
    }

    if let Some(node) = diagram.nodes.topmost_at(world_pt) {
        return Some(Hit::Node(node.id.clone()));
    }

    let slop = viewport.screen_dist_to_document(CONNECTION_HIT_SLOP_PX);
    diagram
        .connections
        .iter()
        .rev()
        .find(|c| {
            diagram
                .endpoints(c)
                .is_some_and(|(a, b)| distance_to_segment(world_pt, a, b) <= c.width / 2.0 + slop)
        })
        .map(|c| Hit::Connection(c.id.clone()))
}
