//! Input model: tools, modifier keys, mouse buttons, selection, and the gesture state machine.
//!
//! `Tool` captures the user's intent at the time of a pointer event. `UiState` holds the interaction state that outlives a single
//! press: the active tool, the selection, a pending connection, and an
//! in-place text edit. `InputState` is the gesture tracked between
//! pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::connection::ConnectionId;
use crate::geometry::{Rect, ResizeHandle};
use crate::node::NodeId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select, move, resize, and edit (default).
    #[default]
    Select,
    /// Click the background to add a node.
    Node,
    /// Click two nodes to connect them.
    Connection,
}

impl Tool {
    /// Whether pressing a node in this tool can start a drag.
    #[must_use]
    pub fn can_drag(self) -> bool {
        matches!(self, Self::Select | Self::Node)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Enter"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The current selection: one node, one connection, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Connection(ConnectionId),
}

impl Selection {
    #[must_use]
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn connection(&self) -> Option<&ConnectionId> {
        match self {
            Self::Connection(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A connection waiting for its target node.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    /// Source node picked by the first click.
    pub from: NodeId,
    /// Last pointer position in document space, for the preview line.
    pub preview: Option<Point>,
}

/// An in-place text edit on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub node: NodeId,
    /// Uncommitted text as typed so far.
    pub draft: String,
}

/// Interaction state visible to the renderer and toolbar.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    pub selection: Selection,
    /// Armed connection, if the connection tool has picked a source.
    pub pending: Option<PendingConnection>,
    /// Node text being edited, if any.
    pub edit: Option<EditSession>,
}

impl UiState {
    /// Whether `id` is the node currently being edited.
    #[must_use]
    pub fn is_editing(&self, id: &NodeId) -> bool {
        self.edit.as_ref().is_some_and(|e| &e.node == id)
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to recompute
/// geometry on every pointer move. The host holds pointer capture for as long
/// as the state is not `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a node.
    DraggingNode {
        /// Id of the node being dragged.
        id: NodeId,
        /// Pointer position minus the node's top-left at press time, in document space.
        grab: Point,
    },
    /// The user is resizing a node by one of its corner handles.
    ResizingNode {
        /// Id of the node being resized.
        id: NodeId,
        /// Which corner is being dragged.
        handle: ResizeHandle,
        /// Document-space pointer position at the start of the resize.
        start_world: Point,
        /// Node geometry at the start of the resize.
        start_rect: Rect,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The node targeted by the active gesture.
    #[must_use]
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Idle => None,
            Self::DraggingNode { id, .. } | Self::ResizingNode { id, .. } => Some(id),
        }
    }
}
