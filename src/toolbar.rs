//! Toolbar contract: the state the chrome renders and the commands it sends back.
//!
//! Presentational collaborators read a [`ToolbarState`] snapshot and send
//! [`ToolbarCommand`]s through [`dispatch`]. Undo and redo are part of the
//! contract but have no history behind them: availability is always `false`
//! and the triggers do nothing.

#[cfg(test)]
#[path = "toolbar_test.rs"]
mod toolbar_test;

use tracing::debug;

use crate::connection::{Connection, ConnectionId, ConnectionPatch, ConnectionStyle};
use crate::engine::{Action, EngineCore};
use crate::input::Tool;
use crate::node::{Node, NodeId, NodePatch};

/// What the toolbar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarState {
    pub tool: Tool,
    /// Zoom as a whole percentage.
    pub zoom_percent: i64,
    pub selected_node: Option<Node>,
    pub selected_connection: Option<Connection>,
    /// Styling applied to the next connection.
    pub connection_style: ConnectionStyle,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ToolbarState {
    #[must_use]
    pub fn from_engine(core: &EngineCore) -> Self {
        Self {
            tool: core.tool(),
            zoom_percent: core.viewport.zoom_percent(),
            selected_node: core.selection().node().and_then(|id| core.node(id)).cloned(),
            selected_connection: core.selection().connection().and_then(|id| core.connection(id)).cloned(),
            connection_style: core.connection_style.clone(),
            can_undo: false,
            can_redo: false,
        }
    }
}

/// A request from the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarCommand {
    SetTool(Tool),
    /// Zoom by a signed delta around the viewport center.
    ZoomBy(f64),
    ZoomIn,
    ZoomOut,
    ResetView,
    UpdateNode { id: NodeId, patch: NodePatch },
    /// Set a node's fill; with `auto_contrast` the text color follows it.
    RecolorNode { id: NodeId, color: String, auto_contrast: bool },
    DeleteNode(NodeId),
    UpdateConnection { id: ConnectionId, patch: ConnectionPatch },
    DeleteConnection(ConnectionId),
    SetConnectionStyle(ConnectionStyle),
    Undo,
    Redo,
    /// Wipe the diagram. `confirmed` carries the user's answer to the confirmation prompt.
    ClearAll { confirmed: bool },
}

/// Apply a toolbar command to the engine.
pub fn dispatch(core: &mut EngineCore, command: ToolbarCommand) -> Vec<Action> {
    match command {
        ToolbarCommand::SetTool(tool) => core.set_tool(tool),
        ToolbarCommand::ZoomBy(delta) => core.zoom_by(delta),
        ToolbarCommand::ZoomIn => core.zoom_in(),
        ToolbarCommand::ZoomOut => core.zoom_out(),
        ToolbarCommand::ResetView => core.reset_view(),
        ToolbarCommand::UpdateNode { id, patch } => core.update_node(&id, patch),
        ToolbarCommand::RecolorNode { id, color, auto_contrast } => core.recolor_node(&id, &color, auto_contrast),
        ToolbarCommand::DeleteNode(id) => core.delete_node(&id),
        ToolbarCommand::UpdateConnection { id, patch } => core.update_connection(&id, patch),
        ToolbarCommand::DeleteConnection(id) => core.delete_connection(&id),
        ToolbarCommand::SetConnectionStyle(style) => {
            core.set_connection_style(style);
            Vec::new()
        }
        inert @ (ToolbarCommand::Undo | ToolbarCommand::Redo) => {
            debug!(command = ?inert, "no edit history; ignoring");
            Vec::new()
        }
        ToolbarCommand::ClearAll { confirmed } => core.clear_all(confirmed),
    }
}
