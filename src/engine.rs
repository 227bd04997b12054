//! Interaction engine: turns pointer, keyboard, and toolbar input into diagram mutations.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the diagram, the viewport, and all transient interaction
//! state. Every handler runs synchronously and returns the [`Action`]s the
//! host needs to react to (redraw, pointer capture, persistence). The host
//! must hold pointer capture between `CapturePointer` and `ReleasePointer`;
//! every path that ends a drag or resize (pointer-up, cancel, tool switch,
//! deleting the node, clear-all, teardown) emits `ReleasePointer`.
//!
//! `revision` increases whenever persisted state changes (nodes,
//! connections, zoom, pan), so an observer can schedule autosaves without
//! diffing snapshots.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::camera::{Point, Viewport};
use crate::color::contrast_text_color;
use crate::connection::{Connection, ConnectionId, ConnectionPatch, ConnectionStyle};
use crate::consts::ZOOM_STEP;
use crate::doc::{Diagram, DiagramSnapshot};
use crate::geometry::Size;
use crate::hit::{Hit, hit_test};
use crate::input::{Button, EditSession, InputState, Key, PendingConnection, Selection, Tool, UiState, WheelDelta};
use crate::node::{Node, NodeId, NodePatch, clean_text};
use crate::render::{SceneView, build_scene};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NodeCreated(Node),
    NodeUpdated { id: NodeId, fields: NodePatch },
    NodeDeleted { id: NodeId },
    ConnectionCreated(Connection),
    ConnectionUpdated { id: ConnectionId, fields: ConnectionPatch },
    ConnectionDeleted { id: ConnectionId },
    SelectionChanged(Selection),
    /// Show the in-place text editor for a node, seeded with `text`.
    EditStarted { id: NodeId, text: String },
    /// Hide the text editor. `committed` is false when the draft was discarded.
    EditEnded { id: NodeId, committed: bool },
    /// Route all pointer events to the canvas until `ReleasePointer`.
    CapturePointer,
    ReleasePointer,
    ViewportChanged { zoom: f64, pan: Point },
    RenderNeeded,
}

/// Core engine state. Free of any host bindings so it can be driven directly from tests.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub diagram: Diagram,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    /// Styling copied onto new connections.
    pub connection_style: ConnectionStyle,
    revision: u64,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine showing `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: DiagramSnapshot) -> Self {
        let mut core = Self::new();
        core.load_snapshot(snapshot);
        core
    }

    // --- Data inputs ---

    /// Replace the diagram and viewport with a persisted snapshot.
    ///
    /// A snapshot without nodes leaves the current diagram in place.
    pub fn load_snapshot(&mut self, snapshot: DiagramSnapshot) -> Vec<Action> {
        let mut out = self.reset_transient();
        if !snapshot.nodes.is_empty() {
            self.diagram.load(snapshot.nodes, snapshot.connections);
        }
        self.viewport.restore(snapshot.zoom, snapshot.pan);
        self.touch();
        out.push(self.viewport_changed());
        out.push(Action::RenderNeeded);
        out
    }

    /// Current persisted state.
    #[must_use]
    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot::capture(&self.diagram, &self.viewport)
    }

    /// Update where the canvas sits on screen and how large it is.
    pub fn set_canvas_rect(&mut self, origin: Point, width: f64, height: f64) {
        self.viewport.origin = origin;
        self.viewport.width = width;
        self.viewport.height = height;
    }

    // --- Tool ---

    /// Switch tools. Drops selection, pending connection, edit draft, and any gesture.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut out = self.reset_transient();
        self.ui.tool = tool;
        out.push(Action::RenderNeeded);
        out
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut out = Vec::new();
        out.extend(self.end_gesture());

        let world = self.viewport.screen_to_document(screen_pt);
        let hit = hit_test(world, &self.diagram, &self.viewport, &self.ui);

        if let Some(editing) = self.ui.edit.as_ref().map(|e| e.node.clone()) {
            match &hit {
                Some(Hit::Node(id)) if *id == editing => return out,
                None => out.extend(self.cancel_edit()),
                Some(_) => out.extend(self.blur_edit()),
            }
        }

        match hit {
            Some(Hit::DeleteHandle(id)) => out.extend(self.delete_connection(&id)),
            Some(Hit::ResizeHandle { node, handle }) => {
                if let Some(n) = self.diagram.nodes.get(&node) {
                    self.input = InputState::ResizingNode { id: node, handle, start_world: world, start_rect: n.rect() };
                    out.push(Action::CapturePointer);
                }
            }
            Some(Hit::Node(id)) => {
                if self.ui.tool == Tool::Connection {
                    out.extend(self.pick_for_connection(id));
                } else {
                    out.extend(self.press_node(id, world));
                }
            }
            Some(Hit::Connection(id)) => {
                if self.ui.tool == Tool::Select {
                    out.extend(self.set_selection(Selection::Connection(id)));
                }
            }
            None => out.extend(self.press_background(world)),
        }
        out.push(Action::RenderNeeded);
        out
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_document(screen_pt);
        match self.input.clone() {
            InputState::DraggingNode { id, grab } => {
                let patch = NodePatch::position(world.x - grab.x, world.y - grab.y);
                if !self.diagram.nodes.update_node(&id, &patch) {
                    return Vec::new();
                }
                self.touch();
                vec![Action::NodeUpdated { id, fields: patch }, Action::RenderNeeded]
            }
            InputState::ResizingNode { id, handle, start_world, start_rect } => {
                let dx = world.x - start_world.x;
                let dy = world.y - start_world.y;
                let resized = self.diagram.nodes.resize(
                    &id,
                    handle,
                    dx,
                    dy,
                    Size::new(start_rect.width, start_rect.height),
                    Point::new(start_rect.x, start_rect.y),
                );
                let Some(rect) = resized else {
                    return Vec::new();
                };
                self.touch();
                vec![Action::NodeUpdated { id, fields: NodePatch::geometry(rect) }, Action::RenderNeeded]
            }
            InputState::Idle => match &mut self.ui.pending {
                Some(pending) => {
                    pending.preview = Some(world);
                    vec![Action::RenderNeeded]
                }
                None => Vec::new(),
            },
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button) -> Vec<Action> {
        self.end_gesture().into_iter().chain([Action::RenderNeeded]).collect()
    }

    /// The host lost the pointer (capture lost, window blur).
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture().into_iter().collect()
    }

    /// Double click: open the text editor on a node.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if !self.ui.tool.can_drag() {
            return Vec::new();
        }
        let world = self.viewport.screen_to_document(screen_pt);
        match hit_test(world, &self.diagram, &self.viewport, &self.ui) {
            Some(Hit::Node(id)) => self.start_edit(&id),
            _ => Vec::new(),
        }
    }

    /// One wheel notch zooms by a fixed step around the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let step = if delta.dy > 0.0 {
            -ZOOM_STEP
        } else if delta.dy < 0.0 {
            ZOOM_STEP
        } else {
            return Vec::new();
        };
        let pivot = self.viewport.screen_to_local(screen_pt);
        let changed = self.viewport.zoom_by(step, pivot);
        self.after_viewport_change(changed)
    }

    pub fn on_key_down(&mut self, key: Key) -> Vec<Action> {
        if self.ui.edit.is_some() {
            if key.is_enter() {
                return self.commit_edit();
            }
            if key.is_escape() {
                return self.cancel_edit();
            }
            return Vec::new();
        }
        if key.is_escape() && self.ui.pending.take().is_some() {
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    // --- Text editing ---

    /// Open the in-place editor on `id`. Clears the selection.
    pub fn start_edit(&mut self, id: &NodeId) -> Vec<Action> {
        let Some(node) = self.diagram.nodes.get(id) else {
            return Vec::new();
        };
        let text = node.text.clone();
        let mut out: Vec<Action> = self.end_gesture().into_iter().collect();
        if self.ui.edit.is_some() {
            out.extend(self.blur_edit());
        }
        out.extend(self.set_selection(Selection::None));
        self.ui.edit = Some(EditSession { node: id.clone(), draft: text.clone() });
        out.push(Action::EditStarted { id: id.clone(), text });
        out.push(Action::RenderNeeded);
        out
    }

    /// Replace the draft with what the user has typed so far.
    pub fn edit_input(&mut self, draft: &str) -> Vec<Action> {
        match &mut self.ui.edit {
            Some(edit) => {
                draft.clone_into(&mut edit.draft);
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// `Enter`: commit the draft. A blank draft is refused and the editor stays open.
    pub fn commit_edit(&mut self) -> Vec<Action> {
        let blank = self.ui.edit.as_ref().is_some_and(|e| clean_text(&e.draft).is_none());
        if blank {
            debug!("blank node text refused, editor stays open");
            return Vec::new();
        }
        self.finish_edit(true)
    }

    /// Focus left the editor: commit the draft, or keep the old text if it is blank.
    pub fn blur_edit(&mut self) -> Vec<Action> {
        self.finish_edit(true)
    }

    /// `Escape`: discard the draft.
    pub fn cancel_edit(&mut self) -> Vec<Action> {
        self.finish_edit(false)
    }

    fn finish_edit(&mut self, commit: bool) -> Vec<Action> {
        let Some(edit) = self.ui.edit.take() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let committed = commit && self.apply_draft(&edit, &mut out);
        out.push(Action::EditEnded { id: edit.node, committed });
        out.push(Action::RenderNeeded);
        out
    }

    /// Write the draft into the node. Blank drafts keep the old text.
    fn apply_draft(&mut self, edit: &EditSession, out: &mut Vec<Action>) -> bool {
        let Some(text) = clean_text(&edit.draft) else {
            debug!(id = %edit.node, "blank draft dropped, keeping previous text");
            return false;
        };
        let Some(node) = self.diagram.nodes.get(&edit.node) else {
            return false;
        };
        if node.text == text {
            return true;
        }
        self.diagram.nodes.set_text(&edit.node, &text);
        self.touch();
        out.push(Action::NodeUpdated { id: edit.node.clone(), fields: NodePatch::text(text) });
        true
    }

    // --- Viewport ---

    /// Zoom by `delta` around the viewport center.
    pub fn zoom_by(&mut self, delta: f64) -> Vec<Action> {
        let pivot = self.viewport.center();
        let changed = self.viewport.zoom_by(delta, pivot);
        self.after_viewport_change(changed)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let changed = self.viewport.zoom_in();
        self.after_viewport_change(changed)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let changed = self.viewport.zoom_out();
        self.after_viewport_change(changed)
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        let before = (self.viewport.zoom, self.viewport.pan);
        self.viewport.reset();
        let changed = before != (self.viewport.zoom, self.viewport.pan);
        self.after_viewport_change(changed)
    }

    // --- Store operations (toolbar and host) ---

    /// Merge `patch` into a node.
    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> Vec<Action> {
        if !self.diagram.nodes.update_node(id, &patch) {
            return Vec::new();
        }
        self.touch();
        vec![Action::NodeUpdated { id: id.clone(), fields: patch }, Action::RenderNeeded]
    }

    /// Recolor a node, optionally picking a readable text color for the new fill.
    pub fn recolor_node(&mut self, id: &NodeId, color: &str, auto_contrast: bool) -> Vec<Action> {
        let patch = NodePatch {
            color: Some(color.to_owned()),
            text_color: auto_contrast.then(|| contrast_text_color(color).to_owned()),
            ..Default::default()
        };
        self.update_node(id, patch)
    }

    /// Delete a node and its connections. The root node cannot be deleted.
    pub fn delete_node(&mut self, id: &NodeId) -> Vec<Action> {
        let Some(removed) = self.diagram.delete_node(id) else {
            return Vec::new();
        };
        self.touch();
        let mut out = Vec::new();
        if self.input.node() == Some(id) {
            out.extend(self.end_gesture());
        }
        if self.ui.is_editing(id) {
            self.ui.edit = None;
            out.push(Action::EditEnded { id: id.clone(), committed: false });
        }
        if self.ui.pending.as_ref().is_some_and(|p| &p.from == id) {
            self.ui.pending = None;
        }
        let selection_gone = match &self.ui.selection {
            Selection::Node(sel) => sel == id,
            Selection::Connection(sel) => removed.connections.contains(sel),
            Selection::None => false,
        };
        if selection_gone {
            out.extend(self.set_selection(Selection::None));
        }
        out.extend(removed.connections.into_iter().map(|cid| Action::ConnectionDeleted { id: cid }));
        out.push(Action::NodeDeleted { id: removed.node.id });
        out.push(Action::RenderNeeded);
        out
    }

    /// Connect two nodes with the current default style.
    pub fn create_connection(&mut self, from: &NodeId, to: &NodeId) -> Vec<Action> {
        let Some(conn) = self.diagram.connect(from, to, &self.connection_style) else {
            return Vec::new();
        };
        self.touch();
        vec![Action::ConnectionCreated(conn), Action::RenderNeeded]
    }

    pub fn delete_connection(&mut self, id: &ConnectionId) -> Vec<Action> {
        if self.diagram.connections.delete(id).is_none() {
            return Vec::new();
        }
        self.touch();
        let mut out = Vec::new();
        if self.ui.selection.connection() == Some(id) {
            out.extend(self.set_selection(Selection::None));
        }
        out.push(Action::ConnectionDeleted { id: id.clone() });
        out.push(Action::RenderNeeded);
        out
    }

    pub fn update_connection(&mut self, id: &ConnectionId, patch: ConnectionPatch) -> Vec<Action> {
        if !self.diagram.connections.update(id, &patch) {
            return Vec::new();
        }
        self.touch();
        vec![Action::ConnectionUpdated { id: id.clone(), fields: patch }, Action::RenderNeeded]
    }

    /// Change the styling copied onto connections created from now on.
    pub fn set_connection_style(&mut self, style: ConnectionStyle) {
        self.connection_style = style;
    }

    /// Reset to the single-root diagram. Needs explicit user confirmation.
    pub fn clear_all(&mut self, confirmed: bool) -> Vec<Action> {
        if !confirmed {
            return Vec::new();
        }
        let mut out = self.reset_transient();
        self.diagram.reset();
        self.touch();
        out.push(Action::RenderNeeded);
        out
    }

    /// Release everything held by the engine before it is dropped.
    pub fn teardown(&mut self) -> Vec<Action> {
        self.reset_transient()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.ui.selection
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.diagram.nodes.get(id)
    }

    #[must_use]
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.diagram.connections.get(id)
    }

    /// Counter bumped on every change to persisted state.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn scene(&self) -> SceneView<'_> {
        build_scene(&self.diagram, &self.viewport, &self.ui, &self.input)
    }

    // --- Internals ---

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn viewport_changed(&self) -> Action {
        Action::ViewportChanged { zoom: self.viewport.zoom, pan: self.viewport.pan }
    }

    fn after_viewport_change(&mut self, changed: bool) -> Vec<Action> {
        if !changed {
            return Vec::new();
        }
        self.touch();
        vec![self.viewport_changed(), Action::RenderNeeded]
    }

    /// Leave any drag or resize, releasing pointer capture.
    fn end_gesture(&mut self) -> Option<Action> {
        if self.input.is_idle() {
            return None;
        }
        self.input = InputState::Idle;
        Some(Action::ReleasePointer)
    }

    /// Drop gesture, edit draft, pending connection, and selection.
    fn reset_transient(&mut self) -> Vec<Action> {
        let mut out: Vec<Action> = self.end_gesture().into_iter().collect();
        out.extend(self.cancel_edit());
        self.ui.pending = None;
        out.extend(self.set_selection(Selection::None));
        out
    }

    fn set_selection(&mut self, selection: Selection) -> Option<Action> {
        if self.ui.selection == selection {
            return None;
        }
        self.ui.selection = selection.clone();
        Some(Action::SelectionChanged(selection))
    }

    fn press_node(&mut self, id: NodeId, world: Point) -> Vec<Action> {
        let Some(node) = self.diagram.nodes.get(&id) else {
            return Vec::new();
        };
        let grab = Point::new(world.x - node.x, world.y - node.y);
        let mut out: Vec<Action> = self.set_selection(Selection::Node(id.clone())).into_iter().collect();
        if self.ui.tool.can_drag() {
            self.input = InputState::DraggingNode { id, grab };
            out.push(Action::CapturePointer);
        }
        out
    }

    fn pick_for_connection(&mut self, id: NodeId) -> Vec<Action> {
        match self.ui.pending.take() {
            None => {
                self.ui.pending = Some(PendingConnection { from: id, preview: None });
                Vec::new()
            }
            Some(pending) if pending.from == id => {
                self.ui.pending = Some(pending);
                Vec::new()
            }
            Some(pending) => self.create_connection(&pending.from, &id),
        }
    }

    fn press_background(&mut self, world: Point) -> Vec<Action> {
        self.ui.pending = None;
        let mut out: Vec<Action> = self.set_selection(Selection::None).into_iter().collect();
        if self.ui.tool == Tool::Node {
            let node = self.diagram.nodes.create_node(world, None);
            self.touch();
            out.push(Action::NodeCreated(node));
        }
        out
    }
}
