#![allow(clippy::clone_on_copy)]

use super::*;

// --- Tool ---

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Connection).unwrap(), "\"connection\"");
    assert_eq!(serde_json::from_str::<Tool>("\"node\"").unwrap(), Tool::Node);
}

#[test]
fn drag_allowed_outside_connection_tool() {
    assert!(Tool::Select.can_drag());
    assert!(Tool::Node.can_drag());
    assert!(!Tool::Connection.can_drag());
}

// --- Key ---

#[test]
fn key_names() {
    assert!(Key("Enter".into()).is_enter());
    assert!(Key("Escape".into()).is_escape());
    assert!(!Key("a".into()).is_enter());
}

// --- Selection ---

#[test]
fn selection_default_is_none() {
    assert!(Selection::default().is_none());
}

#[test]
fn selection_node_accessors() {
    let sel = Selection::Node(NodeId::root());
    assert_eq!(sel.node(), Some(&NodeId::root()));
    assert!(sel.connection().is_none());
    assert!(!sel.is_none());
}

#[test]
fn selection_connection_accessors() {
    let sel = Selection::Connection(ConnectionId::from("c1"));
    assert_eq!(sel.connection(), Some(&ConnectionId::from("c1")));
    assert!(sel.node().is_none());
}

// --- UiState ---

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selection.is_none());
    assert!(ui.pending.is_none());
    assert!(ui.edit.is_none());
}

#[test]
fn is_editing_matches_only_edit_target() {
    let ui = UiState {
        edit: Some(EditSession { node: NodeId::root(), draft: "x".into() }),
        ..Default::default()
    };
    assert!(ui.is_editing(&NodeId::root()));
    assert!(!ui.is_editing(&NodeId::from("other")));
}

// --- InputState ---

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert!(state.node().is_none());
}

#[test]
fn input_state_reports_gesture_node() {
    let drag = InputState::DraggingNode { id: NodeId::from("a"), grab: Point::new(1.0, 2.0) };
    assert_eq!(drag.node(), Some(&NodeId::from("a")));

    let resize = InputState::ResizingNode {
        id: NodeId::from("b"),
        handle: ResizeHandle::TopRight,
        start_world: Point::new(0.0, 0.0),
        start_rect: Rect::new(0.0, 0.0, 100.0, 50.0),
    };
    assert_eq!(resize.node(), Some(&NodeId::from("b")));
    assert!(!resize.is_idle());
}
