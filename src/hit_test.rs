use super::*;
use crate::connection::ConnectionStyle;
use crate::input::{EditSession, Selection};

// =============================================================
// Helpers
// =============================================================

/// Root spans (400..600, 300..360); `a` spans (25..175, 70..130).
fn setup() -> (Diagram, NodeId, ConnectionId) {
    let mut diagram = Diagram::new();
    let a = diagram.nodes.create_node(Point::new(100.0, 100.0), None).id;
    let conn = diagram.connect(&NodeId::root(), &a, &ConnectionStyle::default()).unwrap();
    (diagram, a, conn.id)
}

fn ui_with(selection: Selection) -> UiState {
    UiState { selection, ..Default::default() }
}

fn hit(pt: Point, diagram: &Diagram, ui: &UiState) -> Option<Hit> {
    hit_test(pt, diagram, &Viewport::default(), ui)
}

// =============================================================
// Nodes
// =============================================================

#[test]
fn background_is_none() {
    let (diagram, _, _) = setup();
    assert_eq!(hit(Point::new(900.0, 900.0), &diagram, &UiState::default()), None);
}

#[test]
fn node_body_hit() {
    let (diagram, a, _) = setup();
    assert_eq!(hit(Point::new(100.0, 100.0), &diagram, &UiState::default()), Some(Hit::Node(a)));
    assert_eq!(hit(Point::new(500.0, 330.0), &diagram, &UiState::default()), Some(Hit::Node(NodeId::root())));
}

#[test]
fn topmost_node_wins_overlap() {
    let (mut diagram, a, _) = setup();
    let b = diagram.nodes.create_node(Point::new(150.0, 100.0), None).id;
    assert_eq!(hit(Point::new(130.0, 100.0), &diagram, &UiState::default()), Some(Hit::Node(b)));
    assert_eq!(hit(Point::new(50.0, 100.0), &diagram, &UiState::default()), Some(Hit::Node(a)));
}

// =============================================================
// Resize handles
// =============================================================

#[test]
fn handles_only_on_selected_node() {
    let (diagram, a, _) = setup();
    let corner = Point::new(25.0, 70.0);
    assert_eq!(hit(corner, &diagram, &UiState::default()), Some(Hit::Node(a.clone())));
    let ui = ui_with(Selection::Node(a.clone()));
    assert_eq!(hit(corner, &diagram, &ui), Some(Hit::ResizeHandle { node: a, handle: ResizeHandle::TopLeft }));
}

#[test]
fn handle_slop_reaches_outside_the_box() {
    let (diagram, a, _) = setup();
    let ui = ui_with(Selection::Node(a.clone()));
    assert_eq!(
        hit(Point::new(180.0, 135.0), &diagram, &ui),
        Some(Hit::ResizeHandle { node: a, handle: ResizeHandle::BottomRight })
    );
}

#[test]
fn handle_slop_shrinks_in_document_space_when_zoomed_in() {
    let (diagram, a, _) = setup();
    let ui = ui_with(Selection::Node(a.clone()));
    let zoomed = Viewport { zoom: 2.0, ..Default::default() };
    // 6 units away: inside 8px at zoom 1, outside 4 units at zoom 2.
    let pt = Point::new(181.0, 130.0);
    assert!(matches!(hit_test(pt, &diagram, &Viewport::default(), &ui), Some(Hit::ResizeHandle { .. })));
    assert_eq!(hit_test(pt, &diagram, &zoomed, &ui), None);
}

#[test]
fn no_handles_while_editing() {
    let (diagram, a, _) = setup();
    let ui = UiState {
        selection: Selection::Node(a.clone()),
        edit: Some(EditSession { node: a.clone(), draft: String::new() }),
        ..Default::default()
    };
    assert_eq!(hit(Point::new(25.0, 70.0), &diagram, &ui), Some(Hit::Node(a)));
}

// =============================================================
// Connections
// =============================================================

#[test]
fn connection_line_hit_near_stroke() {
    let (diagram, _, conn) = setup();
    // Point on the segment (500,330)->(100,100) at t = 0.5, nudged 2 units.
    assert_eq!(hit(Point::new(300.0, 217.0), &diagram, &UiState::default()), Some(Hit::Connection(conn)));
}

#[test]
fn connection_line_miss_far_from_stroke() {
    let (diagram, _, _) = setup();
    assert_eq!(hit(Point::new(300.0, 260.0), &diagram, &UiState::default()), None);
}

#[test]
fn delete_handle_only_when_connection_selected() {
    let (diagram, _, conn) = setup();
    let mid = Point::new(300.0, 215.0);
    assert_eq!(hit(mid, &diagram, &UiState::default()), Some(Hit::Connection(conn.clone())));
    let ui = ui_with(Selection::Connection(conn.clone()));
    assert_eq!(hit(mid, &diagram, &ui), Some(Hit::DeleteHandle(conn)));
}

#[test]
fn nodes_sit_above_connection_lines() {
    let (diagram, a, _) = setup();
    // (150, 130) is on node `a` and near the line's `a` end.
    assert_eq!(hit(Point::new(150.0, 120.0), &diagram, &UiState::default()), Some(Hit::Node(a)));
}

#[test]
fn latest_connection_wins_where_lines_cross() {
    let (mut diagram, _, first) = setup();
    let b = diagram.nodes.create_node(Point::new(300.0, -100.0), None).id;
    let c = diagram.nodes.create_node(Point::new(300.0, 500.0), None).id;
    let second = diagram.connect(&b, &c, &ConnectionStyle::default()).unwrap();
    // (300, 215) lies on both the root-`a` line and the vertical `b`-`c` line.
    assert_eq!(hit(Point::new(300.0, 215.0), &diagram, &UiState::default()), Some(Hit::Connection(second.id.clone())));
    assert_ne!(second.id, first);
}
