#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn diagram_with(n: usize) -> (Diagram, Vec<NodeId>) {
    let mut diagram = Diagram::new();
    let ids = (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64 * 200.0;
            diagram.nodes.create_node(Point::new(x, 100.0), None).id
        })
        .collect();
    (diagram, ids)
}

fn style() -> ConnectionStyle {
    ConnectionStyle::default()
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn fresh_diagram_has_only_root() {
    let diagram = Diagram::new();
    assert_eq!(diagram.nodes.len(), 1);
    let root = diagram.nodes.root().unwrap();
    assert_eq!(root.id, NodeId::root());
    assert_eq!((root.x, root.y), (400.0, 300.0));
    assert!(diagram.connections.is_empty());
}

// =============================================================
// delete_node cascade
// =============================================================

#[test]
fn delete_node_cascades_incident_connections() {
    let (mut diagram, ids) = diagram_with(3);
    let root = NodeId::root();
    diagram.connect(&root, &ids[0], &style()).unwrap();
    diagram.connect(&ids[1], &ids[0], &style()).unwrap();
    diagram.connect(&ids[1], &ids[2], &style()).unwrap();

    let removed = diagram.delete_node(&ids[0]).unwrap();
    assert_eq!(removed.node.id, ids[0]);
    assert_eq!(removed.connections.len(), 2);
    assert!(diagram.connections.iter().all(|c| c.from != ids[0] && c.to != ids[0]));
    assert_eq!(diagram.connections.len(), 1);
}

#[test]
fn delete_root_is_ignored_and_keeps_connections() {
    let (mut diagram, ids) = diagram_with(1);
    diagram.connect(&NodeId::root(), &ids[0], &style()).unwrap();
    assert!(diagram.delete_node(&NodeId::root()).is_none());
    assert_eq!(diagram.nodes.len(), 2);
    assert_eq!(diagram.connections.len(), 1);
}

#[test]
fn delete_unknown_node_is_ignored() {
    let (mut diagram, _) = diagram_with(1);
    let before = diagram.clone();
    assert!(diagram.delete_node(&NodeId::from("ghost")).is_none());
    assert_eq!(diagram, before);
}

// =============================================================
// connect
// =============================================================

#[test]
fn connect_then_reverse_keeps_one_from_root() {
    let (mut diagram, ids) = diagram_with(1);
    diagram.connect(&NodeId::root(), &ids[0], &style()).unwrap();
    assert!(diagram.connect(&ids[0], &NodeId::root(), &style()).is_none());
    assert_eq!(diagram.connections.len(), 1);
    assert_eq!(diagram.connections.as_slice()[0].from, NodeId::root());
}

#[test]
fn connect_requires_existing_endpoints() {
    let mut diagram = Diagram::new();
    assert!(diagram.connect(&NodeId::root(), &NodeId::from("ghost"), &style()).is_none());
    assert!(diagram.connections.is_empty());
}

// =============================================================
// load / reset
// =============================================================

#[test]
fn load_drops_dangling_connections() {
    let (source, ids) = diagram_with(2);
    let keep = Connection::new(ids[0].clone(), ids[1].clone(), &style());
    let dangling = Connection::new(ids[0].clone(), NodeId::from("gone"), &style());
    let mut diagram = Diagram::new();
    diagram.load(source.nodes.as_slice().to_vec(), vec![keep.clone(), dangling]);
    assert_eq!(diagram.nodes.len(), 3);
    assert_eq!(diagram.connections.as_slice(), &[keep]);
}

#[test]
fn reset_returns_to_single_root() {
    let (mut diagram, ids) = diagram_with(2);
    diagram.connect(&ids[0], &ids[1], &style()).unwrap();
    diagram.reset();
    assert_eq!(diagram, Diagram::default());
}

// =============================================================
// DiagramSnapshot
// =============================================================

#[test]
fn snapshot_captures_viewport() {
    let (diagram, _) = diagram_with(2);
    let viewport = Viewport { zoom: 1.5, pan: Point::new(10.0, -4.0), ..Default::default() };
    let snap = DiagramSnapshot::capture(&diagram, &viewport);
    assert_eq!(snap.node_count(), 3);
    assert_eq!(snap.zoom, 1.5);
    assert_eq!(snap.pan, Point::new(10.0, -4.0));
}

#[test]
fn snapshot_missing_fields_get_defaults() {
    let json = r##"{"nodes":[{"id":"root","x":400,"y":300,"width":200,"height":60,"text":"Idea Principal","color":"#00A651","textColor":"#FFFFFF","fontSize":16,"isRoot":true}]}"##;
    let snap: DiagramSnapshot = serde_json::from_str(json).unwrap();
    assert_eq!(snap.zoom, 1.0);
    assert_eq!(snap.pan, Point::default());
    assert!(snap.connections.is_empty());
    assert_eq!(snap.nodes[0], Node::root());
}

#[test]
fn default_snapshot_is_root_only_identity() {
    let snap = DiagramSnapshot::default();
    assert_eq!(snap.nodes, vec![Node::root()]);
    assert_eq!(snap.zoom, 1.0);
}

// =============================================================
// Connection geometry
// =============================================================

#[test]
fn endpoints_are_node_centers() {
    let (mut diagram, ids) = diagram_with(1);
    let conn = diagram.connect(&NodeId::root(), &ids[0], &style()).unwrap();
    let (a, b) = diagram.endpoints(&conn).unwrap();
    assert_eq!(a, Point::new(500.0, 330.0));
    assert_eq!(b, Point::new(0.0, 100.0));
    assert_eq!(diagram.midpoint(&conn).unwrap(), Point::new(250.0, 215.0));
}

#[test]
fn endpoints_missing_node_is_none() {
    let diagram = Diagram::new();
    let conn = Connection::new(NodeId::root(), NodeId::from("ghost"), &style());
    assert!(diagram.endpoints(&conn).is_none());
}
