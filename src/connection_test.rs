#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn store_with(pairs: &[(&str, &str)]) -> ConnectionStore {
    let mut store = ConnectionStore::new();
    for (a, b) in pairs {
        store.create_connection(&id(a), &id(b), &ConnectionStyle::default()).unwrap();
    }
    store
}

// =============================================================
// Style types
// =============================================================

#[test]
fn default_style_matches_editor_defaults() {
    let style = ConnectionStyle::default();
    assert_eq!(style.color, "#666");
    assert_eq!(style.width, 2.0);
    assert_eq!(style.style, LineStyle::Solid);
}

#[test]
fn line_style_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&LineStyle::Dashed).unwrap(), "\"dashed\"");
    assert_eq!(serde_json::from_str::<LineStyle>("\"dotted\"").unwrap(), LineStyle::Dotted);
}

#[test]
fn dash_patterns() {
    assert_eq!(LineStyle::Solid.dash_pattern(), None);
    assert_eq!(LineStyle::Dashed.dash_pattern(), Some([5.0, 5.0]));
    assert_eq!(LineStyle::Dotted.dash_pattern(), Some([2.0, 2.0]));
}

// =============================================================
// create_connection
// =============================================================

#[test]
fn create_copies_current_style() {
    let mut store = ConnectionStore::new();
    let style = ConnectionStyle { color: "#FF3B30".into(), width: 4.0, style: LineStyle::Dotted };
    let conn = store.create_connection(&id("root"), &id("a"), &style).unwrap();
    assert_eq!(conn.color, "#FF3B30");
    assert_eq!(conn.width, 4.0);
    assert_eq!(conn.style, LineStyle::Dotted);
    assert!(!conn.animated);
    assert_eq!(store.len(), 1);
}

#[test]
fn create_rejects_self_connection() {
    let mut store = ConnectionStore::new();
    assert!(store.create_connection(&id("a"), &id("a"), &ConnectionStyle::default()).is_none());
    assert!(store.is_empty());
}

#[test]
fn create_rejects_same_direction_duplicate() {
    let mut store = store_with(&[("a", "b")]);
    assert!(store.create_connection(&id("a"), &id("b"), &ConnectionStyle::default()).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn reverse_pair_is_a_duplicate_and_first_direction_wins() {
    let mut store = store_with(&[("root", "a")]);
    assert!(store.create_connection(&id("a"), &id("root"), &ConnectionStyle::default()).is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(store.as_slice()[0].from, id("root"));
    assert_eq!(store.as_slice()[0].to, id("a"));
}

#[test]
fn generated_connection_ids_are_unique() {
    let store = store_with(&[("a", "b"), ("a", "c"), ("b", "c")]);
    let ids: std::collections::HashSet<_> = store.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn iter_walks_creation_order_both_ways() {
    let store = store_with(&[("a", "b"), ("b", "c"), ("c", "d")]);
    let forward: Vec<&str> = store.iter().map(|c| c.to.as_str()).collect();
    let backward: Vec<&str> = store.iter().rev().map(|c| c.to.as_str()).collect();
    assert_eq!(forward, ["b", "c", "d"]);
    assert_eq!(backward, ["d", "c", "b"]);
}

// =============================================================
// delete / update
// =============================================================

#[test]
fn delete_removes_by_id() {
    let mut store = store_with(&[("a", "b"), ("b", "c")]);
    let target = store.as_slice()[0].id.clone();
    assert_eq!(store.delete(&target).unwrap().id, target);
    assert!(store.get(&target).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_unknown_is_none() {
    let mut store = store_with(&[("a", "b")]);
    assert!(store.delete(&ConnectionId::from("nope")).is_none());
}

#[test]
fn update_merges_style() {
    let mut store = store_with(&[("a", "b")]);
    let target = store.as_slice()[0].id.clone();
    let patch = ConnectionPatch { style: Some(LineStyle::Dashed), animated: Some(true), ..Default::default() };
    assert!(store.update(&target, &patch));
    let conn = store.get(&target).unwrap();
    assert_eq!(conn.style, LineStyle::Dashed);
    assert!(conn.animated);
    assert_eq!(conn.color, "#666");
}

#[test]
fn update_unknown_is_false() {
    let mut store = store_with(&[("a", "b")]);
    assert!(!store.update(&ConnectionId::from("x"), &ConnectionPatch::default()));
}

// =============================================================
// Cascade
// =============================================================

#[test]
fn remove_incident_drops_both_directions() {
    let mut store = store_with(&[("a", "b"), ("c", "a"), ("b", "c")]);
    let removed = store.remove_incident(&id("a"));
    assert_eq!(removed.len(), 2);
    assert!(store.iter().all(|c| c.from != id("a") && c.to != id("a")));
    assert_eq!(store.len(), 1);
}

#[test]
fn retain_endpoints_drops_dangling() {
    let mut store = store_with(&[("a", "b"), ("b", "ghost")]);
    store.retain_endpoints(|n| n.as_str() != "ghost");
    assert_eq!(store.len(), 1);
}

#[test]
fn replace_all_filters_invalid_entries() {
    let style = ConnectionStyle::default();
    let conns = vec![
        Connection::new(id("a"), id("b"), &style),
        Connection::new(id("b"), id("a"), &style),
        Connection::new(id("c"), id("c"), &style),
    ];
    let mut store = ConnectionStore::new();
    store.replace_all(conns);
    assert_eq!(store.len(), 1);
}

#[test]
fn connection_without_optional_fields_deserializes() {
    let json = r##"{"id":"conn-1","from":"root","to":"n1","color":"#666","width":2}"##;
    let conn: Connection = serde_json::from_str(json).unwrap();
    assert_eq!(conn.style, LineStyle::Solid);
    assert!(!conn.animated);
}
