//! Store behaviour as seen through the panel buttons and canvas callbacks.

// Test target links the whole lib dependency set.
#![allow(unused_crate_dependencies)]

use flow_canvas::components::flow::{
	Connection, EdgeChange, FlowStore, Node, NodeChange, XYPosition, apply_node_changes,
};
use flow_canvas::parse_flow_data;

fn connect(store: &mut FlowStore, source: &str, target: &str) -> String {
	store.connect(Connection {
		source: source.into(),
		target: target.into(),
	})
}

fn node_ids(store: &FlowStore) -> Vec<&str> {
	store.nodes().iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn add_node_appends_one_with_fresh_id() {
	let mut store = FlowStore::demo();
	for round in 0..5 {
		let before: Vec<String> = store.nodes().iter().map(|n| n.id.clone()).collect();
		let id = store.add_node(|| 0.25);
		assert_eq!(store.nodes().len(), before.len() + 1, "round {}", round);
		assert!(!before.contains(&id));
		assert_eq!(store.nodes().last().map(|n| n.position), Some(XYPosition::new(125.0, 125.0)));
		if round % 2 == 0 {
			store.delete_node(&id);
		}
	}
}

#[test]
fn delete_node_cascades_to_its_edges() {
	let mut store = FlowStore::demo();
	connect(&mut store, "1", "2");
	connect(&mut store, "2", "3");
	store.delete_node("2");
	assert_eq!(node_ids(&store), ["1", "3"]);
	assert!(store.edges().is_empty());
}

#[test]
fn delete_node_leaves_unrelated_edges() {
	let mut store = FlowStore::demo();
	connect(&mut store, "1", "2");
	let kept = connect(&mut store, "1", "3");
	store.delete_node("2");
	assert_eq!(store.edges().len(), 1);
	assert_eq!(store.edges()[0].id, kept);
}

#[test]
fn delete_edge_touches_only_that_edge() {
	let mut store = FlowStore::demo();
	let first = connect(&mut store, "1", "2");
	connect(&mut store, "2", "3");
	store.delete_edge(&first);
	assert_eq!(store.edges().len(), 1);
	assert_eq!(store.edges()[0].source, "2");
	assert_eq!(node_ids(&store), ["1", "2", "3"]);

	store.delete_edge("missing");
	assert_eq!(store.edges().len(), 1);
}

#[test]
fn repeated_connection_is_not_deduplicated() {
	let mut store = FlowStore::demo();
	let a = connect(&mut store, "1", "2");
	let b = connect(&mut store, "1", "2");
	assert_ne!(a, b);
	assert_eq!(store.edges().len(), 2);
	assert!(store.edges().iter().all(|e| e.source == "1" && e.target == "2"));
}

#[test]
fn delete_last_drains_then_no_ops() {
	let mut store = FlowStore::demo();
	connect(&mut store, "1", "3");
	for _ in 0..5 {
		store.delete_last();
	}
	assert!(store.nodes().is_empty());
	assert!(store.edges().is_empty());
	store.delete_node("1");
}

#[test]
fn canvas_remove_batch_mirrors_delete_key() {
	let mut store = FlowStore::demo();
	let edge = connect(&mut store, "1", "2");
	store.apply_node_changes(vec![NodeChange::Remove { id: "2".into() }]);
	store.apply_edge_changes(vec![EdgeChange::Remove { id: edge }]);
	assert_eq!(node_ids(&store), ["1", "3"]);
	assert!(store.edges().is_empty());
}

#[test]
fn seed_json_builds_a_store() {
	let json = r##"{
		"nodes": [
			{ "id": "a", "data": { "label": "Start" }, "position": { "x": 0, "y": 0 }, "type": "input" },
			{ "id": "b", "data": { "label": "End" }, "position": { "x": 100, "y": 200 } }
		],
		"edges": [
			{ "id": "ea-b", "source": "a", "target": "b", "label": "go" }
		]
	}"##;
	let mut store = FlowStore::from(parse_flow_data(json).unwrap());
	assert_eq!(node_ids(&store), ["a", "b"]);
	assert_eq!(store.edges()[0].label.as_deref(), Some("go"));
	assert_eq!(store.add_node(|| 0.0), "3");

	assert!(parse_flow_data("{ not json").is_err());
}

#[test]
fn seed_with_largest_numeric_id_still_adds_nodes() {
	let json = r#"{"nodes":[{"id":"18446744073709551615","data":{"label":"Last"},"position":{"x":0,"y":0}}]}"#;
	let mut store = FlowStore::from(parse_flow_data(json).unwrap());
	let id = store.add_node(|| 0.5);
	assert_eq!(id, "1");
	assert_eq!(node_ids(&store), ["18446744073709551615", "1"]);
}

#[test]
fn free_reducer_matches_store() {
	let mut nodes = FlowStore::demo().nodes().to_vec();
	let mut store = FlowStore::demo();
	let changes = vec![NodeChange::Add {
		item: Node::new("x", "X", XYPosition::default()),
		index: Some(0),
	}];
	apply_node_changes(changes.clone(), &mut nodes);
	store.apply_node_changes(changes);
	assert_eq!(nodes, store.nodes());
}
