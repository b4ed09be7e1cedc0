//! The node and edge collections behind the demo, and the operations its
//! buttons and canvas callbacks perform on them.

use log::debug;

use super::changes::{self, EdgeChange, NodeChange};
use super::types::{
	Connection, Edge, EdgeStyle, FlowData, LabelBgStyle, LabelStyle, Node, NodeKind, XYPosition,
};

/// Added nodes land somewhere in `[0, SPAWN_EXTENT)` on both axes.
pub const SPAWN_EXTENT: f64 = 500.0;

/// Ordered node and edge collections. Order is display order.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	/// Next candidate for a numeric id. `None` once the counter is exhausted.
	next_id: Option<u64>,
}

impl Default for FlowStore {
	fn default() -> Self {
		Self::new(Vec::new(), Vec::new())
	}
}

impl From<FlowData> for FlowStore {
	fn from(data: FlowData) -> Self {
		Self::new(data.nodes, data.edges)
	}
}

impl FlowStore {
	/// Store over the given collections. New ids continue past the largest
	/// numeric node id.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let highest = nodes.iter().filter_map(|n| n.id.parse::<u64>().ok()).max().unwrap_or(0);
		let next_id = highest.max(nodes.len() as u64).checked_add(1);
		Self {
			nodes,
			edges,
			next_id,
		}
	}

	/// Three unconnected nodes, the first one an input.
	pub fn demo() -> Self {
		Self::new(
			vec![
				Node::new("1", "Node 1", XYPosition::new(0.0, 0.0)).with_kind(NodeKind::Input),
				Node::new("2", "Node 2", XYPosition::new(250.0, 250.0)),
				Node::new("3", "Node 3", XYPosition::new(500.0, 0.0)),
			],
			Vec::new(),
		)
	}

	/// Nodes in display order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in display order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn fresh_id(&mut self) -> String {
		while let Some(n) = self.next_id {
			self.next_id = n.checked_add(1);
			let id = n.to_string();
			if self.node(&id).is_none() {
				return id;
			}
		}
		// Counter ran past u64::MAX: reuse the smallest free number.
		let mut n: u64 = 1;
		loop {
			let id = n.to_string();
			if self.node(&id).is_none() {
				return id;
			}
			n += 1;
		}
	}

	/// Append a node with a fresh id at a position drawn from `random`,
	/// which must yield values in `[0, 1)`. Returns the new id.
	pub fn add_node(&mut self, mut random: impl FnMut() -> f64) -> String {
		let position = XYPosition::new(random() * SPAWN_EXTENT, random() * SPAWN_EXTENT);
		self.add_node_at(position)
	}

	/// Append a node with a fresh id at `position`. Returns the new id.
	pub fn add_node_at(&mut self, position: XYPosition) -> String {
		let id = self.fresh_id();
		debug!("flow: add node {} at ({:.1}, {:.1})", id, position.x, position.y);
		self.nodes
			.push(Node::new(id.clone(), format!("Node {}", id), position));
		id
	}

	/// Remove the node and every edge attached to it. Unknown ids are ignored.
	pub fn delete_node(&mut self, id: &str) {
		let before = (self.nodes.len(), self.edges.len());
		self.nodes.retain(|n| n.id != id);
		self.edges.retain(|e| !e.touches(id));
		debug!(
			"flow: delete node {} ({} node(s), {} edge(s) removed)",
			id,
			before.0 - self.nodes.len(),
			before.1 - self.edges.len()
		);
	}

	/// Delete the last node in display order, if any.
	pub fn delete_last(&mut self) {
		if let Some(id) = self.nodes.last().map(|n| n.id.clone()) {
			self.delete_node(&id);
		}
	}

	/// Remove one edge. Unknown ids are ignored.
	pub fn delete_edge(&mut self, id: &str) {
		self.edges.retain(|e| e.id != id);
		debug!("flow: delete edge {}", id);
	}

	/// Fold a canvas change batch into the nodes. See [`changes::apply_node_changes`].
	pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
		changes::apply_node_changes(changes, &mut self.nodes);
	}

	/// Fold a canvas change batch into the edges.
	pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
		changes::apply_edge_changes(changes, &mut self.edges);
	}

	/// Append a labelled, styled edge for `connection`. Repeated connections
	/// between the same nodes produce separate edges. Returns the edge id.
	pub fn connect(&mut self, connection: Connection) -> String {
		let edge = decorated_edge(connection);
		changes::add_edge(edge, &mut self.edges);
		let id = self.edges.last().map(|e| e.id.clone()).unwrap_or_default();
		debug!("flow: connect {}", id);
		id
	}
}

fn decorated_edge(connection: Connection) -> Edge {
	let Connection { source, target } = connection;
	let mut edge = Edge::new(changes::edge_id(&source, &target), source, target);
	edge.label = Some(format!("{} to {}", edge.source, edge.target));
	edge.label_style = Some(LabelStyle {
		fill: "#fff".into(),
		font_size: 12.0,
		font_weight: 500,
	});
	edge.label_bg_style = Some(LabelBgStyle {
		fill: "#1e1e1e".into(),
		fill_opacity: 0.7,
		rx: 4.0,
		ry: 4.0,
	});
	edge.style = Some(EdgeStyle {
		stroke: "#ec003f".into(),
		stroke_width: 2.0,
	});
	edge
}

#[cfg(test)]
mod tests {
	use super::*;

	fn connection(source: &str, target: &str) -> Connection {
		Connection {
			source: source.into(),
			target: target.into(),
		}
	}

	fn rand_simple(seed: &mut usize) -> f64 {
		*seed += 1;
		let x = (*seed * 9301 + 49297) % 233280;
		(x as f64) / 233280.0
	}

	#[test]
	fn demo_continues_numbering() {
		let mut store = FlowStore::demo();
		let mut seed = 0;
		let id = store.add_node(|| rand_simple(&mut seed));
		assert_eq!(id, "4");
		let node = store.node("4").unwrap();
		assert_eq!(node.label, "Node 4");
		assert!((0.0..SPAWN_EXTENT).contains(&node.position.x));
		assert!((0.0..SPAWN_EXTENT).contains(&node.position.y));
	}

	#[test]
	fn ids_stay_unique_after_deletes() {
		let mut store = FlowStore::demo();
		store.delete_node("2");
		let id = store.add_node_at(XYPosition::default());
		assert_ne!(id, "3");
		let mut ids: Vec<_> = store.nodes().iter().map(|n| n.id.as_str()).collect();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), store.nodes().len());
	}

	#[test]
	fn seeded_ids_are_skipped() {
		let mut store = FlowStore::new(vec![Node::new("7", "Seven", XYPosition::default())], Vec::new());
		assert_eq!(store.add_node_at(XYPosition::default()), "8");
	}

	#[test]
	fn seed_id_at_u64_max_does_not_overflow() {
		let mut store = FlowStore::new(
			vec![Node::new("18446744073709551614", "Almost", XYPosition::default())],
			Vec::new(),
		);
		assert_eq!(store.add_node_at(XYPosition::default()), "18446744073709551615");
		assert_eq!(store.add_node_at(XYPosition::default()), "1");
		assert_eq!(store.add_node_at(XYPosition::default()), "2");
		assert_eq!(store.nodes().len(), 4);
	}

	#[test]
	fn connect_decorates_edge() {
		let mut store = FlowStore::demo();
		let id = store.connect(connection("1", "2"));
		let edge = &store.edges()[0];
		assert_eq!(id, "e1-2");
		assert_eq!(edge.label.as_deref(), Some("1 to 2"));
		assert_eq!(edge.style.as_ref().map(|s| s.stroke.as_str()), Some("#ec003f"));
		assert_eq!(edge.label_bg_style.as_ref().map(|s| s.fill_opacity), Some(0.7));
	}

	#[test]
	fn self_loops_are_accepted() {
		let mut store = FlowStore::demo();
		store.connect(connection("2", "2"));
		assert_eq!(store.edges().len(), 1);
		store.delete_node("2");
		assert!(store.edges().is_empty());
	}

	#[test]
	fn delete_last_on_empty_store() {
		let mut store = FlowStore::default();
		store.delete_last();
		assert!(store.nodes().is_empty());

		let mut store = FlowStore::demo();
		store.delete_last();
		assert_eq!(store.nodes().last().map(|n| n.id.as_str()), Some("2"));
	}

	#[test]
	fn canvas_changes_reach_collections() {
		let mut store = FlowStore::demo();
		store.connect(connection("1", "3"));
		store.apply_node_changes(vec![NodeChange::Position {
			id: "3".into(),
			position: Some(XYPosition::new(1.0, 2.0)),
			dragging: false,
		}]);
		store.apply_edge_changes(vec![EdgeChange::Remove { id: "e1-3".into() }]);
		assert_eq!(store.node("3").map(|n| n.position), Some(XYPosition::new(1.0, 2.0)));
		assert!(store.edges().is_empty());
	}
}
