//! Change descriptors emitted by the canvas and the reducer that folds them
//! into the node and edge collections.

use std::collections::HashMap;

use super::types::{Dimensions, Edge, Node, XYPosition};

/// An incremental update to the node collection.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// Drag progress. `position: None` only updates the dragging flag.
	Position {
		/// Target node.
		id: String,
		/// New top-left corner, if it moved.
		position: Option<XYPosition>,
		/// Whether the drag is still in progress.
		dragging: bool,
	},
	/// Size measured by the canvas.
	Dimensions {
		/// Target node.
		id: String,
		/// Measured size.
		dimensions: Dimensions,
	},
	/// Selection toggle.
	Select {
		/// Target node.
		id: String,
		/// New selection state.
		selected: bool,
	},
	/// Drop the node. Attached edges are left alone.
	Remove {
		/// Target node.
		id: String,
	},
	/// Insert `item` at `index`, or append when `None`.
	Add {
		/// Node to insert.
		item: Node,
		/// Insertion index, clamped to the collection length.
		index: Option<usize>,
	},
	/// Swap the node for `item`.
	Replace {
		/// Target node.
		id: String,
		/// Replacement.
		item: Node,
	},
}

/// An incremental update to the edge collection.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	/// Selection toggle.
	Select {
		/// Target edge.
		id: String,
		/// New selection state.
		selected: bool,
	},
	/// Drop the edge.
	Remove {
		/// Target edge.
		id: String,
	},
	/// Insert `item` at `index`, or append when `None`.
	Add {
		/// Edge to insert.
		item: Edge,
		/// Insertion index, clamped to the collection length.
		index: Option<usize>,
	},
	/// Swap the edge for `item`.
	Replace {
		/// Target edge.
		id: String,
		/// Replacement.
		item: Edge,
	},
}

/// Element of a flow collection that changes can address.
trait Identified {
	fn id(&self) -> &str;
}

impl Identified for Node {
	fn id(&self) -> &str {
		&self.id
	}
}

impl Identified for Edge {
	fn id(&self) -> &str {
		&self.id
	}
}

/// How a single change affects its target element.
enum Outcome<T> {
	Keep,
	Remove,
	Replace(T),
}

/// Common shape of node and edge changes.
trait Change: Sized {
	type Item: Identified;

	/// Target id, or `None` for additions.
	fn target(&self) -> Option<&str>;

	/// Split an addition into its item and insertion index.
	fn into_addition(self) -> Result<(Self::Item, Option<usize>), Self>;

	fn apply(self, item: &mut Self::Item) -> Outcome<Self::Item>;
}

impl Change for NodeChange {
	type Item = Node;

	fn target(&self) -> Option<&str> {
		match self {
			NodeChange::Position { id, .. }
			| NodeChange::Dimensions { id, .. }
			| NodeChange::Select { id, .. }
			| NodeChange::Remove { id }
			| NodeChange::Replace { id, .. } => Some(id),
			NodeChange::Add { .. } => None,
		}
	}

	fn into_addition(self) -> Result<(Node, Option<usize>), Self> {
		match self {
			NodeChange::Add { item, index } => Ok((item, index)),
			other => Err(other),
		}
	}

	fn apply(self, node: &mut Node) -> Outcome<Node> {
		match self {
			NodeChange::Position {
				position, dragging, ..
			} => {
				if let Some(position) = position {
					node.position = position;
				}
				node.dragging = dragging;
			}
			NodeChange::Dimensions { dimensions, .. } => node.measured = Some(dimensions),
			NodeChange::Select { selected, .. } => node.selected = selected,
			NodeChange::Remove { .. } => return Outcome::Remove,
			NodeChange::Replace { item, .. } => return Outcome::Replace(item),
			NodeChange::Add { .. } => {}
		}
		Outcome::Keep
	}
}

impl Change for EdgeChange {
	type Item = Edge;

	fn target(&self) -> Option<&str> {
		match self {
			EdgeChange::Select { id, .. } | EdgeChange::Remove { id } | EdgeChange::Replace { id, .. } => {
				Some(id)
			}
			EdgeChange::Add { .. } => None,
		}
	}

	fn into_addition(self) -> Result<(Edge, Option<usize>), Self> {
		match self {
			EdgeChange::Add { item, index } => Ok((item, index)),
			other => Err(other),
		}
	}

	fn apply(self, edge: &mut Edge) -> Outcome<Edge> {
		match self {
			EdgeChange::Select { selected, .. } => edge.selected = selected,
			EdgeChange::Remove { .. } => return Outcome::Remove,
			EdgeChange::Replace { item, .. } => return Outcome::Replace(item),
			EdgeChange::Add { .. } => {}
		}
		Outcome::Keep
	}
}

fn apply_changes<C: Change>(changes: Vec<C>, items: &mut Vec<C::Item>) {
	if changes.is_empty() {
		return;
	}

	let mut additions = Vec::new();
	let mut by_id: HashMap<String, Vec<C>> = HashMap::new();
	for change in changes {
		match change.into_addition() {
			Ok(addition) => additions.push(addition),
			Err(change) => {
				if let Some(id) = change.target() {
					by_id.entry(id.to_owned()).or_default().push(change);
				}
			}
		}
	}

	if !by_id.is_empty() {
		let previous = std::mem::take(items);
		for mut item in previous {
			let Some(pending) = by_id.remove(item.id()) else {
				items.push(item);
				continue;
			};
			let mut removed = false;
			for change in pending {
				match change.apply(&mut item) {
					Outcome::Keep => {}
					Outcome::Replace(next) => item = next,
					Outcome::Remove => {
						removed = true;
						break;
					}
				}
			}
			if !removed {
				items.push(item);
			}
		}
	}

	for (item, index) in additions {
		match index {
			Some(index) => items.insert(index.min(items.len()), item),
			None => items.push(item),
		}
	}
}

/// Fold a batch of node changes into `nodes`.
///
/// Changes addressing unknown ids are ignored. Several changes for the same
/// node apply in batch order; once a node is removed its remaining changes are
/// dropped. Additions are inserted after everything else.
pub fn apply_node_changes(changes: Vec<NodeChange>, nodes: &mut Vec<Node>) {
	apply_changes(changes, nodes);
}

/// Fold a batch of edge changes into `edges`. Same rules as [`apply_node_changes`].
pub fn apply_edge_changes(changes: Vec<EdgeChange>, edges: &mut Vec<Edge>) {
	apply_changes(changes, edges);
}

/// Id derived from the endpoints of an edge.
pub fn edge_id(source: &str, target: &str) -> String {
	format!("e{}-{}", source, target)
}

/// Append `edge`, renaming it with a `#n` suffix if its id is already taken.
///
/// Edges with identical endpoints are not merged.
pub fn add_edge(mut edge: Edge, edges: &mut Vec<Edge>) {
	if edges.iter().any(|e| e.id == edge.id) {
		let base = std::mem::take(&mut edge.id);
		let mut n = 1;
		edge.id = loop {
			let candidate = format!("{}#{}", base, n);
			if !edges.iter().any(|e| e.id == candidate) {
				break candidate;
			}
			n += 1;
		};
	}
	edges.push(edge);
}
