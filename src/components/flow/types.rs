//! Flow data structures shared by the store, the change reducer and the canvas.

use serde::{Deserialize, Serialize};

/// A point in flow (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct XYPosition {
	/// Horizontal coordinate, growing to the right.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl XYPosition {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Measured size of a rendered node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
	/// Width in flow units.
	pub width: f64,
	/// Height in flow units.
	pub height: f64,
}

/// Node flavour. Decides which handles a node exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Only a source handle.
	Input,
	/// Source and target handles.
	#[default]
	Default,
	/// Only a target handle.
	Output,
}

impl NodeKind {
	/// Whether edges can leave this kind of node.
	pub fn has_source(self) -> bool {
		!matches!(self, NodeKind::Output)
	}

	/// Whether edges can enter this kind of node.
	pub fn has_target(self) -> bool {
		!matches!(self, NodeKind::Input)
	}
}

/// Which end of a connection a handle belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleType {
	/// Outgoing end, at the bottom of a node.
	Source,
	/// Incoming end, at the top of a node.
	Target,
}

impl HandleType {
	/// The handle type a connection from `self` must end on.
	pub fn opposite(self) -> Self {
		match self {
			HandleType::Source => HandleType::Target,
			HandleType::Target => HandleType::Source,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct NodeData {
	label: String,
}

/// A vertex of the flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct Node {
	/// Unique identifier, referenced by edges.
	pub id: String,
	/// Text drawn inside the node and shown in the side panel.
	pub label: String,
	/// Top-left corner in flow coordinates.
	pub position: XYPosition,
	/// Optional flavour tag (`"input"`, `"default"`, `"output"`).
	pub kind: Option<NodeKind>,
	/// Part of the current selection.
	pub selected: bool,
	/// Set while the node is being dragged on the canvas.
	pub dragging: bool,
	/// Size reported by the canvas after the node was first drawn.
	pub measured: Option<Dimensions>,
}

impl Node {
	/// Unselected node of the default kind.
	pub fn new(id: impl Into<String>, label: impl Into<String>, position: XYPosition) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			position,
			kind: None,
			selected: false,
			dragging: false,
			measured: None,
		}
	}

	/// Builder-style setter for [`Node::kind`].
	pub fn with_kind(mut self, kind: NodeKind) -> Self {
		self.kind = Some(kind);
		self
	}

	/// Effective kind, [`NodeKind::Default`] when untagged.
	pub fn kind(&self) -> NodeKind {
		self.kind.unwrap_or_default()
	}
}

/// Wire shape of a node: the label lives under `data` and the kind under `type`.
#[derive(Serialize, Deserialize)]
struct RawNode {
	id: String,
	#[serde(default)]
	data: NodeData,
	#[serde(default)]
	position: XYPosition,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	kind: Option<NodeKind>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	selected: bool,
}

impl From<RawNode> for Node {
	fn from(raw: RawNode) -> Self {
		Self {
			id: raw.id,
			label: raw.data.label,
			position: raw.position,
			kind: raw.kind,
			selected: raw.selected,
			dragging: false,
			measured: None,
		}
	}
}

impl From<Node> for RawNode {
	fn from(node: Node) -> Self {
		Self {
			id: node.id,
			data: NodeData { label: node.label },
			position: node.position,
			kind: node.kind,
			selected: node.selected,
		}
	}
}

/// Stroke attributes of an edge path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
	/// CSS colour.
	pub stroke: String,
	/// Line width in flow units.
	pub stroke_width: f64,
}

/// Text attributes of an edge label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
	/// CSS text colour.
	pub fill: String,
	/// Font size in pixels.
	pub font_size: f64,
	/// CSS font weight, e.g. `500`.
	pub font_weight: u16,
}

/// Background box drawn behind an edge label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBgStyle {
	/// CSS fill colour.
	pub fill: String,
	/// Opacity in `[0, 1]`.
	pub fill_opacity: f64,
	/// Horizontal corner radius.
	pub rx: f64,
	/// Vertical corner radius.
	pub ry: f64,
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Unique identifier.
	pub id: String,
	/// Id of the node the edge leaves.
	pub source: String,
	/// Id of the node the edge enters.
	pub target: String,
	/// Text drawn at the middle of the curve.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Stroke override; the theme colour is used otherwise.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<EdgeStyle>,
	/// Label text override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label_style: Option<LabelStyle>,
	/// Label background override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label_bg_style: Option<LabelBgStyle>,
	/// Part of the current selection.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub selected: bool,
}

impl Edge {
	/// Unstyled, unlabelled edge.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: None,
			style: None,
			label_style: None,
			label_bg_style: None,
			selected: false,
		}
	}

	/// True when either endpoint is `node_id`.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Parameters of a completed connect gesture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	/// Node the edge leaves.
	pub source: String,
	/// Node the edge enters.
	pub target: String,
}

/// Snapshot of both collections, used to seed the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
	/// Nodes in display order.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// Edges in display order.
	#[serde(default)]
	pub edges: Vec<Edge>,
}
