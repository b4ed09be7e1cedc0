//! Canvas interaction state.
//!
//! Pointer and keyboard input is turned into [`FlowEvent`]s here. The node and
//! edge collections are only ever read; every mutation goes back to the owner
//! through the emitted changes.

use std::collections::HashSet;

use super::changes::{EdgeChange, NodeChange};
use super::config::FlowConfig;
use super::geometry::{self, EDGE_HIT_DISTANCE, HANDLE_HIT_RADIUS};
use super::theme::Theme;
use super::types::{Connection, Edge, HandleType, Node, XYPosition};
use super::viewport::{Viewport, ZOOM_STEP};

/// Output of an interaction, dispatched to the component callbacks.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
	Nodes(Vec<NodeChange>),
	Edges(Vec<EdgeChange>),
	Connect(Connection),
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Dragged node ids with their positions when the drag started.
	pub nodes: Vec<(String, XYPosition)>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

impl DragState {
	pub fn active(&self) -> bool {
		!self.nodes.is_empty()
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// An unfinished connect gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionState {
	pub node_id: String,
	pub handle: HandleType,
	/// Pointer position in flow coordinates.
	pub cursor: XYPosition,
}

/// What the pointer is over while idle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Hover {
	#[default]
	Pane,
	Node(String),
	Handle(String, HandleType),
	Edge(String),
}

pub struct FlowCanvasState {
	pub config: FlowConfig,
	pub theme: Theme,
	pub viewport: Viewport,
	pub drag: DragState,
	pub pan: PanState,
	pub connection: Option<ConnectionState>,
	pub hover: Hover,
	pub width: f64,
	pub height: f64,
	fitted: bool,
}

impl FlowCanvasState {
	pub fn new(config: FlowConfig, width: f64, height: f64) -> Self {
		Self {
			theme: Theme::for_mode(config.color_mode),
			config,
			viewport: Viewport::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			connection: None,
			hover: Hover::default(),
			width,
			height,
			fitted: false,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Frame all nodes. Leaves the viewport alone when there are none.
	pub fn fit_view(&mut self, nodes: &[Node]) {
		if let Some(bounds) = geometry::nodes_bounds(nodes) {
			self.viewport = Viewport::fit(
				bounds,
				self.width,
				self.height,
				self.config.min_zoom,
				self.config.max_zoom,
			);
		}
		self.fitted = true;
	}

	/// Apply the initial fit view once, if configured.
	pub fn ensure_fitted(&mut self, nodes: &[Node]) {
		if self.config.fit_view && !self.fitted && !nodes.is_empty() {
			self.fit_view(nodes);
		}
	}

	pub fn zoom_in(&mut self) {
		self.zoom_centered(ZOOM_STEP);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_centered(1.0 / ZOOM_STEP);
	}

	fn zoom_centered(&mut self, factor: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.viewport
			.zoom_at(cx, cy, factor, self.config.min_zoom, self.config.max_zoom);
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.viewport
			.zoom_at(sx, sy, factor, self.config.min_zoom, self.config.max_zoom);
	}

	pub fn pointer_down(
		&mut self,
		sx: f64,
		sy: f64,
		multi: bool,
		nodes: &[Node],
		edges: &[Edge],
	) -> Vec<FlowEvent> {
		let p = self.viewport.screen_to_flow(sx, sy);
		let zoom = self.viewport.zoom;

		if let Some((node, handle)) = geometry::handle_at(nodes, p, HANDLE_HIT_RADIUS / zoom, None) {
			self.connection = Some(ConnectionState {
				node_id: node.id.clone(),
				handle,
				cursor: p,
			});
			return Vec::new();
		}

		if let Some(node) = geometry::node_at(nodes, p) {
			let (node_changes, edge_changes, now_selected) = if multi {
				let change = NodeChange::Select {
					id: node.id.clone(),
					selected: !node.selected,
				};
				(vec![change], Vec::new(), !node.selected)
			} else if node.selected {
				(Vec::new(), Vec::new(), true)
			} else {
				let (mut nc, ec) = deselect_others(nodes, edges, Some(node.id.as_str()), None);
				nc.push(NodeChange::Select {
					id: node.id.clone(),
					selected: true,
				});
				(nc, ec, true)
			};

			if now_selected {
				self.drag = DragState {
					nodes: nodes
						.iter()
						.filter(|n| n.id == node.id || (n.selected && (multi || node.selected)))
						.map(|n| (n.id.clone(), n.position))
						.collect(),
					start_x: sx,
					start_y: sy,
					moved: false,
				};
			}
			return events(node_changes, edge_changes);
		}

		if let Some(edge) = geometry::edge_at(edges, nodes, p, EDGE_HIT_DISTANCE / zoom) {
			let (nc, mut ec) = if multi {
				(Vec::new(), Vec::new())
			} else {
				deselect_others(nodes, edges, None, Some(edge.id.as_str()))
			};
			let selected = !(multi && edge.selected);
			if selected != edge.selected {
				ec.push(EdgeChange::Select {
					id: edge.id.clone(),
					selected,
				});
			}
			return events(nc, ec);
		}

		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.viewport.x,
			transform_start_y: self.viewport.y,
		};
		if multi {
			return Vec::new();
		}
		let (nc, ec) = deselect_others(nodes, edges, None, None);
		events(nc, ec)
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64, nodes: &[Node], edges: &[Edge]) -> Vec<FlowEvent> {
		if self.drag.active() {
			let zoom = self.viewport.zoom;
			let (dx, dy) = ((sx - self.drag.start_x) / zoom, (sy - self.drag.start_y) / zoom);
			self.drag.moved = true;
			let changes = self
				.drag
				.nodes
				.iter()
				.map(|(id, start)| NodeChange::Position {
					id: id.clone(),
					position: Some(XYPosition::new(start.x + dx, start.y + dy)),
					dragging: true,
				})
				.collect();
			return vec![FlowEvent::Nodes(changes)];
		}

		let p = self.viewport.screen_to_flow(sx, sy);
		if let Some(connection) = self.connection.as_mut() {
			connection.cursor = p;
		} else if self.pan.active {
			self.viewport.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.viewport.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			self.hover = self.hover_at(p, nodes, edges);
		}
		Vec::new()
	}

	fn hover_at(&self, p: XYPosition, nodes: &[Node], edges: &[Edge]) -> Hover {
		let zoom = self.viewport.zoom;
		if let Some((node, handle)) = geometry::handle_at(nodes, p, HANDLE_HIT_RADIUS / zoom, None) {
			Hover::Handle(node.id.clone(), handle)
		} else if let Some(node) = geometry::node_at(nodes, p) {
			Hover::Node(node.id.clone())
		} else if let Some(edge) = geometry::edge_at(edges, nodes, p, EDGE_HIT_DISTANCE / zoom) {
			Hover::Edge(edge.id.clone())
		} else {
			Hover::Pane
		}
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64, nodes: &[Node]) -> Vec<FlowEvent> {
		self.pan.active = false;
		let mut out = self.end_drag();
		if let Some(connection) = self.connection.take() {
			let p = self.viewport.screen_to_flow(sx, sy);
			if let Some(completed) = self.complete_connection(&connection, p, nodes) {
				out.push(FlowEvent::Connect(completed));
			}
		}
		out
	}

	/// Pointer left the canvas: finish any drag and drop unfinished gestures.
	pub fn pointer_leave(&mut self) -> Vec<FlowEvent> {
		self.pan.active = false;
		self.connection = None;
		self.hover = Hover::Pane;
		self.end_drag()
	}

	fn end_drag(&mut self) -> Vec<FlowEvent> {
		let drag = std::mem::take(&mut self.drag);
		if !drag.moved {
			return Vec::new();
		}
		let changes = drag
			.nodes
			.into_iter()
			.map(|(id, _)| NodeChange::Position {
				id,
				position: None,
				dragging: false,
			})
			.collect();
		vec![FlowEvent::Nodes(changes)]
	}

	/// Resolve the drop target of a connect gesture: the nearest opposite handle
	/// within the connection radius, or the body of another node that has one.
	fn complete_connection(
		&self,
		connection: &ConnectionState,
		p: XYPosition,
		nodes: &[Node],
	) -> Option<Connection> {
		let wanted = connection.handle.opposite();
		let radius = self.config.connection_radius / self.viewport.zoom;
		let target = geometry::handle_at(nodes, p, radius, Some(wanted))
			.map(|(node, _)| node)
			.or_else(|| {
				geometry::node_at(nodes, p)
					.filter(|n| n.id != connection.node_id && geometry::has_handle(n, wanted))
			})?;

		let (source, target) = match connection.handle {
			HandleType::Source => (connection.node_id.clone(), target.id.clone()),
			HandleType::Target => (target.id.clone(), connection.node_id.clone()),
		};
		Some(Connection { source, target })
	}

	/// Delete-key handling: remove selected nodes, selected edges and every
	/// edge attached to a removed node.
	pub fn key_down(&mut self, key: &str, nodes: &[Node], edges: &[Edge]) -> Vec<FlowEvent> {
		if !self.config.is_delete_key(key) || self.drag.active() {
			return Vec::new();
		}
		let removed: HashSet<&str> = nodes
			.iter()
			.filter(|n| n.selected)
			.map(|n| n.id.as_str())
			.collect();
		if self
			.connection
			.as_ref()
			.is_some_and(|c| removed.contains(c.node_id.as_str()))
		{
			self.connection = None;
		}
		let node_changes = nodes
			.iter()
			.filter(|n| removed.contains(n.id.as_str()))
			.map(|n| NodeChange::Remove { id: n.id.clone() })
			.collect::<Vec<_>>();
		let edge_changes = edges
			.iter()
			.filter(|e| {
				e.selected || removed.contains(e.source.as_str()) || removed.contains(e.target.as_str())
			})
			.map(|e| EdgeChange::Remove { id: e.id.clone() })
			.collect();
		events(node_changes, edge_changes)
	}

	/// CSS cursor for the current gesture.
	pub fn cursor(&self) -> &'static str {
		if self.drag.active() || self.pan.active {
			"grabbing"
		} else if self.connection.is_some() {
			"crosshair"
		} else {
			match self.hover {
				Hover::Handle(..) => "crosshair",
				Hover::Node(_) | Hover::Edge(_) => "pointer",
				Hover::Pane => "grab",
			}
		}
	}
}

fn deselect_others(
	nodes: &[Node],
	edges: &[Edge],
	keep_node: Option<&str>,
	keep_edge: Option<&str>,
) -> (Vec<NodeChange>, Vec<EdgeChange>) {
	let nc = nodes
		.iter()
		.filter(|n| n.selected && Some(n.id.as_str()) != keep_node)
		.map(|n| NodeChange::Select {
			id: n.id.clone(),
			selected: false,
		})
		.collect();
	let ec = edges
		.iter()
		.filter(|e| e.selected && Some(e.id.as_str()) != keep_edge)
		.map(|e| EdgeChange::Select {
			id: e.id.clone(),
			selected: false,
		})
		.collect();
	(nc, ec)
}

fn events(node_changes: Vec<NodeChange>, edge_changes: Vec<EdgeChange>) -> Vec<FlowEvent> {
	let mut out = Vec::new();
	if !node_changes.is_empty() {
		out.push(FlowEvent::Nodes(node_changes));
	}
	if !edge_changes.is_empty() {
		out.push(FlowEvent::Edges(edge_changes));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow::changes::{apply_edge_changes, apply_node_changes};
	use crate::components::flow::types::NodeKind;

	/// Identity viewport so screen and flow coordinates coincide.
	fn canvas() -> FlowCanvasState {
		FlowCanvasState::new(FlowConfig::default(), 800.0, 600.0)
	}

	fn sample() -> (Vec<Node>, Vec<Edge>) {
		let nodes = vec![
			Node::new("1", "Node 1", XYPosition::new(0.0, 0.0)).with_kind(NodeKind::Input),
			Node::new("2", "Node 2", XYPosition::new(0.0, 200.0)),
			Node::new("3", "Node 3", XYPosition::new(300.0, 0.0)),
		];
		let edges = vec![Edge::new("e1-2", "1", "2")];
		(nodes, edges)
	}

	fn apply(events: Vec<FlowEvent>, nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) -> Vec<Connection> {
		let mut connections = Vec::new();
		for event in events {
			match event {
				FlowEvent::Nodes(c) => apply_node_changes(c, nodes),
				FlowEvent::Edges(c) => apply_edge_changes(c, edges),
				FlowEvent::Connect(c) => connections.push(c),
			}
		}
		connections
	}

	#[test]
	fn drag_node_emits_positions() {
		let (mut nodes, mut edges) = sample();
		let mut s = canvas();

		let ev = s.pointer_down(310.0, 10.0, false, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert!(nodes[2].selected);
		assert!(s.drag.active());

		let ev = s.pointer_move(330.0, 50.0, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert_eq!(nodes[2].position, XYPosition::new(320.0, 40.0));
		assert!(nodes[2].dragging);

		let ev = s.pointer_up(330.0, 50.0, &nodes);
		apply(ev, &mut nodes, &mut edges);
		assert!(!nodes[2].dragging);
		assert_eq!(nodes[2].position, XYPosition::new(320.0, 40.0));
		assert!(!s.drag.active());
	}

	#[test]
	fn drag_respects_zoom() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		s.viewport = Viewport {
			x: 0.0,
			y: 0.0,
			zoom: 2.0,
		};
		s.pointer_down(620.0, 20.0, false, &nodes, &edges);
		let ev = s.pointer_move(640.0, 20.0, &nodes, &edges);
		let FlowEvent::Nodes(changes) = &ev[0] else {
			panic!("expected node changes, got {:?}", ev);
		};
		assert_eq!(
			changes[0],
			NodeChange::Position {
				id: "3".into(),
				position: Some(XYPosition::new(310.0, 0.0)),
				dragging: true,
			}
		);
	}

	#[test]
	fn click_without_move_only_selects() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		s.pointer_down(10.0, 10.0, false, &nodes, &edges);
		assert!(s.pointer_up(10.0, 10.0, &nodes).is_empty());
	}

	#[test]
	fn handle_to_node_connects_once() {
		let (mut nodes, mut edges) = sample();
		let mut s = canvas();

		// Source handle of node 1 sits at (75, 36).
		assert!(s.pointer_down(75.0, 37.0, false, &nodes, &edges).is_empty());
		assert!(s.connection.is_some());
		s.pointer_move(350.0, 20.0, &nodes, &edges);
		assert_eq!(s.cursor(), "crosshair");

		let ev = s.pointer_up(350.0, 20.0, &nodes);
		let connections = apply(ev, &mut nodes, &mut edges);
		assert_eq!(
			connections,
			vec![Connection {
				source: "1".into(),
				target: "3".into(),
			}]
		);
		assert!(s.connection.is_none());
	}

	#[test]
	fn connection_from_target_handle_is_normalized() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		// Target handle of node 3 at (375, 0); drop near node 1's source handle.
		s.pointer_down(375.0, 1.0, false, &nodes, &edges);
		let ev = s.pointer_up(80.0, 40.0, &nodes);
		assert_eq!(
			ev,
			vec![FlowEvent::Connect(Connection {
				source: "1".into(),
				target: "3".into(),
			})]
		);
	}

	#[test]
	fn connection_dropped_on_pane_is_cancelled() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		s.pointer_down(75.0, 36.0, false, &nodes, &edges);
		assert!(s.pointer_up(700.0, 500.0, &nodes).is_empty());
		assert!(s.connection.is_none());
	}

	#[test]
	fn input_node_body_rejects_incoming_connection() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		// From node 2's source handle (75, 236) onto node 1, which has no target handle.
		s.pointer_down(75.0, 236.0, false, &nodes, &edges);
		assert!(s.pointer_up(120.0, 20.0, &nodes).is_empty());
	}

	#[test]
	fn pane_click_clears_selection_and_pans() {
		let (mut nodes, mut edges) = sample();
		nodes[0].selected = true;
		edges[0].selected = true;
		let mut s = canvas();

		let ev = s.pointer_down(600.0, 400.0, false, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert!(!nodes[0].selected && !edges[0].selected);

		s.pointer_move(650.0, 380.0, &nodes, &edges);
		assert_eq!((s.viewport.x, s.viewport.y), (50.0, -20.0));
		s.pointer_up(650.0, 380.0, &nodes);
		assert!(!s.pan.active);
	}

	#[test]
	fn clicking_edge_selects_it() {
		let (mut nodes, mut edges) = sample();
		nodes[2].selected = true;
		let mut s = canvas();
		let ev = s.pointer_down(76.0, 120.0, false, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert!(edges[0].selected);
		assert!(!nodes[2].selected);
	}

	#[test]
	fn multi_select_drags_together() {
		let (mut nodes, mut edges) = sample();
		let mut s = canvas();
		let ev = s.pointer_down(10.0, 10.0, false, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		s.pointer_up(10.0, 10.0, &nodes);
		let ev = s.pointer_down(310.0, 10.0, true, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert!(nodes[0].selected && nodes[2].selected);

		let ev = s.pointer_move(320.0, 10.0, &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert_eq!(nodes[0].position, XYPosition::new(10.0, 0.0));
		assert_eq!(nodes[2].position, XYPosition::new(310.0, 0.0));
		assert_eq!(nodes[1].position, XYPosition::new(0.0, 200.0));
	}

	#[test]
	fn delete_key_removes_selection_with_edges() {
		let (mut nodes, mut edges) = sample();
		edges.push(Edge::new("e1-3", "1", "3"));
		nodes[1].selected = true;
		let mut s = canvas();

		assert!(s.key_down("Enter", &nodes, &edges).is_empty());
		let ev = s.key_down("Backspace", &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["1", "3"]);
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].id, "e1-3");
	}

	#[test]
	fn deleting_node_mid_connect_cancels_gesture() {
		let (mut nodes, mut edges) = sample();
		nodes[0].selected = true;
		let mut s = canvas();

		s.pointer_down(75.0, 37.0, false, &nodes, &edges);
		s.pointer_move(350.0, 20.0, &nodes, &edges);
		let ev = s.key_down("Delete", &nodes, &edges);
		apply(ev, &mut nodes, &mut edges);
		assert!(s.connection.is_none());
		assert_eq!(s.cursor(), "grab");

		assert!(s.pointer_up(350.0, 20.0, &nodes).is_empty());
		assert!(nodes.iter().all(|n| n.id != "1"));
		assert!(edges.is_empty());
	}

	#[test]
	fn cursor_follows_gesture() {
		let (nodes, edges) = sample();
		let mut s = canvas();
		s.pointer_down(310.0, 10.0, false, &nodes, &edges);
		assert_eq!(s.cursor(), "grabbing");
		s.pointer_up(310.0, 10.0, &nodes);
		s.pointer_down(700.0, 500.0, false, &nodes, &edges);
		assert_eq!(s.cursor(), "grabbing");
		s.pointer_up(700.0, 500.0, &nodes);
		assert_ne!(s.cursor(), "grabbing");
	}

	#[test]
	fn initial_fit_happens_once() {
		let (nodes, _) = sample();
		let mut s = canvas();
		s.ensure_fitted(&nodes);
		let fitted = s.viewport;
		assert_ne!(fitted, Viewport::default());
		s.zoom_in();
		s.ensure_fitted(&nodes);
		assert_ne!(s.viewport, fitted);
	}

	#[test]
	fn wheel_zoom_is_clamped() {
		let mut s = canvas();
		for _ in 0..40 {
			s.wheel(100.0, 100.0, -1.0);
		}
		assert_eq!(s.viewport.zoom, s.config.max_zoom);
	}
}
