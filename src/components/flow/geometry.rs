//! Flow-space geometry: node boxes, handle anchors, edge curves and the
//! hit-testing built on them.

use super::types::{Dimensions, Edge, HandleType, Node, XYPosition};

/// Size used for nodes the canvas has not measured yet.
pub const DEFAULT_NODE_SIZE: Dimensions = Dimensions {
	width: 150.0,
	height: 36.0,
};
pub const HANDLE_RADIUS: f64 = 4.0;
/// Screen-space tolerance for grabbing a handle.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;
/// Screen-space tolerance for clicking an edge.
pub const EDGE_HIT_DISTANCE: f64 = 10.0;
const CURVATURE: f64 = 0.25;
const EDGE_SAMPLES: usize = 24;

/// Axis-aligned rectangle in flow coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, p: XYPosition) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	pub fn center(&self) -> XYPosition {
		XYPosition::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn union(self, other: Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Rect {
			x,
			y,
			width: (self.x + self.width).max(other.x + other.width) - x,
			height: (self.y + self.height).max(other.y + other.height) - y,
		}
	}
}

pub fn node_rect(node: &Node) -> Rect {
	let size = node.measured.unwrap_or(DEFAULT_NODE_SIZE);
	Rect {
		x: node.position.x,
		y: node.position.y,
		width: size.width,
		height: size.height,
	}
}

/// Bounding box of all nodes, `None` when there are none.
pub fn nodes_bounds(nodes: &[Node]) -> Option<Rect> {
	nodes.iter().map(node_rect).reduce(Rect::union)
}

/// Anchor of a handle: sources sit bottom-centre, targets top-centre.
pub fn handle_position(node: &Node, handle: HandleType) -> XYPosition {
	let r = node_rect(node);
	match handle {
		HandleType::Source => XYPosition::new(r.x + r.width / 2.0, r.y + r.height),
		HandleType::Target => XYPosition::new(r.x + r.width / 2.0, r.y),
	}
}

pub fn has_handle(node: &Node, handle: HandleType) -> bool {
	match handle {
		HandleType::Source => node.kind().has_source(),
		HandleType::Target => node.kind().has_target(),
	}
}

/// Cubic Bézier segment.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
	pub p0: XYPosition,
	pub p1: XYPosition,
	pub p2: XYPosition,
	pub p3: XYPosition,
}

impl CubicBezier {
	/// Vertical curve leaving `from` downwards and entering `to` from above.
	pub fn vertical(from: XYPosition, to: XYPosition) -> Self {
		let offset = control_offset(to.y - from.y);
		Self {
			p0: from,
			p1: XYPosition::new(from.x, from.y + offset),
			p2: XYPosition::new(to.x, to.y - offset),
			p3: to,
		}
	}

	pub fn eval(&self, t: f64) -> XYPosition {
		let mt = 1.0 - t;
		let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
		XYPosition::new(
			a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
			a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
		)
	}

	/// Approximate distance from `p` to the curve by sampling it as a polyline.
	pub fn distance_to(&self, p: XYPosition) -> f64 {
		let mut prev = self.p0;
		let mut best = f64::MAX;
		for i in 1..=EDGE_SAMPLES {
			let curr = self.eval(i as f64 / EDGE_SAMPLES as f64);
			best = best.min(segment_distance_sq(p, prev, curr));
			prev = curr;
		}
		best.sqrt()
	}
}

// Short hops bend harder, backwards hops get a loop proportional to the overshoot.
fn control_offset(distance: f64) -> f64 {
	if distance >= 0.0 {
		0.5 * distance
	} else {
		CURVATURE * 25.0 * (-distance).sqrt()
	}
}

fn segment_distance_sq(p: XYPosition, a: XYPosition, b: XYPosition) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
	cx * cx + cy * cy
}

fn find_node<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
	nodes.iter().find(|n| n.id == id)
}

/// Curve of an edge, `None` if an endpoint is missing.
pub fn edge_curve(edge: &Edge, nodes: &[Node]) -> Option<CubicBezier> {
	let source = find_node(nodes, &edge.source)?;
	let target = find_node(nodes, &edge.target)?;
	Some(CubicBezier::vertical(
		handle_position(source, HandleType::Source),
		handle_position(target, HandleType::Target),
	))
}

/// Topmost node under `p`. Later nodes are drawn above earlier ones.
pub fn node_at<'a>(nodes: &'a [Node], p: XYPosition) -> Option<&'a Node> {
	nodes.iter().rev().find(|n| node_rect(n).contains(p))
}

/// Closest handle within `radius` of `p`, optionally restricted to one type.
pub fn handle_at<'a>(
	nodes: &'a [Node],
	p: XYPosition,
	radius: f64,
	only: Option<HandleType>,
) -> Option<(&'a Node, HandleType)> {
	let mut best: Option<(&Node, HandleType, f64)> = None;
	for node in nodes.iter().rev() {
		for handle in [HandleType::Source, HandleType::Target] {
			if !has_handle(node, handle) || only.is_some_and(|o| o != handle) {
				continue;
			}
			let h = handle_position(node, handle);
			let d = ((h.x - p.x).powi(2) + (h.y - p.y).powi(2)).sqrt();
			if d <= radius && best.is_none_or(|(_, _, bd)| d < bd) {
				best = Some((node, handle, d));
			}
		}
	}
	best.map(|(n, h, _)| (n, h))
}

/// Topmost edge whose curve passes within `tolerance` of `p`.
pub fn edge_at<'a>(edges: &'a [Edge], nodes: &[Node], p: XYPosition, tolerance: f64) -> Option<&'a Edge> {
	edges.iter().rev().find(|edge| {
		edge_curve(edge, nodes).is_some_and(|curve| curve.distance_to(p) <= tolerance)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow::types::NodeKind;

	fn node(id: &str, x: f64, y: f64) -> Node {
		Node::new(id, id, XYPosition::new(x, y))
	}

	#[test]
	fn handles_follow_node_kind() {
		let input = node("1", 0.0, 0.0).with_kind(NodeKind::Input);
		let plain = node("2", 0.0, 0.0);
		assert!(has_handle(&input, HandleType::Source));
		assert!(!has_handle(&input, HandleType::Target));
		assert!(has_handle(&plain, HandleType::Target));
		assert_eq!(handle_position(&plain, HandleType::Source), XYPosition::new(75.0, 36.0));
		assert_eq!(handle_position(&plain, HandleType::Target), XYPosition::new(75.0, 0.0));
	}

	#[test]
	fn later_nodes_win_hit_tests() {
		let nodes = vec![node("a", 0.0, 0.0), node("b", 10.0, 10.0)];
		assert_eq!(node_at(&nodes, XYPosition::new(20.0, 20.0)).map(|n| n.id.as_str()), Some("b"));
		assert_eq!(node_at(&nodes, XYPosition::new(5.0, 5.0)).map(|n| n.id.as_str()), Some("a"));
		assert!(node_at(&nodes, XYPosition::new(500.0, 5.0)).is_none());
	}

	#[test]
	fn handle_hit_picks_closest() {
		let nodes = vec![node("a", 0.0, 0.0), node("b", 0.0, 40.0)];
		// a's source is at (75, 36), b's target at (75, 40).
		let (n, h) = handle_at(&nodes, XYPosition::new(75.0, 39.0), 8.0, None).unwrap();
		assert_eq!((n.id.as_str(), h), ("b", HandleType::Target));
		let (n, h) = handle_at(&nodes, XYPosition::new(75.0, 39.0), 8.0, Some(HandleType::Source)).unwrap();
		assert_eq!((n.id.as_str(), h), ("a", HandleType::Source));
		assert!(handle_at(&nodes, XYPosition::new(0.0, 200.0), 8.0, None).is_none());
	}

	#[test]
	fn curve_endpoints_and_edge_hits() {
		let nodes = vec![node("1", 0.0, 0.0), node("2", 0.0, 200.0)];
		let edges = vec![Edge::new("e1-2", "1", "2"), Edge::new("e1-9", "1", "9")];
		let curve = edge_curve(&edges[0], &nodes).unwrap();
		assert_eq!(curve.eval(0.0), XYPosition::new(75.0, 36.0));
		assert_eq!(curve.eval(1.0), XYPosition::new(75.0, 200.0));
		assert!(edge_curve(&edges[1], &nodes).is_none());

		let hit = edge_at(&edges, &nodes, XYPosition::new(78.0, 120.0), 10.0);
		assert_eq!(hit.map(|e| e.id.as_str()), Some("e1-2"));
		assert!(edge_at(&edges, &nodes, XYPosition::new(140.0, 120.0), 10.0).is_none());
	}

	#[test]
	fn bounds_cover_all_nodes() {
		let nodes = vec![node("1", 0.0, 0.0), node("2", 250.0, 250.0), node("3", 500.0, 0.0)];
		let b = nodes_bounds(&nodes).unwrap();
		assert_eq!(b, Rect { x: 0.0, y: 0.0, width: 650.0, height: 286.0 });
		assert!(nodes_bounds(&[]).is_none());
	}
}
