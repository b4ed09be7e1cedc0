use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::changes::NodeChange;
use super::geometry::{self, DEFAULT_NODE_SIZE, HANDLE_RADIUS};
use super::state::{FlowCanvasState, Hover};
use super::types::{Dimensions, Edge, HandleType, Node, XYPosition};

const NODE_FONT: &str = "12px sans-serif";
const NODE_PADDING: f64 = 10.0;
const NODE_CORNER: f64 = 3.0;
const DOT_SIZE: f64 = 1.0;
const LABEL_PADDING: (f64, f64) = (4.0, 2.0);

/// Measure every node label and report the ones whose size changed.
pub fn measure_nodes(ctx: &CanvasRenderingContext2d, nodes: &[Node]) -> Vec<NodeChange> {
	ctx.set_font(NODE_FONT);
	nodes
		.iter()
		.filter_map(|node| {
			let text_width = ctx.measure_text(&node.label).map(|m| m.width()).unwrap_or(0.0);
			let dimensions = Dimensions {
				width: (text_width + 2.0 * NODE_PADDING).max(DEFAULT_NODE_SIZE.width).ceil(),
				height: DEFAULT_NODE_SIZE.height,
			};
			(node.measured != Some(dimensions)).then(|| NodeChange::Dimensions {
				id: node.id.clone(),
				dimensions,
			})
		})
		.collect()
}

pub fn render(state: &FlowCanvasState, nodes: &[Node], edges: &[Edge], ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.config.show_background {
		draw_grid(state, ctx);
	}

	let vp = state.viewport;
	ctx.save();
	let _ = ctx.translate(vp.x, vp.y);
	let _ = ctx.scale(vp.zoom, vp.zoom);
	draw_edges(state, nodes, edges, ctx);
	draw_connection_line(state, nodes, ctx);
	draw_nodes(state, nodes, ctx);
	ctx.restore();
}

fn draw_grid(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	let gap = state.config.grid_gap * state.viewport.zoom;
	if gap < 4.0 {
		return;
	}
	ctx.set_fill_style_str(&state.theme.grid_dot.to_css());
	let (origin_x, origin_y) = state.viewport.flow_to_screen(XYPosition::default());
	let (ox, oy) = (origin_x.rem_euclid(gap), origin_y.rem_euclid(gap));
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x - DOT_SIZE / 2.0, y - DOT_SIZE / 2.0, DOT_SIZE, DOT_SIZE);
			y += gap;
		}
		x += gap;
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_edges(state: &FlowCanvasState, nodes: &[Node], edges: &[Edge], ctx: &CanvasRenderingContext2d) {
	let theme = &state.theme;
	for edge in edges {
		let Some(curve) = geometry::edge_curve(edge, nodes) else {
			continue;
		};
		let (stroke, width) = match &edge.style {
			Some(style) => (style.stroke.clone(), style.stroke_width),
			None if edge.selected => (theme.edge_selected.to_css(), 1.0),
			None => (theme.edge.to_css(), 1.0),
		};
		let hovered = matches!(&state.hover, Hover::Edge(id) if *id == edge.id);

		ctx.set_stroke_style_str(&stroke);
		ctx.set_line_width(if edge.selected || hovered { width + 1.0 } else { width });
		ctx.begin_path();
		ctx.move_to(curve.p0.x, curve.p0.y);
		ctx.bezier_curve_to(curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x, curve.p3.y);
		ctx.stroke();

		if let Some(label) = &edge.label {
			let mid = curve.eval(0.5);
			draw_edge_label(state, edge, label, mid.x, mid.y, ctx);
		}
	}
}

fn draw_edge_label(
	state: &FlowCanvasState,
	edge: &Edge,
	label: &str,
	x: f64,
	y: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let theme = &state.theme;
	let (text_fill, font) = match &edge.label_style {
		Some(s) => (s.fill.clone(), format!("{} {}px sans-serif", s.font_weight, s.font_size)),
		None => (theme.edge_label_text.to_css(), "10px sans-serif".to_owned()),
	};
	ctx.set_font(&font);
	let text_width = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
	let font_size = edge.label_style.as_ref().map_or(10.0, |s| s.font_size);
	let (w, h) = (text_width + 2.0 * LABEL_PADDING.0, font_size + 2.0 * LABEL_PADDING.1);

	match &edge.label_bg_style {
		Some(bg) => {
			ctx.set_global_alpha(bg.fill_opacity);
			ctx.set_fill_style_str(&bg.fill);
			rounded_rect(ctx, x - w / 2.0, y - h / 2.0, w, h, bg.rx.max(bg.ry));
		}
		None => {
			ctx.set_fill_style_str(&theme.edge_label_bg.to_css());
			rounded_rect(ctx, x - w / 2.0, y - h / 2.0, w, h, 2.0);
		}
	}
	ctx.fill();
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str(&text_fill);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
}

fn draw_connection_line(state: &FlowCanvasState, nodes: &[Node], ctx: &CanvasRenderingContext2d) {
	let Some(connection) = &state.connection else {
		return;
	};
	let Some(node) = nodes.iter().find(|n| n.id == connection.node_id) else {
		return;
	};
	let anchor = geometry::handle_position(node, connection.handle);
	let curve = match connection.handle {
		HandleType::Source => geometry::CubicBezier::vertical(anchor, connection.cursor),
		HandleType::Target => geometry::CubicBezier::vertical(connection.cursor, anchor),
	};

	let k = state.viewport.zoom;
	ctx.set_stroke_style_str(&state.theme.connection_line.to_css());
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(5.0 / k),
		&JsValue::from_f64(5.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(curve.p0.x, curve.p0.y);
	ctx.bezier_curve_to(curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x, curve.p3.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &FlowCanvasState, nodes: &[Node], ctx: &CanvasRenderingContext2d) {
	let theme = &state.theme;
	for node in nodes {
		let r = geometry::node_rect(node);

		rounded_rect(ctx, r.x, r.y, r.width, r.height, NODE_CORNER);
		ctx.set_fill_style_str(&theme.node_fill.to_css());
		ctx.fill();
		if node.selected {
			ctx.set_stroke_style_str(&theme.selection.to_css());
			ctx.set_line_width(1.5);
		} else {
			ctx.set_stroke_style_str(&theme.node_border.to_css());
			ctx.set_line_width(1.0);
		}
		ctx.stroke();

		ctx.set_font(NODE_FONT);
		ctx.set_fill_style_str(&theme.node_text.to_css());
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let c = r.center();
		let _ = ctx.fill_text(&node.label, c.x, c.y);

		for handle in [HandleType::Target, HandleType::Source] {
			if geometry::has_handle(node, handle) {
				draw_handle(state, node, handle, ctx);
			}
		}
	}
}

fn draw_handle(state: &FlowCanvasState, node: &Node, handle: HandleType, ctx: &CanvasRenderingContext2d) {
	let p = geometry::handle_position(node, handle);
	let hovered = matches!(&state.hover, Hover::Handle(id, h) if *id == node.id && *h == handle);
	let radius = if hovered { HANDLE_RADIUS * 1.5 } else { HANDLE_RADIUS };

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&state.theme.handle_fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&state.theme.handle_border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke();
}
