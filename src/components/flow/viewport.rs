use super::geometry::Rect;
use super::types::XYPosition;

/// Step used by the zoom in / zoom out controls.
pub const ZOOM_STEP: f64 = 1.2;
/// Share of the canvas left empty around the nodes by fit view.
pub const FIT_PADDING: f64 = 0.1;

/// Pan/zoom transform from flow coordinates to canvas pixels:
/// `screen = flow * zoom + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub zoom: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			zoom: 1.0,
		}
	}
}

impl Viewport {
	pub fn screen_to_flow(&self, sx: f64, sy: f64) -> XYPosition {
		XYPosition::new((sx - self.x) / self.zoom, (sy - self.y) / self.zoom)
	}

	pub fn flow_to_screen(&self, p: XYPosition) -> (f64, f64) {
		(p.x * self.zoom + self.x, p.y * self.zoom + self.y)
	}

	/// Scale by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, min: f64, max: f64) {
		let zoom = (self.zoom * factor).clamp(min, max);
		let ratio = zoom / self.zoom;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.zoom = zoom;
	}

	/// Centre `bounds` in a `width` × `height` canvas.
	pub fn fit(bounds: Rect, width: f64, height: f64, min: f64, max: f64) -> Self {
		let w = bounds.width.max(1.0);
		let h = bounds.height.max(1.0);
		let usable = 1.0 - 2.0 * FIT_PADDING;
		let zoom = (width * usable / w).min(height * usable / h).clamp(min, max);
		let center = bounds.center();
		Self {
			x: width / 2.0 - center.x * zoom,
			y: height / 2.0 - center.y * zoom,
			zoom,
		}
	}
}
