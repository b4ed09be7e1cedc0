//! Canvas behaviour options.

use super::theme::ColorMode;

/// Options for [`FlowCanvas`](super::FlowCanvas). `Default` matches the demo.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowConfig {
	/// Palette selection.
	pub color_mode: ColorMode,
	/// Frame all nodes on the first frame.
	pub fit_view: bool,
	/// Lower zoom bound.
	pub min_zoom: f64,
	/// Upper zoom bound.
	pub max_zoom: f64,
	/// Spacing of the background dot grid, in flow units.
	pub grid_gap: f64,
	/// Draw the dot grid.
	pub show_background: bool,
	/// Show the zoom in / zoom out / fit view buttons.
	pub show_controls: bool,
	/// Screen-space distance within which a dropped connection snaps to a handle.
	pub connection_radius: f64,
	/// `KeyboardEvent.key` values that delete the selection.
	pub delete_keys: Vec<String>,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			color_mode: ColorMode::Dark,
			fit_view: true,
			min_zoom: 0.5,
			max_zoom: 2.0,
			grid_gap: 20.0,
			show_background: true,
			show_controls: true,
			connection_radius: 20.0,
			delete_keys: vec!["Backspace".into(), "Delete".into()],
		}
	}
}

impl FlowConfig {
	/// Whether `key` is one of [`FlowConfig::delete_keys`].
	pub fn is_delete_key(&self, key: &str) -> bool {
		self.delete_keys.iter().any(|k| k == key)
	}
}
