//! Colours used by the canvas renderer.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Light or dark appearance, as in `colorMode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
	/// Dark ink on a light pane.
	Light,
	/// Light ink on a dark pane.
	#[default]
	Dark,
}

/// Resolved colours for one [`ColorMode`].
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Pane fill.
	pub background: Color,
	/// Background dots.
	pub grid_dot: Color,
	/// Node body.
	pub node_fill: Color,
	/// Node outline when unselected.
	pub node_border: Color,
	/// Node label.
	pub node_text: Color,
	/// Node outline when selected.
	pub selection: Color,
	/// Handle dot.
	pub handle_fill: Color,
	/// Handle ring.
	pub handle_border: Color,
	/// Stroke for edges without their own style.
	pub edge: Color,
	/// Stroke for selected edges without their own style.
	pub edge_selected: Color,
	/// Edge label text without a label style.
	pub edge_label_text: Color,
	/// Edge label box without a background style.
	pub edge_label_bg: Color,
	/// Dashed line of an unfinished connection.
	pub connection_line: Color,
}

impl Theme {
	/// Palette for [`ColorMode::Dark`].
	pub fn dark() -> Self {
		Self {
			background: Color::rgb(20, 20, 20),
			grid_dot: Color::rgb(60, 60, 60),
			node_fill: Color::rgb(30, 30, 30),
			node_border: Color::rgb(57, 57, 57),
			node_text: Color::rgb(248, 248, 248),
			selection: Color::rgb(153, 153, 153),
			handle_fill: Color::rgb(46, 46, 46),
			handle_border: Color::rgb(220, 220, 220),
			edge: Color::rgb(62, 62, 62),
			edge_selected: Color::rgb(114, 114, 114),
			edge_label_text: Color::rgb(248, 248, 248),
			edge_label_bg: Color::rgba(20, 20, 20, 0.85),
			connection_line: Color::rgb(177, 177, 183),
		}
	}

	/// Palette for [`ColorMode::Light`].
	pub fn light() -> Self {
		Self {
			background: Color::rgb(250, 250, 250),
			grid_dot: Color::rgb(145, 145, 154),
			node_fill: Color::rgb(255, 255, 255),
			node_border: Color::rgb(26, 25, 43),
			node_text: Color::rgb(34, 34, 34),
			selection: Color::rgb(26, 25, 43),
			handle_fill: Color::rgb(26, 25, 43),
			handle_border: Color::rgb(255, 255, 255),
			edge: Color::rgb(177, 177, 183),
			edge_selected: Color::rgb(85, 85, 85),
			edge_label_text: Color::rgb(34, 34, 34),
			edge_label_bg: Color::rgba(255, 255, 255, 0.85),
			connection_line: Color::rgb(177, 177, 183),
		}
	}

	/// Palette for `mode`.
	pub fn for_mode(mode: ColorMode) -> Self {
		match mode {
			ColorMode::Light => Self::light(),
			ColorMode::Dark => Self::dark(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::for_mode(ColorMode::default())
	}
}
