//! Deterministic community colors and theme-driven style tokens.
//!
//! Two fixed ordered palettes (dark and light mode) with a parallel
//! semantic-group accent and a resting color shared by un-expanded community
//! roots and chunk nodes. Color resolution is a pure function of
//! `(community id, theme mode)` so re-theming can re-resolve every
//! materialized node without touching topology.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Active theme mode, toggled externally via the `data-theme` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	#[default]
	Dark,
	Light,
}

impl ThemeMode {
	/// Parse the document attribute value; anything but "light" is dark.
	pub fn from_attr(value: Option<&str>) -> Self {
		match value {
			Some("light") => Self::Light,
			_ => Self::Dark,
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Self::Dark => Self::Light,
			Self::Light => Self::Dark,
		}
	}
}

/// Number of identity colors per palette.
pub const PALETTE_LEN: usize = 15;

/// Dark-mode identity palette: warm, muted, candlelit.
const DARK_PALETTE: [Color; PALETTE_LEN] = [
	Color::rgb(0xc9, 0xa8, 0x4c), // gold
	Color::rgb(0xda, 0xa5, 0x40), // warm amber
	Color::rgb(0xa0, 0x62, 0x18), // deep amber
	Color::rgb(0xc9, 0x7a, 0x20), // burnt orange
	Color::rgb(0x8b, 0x6b, 0x3a), // tawny gold
	Color::rgb(0x7a, 0x8a, 0x5a), // sage green
	Color::rgb(0x5a, 0x7a, 0x9a), // slate blue
	Color::rgb(0x8a, 0x5a, 0x6a), // dusty rose
	Color::rgb(0x6a, 0x5a, 0x8a), // muted plum
	Color::rgb(0x5a, 0x8a, 0x7a), // teal sage
	Color::rgb(0x9a, 0x7a, 0x5a), // warm khaki
	Color::rgb(0x7a, 0x6a, 0x4a), // dark bronze
	Color::rgb(0xa0, 0x80, 0x60), // sandstone
	Color::rgb(0x6a, 0x80, 0x90), // steel blue
	Color::rgb(0x8a, 0x70, 0x60), // mocha
];

/// Light-mode identity palette: same ordering, deepened for a pale canvas.
const LIGHT_PALETTE: [Color; PALETTE_LEN] = [
	Color::rgb(0x8f, 0x71, 0x1e), // gold
	Color::rgb(0xa1, 0x6f, 0x14), // warm amber
	Color::rgb(0x7a, 0x49, 0x10), // deep amber
	Color::rgb(0x9a, 0x5a, 0x12), // burnt orange
	Color::rgb(0x6b, 0x50, 0x28), // tawny gold
	Color::rgb(0x55, 0x66, 0x38), // sage green
	Color::rgb(0x38, 0x58, 0x7a), // slate blue
	Color::rgb(0x6b, 0x3c, 0x4c), // dusty rose
	Color::rgb(0x4c, 0x3c, 0x6b), // muted plum
	Color::rgb(0x3a, 0x66, 0x56), // teal sage
	Color::rgb(0x78, 0x58, 0x38), // warm khaki
	Color::rgb(0x5a, 0x4c, 0x30), // dark bronze
	Color::rgb(0x80, 0x5e, 0x40), // sandstone
	Color::rgb(0x46, 0x5e, 0x70), // steel blue
	Color::rgb(0x68, 0x50, 0x42), // mocha
];

/// Identity color for a community id. Euclidean modulo keeps the mapping
/// total for negative ids (the unclassified bucket).
pub fn color_for(community: i64, mode: ThemeMode) -> Color {
	let idx = community.rem_euclid(PALETTE_LEN as i64) as usize;
	match mode {
		ThemeMode::Dark => DARK_PALETTE[idx],
		ThemeMode::Light => LIGHT_PALETTE[idx],
	}
}

/// Semantic-group accent color.
pub fn group_accent(mode: ThemeMode) -> Color {
	match mode {
		ThemeMode::Dark => Color::rgb(0x7a, 0x8a, 0x5a),
		ThemeMode::Light => Color::rgb(0x4e, 0x60, 0x30),
	}
}

/// Resting color: un-expanded community roots and chunk nodes.
pub fn resting(mode: ThemeMode) -> Color {
	match mode {
		ThemeMode::Dark => Color::rgb(0x6a, 0x80, 0x90),
		ThemeMode::Light => Color::rgb(0x8c, 0x9c, 0xa8),
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub color_secondary: Color,
	pub use_gradient: bool,
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base color for relation and anchor edges.
	pub color: Color,
	/// Dashed rollup edges between community roots.
	pub rollup_color: Color,
	/// Dashed entity-to-chunk edges.
	pub chunk_color: Color,
	/// Emphasis color for highlighted edges.
	pub highlight_color: Color,
	/// Opacity applied to elements outside the highlight sets.
	pub dim_opacity: f64,
}

/// Text style tokens.
#[derive(Clone, Debug)]
pub struct TextStyle {
	pub label: Color,
	pub label_emphasis: Color,
	pub outline: Color,
}

/// Complete visual theme for one mode.
#[derive(Clone, Debug)]
pub struct Theme {
	pub mode: ThemeMode,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub text: TextStyle,
}

impl Theme {
	pub fn for_mode(mode: ThemeMode) -> Self {
		match mode {
			ThemeMode::Dark => Self::dark(),
			ThemeMode::Light => Self::light(),
		}
	}

	/// Warm dark theme.
	pub fn dark() -> Self {
		Self {
			mode: ThemeMode::Dark,
			background: BackgroundStyle {
				color: Color::rgb(0x0a, 0x0a, 0x12),
				color_secondary: Color::rgb(0x14, 0x12, 0x1c),
				use_gradient: true,
				vignette: 0.18,
			},
			edge: EdgeStyle {
				color: Color::rgba(0x8a, 0x7a, 0x50, 0.45),
				rollup_color: Color::rgba(0x3a, 0x30, 0x20, 0.6),
				chunk_color: Color::rgba(0x6a, 0x80, 0x90, 0.5),
				highlight_color: Color::rgb(0xc9, 0xa8, 0x4c),
				dim_opacity: 0.12,
			},
			text: TextStyle {
				label: Color::rgb(0xd4, 0xc1, 0x8a),
				label_emphasis: Color::rgb(0xf0, 0xe0, 0xc0),
				outline: Color::rgb(0x0a, 0x0a, 0x12),
			},
		}
	}

	/// Pale parchment theme.
	pub fn light() -> Self {
		Self {
			mode: ThemeMode::Light,
			background: BackgroundStyle {
				color: Color::rgb(0xf5, 0xf0, 0xe4),
				color_secondary: Color::rgb(0xec, 0xe4, 0xd2),
				use_gradient: true,
				vignette: 0.08,
			},
			edge: EdgeStyle {
				color: Color::rgba(0x6b, 0x5c, 0x34, 0.5),
				rollup_color: Color::rgba(0x9a, 0x8c, 0x70, 0.6),
				chunk_color: Color::rgba(0x46, 0x5e, 0x70, 0.5),
				highlight_color: Color::rgb(0x8f, 0x71, 0x1e),
				dim_opacity: 0.15,
			},
			text: TextStyle {
				label: Color::rgb(0x4a, 0x40, 0x28),
				label_emphasis: Color::rgb(0x2a, 0x22, 0x10),
				outline: Color::rgb(0xf5, 0xf0, 0xe4),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
