//! Zoom-dependent scaling for graph visuals.
//!
//! Node sizes come from the data (centrality-derived), so scaling works on
//! multipliers and clamps rather than a fixed base radius.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the graph. Values in
//!   world-space scale proportionally with zoom.
//! - **Screen-space**: Pixel coordinates on the canvas. Values in
//!   screen-space remain constant regardless of zoom level.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// Use `f64::NEG_INFINITY` or `f64::INFINITY` for unbounded.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so the clamp bounds convert
				// to world units by dividing through.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how dash-pattern visibility scales with zoom level.
#[derive(Clone, Debug)]
#[allow(dead_code, reason = "Constant variant available for custom dash behaviors")]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Multiplier applied to each node's data-driven size.
	pub size_factor: f64,
	/// How the resulting radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Padding added to the radius for hit detection, in screen pixels.
	pub hit_padding: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
}

/// Configuration for edge visual scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Base line width for relation edges, in screen pixels.
	pub line_width: f64,
	/// Line width for synthesized anchor edges, in screen pixels.
	pub anchor_width: f64,
	/// Dash pattern (dash, gap) for rollup and chunk edges, in world units.
	pub dash_pattern: (f64, f64),
	/// How dash visibility scales with zoom. Faded out means solid lines.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Configuration for hover emphasis rings.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width for the ring, in screen pixels.
	pub width: f64,
	/// Ring offset from the node edge, in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				size_factor: 0.5,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: f64::INFINITY,
				},
				hit_padding: 4.0,
				label_size: 11.0,
				label_min_k: 0.5,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				anchor_width: 0.75,
				dash_pattern: (8.0, 4.0),
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.4,
					full_alpha_k: 0.9,
				},
			},
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	size_factor: f64,
	radius_behavior: ScaleBehavior,
	/// Hit padding in world-space.
	pub hit_padding: f64,
	/// Label font string (e.g., "11px sans-serif").
	pub label_font: String,
	/// Relation line width in world-space.
	pub edge_line_width: f64,
	/// Anchor line width in world-space.
	pub anchor_line_width: f64,
	/// Dash pattern in world-space.
	pub dash_pattern: (f64, f64),
	/// Dash visibility [0, 1]. At 0, dashed edges draw solid.
	pub dash_alpha: f64,
	/// Hover ring width in world-space.
	pub ring_width: f64,
	/// Hover ring offset in world-space.
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		Self {
			k,
			size_factor: config.node.size_factor,
			radius_behavior: config.node.radius_behavior.clone(),
			hit_padding: config.node.hit_padding / k,
			label_font: format!("{label_font_size}px sans-serif"),
			edge_line_width: config.edge.line_width / k,
			anchor_line_width: config.edge.anchor_width / k,
			dash_pattern: config.edge.dash_pattern,
			dash_alpha: config.edge.dash_alpha_behavior.apply(k),
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
		}
	}

	/// World-space radius for a node with the given data size.
	pub fn node_radius(&self, size: f64) -> f64 {
		self.radius_behavior.apply(size * self.size_factor, self.k)
	}

	/// World-space hit radius for a node with the given data size.
	pub fn hit_radius(&self, size: f64) -> f64 {
		self.node_radius(size) + self.hit_padding
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: 40.0,
		};
		// Zoomed far out, a tiny node still occupies 4 screen pixels.
		assert_eq!(behavior.apply(1.0, 0.1) * 0.1, 4.0);
		// Zoomed far in, a big node caps at 40 screen pixels.
		assert_eq!(behavior.apply(100.0, 10.0) * 10.0, 40.0);
		// In range, world size passes through.
		assert_eq!(behavior.apply(10.0, 1.0), 10.0);
	}

	#[test]
	fn screen_behavior_counteracts_zoom() {
		let behavior = ScaleBehavior::Screen;
		assert_eq!(behavior.apply(10.0, 2.0) * 2.0, 10.0);
	}

	#[test]
	fn dash_fade_interpolates_and_clamps() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.4,
			full_alpha_k: 0.9,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(1.5), 1.0);
		let mid = fade.apply(0.65);
		assert!(mid > 0.49 && mid < 0.51);
	}

	#[test]
	fn hit_radius_exceeds_node_radius() {
		let values = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert!(values.hit_radius(30.0) > values.node_radius(30.0));
	}
}
