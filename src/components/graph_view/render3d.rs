//! Spherical canvas backend.
//!
//! Projects the sphere-constrained positions orthographically after a
//! yaw/pitch view rotation. Depth ordering uses the painter's algorithm on
//! rotated `z`; nodes on the far side of the sphere fade toward the
//! background instead of disappearing, so the shell stays legible while it
//! spins.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::model::{EdgeKind, NodeId, Vec3};
use super::palette::Theme;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;

/// Opacity floor for far-side elements.
const FAR_SIDE_FLOOR: f64 = 0.15;

/// Sphere backend view state: rotation, zoom, and viewport size.
#[derive(Clone, Debug)]
pub struct SphereView {
	pub yaw: f64,
	pub pitch: f64,
	/// Zoom factor, clamped to 0.1..10.0.
	pub zoom: f64,
	pub width: f64,
	pub height: f64,
}

impl SphereView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			yaw: 0.0,
			pitch: 0.0,
			zoom: 1.0,
			width,
			height,
		}
	}

	/// Apply a pointer drag as a rotation. Pitch clamps short of the poles to
	/// keep "up" stable.
	pub fn rotate(&mut self, dx: f64, dy: f64) {
		self.yaw += dx * 0.005;
		self.pitch = (self.pitch + dy * 0.005).clamp(-PI / 2.0 + 0.05, PI / 2.0 - 0.05);
	}

	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom = (self.zoom * factor).clamp(0.1, 10.0);
	}

	/// Scale the zoom so the sphere fills the viewport with a margin.
	pub fn fit_to(&mut self, state: &GraphState) {
		let radius = state.config.sphere_radius.max(1.0);
		let margin = 60.0;
		self.zoom = ((self.width.min(self.height) / 2.0 - margin) / radius).clamp(0.1, 10.0);
	}

	/// Rotate a world position into view space. `z` grows toward the viewer.
	fn rotate_point(&self, p: Vec3) -> Vec3 {
		let (sin_y, cos_y) = self.yaw.sin_cos();
		let (sin_p, cos_p) = self.pitch.sin_cos();
		// Yaw about the vertical axis, then pitch about the horizontal.
		let x1 = p.x * cos_y + p.z * sin_y;
		let z1 = -p.x * sin_y + p.z * cos_y;
		let y2 = p.y * cos_p - z1 * sin_p;
		let z2 = p.y * sin_p + z1 * cos_p;
		Vec3::new(x1, y2, z2)
	}

	/// Project to screen space. Returns `(sx, sy, depth)` with depth in
	/// `[-1, 1]`, positive toward the viewer.
	pub fn project(&self, state: &GraphState, p: Vec3) -> (f64, f64, f64) {
		let rotated = self.rotate_point(p);
		let radius = state.config.sphere_radius.max(1.0);
		(
			self.width / 2.0 + rotated.x * self.zoom,
			self.height / 2.0 - rotated.y * self.zoom,
			(rotated.z / radius).clamp(-1.0, 1.0),
		)
	}

	/// Front-most node under a screen position.
	pub fn pick(&self, state: &GraphState, config: &ScaleConfig, sx: f64, sy: f64) -> Option<NodeId> {
		let scale = ScaledValues::new(config, self.zoom);
		let mut best: Option<(NodeId, f64)> = None;
		for node in state.nodes.iter() {
			let (px, py, depth) = self.project(state, node.pos);
			let (dx, dy) = (px - sx, py - sy);
			let hit = scale.hit_radius(node.size) * self.zoom;
			if (dx * dx + dy * dy).sqrt() < hit
				&& best.as_ref().is_none_or(|(_, d)| depth > *d)
			{
				best = Some((node.id.clone(), depth));
			}
		}
		best.map(|(id, _)| id)
	}
}

/// Depth-based opacity: full on the near side, fading to the floor on the
/// far side.
fn depth_alpha(depth: f64) -> f64 {
	let t = (depth + 1.0) / 2.0;
	FAR_SIDE_FLOOR + (1.0 - FAR_SIDE_FLOOR) * t
}

/// Render the sphere-constrained graph to the canvas.
pub fn render(
	state: &GraphState,
	view: &SphereView,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, view.zoom);
	let dimming = !state.highlight.is_empty();

	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, view.width, view.height);

	// Edges first: their depth is the mean of the endpoints.
	for edge in state.edges.iter() {
		let (Some(source), Some(target)) =
			(state.nodes.get(&edge.source), state.nodes.get(&edge.target))
		else {
			continue;
		};
		let (x1, y1, d1) = view.project(state, source.pos);
		let (x2, y2, d2) = view.project(state, target.pos);

		let highlighted = state.highlight.edge_highlighted(&edge.id);
		let base = match edge.kind {
			EdgeKind::Rollup => theme.edge.rollup_color,
			EdgeKind::Chunk => theme.edge.chunk_color,
			EdgeKind::Relation | EdgeKind::Anchor => theme.edge.color,
		};
		let mut alpha = base.a * depth_alpha((d1 + d2) / 2.0);
		if dimming && !highlighted {
			alpha *= theme.edge.dim_opacity;
		}
		let color = if highlighted {
			theme.edge.highlight_color.with_alpha(0.9)
		} else {
			base.with_alpha(alpha)
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(match edge.kind {
			EdgeKind::Anchor => scale.anchor_line_width * view.zoom,
			_ => scale.edge_line_width * view.zoom,
		});
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}

	// Painter's algorithm: far nodes first.
	let mut order: Vec<(&str, f64)> = state
		.nodes
		.iter()
		.map(|n| {
			let (_, _, depth) = view.project(state, n.pos);
			(n.id.as_str(), depth)
		})
		.collect();
	order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

	for (id, depth) in order {
		let Some(node) = state.nodes.get(id) else {
			continue;
		};
		let (x, y, _) = view.project(state, node.pos);
		let radius = scale.node_radius(node.size) * view.zoom;

		let mut alpha = depth_alpha(depth);
		if dimming && !state.highlight.node_highlighted(id) {
			alpha *= theme.edge.dim_opacity;
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color.to_css());
		ctx.fill();

		if state.highlight.focused() == Some(id) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset * view.zoom, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.edge.highlight_color.to_css());
			ctx.set_line_width(scale.ring_width * view.zoom);
			ctx.stroke();
		}

		// Labels only for near-side, sufficiently visible nodes.
		if depth > 0.0 && alpha > 0.5 && !node.label.is_empty() {
			ctx.set_fill_style_str(&theme.text.label.to_css());
			ctx.set_font(&scale.label_font);
			let _ = ctx.fill_text(&node.label, x + radius + 4.0, y + 3.0);
		}
		ctx.set_global_alpha(1.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::layout::seed_sphere_positions;
	use crate::components::graph_view::model::tests::sample_dataset;
	use crate::components::graph_view::palette::ThemeMode;
	use crate::components::graph_view::state::GraphState;

	fn state() -> GraphState {
		GraphState::new(sample_dataset(), ThemeMode::Dark)
	}

	#[test]
	fn projection_is_depth_bounded() {
		let mut s = state();
		seed_sphere_positions(&mut s);
		let view = SphereView::new(800.0, 600.0);
		for node in s.nodes.iter() {
			let (_, _, depth) = view.project(&s, node.pos);
			assert!((-1.0..=1.0).contains(&depth));
		}
	}

	#[test]
	fn rotation_preserves_radius() {
		let s = state();
		let mut view = SphereView::new(800.0, 600.0);
		view.rotate(120.0, -45.0);
		let p = Vec3::new(0.0, 0.0, s.config.sphere_radius);
		let rotated = view.rotate_point(p);
		assert!((rotated.norm() - s.config.sphere_radius).abs() < 1e-6);
	}

	#[test]
	fn pitch_clamps_short_of_the_poles() {
		let mut view = SphereView::new(800.0, 600.0);
		view.rotate(0.0, 1e6);
		assert!(view.pitch < PI / 2.0);
		view.rotate(0.0, -1e7);
		assert!(view.pitch > -PI / 2.0);
	}

	#[test]
	fn far_side_fades_but_stays_visible() {
		assert!((depth_alpha(1.0) - 1.0).abs() < 1e-9);
		assert!(depth_alpha(-1.0) > 0.0);
		assert!(depth_alpha(-1.0) < depth_alpha(0.0));
	}

	#[test]
	fn pick_prefers_the_near_side() {
		let mut s = state();
		// Two nodes on the view axis: one toward the viewer, one behind.
		s.nodes.get_mut("comm-5").unwrap().pos = Vec3::new(0.0, 0.0, s.config.sphere_radius);
		s.nodes.get_mut("comm-7").unwrap().pos = Vec3::new(0.0, 0.0, -s.config.sphere_radius);
		s.nodes.get_mut("comm-other").unwrap().pos =
			Vec3::new(s.config.sphere_radius, 0.0, 0.0);
		let view = SphereView::new(800.0, 600.0);
		let config = ScaleConfig::default();
		let picked = view.pick(&s, &config, 400.0, 300.0);
		assert_eq!(picked.as_deref(), Some("comm-5"));
	}
}
