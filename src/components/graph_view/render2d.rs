//! Planar canvas backend.
//!
//! Draws the materialized graph under a pan/zoom transform in passes for
//! correct z-ordering: background, edges, dimmed nodes, highlighted nodes,
//! labels. Highlighting is binary: with an active highlight, everything
//! outside the highlight sets drops to the theme's dim opacity.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::model::{EdgeKind, GraphNode, NodeId};
use super::palette::Theme;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;

/// Pan and zoom transform applied to the entire planar view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to 0.1..10.0.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom about a screen-space anchor so the point under the cursor stays
	/// under the cursor.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let (wx, wy) = self.screen_to_world(sx, sy);
		self.k = (self.k * factor).clamp(0.1, 10.0);
		self.x = sx - wx * self.k;
		self.y = sy - wy * self.k;
	}

	/// Center the world-space bounds in the viewport with a margin.
	pub fn fit(&mut self, bounds: (f64, f64, f64, f64), width: f64, height: f64) {
		let (min_x, min_y, max_x, max_y) = bounds;
		let (span_x, span_y) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let margin = 60.0;
		let k = ((width - margin * 2.0) / span_x)
			.min((height - margin * 2.0) / span_y)
			.clamp(0.1, 10.0);
		self.k = k;
		self.x = width / 2.0 - (min_x + span_x / 2.0) * k;
		self.y = height / 2.0 - (min_y + span_y / 2.0) * k;
	}
}

/// Planar backend view state: transform plus viewport size.
#[derive(Clone, Debug)]
pub struct PlanarView {
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
}

impl PlanarView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
		}
	}

	/// Topmost node under a screen position, honoring per-node hit radii.
	/// Later arena entries (chunks, freshly expanded children) win ties.
	pub fn pick(&self, state: &GraphState, config: &ScaleConfig, sx: f64, sy: f64) -> Option<NodeId> {
		let (wx, wy) = self.transform.screen_to_world(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		for node in state.nodes.iter() {
			let (dx, dy) = (node.pos.x - wx, node.pos.y - wy);
			let hit = scale.hit_radius(node.size);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.id.clone());
			}
		}
		found
	}

	pub fn fit_to(&mut self, state: &GraphState) {
		if let Some((min, max)) = super::layout::bounds(state) {
			self.transform
				.fit((min.x, min.y, max.x, max.y), self.width, self.height);
		}
	}
}

/// Render the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	view: &PlanarView,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, view.transform.k);

	draw_background(view, ctx, theme);

	ctx.save();
	let _ = ctx.translate(view.transform.x, view.transform.y);
	let _ = ctx.scale(view.transform.k, view.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(view, ctx, theme);
	}
}

fn draw_background(view: &PlanarView, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				view.width / 2.0,
				view.height / 2.0,
				0.0,
				view.width / 2.0,
				view.height / 2.0,
				view.width.max(view.height) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, view.width, view.height);
}

fn draw_vignette(view: &PlanarView, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			view.width / 2.0,
			view.height / 2.0,
			view.width.min(view.height) * 0.3,
			view.width / 2.0,
			view.height / 2.0,
			view.width.max(view.height) * 0.7,
		)
		.unwrap();

	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
}

fn draw_edges(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let dimming = !state.highlight.is_empty();

	for edge in state.edges.iter() {
		let (Some(source), Some(target)) =
			(state.nodes.get(&edge.source), state.nodes.get(&edge.target))
		else {
			continue;
		};
		let (x1, y1, x2, y2) = (source.pos.x, source.pos.y, target.pos.x, target.pos.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let highlighted = state.highlight.edge_highlighted(&edge.id);
		let base = match edge.kind {
			EdgeKind::Rollup => theme.edge.rollup_color,
			EdgeKind::Chunk => theme.edge.chunk_color,
			EdgeKind::Relation | EdgeKind::Anchor => theme.edge.color,
		};
		let color = if highlighted {
			theme.edge.highlight_color.with_alpha(0.9)
		} else if dimming {
			base.with_alpha(base.a * theme.edge.dim_opacity)
		} else {
			base
		};
		let width = match edge.kind {
			EdgeKind::Anchor => scale.anchor_line_width,
			// Relation width follows the edge weight lightly.
			_ => scale.edge_line_width * (1.0 + 0.3 * edge.weight.unwrap_or(1.0).min(3.0)),
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(if highlighted { width * 1.4 } else { width });

		// Rollup and chunk edges stay dashed; the dash fades to a solid line
		// when zoomed far out.
		let dashed = matches!(edge.kind, EdgeKind::Rollup | EdgeKind::Chunk);
		let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
		if dashed && effective_gap > 0.1 {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(scale.dash_pattern.0),
				&JsValue::from_f64(effective_gap),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (scale.node_radius(source.size), scale.node_radius(target.size));
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * r2, y2 - uy * r2);
		ctx.stroke();
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let dimming = !state.highlight.is_empty();

	// Pass 1: dimmed nodes under everything.
	for node in state.nodes.iter() {
		if dimming && !state.highlight.node_highlighted(&node.id) {
			draw_node(ctx, node, scale, theme, theme.edge.dim_opacity, false);
		}
	}

	// Pass 2: full-opacity nodes on top.
	for node in state.nodes.iter() {
		if !dimming || state.highlight.node_highlighted(&node.id) {
			let focused = state.highlight.focused() == Some(node.id.as_str());
			draw_node(ctx, node, scale, theme, 1.0, focused);
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	focused: bool,
) {
	let (x, y) = (node.pos.x, node.pos.y);
	let radius = scale.node_radius(node.size);

	ctx.set_global_alpha(alpha);

	let gradient = ctx
		.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
		.unwrap();
	gradient
		.add_color_stop(0.0, &node.color.lighten(0.4).to_css())
		.unwrap();
	gradient.add_color_stop(0.7, &node.color.to_css()).unwrap();
	gradient
		.add_color_stop(1.0, &node.color.darken(0.2).to_css())
		.unwrap();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();

	if focused {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.edge.highlight_color.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
	}

	if alpha > 0.5 && !node.label.is_empty() {
		let text = if focused {
			theme.text.label_emphasis
		} else {
			theme.text.label
		};
		ctx.set_fill_style_str(&text.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&node.label, x + radius + 4.0, y + 3.0);
	}

	ctx.set_global_alpha(1.0);
}
