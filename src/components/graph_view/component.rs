//! Leptos component wrapping the knowledge-graph canvas.
//!
//! The component creates an HTML canvas, wires pointer handlers for click,
//! hover, drag, and zoom, and runs an animation loop via
//! `requestAnimationFrame`. The graph state lives in an `Rc<RefCell<...>>`
//! shared by the loop and every handler; reactive signals carry the derived
//! panel, legend, and level-indicator views into the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::error::GraphError;
use super::layout;
use super::model::{EdgeKind, GraphDataset, NodeId, NodeKind};
use super::palette::{Theme, ThemeMode};
use super::panel::{self, DetailView, LegendRow};
use super::render2d::{self, PlanarView};
use super::render3d::{self, SphereView};
use super::scale::ScaleConfig;
use super::state::GraphState;

/// Which projection draws the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
	#[default]
	Planar,
	Sphere,
}

/// A renderer backend. Owns its view parameters (transform or rotation) and
/// projects the shared [`GraphState`]; it never mutates topology.
trait RendererAdapter {
	fn kind(&self) -> BackendKind;
	/// Re-derive positions after a topology change.
	fn sync(&mut self, state: &mut GraphState);
	/// Advance any continuous simulation by `dt` seconds.
	fn tick(&mut self, state: &mut GraphState, dt: f64);
	fn draw(
		&self,
		state: &GraphState,
		ctx: &CanvasRenderingContext2d,
		config: &ScaleConfig,
		theme: &Theme,
	);
	fn pick(&self, state: &GraphState, config: &ScaleConfig, sx: f64, sy: f64) -> Option<NodeId>;
	/// Apply a background drag: pan in the plane, rotate on the sphere.
	fn drag(&mut self, dx: f64, dy: f64);
	fn zoom(&mut self, sx: f64, sy: f64, factor: f64);
	fn fit(&mut self, state: &GraphState);
	fn resize(&mut self, width: f64, height: f64);
	/// Planar view access for screen-space hit tests on edges.
	fn planar(&self) -> Option<&PlanarView> {
		None
	}
}

struct PlanarBackend(PlanarView);

impl RendererAdapter for PlanarBackend {
	fn kind(&self) -> BackendKind {
		BackendKind::Planar
	}

	fn sync(&mut self, state: &mut GraphState) {
		let expanded: Vec<i64> = state
			.dataset()
			.payloads
			.keys()
			.copied()
			.filter(|&c| state.is_expanded(c))
			.collect();
		for community in expanded {
			layout::place_children(state, community);
		}
		layout::relayout_top_level(state);
		if let Some(entity) = state.chunk_entity().map(str::to_string) {
			layout::place_chunks(state, &entity);
		}
	}

	fn tick(&mut self, _state: &mut GraphState, _dt: f64) {}

	fn draw(
		&self,
		state: &GraphState,
		ctx: &CanvasRenderingContext2d,
		config: &ScaleConfig,
		theme: &Theme,
	) {
		render2d::render(state, &self.0, ctx, config, theme);
	}

	fn pick(&self, state: &GraphState, config: &ScaleConfig, sx: f64, sy: f64) -> Option<NodeId> {
		self.0.pick(state, config, sx, sy)
	}

	fn drag(&mut self, dx: f64, dy: f64) {
		self.0.transform.x += dx;
		self.0.transform.y += dy;
	}

	fn zoom(&mut self, sx: f64, sy: f64, factor: f64) {
		self.0.transform.zoom_at(sx, sy, factor);
	}

	fn fit(&mut self, state: &GraphState) {
		self.0.fit_to(state);
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.0.width = width;
		self.0.height = height;
	}

	fn planar(&self) -> Option<&PlanarView> {
		Some(&self.0)
	}
}

struct SphereBackend(SphereView);

impl RendererAdapter for SphereBackend {
	fn kind(&self) -> BackendKind {
		BackendKind::Sphere
	}

	fn sync(&mut self, state: &mut GraphState) {
		layout::seed_sphere_positions(state);
	}

	fn tick(&mut self, state: &mut GraphState, dt: f64) {
		layout::sphere_tick(state, dt);
	}

	fn draw(
		&self,
		state: &GraphState,
		ctx: &CanvasRenderingContext2d,
		config: &ScaleConfig,
		theme: &Theme,
	) {
		render3d::render(state, &self.0, ctx, config, theme);
	}

	fn pick(&self, state: &GraphState, config: &ScaleConfig, sx: f64, sy: f64) -> Option<NodeId> {
		self.0.pick(state, config, sx, sy)
	}

	fn drag(&mut self, dx: f64, dy: f64) {
		self.0.rotate(dx, dy);
	}

	fn zoom(&mut self, _sx: f64, _sy: f64, factor: f64) {
		self.0.zoom_by(factor);
	}

	fn fit(&mut self, state: &GraphState) {
		self.0.fit_to(state);
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.0.width = width;
		self.0.height = height;
	}
}

fn make_backend(kind: BackendKind, width: f64, height: f64) -> Box<dyn RendererAdapter> {
	match kind {
		BackendKind::Planar => Box::new(PlanarBackend(PlanarView::new(width, height))),
		BackendKind::Sphere => Box::new(SphereBackend(SphereView::new(width, height))),
	}
}

/// Bundles graph state with the active backend and visual configuration.
struct GraphContext {
	state: GraphState,
	backend: Box<dyn RendererAdapter>,
	scale: ScaleConfig,
	theme: Theme,
}

/// Pointer gesture tracking between mousedown and mouseup.
#[derive(Clone, Copy, Debug, Default)]
struct PointerState {
	down: bool,
	last_x: f64,
	last_y: f64,
	/// Accumulated drag distance; below [`CLICK_SLOP`] the gesture is a click.
	moved: f64,
}

/// Maximum pointer travel (px) for a press to still count as a click.
const CLICK_SLOP: f64 = 4.0;

/// Canvas-init retry schedule: the canvas 2d context can be briefly
/// unavailable right after mount.
const INIT_RETRY_MS: u32 = 120;
const MAX_INIT_ATTEMPTS: u32 = 5;

/// Screen-space distance for rollup-edge tooltips.
const EDGE_HOVER_PX: f64 = 6.0;

/// Derived UI state pushed into the DOM after every interaction.
#[derive(Clone, Copy)]
struct UiSignals {
	detail: RwSignal<DetailView>,
	legend: RwSignal<Vec<LegendRow>>,
	level: RwSignal<String>,
	tooltip: RwSignal<Option<(String, f64, f64)>>,
	fault: RwSignal<Option<String>>,
}

fn sync_ui(c: &GraphContext, ui: &UiSignals) {
	ui.detail.set(panel::detail_view(&c.state));
	ui.legend.set(panel::legend_rows(&c.state));
	ui.level.set(c.state.level_indicator());
}

/// Rollup-edge tooltip text when the cursor sits on one (planar only).
fn rollup_tooltip(state: &GraphState, view: &PlanarView, sx: f64, sy: f64) -> Option<String> {
	let (wx, wy) = view.transform.screen_to_world(sx, sy);
	let threshold = EDGE_HOVER_PX / view.transform.k;
	for edge in state.edges.iter() {
		if edge.kind != EdgeKind::Rollup {
			continue;
		}
		let (Some(a), Some(b)) = (state.nodes.get(&edge.source), state.nodes.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (b.pos.x - a.pos.x, b.pos.y - a.pos.y);
		let len_sq = dx * dx + dy * dy;
		if len_sq < 1e-9 {
			continue;
		}
		let t = (((wx - a.pos.x) * dx + (wy - a.pos.y) * dy) / len_sq).clamp(0.0, 1.0);
		let (px, py) = (a.pos.x + t * dx, a.pos.y + t * dy);
		let dist = ((wx - px).powi(2) + (wy - py).powi(2)).sqrt();
		if dist < threshold {
			let mut lines = Vec::new();
			if let Some(desc) = &edge.description {
				lines.push(desc.clone());
			}
			lines.extend(edge.details.iter().cloned());
			if lines.is_empty() {
				lines.push(format!("weight {}", edge.weight.unwrap_or(0.0)));
			}
			return Some(lines.join("\n"));
		}
	}
	None
}

/// Tooltip body for a hovered node, if it warrants one.
fn node_tooltip(state: &GraphState, id: &str) -> Option<String> {
	let node = state.nodes.get(id)?;
	match &node.kind {
		NodeKind::Chunk {
			text_idx,
			source_id,
			..
		} => {
			let text = state.dataset().chunk_text(*text_idx);
			Some(format!("{source_id}\n{text}"))
		}
		_ => None,
	}
}

type SharedContext = SendWrapper<Rc<RefCell<Option<GraphContext>>>>;

fn canvas_size(canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	let fallback = (
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(1200.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
	);
	match canvas.parent_element() {
		Some(parent) if parent.client_width() > 0 => (
			parent.client_width() as f64,
			parent.client_height().max(400) as f64,
		),
		_ => fallback,
	}
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn try_init(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	dataset: &GraphDataset,
	context: &SharedContext,
	animate: &SharedClosure,
	resize_cb: &SharedClosure,
	ui: UiSignals,
	mode: ThemeMode,
) -> Result<(), GraphError> {
	let canvas = canvas_ref
		.get_untracked()
		.ok_or_else(|| GraphError::RenderInit("canvas element not mounted".into()))?;
	let canvas: HtmlCanvasElement = canvas.into();
	let window = web_sys::window()
		.ok_or_else(|| GraphError::RenderInit("no window object".into()))?;

	let (w, h) = canvas_size(&canvas, &window);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|_| GraphError::RenderInit("2d context request failed".into()))?
		.ok_or_else(|| GraphError::RenderInit("2d context unavailable".into()))?
		.dyn_into()
		.map_err(|_| GraphError::RenderInit("unexpected context type".into()))?;

	let mut state = GraphState::new(dataset.clone(), mode);
	let mut backend = make_backend(BackendKind::default(), w, h);
	backend.sync(&mut state);
	backend.fit(&state);

	let graph_context = GraphContext {
		state,
		backend,
		scale: ScaleConfig::default(),
		theme: Theme::for_mode(mode),
	};
	sync_ui(&graph_context, &ui);
	*context.borrow_mut() = Some(graph_context);

	let (context_anim, animate_inner) = (context.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut c) = *context_anim.borrow_mut() {
			let GraphContext {
				state,
				backend,
				scale,
				theme,
			} = c;
			backend.tick(state, 0.016);
			backend.draw(state, &ctx, scale, theme);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			if let Some(win) = web_sys::window() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}

	let (context_resize, canvas_resize) = (context.clone(), canvas.clone());
	*resize_cb.borrow_mut() = Some(Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (w, h) = canvas_size(&canvas_resize, &win);
		canvas_resize.set_width(w as u32);
		canvas_resize.set_height(h as u32);
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			c.backend.resize(w, h);
		}
	}));
	if let Some(ref cb) = *resize_cb.borrow() {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	Ok(())
}

fn init_with_retry(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	dataset: GraphDataset,
	context: SharedContext,
	animate: SharedClosure,
	resize_cb: SharedClosure,
	ui: UiSignals,
	mode: ThemeMode,
	attempt: u32,
) {
	match try_init(canvas_ref, &dataset, &context, &animate, &resize_cb, ui, mode) {
		Ok(()) => {}
		Err(err) if attempt + 1 < MAX_INIT_ATTEMPTS => {
			warn!("canvas init attempt {} failed: {err}", attempt + 1);
			Timeout::new(INIT_RETRY_MS, move || {
				init_with_retry(
					canvas_ref,
					dataset,
					context,
					animate,
					resize_cb,
					ui,
					mode,
					attempt + 1,
				);
			})
			.forget();
		}
		Err(err) => {
			ui.fault.set(Some(err.to_string()));
		}
	}
}

/// Initial theme mode from the document's `data-theme` attribute.
fn initial_theme() -> ThemeMode {
	let attr = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element())
		.and_then(|el| el.get_attribute("data-theme"));
	ThemeMode::from_attr(attr.as_deref())
}

/// Pointer position relative to the canvas.
fn event_pos(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive hierarchical knowledge-graph explorer.
///
/// Renders the community overview on a canvas with a legend, level
/// indicator, toolbar, and a detail side panel. `data` stays `None` until
/// the payload fetch resolves; the component shows a loading state until
/// then and surfaces load failures inline.
#[component]
pub fn GraphExplorer(#[prop(into)] data: Signal<Option<GraphDataset>>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = SendWrapper::new(Rc::new(RefCell::new(None)));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let pointer = Rc::new(RefCell::new(PointerState::default()));

	let ui = UiSignals {
		detail: RwSignal::new(DetailView::Placeholder),
		legend: RwSignal::new(Vec::new()),
		level: RwSignal::new(String::new()),
		tooltip: RwSignal::new(None),
		fault: RwSignal::new(None),
	};
	let sidebar_open = RwSignal::new(true);
	let theme_mode = RwSignal::new(initial_theme());
	let backend_kind = RwSignal::new(BackendKind::Planar);

	let (context_init, animate_init, resize_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(dataset) = data.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		init_with_retry(
			canvas_ref,
			dataset,
			context_init.clone(),
			animate_init.clone(),
			resize_init.clone(),
			ui,
			theme_mode.get_untracked(),
			0,
		);
	});

	let pointer_md = pointer.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = event_pos(canvas_ref, &ev) else {
			return;
		};
		*pointer_md.borrow_mut() = PointerState {
			down: true,
			last_x: x,
			last_y: y,
			moved: 0.0,
		};
	};

	let (context_mm, pointer_mm) = (context.clone(), pointer.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = event_pos(canvas_ref, &ev) else {
			return;
		};
		let mut p = pointer_mm.borrow_mut();
		if p.down {
			let (dx, dy) = (x - p.last_x, y - p.last_y);
			p.moved += dx.abs() + dy.abs();
			p.last_x = x;
			p.last_y = y;
			if let Some(ref mut c) = *context_mm.borrow_mut() {
				c.backend.drag(dx, dy);
			}
			return;
		}
		drop(p);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let hovered = c.backend.pick(&c.state, &c.scale, x, y);
			c.state.hover(hovered.as_deref());

			let tip = hovered
				.as_deref()
				.and_then(|id| node_tooltip(&c.state, id))
				.or_else(|| {
					c.backend
						.planar()
						.and_then(|view| rollup_tooltip(&c.state, view, x, y))
				});
			ui.tooltip.set(tip.map(|text| (text, x + 12.0, y + 12.0)));
		}
	};

	let (context_mu, pointer_mu) = (context.clone(), pointer.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = event_pos(canvas_ref, &ev) else {
			return;
		};
		let was_click = {
			let mut p = pointer_mu.borrow_mut();
			let was_click = p.down && p.moved < CLICK_SLOP;
			p.down = false;
			was_click
		};
		if !was_click {
			return;
		}
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let picked = c.backend.pick(&c.state, &c.scale, x, y);
			match c.state.handle_click(picked.as_deref()) {
				Ok(()) => {
					c.backend.sync(&mut c.state);
					sync_ui(c, &ui);
				}
				Err(err) => {
					warn!("{err}");
					sync_ui(c, &ui);
					ui.detail.set(DetailView::Fault(err.to_string()));
				}
			}
		}
	};

	let (context_ml, pointer_ml) = (context.clone(), pointer.clone());
	let on_mouseleave = move |_: MouseEvent| {
		pointer_ml.borrow_mut().down = false;
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.hover(None);
		}
		ui.tooltip.set(None);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = event_pos(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.backend.zoom(x, y, factor);
		}
	};

	// Toolbar actions are no-ops until the context exists.
	let context_fit = context.clone();
	let on_fit = move |_| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			c.backend.fit(&c.state);
		}
	};

	let context_collapse = context.clone();
	let on_collapse_all = move |_| {
		if let Some(ref mut c) = *context_collapse.borrow_mut() {
			c.state.collapse_all();
			c.backend.sync(&mut c.state);
			sync_ui(c, &ui);
		}
	};

	// Reset clears chunks, selection, and highlight but keeps every
	// expansion; collapsing is its own control.
	let context_reset = context.clone();
	let on_reset = move |_| {
		if let Some(ref mut c) = *context_reset.borrow_mut() {
			let _ = c.state.handle_click(None);
			c.backend.sync(&mut c.state);
			c.backend.fit(&c.state);
			sync_ui(c, &ui);
		}
	};

	let context_theme = context.clone();
	let on_theme_toggle = move |_| {
		let mode = theme_mode.get_untracked().toggled();
		theme_mode.set(mode);
		if let Some(ref mut c) = *context_theme.borrow_mut() {
			c.state.retheme(mode);
			c.theme = Theme::for_mode(mode);
			sync_ui(c, &ui);
		}
	};

	let context_backend = context.clone();
	let on_backend_toggle = move |_| {
		if let Some(ref mut c) = *context_backend.borrow_mut() {
			let next = match c.backend.kind() {
				BackendKind::Planar => BackendKind::Sphere,
				BackendKind::Sphere => BackendKind::Planar,
			};
			let canvas: Option<HtmlCanvasElement> =
				canvas_ref.get_untracked().map(Into::into);
			let (w, h) = canvas
				.map(|el| (el.width() as f64, el.height() as f64))
				.unwrap_or((1200.0, 800.0));
			c.backend = make_backend(next, w, h);
			c.backend.sync(&mut c.state);
			c.backend.fit(&c.state);
			backend_kind.set(next);
		}
	};

	let context_legend = context.clone();
	let on_legend_click = move |row: LegendRow| {
		if let Some(ref mut c) = *context_legend.borrow_mut() {
			match c.state.legend_click(row.community) {
				Ok(refit) => {
					c.backend.sync(&mut c.state);
					if refit {
						c.backend.fit(&c.state);
					}
					sync_ui(c, &ui);
				}
				Err(err) => {
					warn!("{err}");
					sync_ui(c, &ui);
					ui.detail.set(DetailView::Fault(err.to_string()));
				}
			}
		}
	};

	let context_chunk = context.clone();
	let on_chunk_hover = move |chunk_id: Option<String>| {
		if let Some(ref mut c) = *context_chunk.borrow_mut() {
			c.state.hover(chunk_id.as_deref());
		}
	};

	view! {
		<div class="graph-explorer">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>

			<div class="graph-toolbar">
				<button on:click=on_fit>"Fit"</button>
				<button on:click=on_collapse_all>"Collapse All"</button>
				<button on:click=on_reset>"Reset"</button>
				<button on:click=on_backend_toggle>
					{move || match backend_kind.get() {
						BackendKind::Planar => "3D View",
						BackendKind::Sphere => "2D View",
					}}
				</button>
				<button on:click=on_theme_toggle>
					{move || match theme_mode.get() {
						ThemeMode::Dark => "Light",
						ThemeMode::Light => "Dark",
					}}
				</button>
				<button on:click=move |_| sidebar_open.update(|open| *open = !*open)>
					"Panel"
				</button>
			</div>

			<div class="graph-level">{move || ui.level.get()}</div>

			<div class="graph-legend">
				<For
					each=move || ui.legend.get()
					key=|row| row.community
					children=move |row: LegendRow| {
						let on_click = on_legend_click.clone();
						let clicked = row.clone();
						view! {
							<div class="legend-row" on:click=move |_| on_click(clicked.clone())>
								<span
									class="legend-swatch"
									style=format!("background: {};", row.swatch.to_css())
								/>
								<span class="legend-label">{row.label.clone()}</span>
							</div>
						}
					}
				/>
			</div>

			{move || {
				ui.fault.get().map(|msg| {
					view! { <div class="graph-fault">{msg}</div> }
				})
			}}

			{move || {
				ui.tooltip.get().map(|(text, x, y)| {
					view! {
						<div
							class="graph-tooltip"
							style=format!("position: absolute; left: {x}px; top: {y}px;")
						>
							{text}
						</div>
					}
				})
			}}

			<Show when=move || sidebar_open.get()>
				<aside class="graph-sidebar">
					{
						let on_chunk_hover = on_chunk_hover.clone();
						move || detail_markup(ui.detail.get(), on_chunk_hover.clone())
					}
				</aside>
			</Show>

			<Show when=move || data.get().is_none() && ui.fault.get().is_none()>
				<div class="graph-loading">"Loading graph..."</div>
			</Show>
		</div>
	}
}

/// Side-panel markup for the current detail view.
fn detail_markup(
	detail: DetailView,
	on_chunk_hover: impl Fn(Option<String>) + Clone + 'static,
) -> AnyView {
	match detail {
		DetailView::Placeholder => view! {
			<p class="panel-placeholder">"Select a node to see details."</p>
		}
		.into_any(),
		DetailView::Fault(msg) => view! {
			<div class="panel-fault">{msg}</div>
		}
		.into_any(),
		DetailView::Community(c) => view! {
			<div class="panel-community">
				<h2>{c.label.clone()}</h2>
				<p class="panel-meta">
					{format!(
						"Community {} · {} members · {}",
						c.community,
						c.member_count,
						if c.expanded { "expanded" } else { "collapsed" },
					)}
				</p>
				{c.summary.map(|summary| {
					view! {
						<div class="panel-summary">
							{c.title.map(|t| view! { <h3>{t}</h3> })}
							<p>{summary}</p>
						</div>
					}
				})}
				{(!c.key_insights.is_empty()).then(|| {
					view! {
						<ul class="panel-insights">
							{c.key_insights
								.into_iter()
								.map(|insight| view! { <li>{insight}</li> })
								.collect_view()}
						</ul>
					}
				})}
			</div>
		}
		.into_any(),
		DetailView::Entity(e) => view! {
			<div class="panel-entity">
				<h2>{e.label.clone()}</h2>
				<p class="panel-meta">
					{format!("{} · community {}", e.kind, e.community)}
				</p>
				{e.description.map(|d| view! { <p class="panel-description">{d}</p> })}
				<table class="panel-metrics">
					<tbody>
						{e.metrics
							.into_iter()
							.map(|m| {
								view! {
									<tr>
										<td>{m.name}</td>
										<td>{m.value}</td>
									</tr>
								}
							})
							.collect_view()}
					</tbody>
				</table>
				<p class="panel-sources">{e.sources}</p>
				{(e.chunk_count > 0).then(|| {
					view! {
						<p class="panel-chunk-hint">
							{format!("{} source chunks · shown on graph", e.chunk_count)}
						</p>
					}
				})}
				{e.community_summary.map(|summary| {
					view! {
						<div class="panel-summary">
							{e.community_title.map(|t| view! { <h3>{t}</h3> })}
							<p>{summary}</p>
						</div>
					}
				})}
				{e.group.map(|group| {
					view! {
						<div class="panel-group-box">
							<h3>{group.canonical.clone()}</h3>
							<ul>
								{group
									.members
									.into_iter()
									.map(|(name, score)| {
										view! { <li>{format!("{name} {score}")}</li> }
									})
									.collect_view()}
							</ul>
						</div>
					}
				})}
				{(!e.chunks.is_empty()).then(|| {
					let hover = on_chunk_hover.clone();
					view! {
						<div class="panel-chunks">
							{e.chunks
								.into_iter()
								.map(|chunk| {
									let enter = hover.clone();
									let leave = hover.clone();
									let id = chunk.chunk_id.clone();
									view! {
										<div
											class="chunk-card"
											on:mouseenter=move |_| enter(Some(id.clone()))
											on:mouseleave=move |_| leave(None)
										>
											<div class="chunk-header">
												{format!("#{} {}", chunk.index, chunk.source_id)}
											</div>
											<p class="chunk-text">{chunk.text}</p>
										</div>
									}
								})
								.collect_view()}
						</div>
					}
				})}
			</div>
		}
		.into_any(),
		DetailView::Group(g) => view! {
			<div class="panel-group">
				<h2>{g.label.clone()}</h2>
				<p class="panel-meta">
					{format!("Semantic group · {} members", g.member_count)}
				</p>
				<p class="panel-canonical">{g.canonical}</p>
				<ul class="panel-members">
					{g.members
						.into_iter()
						.map(|(name, score)| {
							view! { <li>{format!("{name} {score}")}</li> }
						})
						.collect_view()}
				</ul>
			</div>
		}
		.into_any(),
	}
}
