//! atlas-graph: interactive hierarchical knowledge-graph explorer.
//!
//! This crate provides a WASM-based visualization for a precomputed
//! GraphRAG-style dataset: community roots that expand into entities and
//! semantic groups, entities that expand into their source chunks, with a
//! detail side panel and two interchangeable canvas backends.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info};

pub mod components;

pub use components::graph_view::{GraphDataset, GraphError, GraphExplorer, RawPayload};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("atlas-graph: logging initialized");
}

/// Endpoint serving the precomputed graph payload.
const GRAPH_DATA_URL: &str = "/api/graph-data";

async fn fetch_dataset() -> Result<GraphDataset, GraphError> {
	let response = gloo_net::http::Request::get(GRAPH_DATA_URL)
		.send()
		.await
		.map_err(|e| GraphError::DataLoad(e.to_string()))?;
	let raw: RawPayload = response
		.json()
		.await
		.map_err(|e| GraphError::DataLoad(e.to_string()))?;
	GraphDataset::from_payload(raw)
}

/// Main application component.
///
/// Fetches the graph payload once on mount and renders the explorer when it
/// arrives. A failed load (network, parse, or a service-side error marker)
/// replaces the canvas with an inline failure notice.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let dataset = RwSignal::new(None::<GraphDataset>);
	let load_error = RwSignal::new(None::<String>);

	wasm_bindgen_futures::spawn_local(async move {
		match fetch_dataset().await {
			Ok(ds) => {
				info!(
					"atlas-graph: loaded {} communities, {} rollup edges",
					ds.communities.len(),
					ds.rollup_edges.len()
				);
				dataset.set(Some(ds));
			}
			Err(err) => {
				error!("atlas-graph: payload load failed: {err}");
				load_error.set(Some(err.to_string()));
			}
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Knowledge Graph Atlas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{move || {
				load_error.get().map(|msg| {
					view! {
						<div class="load-failure">
							<h1>"Graph unavailable"</h1>
							<p>{msg}</p>
						</div>
					}
				})
			}}
			<Show when=move || load_error.get().is_none()>
				<GraphExplorer data=dataset />
			</Show>
		</div>
	}
}
