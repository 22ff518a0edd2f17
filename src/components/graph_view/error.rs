//! Error kinds for the graph explorer.

use thiserror::Error;

/// Faults surfaced by the visualization. None of these corrupt the
/// materialized node/edge set: operations validate before mutating.
#[derive(Clone, Debug, Error)]
pub enum GraphError {
	/// Startup fetch or parse failed. Terminal: rendered inline, not retried.
	#[error("data load failed: {0}")]
	DataLoad(String),
	/// Canvas 2d context unavailable at init time. Retried with a bounded
	/// poll since it can be a load-order race.
	#[error("renderer init failed: {0}")]
	RenderInit(String),
	/// A pointer handler raised; shown as diagnostic text in the detail panel.
	#[error("interaction fault: {0}")]
	Interaction(String),
}
