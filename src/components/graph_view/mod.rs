//! Hierarchical knowledge-graph visualization component.
//!
//! Renders a three-level drill-down over a precomputed graph dataset on an
//! HTML canvas:
//! - Level 0: community roots with aggregated rollup edges
//! - Level 1: expanded communities showing entities and semantic groups
//! - Level 2: one entity's source chunks
//!
//! Two interchangeable canvas backends share the same state machine: a
//! deterministic planar layout with pan/zoom and a rotating force-directed
//! sphere. A side panel, legend, and level indicator derive reactively from
//! the same state.
//!
//! # Example
//!
//! ```ignore
//! use atlas_graph::components::graph_view::{GraphDataset, GraphExplorer, RawPayload};
//!
//! let raw: RawPayload = serde_json::from_str(&payload_json)?;
//! let dataset = GraphDataset::from_payload(raw)?;
//!
//! view! { <GraphExplorer data=Signal::derive(move || Some(dataset.clone())) /> }
//! ```

mod adjacency;
mod arena;
mod component;
mod error;
pub mod layout;
mod model;
pub mod palette;
pub mod panel;
mod render2d;
mod render3d;
pub mod scale;
mod state;

pub use component::{BackendKind, GraphExplorer};
pub use error::GraphError;
pub use model::{GraphDataset, RawPayload, Vec3};
pub use palette::{Theme, ThemeMode};
pub use state::{GraphConfig, GraphState, Level};
