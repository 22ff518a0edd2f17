//! Graph state machine: the single source of truth for what is on screen.
//!
//! Owns the materialized node/edge arenas, the expanded-community set, chunk
//! expansion, selection, and the highlight engine. Renderer adapters are pure
//! projections of this state; they read it to draw and write only position
//! fields back. All mutations here are synchronous and validate their guards
//! before touching the arenas, so a failed operation never leaves a partially
//! materialized graph.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::adjacency::{AdjacencyIndex, Highlight};
use super::arena::Arena;
use super::error::GraphError;
use super::model::{
	EdgeKind, GraphDataset, GraphEdge, GraphNode, NodeId, NodeKind, UNCLASSIFIED,
};
use super::palette::{self, ThemeMode};

/// Tuned layout constants, kept configurable rather than hard-coded.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	/// Weight of the synthesized anchor edges tying children to their root.
	pub anchor_weight: f64,
	/// Radius of the sphere every 3D node position is projected onto.
	pub sphere_radius: f64,
	/// Pairwise repulsion strength for the 3D simulation.
	pub force_charge: f64,
	/// Spring stiffness along edges for the 3D simulation.
	pub force_spring: f64,
	/// Per-tick velocity damping for the 3D simulation.
	pub damping_factor: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			anchor_weight: 0.1,
			sphere_radius: 320.0,
			force_charge: 180.0,
			force_spring: 0.04,
			damping_factor: 0.85,
		}
	}
}

/// Global derived drill-down level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Level {
	/// No community expanded.
	Overview,
	/// At least one community expanded.
	Expanded(usize),
	/// An entity's source chunks are shown.
	Chunks(NodeId),
}

/// What a click on a node should do, derived from its variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeAction {
	ToggleCommunity(i64),
	SelectEntity(NodeId),
	SelectGroup(NodeId),
	/// Chunk nodes only respond to hover.
	Ignore,
}

/// Owned, explicit graph state shared by both renderer backends.
pub struct GraphState {
	dataset: GraphDataset,
	pub nodes: Arena<GraphNode>,
	pub edges: Arena<GraphEdge>,
	pub adjacency: AdjacencyIndex,
	pub highlight: Highlight,
	pub config: GraphConfig,
	expanded: BTreeSet<i64>,
	/// Entity whose chunks are currently materialized, if any.
	chunk_entity: Option<NodeId>,
	selected: Option<NodeId>,
	roots: HashMap<i64, NodeId>,
	theme: ThemeMode,
}

impl GraphState {
	/// Materialize the top level: community roots and rollup edges.
	/// Every root starts at the theme's resting color.
	pub fn new(dataset: GraphDataset, theme: ThemeMode) -> Self {
		let mut nodes = Arena::new();
		let mut edges = Arena::new();
		let mut roots = HashMap::new();
		let resting = palette::resting(theme);

		for template in &dataset.communities {
			let mut node = template.clone();
			if let NodeKind::Community {
				community,
				default_color,
				..
			} = &mut node.kind
			{
				*default_color = resting;
				roots.insert(*community, node.id.clone());
			}
			node.color = resting;
			nodes.insert(node);
		}
		for edge in &dataset.rollup_edges {
			edges.insert(edge.clone());
		}

		let mut adjacency = AdjacencyIndex::default();
		adjacency.rebuild(&nodes, &edges);

		Self {
			dataset,
			nodes,
			edges,
			adjacency,
			highlight: Highlight::default(),
			config: GraphConfig::default(),
			expanded: BTreeSet::new(),
			chunk_entity: None,
			selected: None,
			roots,
			theme,
		}
	}

	pub fn dataset(&self) -> &GraphDataset {
		&self.dataset
	}

	pub fn theme(&self) -> ThemeMode {
		self.theme
	}

	pub fn is_expanded(&self, community: i64) -> bool {
		self.expanded.contains(&community)
	}

	pub fn expanded_count(&self) -> usize {
		self.expanded.len()
	}

	pub fn root_id(&self, community: i64) -> Option<&NodeId> {
		self.roots.get(&community)
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn chunk_entity(&self) -> Option<&str> {
		self.chunk_entity.as_deref()
	}

	/// Current drill-down level.
	pub fn level(&self) -> Level {
		if let Some(entity) = &self.chunk_entity {
			Level::Chunks(entity.clone())
		} else if self.expanded.is_empty() {
			Level::Overview
		} else {
			Level::Expanded(self.expanded.len())
		}
	}

	/// Human-readable level indicator line.
	pub fn level_indicator(&self) -> String {
		match self.level() {
			Level::Overview => "Level 0 · Community Overview".to_string(),
			Level::Expanded(n) => format!("Level 1 · {n} expanded"),
			Level::Chunks(entity) => format!("Level 2 · chunk expansion for {entity}"),
		}
	}

	// Expansion.

	/// Materialize one community's subgraph. No-op (returns false) when the
	/// community is already expanded, is the unclassified bucket, or has no
	/// payload. All guards run before any mutation.
	pub fn expand(&mut self, community: i64) -> bool {
		if community == UNCLASSIFIED
			|| self.expanded.contains(&community)
			|| !self.dataset.payloads.contains_key(&community)
		{
			return false;
		}
		let Some(root_id) = self.roots.get(&community).cloned() else {
			return false;
		};
		self.clear_chunks();

		let payload = self.dataset.payloads[&community].clone();
		let root_pos = self
			.nodes
			.get(&root_id)
			.map(|n| n.pos)
			.unwrap_or_default();
		let identity = palette::color_for(community, self.theme);
		let accent = palette::group_accent(self.theme);

		for mut group in payload.semantic_groups {
			group.color = accent;
			group.pos = root_pos;
			let anchor = anchor_edge(&group.id, &root_id, community, self.config.anchor_weight);
			self.nodes.insert(group);
			self.edges.insert(anchor);
		}
		for mut entity in payload.entities {
			entity.color = identity;
			entity.pos = root_pos;
			// Group members anchor to their group node so the cluster
			// stays nested; everything else anchors to the root.
			let anchor_target = match &entity.kind {
				NodeKind::Entity(info) => info
					.group
					.as_ref()
					.map(|gid| format!("sg-{gid}"))
					.filter(|id| self.nodes.contains(id))
					.unwrap_or_else(|| root_id.clone()),
				_ => root_id.clone(),
			};
			let anchor =
				anchor_edge(&entity.id, &anchor_target, community, self.config.anchor_weight);
			self.nodes.insert(entity);
			self.edges.insert(anchor);
		}
		for edge in payload.edges {
			self.edges.insert(edge);
		}

		if let Some(root) = self.nodes.get_mut(&root_id) {
			root.color = identity;
		}
		self.expanded.insert(community);
		self.adjacency.rebuild(&self.nodes, &self.edges);
		debug!("expanded community {community}: {} nodes materialized", self.nodes.len());
		true
	}

	/// Remove every node and edge the community materialized, including any
	/// open chunk expansion rooted inside it, and revert the root's color.
	pub fn collapse(&mut self, community: i64) -> bool {
		if !self.expanded.contains(&community) {
			return false;
		}
		if let Some(entity) = &self.chunk_entity {
			let inside = self
				.nodes
				.get(entity)
				.is_some_and(|n| n.parent_comm == Some(community));
			if inside {
				self.chunk_entity = None;
			}
		}

		self.nodes.retain(|n| n.parent_comm != Some(community));
		self.edges.retain(|e| e.parent_comm != Some(community));

		if let Some(root_id) = self.roots.get(&community) {
			if let Some(root) = self.nodes.get_mut(root_id) {
				if let NodeKind::Community { default_color, .. } = root.kind {
					root.color = default_color;
				}
			}
		}
		self.expanded.remove(&community);
		self.prune_dangling_references();
		self.adjacency.rebuild(&self.nodes, &self.edges);
		debug!("collapsed community {community}");
		true
	}

	pub fn toggle(&mut self, community: i64) -> bool {
		if self.expanded.contains(&community) {
			self.collapse(community)
		} else {
			self.expand(community)
		}
	}

	/// Collapse every expanded community. Idempotent; the resulting
	/// materialized set matches a fresh load.
	pub fn collapse_all(&mut self) {
		for community in self.expanded.clone() {
			self.collapse(community);
		}
	}

	// Chunk expansion.

	/// Materialize the entity's source chunks as leaf nodes. Clears any
	/// previous chunk expansion first; only one entity's chunks are shown at
	/// a time. Returns the number of chunk nodes added.
	pub fn show_chunks(&mut self, entity_id: &str) -> usize {
		self.clear_chunks();
		let Some(entity) = self.nodes.get(entity_id) else {
			return 0;
		};
		let parent_comm = entity.parent_comm;
		let entity_pos = entity.pos;
		let refs = self.dataset.chunk_refs_for(entity_id).to_vec();
		if refs.is_empty() {
			return 0;
		}

		let resting = palette::resting(self.theme);
		for chunk_ref in &refs {
			let chunk_id = format!("chunk-{entity_id}-{}", chunk_ref.index);
			let tail = chunk_ref
				.source_id
				.rsplit(':')
				.next()
				.unwrap_or(&chunk_ref.source_id);
			self.nodes.insert(GraphNode {
				id: chunk_id.clone(),
				label: format!("#{} {tail}", chunk_ref.index),
				color: resting,
				size: 16.0,
				parent_comm,
				kind: NodeKind::Chunk {
					text_idx: chunk_ref.text_idx,
					source_id: chunk_ref.source_id.clone(),
					chunk_index: chunk_ref.index,
				},
				pos: entity_pos,
				vel: Default::default(),
			});
			self.edges.insert(GraphEdge {
				id: format!("cedge-{chunk_id}"),
				source: entity_id.to_string(),
				target: chunk_id,
				weight: None,
				description: None,
				details: Vec::new(),
				parent_comm,
				kind: EdgeKind::Chunk,
			});
		}
		self.chunk_entity = Some(entity_id.to_string());
		self.adjacency.rebuild(&self.nodes, &self.edges);
		refs.len()
	}

	/// Remove all chunk nodes/edges. Completes (index rebuilt) before any
	/// subsequent highlight query runs.
	pub fn clear_chunks(&mut self) {
		if self.chunk_entity.is_none() {
			return;
		}
		self.nodes.retain(|n| !n.kind.is_chunk());
		self.edges.retain(|e| e.kind != EdgeKind::Chunk);
		self.chunk_entity = None;
		self.prune_dangling_references();
		self.adjacency.rebuild(&self.nodes, &self.edges);
	}

	// Highlight and selection.

	/// Hover focus: highlight the hovered node and its neighborhood, or fall
	/// back to the selection's neighborhood when the pointer leaves.
	pub fn hover(&mut self, node: Option<&str>) {
		let target = node.or(self.selected.as_deref());
		self.highlight.focus(target, &self.adjacency);
	}

	/// Highlight exactly the nodes of the unclassified bucket (legend click
	/// on community `-1`); expansion state is untouched.
	pub fn focus_unclassified(&mut self) {
		let ids: Vec<NodeId> = self
			.nodes
			.iter()
			.filter(|n| n.community() == Some(UNCLASSIFIED))
			.map(|n| n.id.clone())
			.collect();
		self.highlight.focus_nodes(ids);
	}

	/// Apply a legend click for a community row. Any open chunk expansion is
	/// dropped first. The unclassified bucket focuses its nodes, a collapsed
	/// community expands and selects its root, and an already-expanded
	/// community keeps its state, selects its root, and asks the caller to
	/// re-center the view (returns true).
	pub fn legend_click(&mut self, community: i64) -> Result<bool, GraphError> {
		self.clear_chunks();
		if community == UNCLASSIFIED {
			self.focus_unclassified();
			return Ok(false);
		}
		let Some(root) = self.roots.get(&community).cloned() else {
			return Ok(false);
		};
		if self.is_expanded(community) {
			self.selected = Some(root.clone());
			self.highlight.focus(Some(root.as_str()), &self.adjacency);
			return Ok(true);
		}
		self.handle_click(Some(root.as_str()))?;
		Ok(false)
	}

	/// Classify what a click on this node should do.
	pub fn click_action(&self, node_id: &str) -> Result<NodeAction, GraphError> {
		let node = self.nodes.get(node_id).ok_or_else(|| {
			GraphError::Interaction(format!("clicked unknown node {node_id}"))
		})?;
		Ok(match &node.kind {
			NodeKind::Community { community, .. } => NodeAction::ToggleCommunity(*community),
			NodeKind::Entity(_) => NodeAction::SelectEntity(node.id.clone()),
			NodeKind::SemanticGroup { .. } => NodeAction::SelectGroup(node.id.clone()),
			NodeKind::Chunk { .. } => NodeAction::Ignore,
		})
	}

	/// Apply the pointer contract for a click on a node (or the background
	/// when `node_id` is `None`). Never mutates topology on failure.
	pub fn handle_click(&mut self, node_id: Option<&str>) -> Result<(), GraphError> {
		let Some(id) = node_id else {
			// Background click: clear chunks, highlight, and selection, but
			// leave every expansion in place.
			self.clear_chunks();
			self.highlight.clear();
			self.selected = None;
			return Ok(());
		};
		match self.click_action(id)? {
			NodeAction::ToggleCommunity(community) => {
				self.clear_chunks();
				self.highlight.clear();
				self.toggle(community);
				self.selected = self.roots.get(&community).cloned();
			}
			NodeAction::SelectEntity(entity) => {
				let chunk_count = match self.nodes.get(&entity).map(|n| &n.kind) {
					Some(NodeKind::Entity(info)) => info.chunk_count,
					_ => 0,
				};
				if chunk_count > 0 {
					self.show_chunks(&entity);
				} else {
					self.clear_chunks();
				}
				self.selected = Some(entity.clone());
				self.highlight.focus(Some(&entity), &self.adjacency);
			}
			NodeAction::SelectGroup(group) => {
				self.clear_chunks();
				self.selected = Some(group.clone());
				self.highlight.focus(Some(&group), &self.adjacency);
			}
			NodeAction::Ignore => {}
		}
		Ok(())
	}

	// Theme.

	/// Re-resolve every materialized color for a new theme mode. Topology,
	/// `parent_comm` tags, and the expanded set are untouched.
	pub fn retheme(&mut self, mode: ThemeMode) {
		self.theme = mode;
		let resting = palette::resting(mode);
		let accent = palette::group_accent(mode);
		let expanded = self.expanded.clone();
		for node in self.nodes.iter_mut() {
			match &mut node.kind {
				NodeKind::Community {
					community,
					default_color,
					..
				} => {
					*default_color = resting;
					node.color = if expanded.contains(community) {
						palette::color_for(*community, mode)
					} else {
						resting
					};
				}
				NodeKind::Entity(info) => {
					node.color = palette::color_for(info.community, mode);
				}
				NodeKind::SemanticGroup { .. } => node.color = accent,
				NodeKind::Chunk { .. } => node.color = resting,
			}
		}
	}

	/// Drop selection/highlight references to nodes that no longer exist.
	fn prune_dangling_references(&mut self) {
		if let Some(selected) = &self.selected {
			if !self.nodes.contains(selected) {
				self.selected = None;
			}
		}
		if let Some(focused) = self.highlight.focused() {
			if !self.nodes.contains(focused) {
				self.highlight.clear();
			}
		}
	}
}

fn anchor_edge(child: &str, parent: &str, community: i64, weight: f64) -> GraphEdge {
	GraphEdge {
		id: format!("anchor-{child}"),
		source: child.to_string(),
		target: parent.to_string(),
		weight: Some(weight),
		description: None,
		details: Vec::new(),
		parent_comm: Some(community),
		kind: EdgeKind::Anchor,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::model::tests::sample_dataset;
	use crate::components::graph_view::palette;

	fn state() -> GraphState {
		GraphState::new(sample_dataset(), ThemeMode::Dark)
	}

	#[test]
	fn fresh_load_materializes_top_level_only() {
		let s = state();
		assert_eq!(s.nodes.len(), 3);
		assert_eq!(s.edges.len(), 1);
		assert_eq!(s.level(), Level::Overview);
		let root = s.nodes.get("comm-5").unwrap();
		assert_eq!(root.color, palette::resting(ThemeMode::Dark));
	}

	#[test]
	fn expand_materializes_payload_with_anchors() {
		let mut s = state();
		assert!(s.expand(5));
		// 3 roots + 3 entities + 1 semantic group
		assert_eq!(s.nodes.len(), 7);
		// 1 rollup + 2 internal + 4 anchors (3 entities + 1 group)
		assert_eq!(s.edges.len(), 7);
		assert_eq!(s.level(), Level::Expanded(1));

		// Root takes its identity color from the palette.
		let root = s.nodes.get("comm-5").unwrap();
		assert_eq!(root.color, palette::color_for(5, ThemeMode::Dark));

		// Group member anchors to its group; the group anchors to the root.
		assert_eq!(s.edges.get("anchor-e2").unwrap().target, "sg-9");
		assert_eq!(s.edges.get("anchor-sg-9").unwrap().target, "comm-5");
		assert_eq!(s.edges.get("anchor-e1").unwrap().target, "comm-5");
		assert_eq!(
			s.edges.get("anchor-e1").unwrap().weight,
			Some(s.config.anchor_weight)
		);

		// Everything materialized carries the producing community's tag.
		for id in ["e1", "e2", "e3", "sg-9"] {
			assert_eq!(s.nodes.get(id).unwrap().parent_comm, Some(5));
		}
	}

	#[test]
	fn expand_is_idempotent() {
		let mut s = state();
		assert!(s.expand(5));
		let (n, e) = (s.nodes.len(), s.edges.len());
		assert!(!s.expand(5));
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
	}

	#[test]
	fn expand_guards() {
		let mut s = state();
		assert!(!s.expand(UNCLASSIFIED));
		assert!(!s.expand(42)); // no payload
		assert_eq!(s.nodes.len(), 3);
	}

	#[test]
	fn collapse_restores_pre_expand_state() {
		let mut s = state();
		let (n, e) = (s.nodes.len(), s.edges.len());
		let before = s.nodes.get("comm-5").unwrap().color;
		s.expand(5);
		assert!(s.collapse(5));
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
		assert_eq!(s.nodes.get("comm-5").unwrap().color, before);
		assert!(!s.is_expanded(5));
		// Adjacency reflects the restored set.
		assert!(s.adjacency.neighbors("e1").is_empty());
	}

	#[test]
	fn collapse_never_expanded_is_noop() {
		let mut s = state();
		assert!(!s.collapse(5));
		assert!(!s.collapse(42));
		assert_eq!(s.nodes.len(), 3);
	}

	#[test]
	fn collapse_all_equals_fresh_load() {
		let mut s = state();
		s.expand(5);
		s.expand(7);
		s.collapse_all();
		assert_eq!(s.nodes.len(), 3);
		assert_eq!(s.edges.len(), 1);
		assert_eq!(s.level(), Level::Overview);
		// Idempotent.
		s.collapse_all();
		assert_eq!(s.nodes.len(), 3);
	}

	#[test]
	fn show_chunks_adds_exactly_k_pairs() {
		let mut s = state();
		s.expand(5);
		let (n, e) = (s.nodes.len(), s.edges.len());
		assert_eq!(s.show_chunks("e1"), 2);
		assert_eq!(s.nodes.len(), n + 2);
		assert_eq!(s.edges.len(), e + 2);
		assert_eq!(s.level(), Level::Chunks("e1".into()));
		assert!(s.nodes.contains("chunk-e1-0"));
		assert!(s.edges.contains("cedge-chunk-e1-3"));
		// Chunk neighbors resolve through the rebuilt index.
		assert!(s.adjacency.neighbors("chunk-e1-0") == ["e1"]);

		s.clear_chunks();
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
		assert!(s.adjacency.incident_edges("chunk-e1-0").is_empty());
	}

	#[test]
	fn chunks_for_entity_without_refs_is_noop() {
		let mut s = state();
		s.expand(5);
		assert_eq!(s.show_chunks("e3"), 0);
		assert_eq!(s.level(), Level::Expanded(1));
	}

	#[test]
	fn only_one_chunk_expansion_at_a_time() {
		let mut s = state();
		s.expand(5);
		s.show_chunks("e1");
		// Re-showing for the same entity does not accumulate nodes.
		s.show_chunks("e1");
		let chunk_nodes = s.nodes.iter().filter(|n| n.kind.is_chunk()).count();
		assert_eq!(chunk_nodes, 2);
	}

	#[test]
	fn collapse_removes_open_chunk_expansion() {
		let mut s = state();
		s.expand(5);
		s.show_chunks("e1");
		s.collapse(5);
		assert_eq!(s.nodes.len(), 3);
		assert_eq!(s.chunk_entity(), None);
		assert_eq!(s.level(), Level::Overview);
	}

	#[test]
	fn background_click_clears_but_keeps_expansion() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e1")).unwrap();
		assert!(s.selected().is_some());
		assert!(!s.highlight.is_empty());
		assert_eq!(s.level(), Level::Chunks("e1".into()));

		s.handle_click(None).unwrap();
		assert_eq!(s.selected(), None);
		assert!(s.highlight.is_empty());
		assert!(s.is_expanded(5));
		assert_eq!(s.level(), Level::Expanded(1));
	}

	#[test]
	fn scenario_expand_select_reset() {
		// Community 5: 3 entities, 2 internal edges, e1 has 2 chunk refs.
		let mut s = state();
		let (n0, e0) = (s.nodes.len(), s.edges.len());

		s.handle_click(Some("comm-5")).unwrap();
		assert_eq!(s.nodes.len(), n0 + 4); // 3 entities + 1 group
		assert_eq!(s.edges.len(), e0 + 6); // 2 internal + 4 anchors
		assert_eq!(
			s.nodes.get("comm-5").unwrap().color,
			palette::color_for(5, ThemeMode::Dark)
		);

		s.handle_click(Some("e1")).unwrap();
		assert_eq!(s.selected(), Some("e1"));
		let chunk_nodes = s.nodes.iter().filter(|n| n.kind.is_chunk()).count();
		assert_eq!(chunk_nodes, 2);

		s.handle_click(None).unwrap();
		assert_eq!(s.nodes.iter().filter(|n| n.kind.is_chunk()).count(), 0);
		assert!(s.highlight.is_empty());
		assert!(s.is_expanded(5));
	}

	#[test]
	fn click_on_unclassified_root_toggles_nothing() {
		let mut s = state();
		s.handle_click(Some("comm-other")).unwrap();
		assert_eq!(s.expanded_count(), 0);
		assert_eq!(s.nodes.len(), 3);
	}

	#[test]
	fn unclassified_legend_focus_highlights_only_that_bucket() {
		let mut s = state();
		s.expand(5);
		s.focus_unclassified();
		assert!(s.highlight.node_highlighted("comm-other"));
		assert!(!s.highlight.node_highlighted("comm-5"));
		assert!(!s.highlight.node_highlighted("e1"));
		assert_eq!(s.highlight.edge_count(), 0);
		assert!(s.is_expanded(5));
	}

	#[test]
	fn full_reset_keeps_the_drill_down() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e1")).unwrap();
		// Reset is a background click plus a re-fit: expansion survives.
		s.handle_click(None).unwrap();
		assert!(s.is_expanded(5));
		assert_eq!(s.level(), Level::Expanded(1));
		assert_eq!(s.selected(), None);
		assert!(s.highlight.is_empty());
	}

	#[test]
	fn legend_click_drops_open_chunk_expansion() {
		let mut s = state();
		s.expand(5);
		s.show_chunks("e1");
		assert!(!s.legend_click(UNCLASSIFIED).unwrap());
		assert_eq!(s.nodes.iter().filter(|n| n.kind.is_chunk()).count(), 0);
		assert!(s.highlight.node_highlighted("comm-other"));
		assert!(s.is_expanded(5));
	}

	#[test]
	fn legend_click_on_expanded_community_recenters_without_collapsing() {
		let mut s = state();
		s.expand(5);
		let (n, e) = (s.nodes.len(), s.edges.len());
		assert!(s.legend_click(5).unwrap());
		assert!(s.is_expanded(5));
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
		assert_eq!(s.selected(), Some("comm-5"));
		assert!(s.highlight.node_highlighted("comm-5"));
	}

	#[test]
	fn legend_click_expands_a_collapsed_community() {
		let mut s = state();
		assert!(!s.legend_click(5).unwrap());
		assert!(s.is_expanded(5));
		assert_eq!(s.selected(), Some("comm-5"));
	}

	#[test]
	fn retheme_re_resolves_colors_without_touching_topology() {
		let mut s = state();
		s.expand(5);
		let (n, e) = (s.nodes.len(), s.edges.len());
		s.retheme(ThemeMode::Light);
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
		assert!(s.is_expanded(5));
		assert_eq!(
			s.nodes.get("comm-5").unwrap().color,
			palette::color_for(5, ThemeMode::Light)
		);
		assert_eq!(
			s.nodes.get("comm-7").unwrap().color,
			palette::resting(ThemeMode::Light)
		);
		assert_eq!(
			s.nodes.get("e1").unwrap().color,
			palette::color_for(5, ThemeMode::Light)
		);
		// Collapse after retheme reverts to the new theme's resting color.
		s.collapse(5);
		assert_eq!(
			s.nodes.get("comm-5").unwrap().color,
			palette::resting(ThemeMode::Light)
		);
	}

	#[test]
	fn hover_falls_back_to_selection() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e2")).unwrap();
		s.hover(Some("e3"));
		assert!(s.highlight.node_highlighted("e3"));
		s.hover(None);
		assert!(s.highlight.node_highlighted("e2"));
	}

	#[test]
	fn click_unknown_node_is_interaction_fault() {
		let mut s = state();
		let (n, e) = (s.nodes.len(), s.edges.len());
		assert!(s.handle_click(Some("ghost")).is_err());
		// The fault leaves the materialized set untouched.
		assert_eq!((s.nodes.len(), s.edges.len()), (n, e));
	}
}
