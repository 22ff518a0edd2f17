//! Adjacency index and neighbor-highlight engine.
//!
//! The index maps every materialized node id to its incident edge ids and
//! neighbor ids. It is rebuilt in full (O(E)) whenever the materialized set
//! changes, so hover and selection lookups stay O(1) instead of scanning the
//! edge list per event. Renderers consult [`Highlight`] per redraw; an empty
//! highlight means no dimming is applied.

use std::collections::{HashMap, HashSet};

use super::arena::Arena;
use super::model::{GraphEdge, GraphNode, NodeId};

/// Incident-edge and neighbor lookup for the materialized set.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	incident: HashMap<NodeId, Vec<String>>,
	neighbors: HashMap<NodeId, Vec<NodeId>>,
}

impl AdjacencyIndex {
	/// Recompute from scratch. Edges with a missing endpoint are skipped;
	/// they can appear transiently while a collapse removes tagged nodes.
	pub fn rebuild(&mut self, nodes: &Arena<GraphNode>, edges: &Arena<GraphEdge>) {
		self.incident.clear();
		self.neighbors.clear();
		for edge in edges.iter() {
			if !nodes.contains(&edge.source) || !nodes.contains(&edge.target) {
				continue;
			}
			self.incident
				.entry(edge.source.clone())
				.or_default()
				.push(edge.id.clone());
			self.incident
				.entry(edge.target.clone())
				.or_default()
				.push(edge.id.clone());
			self.neighbors
				.entry(edge.source.clone())
				.or_default()
				.push(edge.target.clone());
			self.neighbors
				.entry(edge.target.clone())
				.or_default()
				.push(edge.source.clone());
		}
	}

	pub fn neighbors(&self, id: &str) -> &[NodeId] {
		self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn incident_edges(&self, id: &str) -> &[String] {
		self.incident.get(id).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Highlighted node/edge id sets driven by hover and selection.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	focused: Option<NodeId>,
	nodes: HashSet<NodeId>,
	edges: HashSet<String>,
}

impl Highlight {
	/// Focus a node: highlight it, its neighbors, and its incident edges.
	/// `None` clears both sets, which renderers read as "show everything".
	pub fn focus(&mut self, node: Option<&str>, index: &AdjacencyIndex) {
		self.nodes.clear();
		self.edges.clear();
		self.focused = node.map(str::to_string);
		if let Some(id) = node {
			self.nodes.insert(id.to_string());
			for neighbor in index.neighbors(id) {
				self.nodes.insert(neighbor.clone());
			}
			for edge in index.incident_edges(id) {
				self.edges.insert(edge.clone());
			}
		}
	}

	/// Highlight an explicit node set with no edges (legend focus).
	pub fn focus_nodes(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
		self.nodes = nodes.into_iter().collect();
		self.edges.clear();
		self.focused = None;
	}

	pub fn clear(&mut self) {
		self.focused = None;
		self.nodes.clear();
		self.edges.clear();
	}

	/// True when no highlight is active and nothing should be dimmed.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	pub fn node_highlighted(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	pub fn edge_highlighted(&self, id: &str) -> bool {
		self.edges.contains(id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::model::{EdgeKind, NodeKind, Vec3};
	use crate::components::graph_view::palette::Color;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			color: Color::rgb(0, 0, 0),
			size: 10.0,
			parent_comm: None,
			kind: NodeKind::SemanticGroup {
				group_id: String::new(),
				member_count: 0,
			},
			pos: Vec3::default(),
			vel: Vec3::default(),
		}
	}

	fn edge(id: &str, source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			weight: None,
			description: None,
			details: Vec::new(),
			parent_comm: None,
			kind: EdgeKind::Relation,
		}
	}

	fn fixture() -> (Arena<GraphNode>, Arena<GraphEdge>, AdjacencyIndex) {
		let mut nodes = Arena::new();
		for id in ["a", "b", "c", "isolated"] {
			nodes.insert(node(id));
		}
		let mut edges = Arena::new();
		edges.insert(edge("ab", "a", "b"));
		edges.insert(edge("bc", "b", "c"));
		let mut index = AdjacencyIndex::default();
		index.rebuild(&nodes, &edges);
		(nodes, edges, index)
	}

	#[test]
	fn neighbors_are_indexed_both_ways() {
		let (_, _, index) = fixture();
		assert_eq!(index.neighbors("a"), ["b"]);
		let mut b: Vec<_> = index.neighbors("b").to_vec();
		b.sort();
		assert_eq!(b, ["a", "c"]);
		assert!(index.neighbors("isolated").is_empty());
	}

	#[test]
	fn focus_is_node_plus_neighbors_and_incident_edges() {
		let (_, _, index) = fixture();
		let mut hl = Highlight::default();
		hl.focus(Some("b"), &index);
		assert_eq!(hl.node_count(), 3);
		for id in ["a", "b", "c"] {
			assert!(hl.node_highlighted(id));
		}
		assert!(hl.edge_highlighted("ab"));
		assert!(hl.edge_highlighted("bc"));
		assert!(!hl.node_highlighted("isolated"));
	}

	#[test]
	fn focus_isolated_node_is_singleton() {
		let (_, _, index) = fixture();
		let mut hl = Highlight::default();
		hl.focus(Some("isolated"), &index);
		assert_eq!(hl.node_count(), 1);
		assert_eq!(hl.edge_count(), 0);
	}

	#[test]
	fn clearing_focus_empties_both_sets() {
		let (_, _, index) = fixture();
		let mut hl = Highlight::default();
		hl.focus(Some("b"), &index);
		hl.focus(None, &index);
		assert!(hl.is_empty());
	}

	#[test]
	fn rebuild_skips_edges_with_missing_endpoints() {
		let (mut nodes, edges, mut index) = fixture();
		nodes.remove("c");
		index.rebuild(&nodes, &edges);
		assert!(index.neighbors("b") == ["a"]);
		assert!(index.incident_edges("c").is_empty());
	}
}
