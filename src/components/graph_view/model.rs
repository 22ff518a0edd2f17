//! Data model: wire payload types and the domain graph types.
//!
//! The startup payload arrives in the element-wrapper shape the graph service
//! emits (`{"data": {...}}` records with optional fields). [`GraphDataset`]
//! converts that into typed domain nodes and edges once at load time; the
//! dataset is immutable afterwards and the state machine materializes
//! sub-levels from it on demand.

use std::collections::HashMap;

use serde::Deserialize;

use super::error::GraphError;
use super::palette::Color;

/// Stable node identifier, unique within the materialized set.
pub type NodeId = String;

/// Community id reserved for the "unclassified" bucket. Never expandable.
pub const UNCLASSIFIED: i64 = -1;

// Wire types.

/// One Cytoscape-style element wrapper from the payload.
#[derive(Clone, Debug, Deserialize)]
pub struct RawElement {
	pub data: RawData,
}

/// Permissive element record. Node and edge fields are all optional;
/// classification happens during dataset construction.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawData {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub community: Option<i64>,
	#[serde(default)]
	pub member_count: Option<u32>,
	#[serde(default)]
	pub size: Option<f64>,
	#[serde(default)]
	pub parent: Option<String>,
	#[serde(default)]
	pub group_id: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub pagerank: Option<f64>,
	#[serde(default)]
	pub degree_centrality: Option<f64>,
	#[serde(default)]
	pub betweenness: Option<f64>,
	#[serde(default)]
	pub num_sources: Option<u32>,
	#[serde(default)]
	pub source_refs: Option<String>,
	#[serde(default)]
	pub chunk_count: Option<u32>,
	// Edge fields
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub target: Option<String>,
	#[serde(default)]
	pub weight: Option<f64>,
	#[serde(default)]
	pub details: Option<Vec<String>>,
}

/// Per-community subgraph as delivered on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCommunityPayload {
	#[serde(default)]
	pub entities: Vec<RawElement>,
	#[serde(default)]
	pub edges: Vec<RawElement>,
	#[serde(default)]
	pub semantic_groups: Vec<RawElement>,
}

/// One chunk reference from `chunkRefs`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChunkRef {
	pub index: i64,
	pub source_id: String,
	pub text_idx: usize,
}

/// Precomputed community summary.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommunitySummary {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub key_insights: Vec<String>,
}

/// Semantic group detail table entry.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SemanticGroupDetail {
	#[serde(default)]
	pub canonical: String,
	#[serde(default)]
	pub members: Vec<String>,
	#[serde(default)]
	pub member_similarities: HashMap<String, f64>,
}

/// Complete startup payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPayload {
	#[serde(rename = "metaElements", default)]
	pub meta_elements: Vec<RawElement>,
	#[serde(rename = "communityData", default)]
	pub community_data: HashMap<String, RawCommunityPayload>,
	#[serde(rename = "commSummaries", default)]
	pub comm_summaries: HashMap<String, CommunitySummary>,
	#[serde(rename = "semanticGroups", default)]
	pub semantic_groups: HashMap<String, SemanticGroupDetail>,
	#[serde(rename = "chunkRefs", default)]
	pub chunk_refs: HashMap<String, Vec<ChunkRef>>,
	#[serde(rename = "chunkTexts", default)]
	pub chunk_texts: Vec<String>,
	/// Service-side failure marker ("Database not found").
	#[serde(default)]
	pub error: Option<String>,
}

// Domain types.

/// Fixed entity type enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	Person,
	Organization,
	Concept,
	Event,
	Product,
	Location,
	Technology,
	Document,
	Metric,
	Category,
	Unknown,
}

impl EntityKind {
	pub fn from_wire(s: &str) -> Self {
		match s {
			"PERSON" => Self::Person,
			"ORGANIZATION" => Self::Organization,
			"CONCEPT" => Self::Concept,
			"EVENT" => Self::Event,
			"PRODUCT" => Self::Product,
			"LOCATION" => Self::Location,
			"TECHNOLOGY" => Self::Technology,
			"DOCUMENT" => Self::Document,
			"METRIC" => Self::Metric,
			"CATEGORY" => Self::Category,
			_ => Self::Unknown,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Person => "PERSON",
			Self::Organization => "ORGANIZATION",
			Self::Concept => "CONCEPT",
			Self::Event => "EVENT",
			Self::Product => "PRODUCT",
			Self::Location => "LOCATION",
			Self::Technology => "TECHNOLOGY",
			Self::Document => "DOCUMENT",
			Self::Metric => "METRIC",
			Self::Category => "CATEGORY",
			Self::Unknown => "UNKNOWN",
		}
	}
}

/// Entity payload shared by the node union and the side panel.
#[derive(Clone, Debug)]
pub struct EntityInfo {
	pub kind: EntityKind,
	pub community: i64,
	pub pagerank: Option<f64>,
	pub degree_centrality: Option<f64>,
	pub betweenness: Option<f64>,
	pub num_sources: u32,
	pub source_refs: Vec<String>,
	pub chunk_count: u32,
	pub description: Option<String>,
	/// Owning semantic group id when the entity is a group member.
	pub group: Option<String>,
}

/// Variant payloads for the node union.
#[derive(Clone, Debug)]
pub enum NodeKind {
	Community {
		community: i64,
		member_count: u32,
		/// Resting color assigned before first expansion; collapse reverts to it.
		default_color: Color,
	},
	Entity(EntityInfo),
	SemanticGroup { group_id: String, member_count: u32 },
	Chunk {
		text_idx: usize,
		source_id: String,
		chunk_index: i64,
	},
}

impl NodeKind {
	pub fn is_chunk(&self) -> bool {
		matches!(self, NodeKind::Chunk { .. })
	}
}

/// 3-component position/velocity vector. The 2D backend ignores `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	pub fn norm(self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	pub fn scale(self, s: f64) -> Self {
		Self::new(self.x * s, self.y * s, self.z * s)
	}
}

/// A materialized node. Renderers read everything and write only `pos`/`vel`.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: NodeId,
	pub label: String,
	pub color: Color,
	pub size: f64,
	/// Community that materialized this node; collapse removes by this tag.
	pub parent_comm: Option<i64>,
	pub kind: NodeKind,
	pub pos: Vec3,
	pub vel: Vec3,
}

impl GraphNode {
	/// Owning community id for color resolution, if any.
	pub fn community(&self) -> Option<i64> {
		match &self.kind {
			NodeKind::Community { community, .. } => Some(*community),
			NodeKind::Entity(info) => Some(info.community),
			NodeKind::SemanticGroup { .. } | NodeKind::Chunk { .. } => self.parent_comm,
		}
	}
}

/// Edge role in the materialized graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Direct entity relation inside a community.
	Relation,
	/// Aggregated inter-community edge with weight and hover details.
	Rollup,
	/// Weak synthesized edge keeping children clustered near their root.
	Anchor,
	/// Entity-to-chunk edge.
	Chunk,
}

/// A materialized edge between two node ids.
#[derive(Clone, Debug)]
pub struct GraphEdge {
	pub id: String,
	pub source: NodeId,
	pub target: NodeId,
	pub weight: Option<f64>,
	pub description: Option<String>,
	pub details: Vec<String>,
	pub parent_comm: Option<i64>,
	pub kind: EdgeKind,
}

/// Templates for one community's subgraph, ready to materialize.
#[derive(Clone, Debug, Default)]
pub struct CommunityPayload {
	pub entities: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub semantic_groups: Vec<GraphNode>,
}

/// The immutable precomputed dataset, fetched once at startup.
#[derive(Clone, Debug, Default)]
pub struct GraphDataset {
	/// Top-level community root nodes, in payload order.
	pub communities: Vec<GraphNode>,
	/// Aggregated inter-community edges.
	pub rollup_edges: Vec<GraphEdge>,
	pub payloads: HashMap<i64, CommunityPayload>,
	pub summaries: HashMap<i64, CommunitySummary>,
	pub groups: HashMap<String, SemanticGroupDetail>,
	pub chunk_refs: HashMap<NodeId, Vec<ChunkRef>>,
	pub chunk_texts: Vec<String>,
}

/// Placeholder color used on templates until the palette resolves them.
const UNRESOLVED: Color = Color::rgb(128, 128, 128);

fn node_template(d: &RawData, comm_id: i64) -> Option<GraphNode> {
	let id = d.id.clone()?;
	let kind = match d.kind.as_deref() {
		Some("SEMANTIC_GROUP") => NodeKind::SemanticGroup {
			group_id: d.group_id.clone().unwrap_or_default(),
			member_count: d.member_count.unwrap_or(0),
		},
		Some(other) => NodeKind::Entity(EntityInfo {
			kind: EntityKind::from_wire(other),
			community: d.community.unwrap_or(comm_id),
			pagerank: d.pagerank,
			degree_centrality: d.degree_centrality,
			betweenness: d.betweenness,
			num_sources: d.num_sources.unwrap_or(1),
			source_refs: d
				.source_refs
				.as_deref()
				.and_then(|raw| serde_json::from_str(raw).ok())
				.unwrap_or_default(),
			chunk_count: d.chunk_count.unwrap_or(0),
			description: d.description.clone().filter(|s| !s.is_empty()),
			group: d
				.parent
				.as_deref()
				.filter(|p| p.starts_with("sg-"))
				.and_then(|p| p.strip_prefix("sg-"))
				.map(str::to_string),
		}),
		None => return None,
	};
	Some(GraphNode {
		id,
		label: d.label.clone().unwrap_or_default(),
		color: UNRESOLVED,
		size: d.size.unwrap_or(30.0),
		parent_comm: Some(comm_id),
		kind,
		pos: Vec3::default(),
		vel: Vec3::default(),
	})
}

fn edge_template(d: &RawData, comm_id: Option<i64>, kind: EdgeKind) -> Option<GraphEdge> {
	let (source, target) = (d.source.clone()?, d.target.clone()?);
	Some(GraphEdge {
		id: d
			.id
			.clone()
			.unwrap_or_else(|| format!("{source}-->{target}")),
		source,
		target,
		weight: d.weight,
		description: d.description.clone().filter(|s| !s.is_empty()),
		details: d.details.clone().unwrap_or_default(),
		parent_comm: comm_id,
		kind,
	})
}

impl GraphDataset {
	/// Build the typed dataset from the wire payload.
	///
	/// A service-side `error` field is treated as a load failure. Malformed
	/// individual elements are skipped rather than failing the whole load.
	pub fn from_payload(raw: RawPayload) -> Result<Self, GraphError> {
		if let Some(msg) = raw.error {
			return Err(GraphError::DataLoad(msg));
		}

		let mut communities = Vec::new();
		let mut rollup_edges = Vec::new();
		for el in &raw.meta_elements {
			let d = &el.data;
			if d.source.is_some() {
				if let Some(edge) = edge_template(d, None, EdgeKind::Rollup) {
					rollup_edges.push(edge);
				}
			} else if d.kind.as_deref() == Some("COMMUNITY") {
				let comm = d.community.unwrap_or(UNCLASSIFIED);
				communities.push(GraphNode {
					id: d.id.clone().unwrap_or_else(|| format!("comm-{comm}")),
					label: d.label.clone().unwrap_or_default(),
					color: UNRESOLVED,
					size: d.size.unwrap_or(40.0),
					parent_comm: None,
					kind: NodeKind::Community {
						community: comm,
						member_count: d.member_count.unwrap_or(0),
						default_color: UNRESOLVED,
					},
					pos: Vec3::default(),
					vel: Vec3::default(),
				});
			}
		}

		let mut payloads = HashMap::new();
		for (key, raw_payload) in &raw.community_data {
			let Ok(comm_id) = key.parse::<i64>() else {
				continue;
			};
			let payload = CommunityPayload {
				entities: raw_payload
					.entities
					.iter()
					.filter_map(|el| node_template(&el.data, comm_id))
					.collect(),
				edges: raw_payload
					.edges
					.iter()
					.filter_map(|el| edge_template(&el.data, Some(comm_id), EdgeKind::Relation))
					.collect(),
				semantic_groups: raw_payload
					.semantic_groups
					.iter()
					.filter_map(|el| node_template(&el.data, comm_id))
					.collect(),
			};
			payloads.insert(comm_id, payload);
		}

		let summaries = raw
			.comm_summaries
			.into_iter()
			.filter_map(|(k, v)| k.parse::<i64>().ok().map(|id| (id, v)))
			.collect();

		Ok(Self {
			communities,
			rollup_edges,
			payloads,
			summaries,
			groups: raw.semantic_groups,
			chunk_refs: raw.chunk_refs,
			chunk_texts: raw.chunk_texts,
		})
	}

	/// Chunk references for an entity; missing key is an empty result.
	pub fn chunk_refs_for(&self, entity: &str) -> &[ChunkRef] {
		self.chunk_refs.get(entity).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Chunk text body by deduplicated index.
	pub fn chunk_text(&self, text_idx: usize) -> &str {
		self.chunk_texts.get(text_idx).map(String::as_str).unwrap_or("")
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) const SAMPLE: &str = r##"{
		"metaElements": [
			{"data": {"id": "comm-5", "label": "Distributed Systems", "type": "COMMUNITY",
			          "community": 5, "member_count": 3, "color": "#e6194b", "size": 80.0}},
			{"data": {"id": "comm-7", "label": "Storage", "type": "COMMUNITY",
			          "community": 7, "member_count": 2, "color": "#3cb44b", "size": 60.0}},
			{"data": {"id": "comm-other", "label": "Other (2 small)", "type": "COMMUNITY",
			          "community": -1, "member_count": 4, "color": "#555555", "size": 40.0}},
			{"data": {"id": "comm-5-->comm-7", "source": "comm-5", "target": "comm-7",
			          "weight": 3, "description": "3 cross-community relationships",
			          "details": ["raft -> wal: persists state"]}}
		],
		"communityData": {
			"5": {
				"entities": [
					{"data": {"id": "e1", "label": "Raft", "parent": "comm-5", "type": "CONCEPT",
					          "community": 5, "pagerank": 0.031, "degree_centrality": 0.2,
					          "betweenness": 0.01, "num_sources": 2,
					          "source_refs": "[\"paper:raft\", \"blog:consensus\"]",
					          "size": 48.0, "chunk_count": 2}},
					{"data": {"id": "e2", "label": "Paxos", "parent": "sg-9", "type": "CONCEPT",
					          "community": 5, "pagerank": 0.012, "num_sources": 1,
					          "source_refs": "[]", "size": 30.0, "chunk_count": 0}},
					{"data": {"id": "e3", "label": "Leslie Lamport", "parent": "comm-5",
					          "type": "PERSON", "community": 5, "num_sources": 1,
					          "size": 25.0, "chunk_count": 0}}
				],
				"edges": [
					{"data": {"id": "e1-->e2", "source": "e1", "target": "e2",
					          "description": "competing consensus protocols", "weight": 1.0}},
					{"data": {"id": "e2-->e3", "source": "e2", "target": "e3", "weight": 1.0}}
				],
				"semantic_groups": [
					{"data": {"id": "sg-9", "label": "Consensus", "parent": "comm-5",
					          "type": "SEMANTIC_GROUP", "group_id": "9", "member_count": 2}}
				]
			},
			"7": {"entities": [], "edges": [], "semantic_groups": []}
		},
		"commSummaries": {
			"5": {"title": "Distributed Systems", "summary": "Consensus and replication.",
			      "key_insights": ["Raft dominates modern designs"]}
		},
		"semanticGroups": {
			"9": {"canonical": "Consensus", "members": ["Paxos", "Raft"],
			      "member_similarities": {"Paxos": 0.91}}
		},
		"chunkRefs": {
			"e1": [{"index": 0, "source_id": "paper:raft:p1", "text_idx": 0},
			       {"index": 3, "source_id": "blog:consensus:p2", "text_idx": 1}]
		},
		"chunkTexts": ["Raft is a consensus algorithm.", "Consensus made simple."]
	}"##;

	pub(crate) fn sample_dataset() -> GraphDataset {
		let raw: RawPayload = serde_json::from_str(SAMPLE).unwrap();
		GraphDataset::from_payload(raw).unwrap()
	}

	#[test]
	fn parses_sample_payload() {
		let ds = sample_dataset();
		assert_eq!(ds.communities.len(), 3);
		assert_eq!(ds.rollup_edges.len(), 1);
		assert_eq!(ds.rollup_edges[0].kind, EdgeKind::Rollup);
		assert_eq!(ds.rollup_edges[0].weight, Some(3.0));

		let payload = &ds.payloads[&5];
		assert_eq!(payload.entities.len(), 3);
		assert_eq!(payload.edges.len(), 2);
		assert_eq!(payload.semantic_groups.len(), 1);
	}

	#[test]
	fn entity_fields_are_typed() {
		let ds = sample_dataset();
		let payload = &ds.payloads[&5];
		let e1 = payload.entities.iter().find(|n| n.id == "e1").unwrap();
		let NodeKind::Entity(info) = &e1.kind else {
			panic!("e1 should be an entity");
		};
		assert_eq!(info.kind, EntityKind::Concept);
		assert_eq!(info.source_refs, vec!["paper:raft", "blog:consensus"]);
		assert_eq!(info.chunk_count, 2);
		assert_eq!(info.group, None);

		let e2 = payload.entities.iter().find(|n| n.id == "e2").unwrap();
		let NodeKind::Entity(info) = &e2.kind else {
			panic!("e2 should be an entity");
		};
		assert_eq!(info.group.as_deref(), Some("9"));
		// Absent centrality scores stay absent; the panel renders "N/A".
		assert_eq!(info.degree_centrality, None);
	}

	#[test]
	fn service_error_is_load_failure() {
		let raw: RawPayload =
			serde_json::from_str(r#"{"error": "Database not found"}"#).unwrap();
		assert!(GraphDataset::from_payload(raw).is_err());
	}

	#[test]
	fn missing_lookup_keys_are_empty() {
		let ds = sample_dataset();
		assert!(ds.chunk_refs_for("nonexistent").is_empty());
		assert_eq!(ds.chunk_text(999), "");
	}
}
