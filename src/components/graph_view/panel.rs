//! Side-panel presenter.
//!
//! Pure projection of the graph state into display structs, kept free of any
//! DOM types so every fallback rule is testable: centrality metrics print
//! with four decimals or "N/A", an entity without source references reads
//! "single source", and a missing community summary degrades to the node's
//! basic fields.

use super::model::{NodeKind, UNCLASSIFIED};
use super::palette::{self, Color};
use super::state::GraphState;

/// Metric line with the formatted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricRow {
	pub name: &'static str,
	pub value: String,
}

/// One chunk card under an entity's detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkCard {
	pub chunk_id: String,
	pub index: i64,
	pub source_id: String,
	pub text: String,
}

/// Community detail contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityView {
	pub label: String,
	pub community: i64,
	pub member_count: u32,
	pub expanded: bool,
	pub title: Option<String>,
	pub summary: Option<String>,
	pub key_insights: Vec<String>,
}

/// Entity detail contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityView {
	pub label: String,
	pub kind: &'static str,
	pub community: i64,
	pub metrics: Vec<MetricRow>,
	pub sources: String,
	pub description: Option<String>,
	/// Owning community's summary box, when one exists.
	pub community_title: Option<String>,
	pub community_summary: Option<String>,
	/// Semantic-group box when the entity is a group member.
	pub group: Option<GroupView>,
	/// Recorded source-chunk count; shown as a hint even when no cards are
	/// materialized (the `chunkRefs` lookup can be empty).
	pub chunk_count: u32,
	pub chunks: Vec<ChunkCard>,
}

/// Semantic group detail contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupView {
	pub label: String,
	pub canonical: String,
	pub member_count: u32,
	/// Member names paired with their similarity line: `sim=<4 dp>` when a
	/// score is recorded, `(canonical)` otherwise.
	pub members: Vec<(String, String)>,
}

/// What the side panel shows for the current selection.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailView {
	/// Nothing selected.
	Placeholder,
	Community(CommunityView),
	Entity(EntityView),
	Group(GroupView),
	/// Load or interaction failure surfaced inline.
	Fault(String),
}

/// Four-decimal metric formatting with an explicit absence marker.
pub fn format_metric(value: Option<f64>) -> String {
	match value {
		Some(v) => format!("{v:.4}"),
		None => "N/A".to_string(),
	}
}

/// Source attribution line: joined references, or a singular fallback.
pub fn format_sources(refs: &[String], num_sources: u32) -> String {
	if refs.is_empty() {
		if num_sources > 1 {
			format!("{num_sources} sources")
		} else {
			"single source".to_string()
		}
	} else {
		refs.join(", ")
	}
}

/// Semantic-group box contents for a group id, empty-on-missing.
fn group_view(state: &GraphState, group_id: &str, label: String, member_count: u32) -> GroupView {
	let detail = state.dataset().groups.get(group_id);
	GroupView {
		label,
		canonical: detail.map(|d| d.canonical.clone()).unwrap_or_default(),
		member_count,
		members: detail
			.map(|d| {
				d.members
					.iter()
					.map(|m| {
						let score = d
							.member_similarities
							.get(m)
							.map(|s| format!("sim={s:.4}"))
							.unwrap_or_else(|| "(canonical)".to_string());
						(m.clone(), score)
					})
					.collect()
			})
			.unwrap_or_default(),
	}
}

/// Build the detail view for the current selection.
pub fn detail_view(state: &GraphState) -> DetailView {
	let Some(selected) = state.selected() else {
		return DetailView::Placeholder;
	};
	let Some(node) = state.nodes.get(selected) else {
		return DetailView::Placeholder;
	};

	match &node.kind {
		NodeKind::Community {
			community,
			member_count,
			..
		} => {
			let summary = state.dataset().summaries.get(community);
			DetailView::Community(CommunityView {
				label: node.label.clone(),
				community: *community,
				member_count: *member_count,
				expanded: state.is_expanded(*community),
				title: summary.map(|s| s.title.clone()),
				summary: summary.map(|s| s.summary.clone()),
				key_insights: summary.map(|s| s.key_insights.clone()).unwrap_or_default(),
			})
		}
		NodeKind::Entity(info) => {
			let summary = state.dataset().summaries.get(&info.community);
			DetailView::Entity(EntityView {
				label: node.label.clone(),
				kind: info.kind.label(),
				community: info.community,
				metrics: vec![
					MetricRow {
						name: "PageRank",
						value: format_metric(info.pagerank),
					},
					MetricRow {
						name: "Degree centrality",
						value: format_metric(info.degree_centrality),
					},
					MetricRow {
						name: "Betweenness",
						value: format_metric(info.betweenness),
					},
				],
				sources: format_sources(&info.source_refs, info.num_sources),
				description: info.description.clone(),
				community_title: summary.map(|s| s.title.clone()),
				community_summary: summary.map(|s| s.summary.clone()),
				group: info.group.as_deref().map(|gid| {
					let detail = state.dataset().groups.get(gid);
					let label = detail.map(|d| d.canonical.clone()).unwrap_or_default();
					let count = detail.map(|d| d.members.len() as u32).unwrap_or(0);
					group_view(state, gid, label, count)
				}),
				chunk_count: info.chunk_count,
				chunks: chunk_cards(state, selected),
			})
		}
		NodeKind::SemanticGroup {
			group_id,
			member_count,
		} => DetailView::Group(group_view(
			state,
			group_id,
			node.label.clone(),
			*member_count,
		)),
		// Chunks respond to hover only; the panel keeps whatever entity
		// selection produced them.
		NodeKind::Chunk { .. } => DetailView::Placeholder,
	}
}

/// Chunk cards for an entity whose chunks are currently materialized.
pub fn chunk_cards(state: &GraphState, entity_id: &str) -> Vec<ChunkCard> {
	if state.chunk_entity() != Some(entity_id) {
		return Vec::new();
	}
	state
		.dataset()
		.chunk_refs_for(entity_id)
		.iter()
		.map(|r| ChunkCard {
			chunk_id: format!("chunk-{entity_id}-{}", r.index),
			index: r.index,
			source_id: r.source_id.clone(),
			text: state.dataset().chunk_text(r.text_idx).to_string(),
		})
		.collect()
}

/// One legend entry per community root.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendRow {
	pub community: i64,
	pub label: String,
	pub swatch: Color,
	/// The unclassified bucket highlights instead of expanding.
	pub focus_only: bool,
}

/// Legend rows in payload order, swatches resolved for the current theme.
pub fn legend_rows(state: &GraphState) -> Vec<LegendRow> {
	state
		.dataset()
		.communities
		.iter()
		.filter_map(|node| match &node.kind {
			NodeKind::Community { community, .. } => Some(LegendRow {
				community: *community,
				label: node.label.clone(),
				swatch: palette::color_for(*community, state.theme()),
				focus_only: *community == UNCLASSIFIED,
			}),
			_ => None,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::model::tests::sample_dataset;
	use crate::components::graph_view::palette::ThemeMode;
	use crate::components::graph_view::state::GraphState;

	fn state() -> GraphState {
		GraphState::new(sample_dataset(), ThemeMode::Dark)
	}

	#[test]
	fn metric_formatting() {
		assert_eq!(format_metric(Some(0.031)), "0.0310");
		assert_eq!(format_metric(Some(0.123456)), "0.1235");
		assert_eq!(format_metric(None), "N/A");
	}

	#[test]
	fn source_fallbacks() {
		assert_eq!(format_sources(&[], 1), "single source");
		assert_eq!(format_sources(&[], 3), "3 sources");
		assert_eq!(
			format_sources(&["a".into(), "b".into()], 2),
			"a, b"
		);
	}

	#[test]
	fn no_selection_is_placeholder() {
		let s = state();
		assert_eq!(detail_view(&s), DetailView::Placeholder);
	}

	#[test]
	fn community_view_includes_summary() {
		let mut s = state();
		s.handle_click(Some("comm-5")).unwrap();
		let DetailView::Community(view) = detail_view(&s) else {
			panic!("expected community view");
		};
		assert_eq!(view.community, 5);
		assert_eq!(view.member_count, 3);
		assert!(view.expanded);
		assert_eq!(view.summary.as_deref(), Some("Consensus and replication."));
		assert_eq!(view.key_insights.len(), 1);
	}

	#[test]
	fn community_without_summary_degrades() {
		let mut s = state();
		s.handle_click(Some("comm-7")).unwrap();
		let DetailView::Community(view) = detail_view(&s) else {
			panic!("expected community view");
		};
		assert_eq!(view.summary, None);
		assert!(view.key_insights.is_empty());
	}

	#[test]
	fn entity_view_formats_metrics_and_chunks() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e1")).unwrap();
		let DetailView::Entity(view) = detail_view(&s) else {
			panic!("expected entity view");
		};
		assert_eq!(view.kind, "CONCEPT");
		assert_eq!(view.metrics[0].value, "0.0310");
		assert_eq!(view.metrics[2].value, "0.0100");
		assert_eq!(view.sources, "paper:raft, blog:consensus");
		// e1 is not a group member; its community summary still shows.
		assert_eq!(view.group, None);
		assert_eq!(
			view.community_summary.as_deref(),
			Some("Consensus and replication.")
		);
		assert_eq!(view.chunk_count, 2);
		assert_eq!(view.chunks.len(), 2);
		assert_eq!(view.chunks[0].chunk_id, "chunk-e1-0");
		assert_eq!(view.chunks[0].text, "Raft is a consensus algorithm.");
		assert_eq!(view.chunks[1].index, 3);
	}

	#[test]
	fn chunk_hint_survives_without_materialized_cards() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e1")).unwrap();
		s.clear_chunks();
		let DetailView::Entity(view) = detail_view(&s) else {
			panic!("expected entity view");
		};
		// The recorded count still reads 2 even though no cards are open.
		assert_eq!(view.chunk_count, 2);
		assert!(view.chunks.is_empty());
	}

	#[test]
	fn entity_without_metrics_reads_na() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e3")).unwrap();
		let DetailView::Entity(view) = detail_view(&s) else {
			panic!("expected entity view");
		};
		assert!(view.metrics.iter().all(|m| m.value == "N/A"));
		assert_eq!(view.sources, "single source");
		assert!(view.chunks.is_empty());
	}

	#[test]
	fn group_view_lists_members_with_scores() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("sg-9")).unwrap();
		let DetailView::Group(view) = detail_view(&s) else {
			panic!("expected group view");
		};
		assert_eq!(view.canonical, "Consensus");
		assert_eq!(view.members.len(), 2);
		let paxos = view.members.iter().find(|(m, _)| m == "Paxos").unwrap();
		assert_eq!(paxos.1, "sim=0.9100");
		let raft = view.members.iter().find(|(m, _)| m == "Raft").unwrap();
		assert_eq!(raft.1, "(canonical)");
	}

	#[test]
	fn group_member_entity_carries_its_group_box() {
		let mut s = state();
		s.expand(5);
		s.handle_click(Some("e2")).unwrap();
		let DetailView::Entity(view) = detail_view(&s) else {
			panic!("expected entity view");
		};
		let group = view.group.expect("e2 belongs to sg-9");
		assert_eq!(group.canonical, "Consensus");
		assert_eq!(group.member_count, 2);
	}

	#[test]
	fn chunk_cards_require_an_open_expansion() {
		let mut s = state();
		s.expand(5);
		assert!(chunk_cards(&s, "e1").is_empty());
		s.show_chunks("e1");
		assert_eq!(chunk_cards(&s, "e1").len(), 2);
		assert!(chunk_cards(&s, "e2").is_empty());
	}

	#[test]
	fn legend_covers_every_root_in_order() {
		let s = state();
		let rows = legend_rows(&s);
		assert_eq!(rows.len(), 3);
		assert_eq!(rows[0].community, 5);
		assert!(!rows[0].focus_only);
		let other = &rows[2];
		assert_eq!(other.community, -1);
		assert!(other.focus_only);
		assert_eq!(other.swatch, palette::color_for(-1, ThemeMode::Dark));
	}
}
