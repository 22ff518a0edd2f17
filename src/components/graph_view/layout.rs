//! Position policies for the two backends.
//!
//! The planar backend repositions nodes deterministically after every
//! expand/collapse: top-level roots on rings, children of an expanding
//! community on a circle around their parent. The sphere backend runs a
//! continuous force simulation instead and projects every position onto a
//! fixed-radius sphere each tick, so entities stay pinned to the shell
//! whatever the unconstrained solver produces.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use super::model::{NodeKind, Vec3};
use super::state::GraphState;

// Planar layout policy.

fn circle_pos(center: Vec3, radius: f64, i: usize, count: usize) -> Vec3 {
	let angle = TAU * i as f64 / count.max(1) as f64 - PI / 2.0;
	Vec3::new(
		center.x + radius * angle.cos(),
		center.y + radius * angle.sin(),
		0.0,
	)
}

fn arrange_in_circle(state: &mut GraphState, ids: &[String], center: Vec3, radius: f64) {
	let count = ids.len();
	for (i, id) in ids.iter().enumerate() {
		if let Some(node) = state.nodes.get_mut(id) {
			node.pos = circle_pos(center, radius, i, count);
		}
	}
}

/// Place a freshly expanded community's children evenly around the parent's
/// last known position, radius scaling with child count.
pub fn place_children(state: &mut GraphState, community: i64) {
	let Some(root_id) = state.root_id(community).cloned() else {
		return;
	};
	let center = state.nodes.get(&root_id).map(|n| n.pos).unwrap_or_default();
	let children: Vec<String> = state
		.nodes
		.iter()
		.filter(|n| n.parent_comm == Some(community) && !n.kind.is_chunk())
		.map(|n| n.id.clone())
		.collect();
	let radius = (children.len() as f64 * 12.0).max(60.0);
	arrange_in_circle(state, &children, center, radius);
}

/// Place an entity's chunk nodes on a circle around the entity.
pub fn place_chunks(state: &mut GraphState, entity_id: &str) {
	let Some(center) = state.nodes.get(entity_id).map(|n| n.pos) else {
		return;
	};
	let chunks: Vec<String> = state
		.nodes
		.iter()
		.filter(|n| n.kind.is_chunk())
		.map(|n| n.id.clone())
		.collect();
	let radius = 120.0 + chunks.len() as f64 * 8.0;
	arrange_in_circle(state, &chunks, center, radius);
}

/// Distance from a root to its farthest child, plus that child's extent.
fn bounding_radius(state: &GraphState, community: i64, root_pos: Vec3) -> f64 {
	let mut radius: f64 = 0.0;
	for node in state.nodes.iter() {
		if node.parent_comm == Some(community) {
			let (dx, dy) = (node.pos.x - root_pos.x, node.pos.y - root_pos.y);
			radius = radius.max((dx * dx + dy * dy).sqrt() + node.size / 2.0);
		}
	}
	radius
}

/// Re-run the top-level ring policy after an expand/collapse.
///
/// With nothing expanded every root sits on one circle sized to the root
/// count, largest first. Otherwise expanded roots spread around the global
/// centroid scaled by their bounding radii (a single expanded root takes the
/// centroid itself) and collapsed roots form an outer ring beyond the widest
/// expanded cluster. Children translate with their root.
pub fn relayout_top_level(state: &mut GraphState) {
	let mut roots: Vec<(String, i64, f64, Vec3)> = state
		.nodes
		.iter()
		.filter_map(|n| match &n.kind {
			NodeKind::Community { community, .. } => {
				Some((n.id.clone(), *community, n.size, n.pos))
			}
			_ => None,
		})
		.collect();
	if roots.is_empty() {
		return;
	}

	let inv = 1.0 / roots.len() as f64;
	let centroid = roots.iter().fold(Vec3::default(), |acc, (_, _, _, pos)| {
		Vec3::new(acc.x + pos.x * inv, acc.y + pos.y * inv, 0.0)
	});

	let (expanded, collapsed): (Vec<_>, Vec<_>) = {
		let mut expanded = Vec::new();
		let mut collapsed = Vec::new();
		for root in roots.drain(..) {
			if state.is_expanded(root.1) {
				expanded.push(root);
			} else {
				collapsed.push(root);
			}
		}
		(expanded, collapsed)
	};

	if expanded.is_empty() {
		let mut ids: Vec<(String, f64)> = collapsed
			.into_iter()
			.map(|(id, _, size, _)| (id, size))
			.collect();
		ids.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
		let ids: Vec<String> = ids.into_iter().map(|(id, _)| id).collect();
		let radius = (ids.len() as f64 * 25.0).max(200.0);
		arrange_in_circle(state, &ids, centroid, radius);
		return;
	}

	let max_bounding = expanded
		.iter()
		.map(|(_, community, _, pos)| bounding_radius(state, *community, *pos))
		.fold(0.0_f64, f64::max);

	let spread = max_bounding * 2.5;
	let mut max_extent: f64 = 0.0;
	for (i, (id, community, _, old_pos)) in expanded.iter().enumerate() {
		let new_pos = if expanded.len() == 1 {
			centroid
		} else {
			circle_pos(centroid, spread, i, expanded.len())
		};
		move_root_with_children(state, id, *community, *old_pos, new_pos);
		let dist = ((new_pos.x - centroid.x).powi(2) + (new_pos.y - centroid.y).powi(2)).sqrt();
		max_extent = max_extent.max(dist + bounding_radius(state, *community, new_pos));
	}

	let outer: Vec<String> = collapsed.into_iter().map(|(id, _, _, _)| id).collect();
	arrange_in_circle(state, &outer, centroid, max_extent + 120.0);
}

fn move_root_with_children(
	state: &mut GraphState,
	root_id: &str,
	community: i64,
	old_pos: Vec3,
	new_pos: Vec3,
) {
	let (dx, dy) = (new_pos.x - old_pos.x, new_pos.y - old_pos.y);
	if let Some(root) = state.nodes.get_mut(root_id) {
		root.pos = new_pos;
	}
	if dx == 0.0 && dy == 0.0 {
		return;
	}
	for node in state.nodes.iter_mut() {
		if node.parent_comm == Some(community) {
			node.pos.x += dx;
			node.pos.y += dy;
		}
	}
}

/// Planar bounding box of all materialized positions, for fit-to-view.
pub fn bounds(state: &GraphState) -> Option<(Vec3, Vec3)> {
	let mut iter = state.nodes.iter();
	let first = iter.next()?;
	let mut min = first.pos;
	let mut max = first.pos;
	for node in iter {
		min.x = min.x.min(node.pos.x);
		min.y = min.y.min(node.pos.y);
		max.x = max.x.max(node.pos.x);
		max.y = max.y.max(node.pos.y);
	}
	Some((min, max))
}

// Sphere simulation.

/// Deterministic pseudo-random in [0, 1) from a seed.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

fn seed_hash(id: &str) -> f64 {
	id.bytes().fold(7.0, |acc, b| acc + b as f64 * 0.61803)
}

/// Seed every node still at the origin onto a deterministic point of the
/// sphere. Leaving them at the origin would make the projection skip them.
pub fn seed_sphere_positions(state: &mut GraphState) {
	let radius = state.config.sphere_radius;
	for node in state.nodes.iter_mut() {
		if node.pos.norm() > f64::EPSILON {
			continue;
		}
		let seed = seed_hash(&node.id);
		let theta = pseudo_random(seed) * TAU;
		let z = pseudo_random(seed * 1.7) * 2.0 - 1.0;
		let ring = (1.0 - z * z).sqrt();
		node.pos = Vec3::new(
			radius * ring * theta.cos(),
			radius * ring * theta.sin(),
			radius * z,
		);
		node.vel = Vec3::default();
	}
}

/// Advance the 3D force simulation one tick and project every position onto
/// the sphere surface: `p ← p · r/‖p‖`, skipped when `‖p‖ = 0`.
pub fn sphere_tick(state: &mut GraphState, dt: f64) {
	let charge = state.config.force_charge;
	let spring = state.config.force_spring;
	let damping = state.config.damping_factor;
	let radius = state.config.sphere_radius;

	let positions: Vec<(String, Vec3)> = state
		.nodes
		.iter()
		.map(|n| (n.id.clone(), n.pos))
		.collect();
	let index: HashMap<&str, usize> = positions
		.iter()
		.enumerate()
		.map(|(i, (id, _))| (id.as_str(), i))
		.collect();
	let mut forces = vec![Vec3::default(); positions.len()];

	// Pairwise charge repulsion.
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let (a, b) = (positions[i].1, positions[j].1);
			let d = Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z);
			let dist_sq = (d.x * d.x + d.y * d.y + d.z * d.z).max(1.0);
			let f = charge / dist_sq;
			let dist = dist_sq.sqrt();
			let push = d.scale(f / dist);
			forces[i] = Vec3::new(forces[i].x + push.x, forces[i].y + push.y, forces[i].z + push.z);
			forces[j] = Vec3::new(forces[j].x - push.x, forces[j].y - push.y, forces[j].z - push.z);
		}
	}

	// Springs along edges, scaled by edge weight (anchors pull weakly).
	let rest = radius * 0.4;
	for edge in state.edges.iter() {
		let (Some(&si), Some(&ti)) = (
			index.get(edge.source.as_str()),
			index.get(edge.target.as_str()),
		) else {
			continue;
		};
		let (a, b) = (positions[si].1, positions[ti].1);
		let d = Vec3::new(b.x - a.x, b.y - a.y, b.z - a.z);
		let dist = d.norm().max(1e-6);
		let stretch = dist - rest;
		let k = spring * edge.weight.unwrap_or(1.0);
		let pull = d.scale(k * stretch / dist);
		forces[si] = Vec3::new(forces[si].x + pull.x, forces[si].y + pull.y, forces[si].z + pull.z);
		forces[ti] = Vec3::new(forces[ti].x - pull.x, forces[ti].y - pull.y, forces[ti].z - pull.z);
	}

	for (slot, (id, _)) in positions.iter().enumerate() {
		let Some(node) = state.nodes.get_mut(id) else {
			continue;
		};
		let f = forces[slot];
		node.vel = Vec3::new(
			(node.vel.x + f.x * dt) * damping,
			(node.vel.y + f.y * dt) * damping,
			(node.vel.z + f.z * dt) * damping,
		);
		node.pos = Vec3::new(
			node.pos.x + node.vel.x * dt,
			node.pos.y + node.vel.y * dt,
			node.pos.z + node.vel.z * dt,
		);
		// Surface constraint.
		let norm = node.pos.norm();
		if norm > 0.0 {
			node.pos = node.pos.scale(radius / norm);
		}
	}
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
	fn overview_roots_share_one_circle() {
		let mut s = state();
		relayout_top_level(&mut s);
		let radius = 200.0_f64; // max(200, 3 * 25)
		for node in s.nodes.iter() {
			let r = (node.pos.x * node.pos.x + node.pos.y * node.pos.y).sqrt();
			assert!((r - radius).abs() < 1e-6, "{} at radius {r}", node.id);
		}
	}

	#[test]
	fn children_circle_scales_with_count() {
		let mut s = state();
		relayout_top_level(&mut s);
		s.expand(5);
		place_children(&mut s, 5);
		let center = s.nodes.get("comm-5").unwrap().pos;
		// 4 children (3 entities + 1 group) -> radius max(60, 4 * 12) = 60.
		for id in ["e1", "e2", "e3", "sg-9"] {
			let pos = s.nodes.get(id).unwrap().pos;
			let r = ((pos.x - center.x).powi(2) + (pos.y - center.y).powi(2)).sqrt();
			assert!((r - 60.0).abs() < 1e-6);
		}
	}

	#[test]
	fn single_expanded_root_takes_centroid() {
		let mut s = state();
		relayout_top_level(&mut s);
		s.expand(5);
		place_children(&mut s, 5);
		relayout_top_level(&mut s);

		let expanded_pos = s.nodes.get("comm-5").unwrap().pos;
		let collapsed_pos = s.nodes.get("comm-7").unwrap().pos;
		let d_expanded = (expanded_pos.x.powi(2) + expanded_pos.y.powi(2)).sqrt();
		let d_collapsed = ((collapsed_pos.x - expanded_pos.x).powi(2)
			+ (collapsed_pos.y - expanded_pos.y).powi(2))
		.sqrt();
		// Collapsed roots sit on an outer ring beyond the expanded cluster.
		assert!(d_collapsed > bounding_radius(&s, 5, expanded_pos));
		assert!(d_expanded < 1e-6);
	}

	#[test]
	fn children_translate_with_their_root() {
		let mut s = state();
		relayout_top_level(&mut s);
		s.expand(5);
		place_children(&mut s, 5);
		let root_before = s.nodes.get("comm-5").unwrap().pos;
		let child_before = s.nodes.get("e1").unwrap().pos;
		relayout_top_level(&mut s);
		let root_after = s.nodes.get("comm-5").unwrap().pos;
		let child_after = s.nodes.get("e1").unwrap().pos;
		let root_delta = (root_after.x - root_before.x, root_after.y - root_before.y);
		let child_delta = (child_after.x - child_before.x, child_after.y - child_before.y);
		assert!((root_delta.0 - child_delta.0).abs() < 1e-9);
		assert!((root_delta.1 - child_delta.1).abs() < 1e-9);
	}

	#[test]
	fn chunk_ring_radius() {
		let mut s = state();
		relayout_top_level(&mut s);
		s.expand(5);
		place_children(&mut s, 5);
		s.show_chunks("e1");
		place_chunks(&mut s, "e1");
		let center = s.nodes.get("e1").unwrap().pos;
		for id in ["chunk-e1-0", "chunk-e1-3"] {
			let pos = s.nodes.get(id).unwrap().pos;
			let r = ((pos.x - center.x).powi(2) + (pos.y - center.y).powi(2)).sqrt();
			assert!((r - 136.0).abs() < 1e-6); // 120 + 2 * 8
		}
	}

	#[test]
	fn seeding_is_deterministic_and_on_sphere() {
		let mut a = state();
		let mut b = state();
		seed_sphere_positions(&mut a);
		seed_sphere_positions(&mut b);
		for node in a.nodes.iter() {
			let other = b.nodes.get(&node.id).unwrap();
			assert_eq!(node.pos, other.pos);
			assert!((node.pos.norm() - a.config.sphere_radius).abs() < 1e-6);
		}
	}

	#[test]
	fn tick_keeps_every_node_on_the_shell() {
		let mut s = state();
		s.expand(5);
		seed_sphere_positions(&mut s);
		for _ in 0..10 {
			sphere_tick(&mut s, 0.016);
		}
		let r = s.config.sphere_radius;
		for node in s.nodes.iter() {
			assert!((node.pos.norm() - r).abs() < 1e-6, "{} off shell", node.id);
		}
	}

	#[test]
	fn origin_position_is_skipped_by_the_constraint() {
		let mut s = state();
		// Do not seed: everything is at the origin with zero velocity and no
		// net force asymmetry can be guaranteed, but the constraint must not
		// divide by zero either way.
		sphere_tick(&mut s, 0.016);
		for node in s.nodes.iter() {
			assert!(node.pos.x.is_finite() && node.pos.y.is_finite() && node.pos.z.is_finite());
		}
	}
}
