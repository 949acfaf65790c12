//! Node/edge sets to coordinates.
//!
//! Compact graphs use a fixed radial scheme around the company node. Larger
//! aggregate graphs are relaxed with a bounded number of repulsion/spring
//! iterations from a seeded start, so a given seed always lands in the same
//! arrangement.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{CompactGeometry, RelaxParams};
use super::types::{
	JobGraph, LayoutKind, NodeKind, PositionedEdge, PositionedGraph, PositionedNode,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutMode {
	Compact(CompactGeometry),
	Expansive(RelaxParams),
}

pub fn layout(graph: &JobGraph, mode: &LayoutMode) -> PositionedGraph {
	match mode {
		LayoutMode::Compact(geometry) => radial(graph, geometry),
		LayoutMode::Expansive(params) => relax(graph, params),
	}
}

fn resolve_edges(graph: &JobGraph) -> Vec<PositionedEdge> {
	let index: HashMap<&str, usize> = graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	graph
		.edges
		.iter()
		.filter_map(|e| {
			Some(PositionedEdge {
				source: *index.get(e.source.as_str())?,
				target: *index.get(e.target.as_str())?,
				kind: e.kind,
			})
		})
		.collect()
}

fn positioned(graph: &JobGraph, kind: LayoutKind, at: impl Fn(usize) -> (DVec3, f64)) -> PositionedGraph {
	let nodes = graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| {
			let (position, size) = at(i);
			PositionedNode {
				id: n.id.clone(),
				label: n.label.clone(),
				name: n.name.clone(),
				detail: n.detail.clone(),
				url: n.url.clone(),
				kind: n.kind,
				position,
				size,
			}
		})
		.collect();
	PositionedGraph {
		kind,
		nodes,
		edges: resolve_edges(graph),
	}
}

/// Angle of the `i`-th of `count` skills, in y-down screen space.
///
/// Starts at the bottom; even counts are shifted half a step so no slot
/// points straight up at the job node.
pub fn skill_angle(i: usize, count: usize) -> f64 {
	let step = TAU / count.max(1) as f64;
	let start = if count % 2 == 0 {
		FRAC_PI_2 + step / 2.0
	} else {
		FRAC_PI_2
	};
	start + i as f64 * step
}

fn radial(graph: &JobGraph, geometry: &CompactGeometry) -> PositionedGraph {
	let center = geometry.viewport().center();
	let skill_count = graph.count(NodeKind::Skill);
	let mut skill_slot = HashMap::new();
	for (slot, (i, _)) in graph
		.nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| n.kind == NodeKind::Skill)
		.enumerate()
	{
		skill_slot.insert(i, slot);
	}

	positioned(graph, LayoutKind::Compact, |i| {
		let kind = graph.nodes[i].kind;
		let position = match kind {
			NodeKind::Company => DVec3::new(center.x, center.y, 0.0),
			NodeKind::Job => DVec3::new(center.x, center.y - geometry.job_offset, 0.0),
			NodeKind::Skill => {
				let angle = skill_angle(skill_slot[&i], skill_count);
				DVec3::new(
					center.x + angle.cos() * geometry.skill_radius,
					center.y + angle.sin() * geometry.skill_radius,
					0.0,
				)
			}
		};
		(position, geometry.node_size(kind))
	})
}

fn ring_radius(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Company => 40.0,
		NodeKind::Job => 90.0,
		NodeKind::Skill => 150.0,
	}
}

fn seed_positions(graph: &JobGraph, params: &RelaxParams) -> Vec<DVec3> {
	let mut rng = StdRng::seed_from_u64(params.seed);
	let mut totals: HashMap<NodeKind, usize> = HashMap::new();
	for n in &graph.nodes {
		*totals.entry(n.kind).or_default() += 1;
	}
	let mut placed: HashMap<NodeKind, usize> = HashMap::new();

	graph
		.nodes
		.iter()
		.map(|n| {
			let slot = placed.entry(n.kind).or_default();
			let angle = *slot as f64 * TAU / totals[&n.kind] as f64;
			*slot += 1;
			let r = ring_radius(n.kind);
			let jitter = r * 0.15;
			let z = if params.depth {
				rng.gen_range(-r..=r) * 0.5
			} else {
				0.0
			};
			DVec3::new(
				r * angle.cos() + rng.gen_range(-jitter..=jitter),
				r * angle.sin() + rng.gen_range(-jitter..=jitter),
				z,
			)
		})
		.collect()
}

fn relax(graph: &JobGraph, params: &RelaxParams) -> PositionedGraph {
	let edges = resolve_edges(graph);
	let mut pos = seed_positions(graph, params);
	let mut vel = vec![DVec3::ZERO; pos.len()];
	let min_d2 = params.min_distance * params.min_distance;

	for _ in 0..params.iterations {
		let mut forces = vec![DVec3::ZERO; pos.len()];

		for i in 0..pos.len() {
			for j in (i + 1)..pos.len() {
				let d = pos[i] - pos[j];
				let d2 = d.dot(d).max(min_d2);
				let push = d.normalize_or_zero() * (params.repulsion / d2);
				forces[i] = forces[i] + push;
				forces[j] = forces[j] - push;
			}
		}

		for edge in &edges {
			let d = pos[edge.target] - pos[edge.source];
			let len = d.length().max(0.001);
			let stretch = len - params.rest_length(edge.kind);
			let pull = d * (params.spring * stretch / len);
			forces[edge.source] = forces[edge.source] + pull;
			forces[edge.target] = forces[edge.target] - pull;
		}

		for i in 0..pos.len() {
			vel[i] = (vel[i] + forces[i]) * params.damping;
			let mut step = vel[i];
			if step.length() > params.max_step {
				step = step.normalize_or_zero() * params.max_step;
			}
			if !params.depth {
				step.z = 0.0;
			}
			pos[i] = pos[i] + step;
		}
	}

	if !pos.is_empty() {
		let sum = pos.iter().fold(DVec3::ZERO, |acc, p| acc + *p);
		let centroid = sum * (1.0 / pos.len() as f64);
		for p in &mut pos {
			*p = *p - centroid;
		}
	}

	positioned(graph, LayoutKind::Expansive, |i| {
		(pos[i], params.node_size(graph.nodes[i].kind))
	})
}
