use glam::DVec2;

use super::projection::Ray;
use super::types::PositionedGraph;
use super::view::{View, ViewTransform};

/// Transient emphasis written by pointer callbacks and read by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
	pub hovered: Option<String>,
	pub expanded: bool,
}

/// Nearest node whose center lies within `size + tolerance` of the pointer.
pub fn hit_test_flat(
	graph: &PositionedGraph,
	transform: &ViewTransform,
	pointer: DVec2,
	tolerance: f64,
) -> Option<usize> {
	let (gx, gy) = transform.screen_to_graph(pointer.x, pointer.y);
	let at = DVec2::new(gx, gy);
	// Tolerance is given in screen pixels.
	let slack = tolerance / transform.k;
	graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (i, n.position.truncate().distance(at), n.size + slack))
		.filter(|(_, d, reach)| d <= reach)
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(i, _, _)| i)
}

/// Nearest node to a camera ray, accepting the same `size + tolerance` reach.
///
/// `pixels_per_unit_at(t)` converts the pixel tolerance into world units at
/// distance `t` along the ray.
pub fn hit_test_ray(
	graph: &PositionedGraph,
	ray: &Ray,
	tolerance: f64,
	pixels_per_unit_at: impl Fn(f64) -> f64,
) -> Option<usize> {
	graph
		.nodes
		.iter()
		.enumerate()
		.filter_map(|(i, n)| {
			let (along, gap) = ray.closest_approach(n.position);
			if along <= 0.0 {
				return None;
			}
			let slack = tolerance / pixels_per_unit_at(along).max(f64::EPSILON);
			(gap <= n.size + slack).then_some((i, gap, along))
		})
		.min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)))
		.map(|(i, _, _)| i)
}

/// Turns pointer events into hover and expand state.
#[derive(Clone, Debug)]
pub struct InteractionController {
	state: InteractionState,
	tolerance: f64,
}

impl InteractionController {
	pub fn new(tolerance: f64) -> Self {
		Self {
			state: InteractionState::default(),
			tolerance: tolerance.max(0.0),
		}
	}

	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	pub fn pick(&self, graph: &PositionedGraph, view: &View, pointer: DVec2) -> Option<usize> {
		match view {
			View::Flat(transform) => hit_test_flat(graph, transform, pointer, self.tolerance),
			View::Projected {
				camera,
				elapsed,
				viewport,
			} => {
				let ray = camera.ray(pointer, *elapsed, *viewport);
				let focal = camera.focal;
				// Along the ray `t` approximates depth; one world unit spans focal / t pixels.
				hit_test_ray(graph, &ray, self.tolerance, |t| focal / t.max(1.0))
			}
		}
	}

	/// Returns true when the hovered node changed.
	pub fn pointer_move(&mut self, graph: &PositionedGraph, view: &View, pointer: DVec2) -> bool {
		let hovered = self
			.pick(graph, view, pointer)
			.map(|i| graph.nodes[i].id.clone());
		self.set_hover(hovered)
	}

	pub fn pointer_leave(&mut self) -> bool {
		self.set_hover(None)
	}

	/// Toggles and returns the expanded flag.
	pub fn click(&mut self) -> bool {
		self.state.expanded = !self.state.expanded;
		self.state.expanded
	}

	/// Drops a hover that points at a node no longer in the graph.
	pub fn retain(&mut self, graph: &PositionedGraph) -> bool {
		match &self.state.hovered {
			Some(id) if graph.index_of(id).is_none() => self.set_hover(None),
			_ => false,
		}
	}

	fn set_hover(&mut self, hovered: Option<String>) -> bool {
		if self.state.hovered == hovered {
			return false;
		}
		self.state.hovered = hovered;
		true
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec3;

	use super::*;
	use crate::components::job_graph::builder::build;
	use crate::components::job_graph::config::{BuildOptions, CompactGeometry, HIT_TOLERANCE};
	use crate::components::job_graph::layout::{LayoutMode, layout};
	use crate::components::job_graph::projection::Camera;
	use crate::components::job_graph::types::{JobInput, Viewport};

	fn compact() -> PositionedGraph {
		let built = build(
			&JobInput {
				company_name: "Acme".into(),
				company_domain: None,
				job_title: "CFO".into(),
				skills: vec!["Excel".into(), "SAP".into()],
			},
			&BuildOptions::default(),
		)
		.unwrap();
		layout(&built.graph, &LayoutMode::Compact(CompactGeometry::default()))
	}

	fn flat() -> View {
		View::Flat(ViewTransform::default())
	}

	#[test]
	fn pointer_over_a_node_hovers_it() {
		let graph = compact();
		let mut ctl = InteractionController::new(HIT_TOLERANCE);
		assert!(ctl.pointer_move(&graph, &flat(), DVec2::new(72.0, 52.0)));
		assert_eq!(ctl.state().hovered.as_deref(), Some("company"));
		// Same node again is not a change.
		assert!(!ctl.pointer_move(&graph, &flat(), DVec2::new(70.0, 50.0)));
	}

	#[test]
	fn tolerance_extends_the_reach() {
		let graph = compact();
		let ctl = InteractionController::new(HIT_TOLERANCE);
		// Job node: center (70, 15), radius 12.
		assert_eq!(ctl.pick(&graph, &flat(), DVec2::new(70.0 + 15.0, 15.0)), Some(1));
		assert_eq!(ctl.pick(&graph, &flat(), DVec2::new(70.0 + 17.0, 15.0)), None);
	}

	#[test]
	fn overlapping_reach_picks_the_nearest_center() {
		let graph = compact();
		let ctl = InteractionController::new(50.0);
		assert_eq!(ctl.pick(&graph, &flat(), DVec2::new(70.0, 20.0)), Some(1));
		assert_eq!(ctl.pick(&graph, &flat(), DVec2::new(70.0, 45.0)), Some(0));
	}

	#[test]
	fn leave_clears_hover_and_click_toggles() {
		let graph = compact();
		let mut ctl = InteractionController::new(HIT_TOLERANCE);
		ctl.pointer_move(&graph, &flat(), DVec2::new(70.0, 50.0));
		assert!(ctl.pointer_leave());
		assert_eq!(ctl.state().hovered, None);
		assert!(!ctl.pointer_leave());

		assert!(ctl.click());
		assert!(ctl.state().expanded);
		assert!(!ctl.click());
	}

	#[test]
	fn zoomed_views_map_the_pointer_back() {
		let graph = compact();
		let ctl = InteractionController::new(0.0);
		let view = View::Flat(ViewTransform { x: 100.0, y: 0.0, k: 2.0 });
		// Company center (70, 50) lands at (240, 100) on screen.
		assert_eq!(ctl.pick(&graph, &view, DVec2::new(240.0, 100.0)), Some(0));
		assert_eq!(ctl.pick(&graph, &view, DVec2::new(70.0, 50.0)), None);
	}

	#[test]
	fn projected_hit_uses_the_camera_ray() {
		let mut graph = compact();
		for (i, n) in graph.nodes.iter_mut().enumerate() {
			n.position = DVec3::new(i as f64 * 60.0 - 90.0, 0.0, i as f64 * 10.0);
			n.size = 6.0;
		}
		let viewport = Viewport::new(800.0, 500.0);
		let camera = Camera::default();
		let view = View::Projected {
			camera,
			elapsed: 3.0,
			viewport,
		};
		let ctl = InteractionController::new(HIT_TOLERANCE);
		for (i, n) in graph.nodes.iter().enumerate() {
			let p = camera.project(n.position, 3.0, viewport).unwrap();
			assert_eq!(ctl.pick(&graph, &view, p.screen), Some(i));
		}
		assert_eq!(ctl.pick(&graph, &view, DVec2::new(5.0, 5.0)), None);
	}

	#[test]
	fn retain_drops_stale_hover() {
		let graph = compact();
		let mut ctl = InteractionController::new(HIT_TOLERANCE);
		ctl.pointer_move(&graph, &flat(), DVec2::new(70.0, 50.0));
		let mut smaller = graph.clone();
		smaller.nodes.retain(|n| n.id != "company");
		assert!(ctl.retain(&smaller));
		assert!(!ctl.retain(&graph));
	}
}
