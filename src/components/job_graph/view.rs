use glam::DVec2;

use super::projection::Camera;
use super::types::{PositionedGraph, Viewport};

/// Pan/zoom from graph space to screen space: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: DVec2) -> DVec2 {
		DVec2::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Centers the graph's bounds in the viewport, scaled to fit inside `padding`.
	pub fn fit(graph: &PositionedGraph, viewport: Viewport, padding: f64) -> Self {
		let c = viewport.center();
		if graph.nodes.is_empty() {
			return Self { x: c.x, y: c.y, k: 1.0 };
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for n in &graph.nodes {
			min_x = min_x.min(n.position.x - n.size);
			min_y = min_y.min(n.position.y - n.size);
			max_x = max_x.max(n.position.x + n.size);
			max_y = max_y.max(n.position.y + n.size);
		}
		let (w, h) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let room_w = (viewport.width - 2.0 * padding).max(1.0);
		let room_h = (viewport.height - 2.0 * padding).max(1.0);
		let k = (room_w / w).min(room_h / h).clamp(0.1, 10.0);
		let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Self {
			x: c.x - mid_x * k,
			y: c.y - mid_y * k,
			k,
		}
	}
}

/// How pointer coordinates map into the drawn scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum View {
	Flat(ViewTransform),
	Projected {
		camera: Camera,
		elapsed: f64,
		viewport: Viewport,
	},
}

#[cfg(test)]
mod tests {
	use glam::DVec3;

	use super::*;
	use crate::components::job_graph::types::{LayoutKind, NodeKind, PositionedNode};

	fn at(x: f64, y: f64) -> PositionedNode {
		PositionedNode {
			id: format!("{x},{y}"),
			label: String::new(),
			name: String::new(),
			detail: None,
			url: None,
			kind: NodeKind::Skill,
			position: DVec3::new(x, y, 0.0),
			size: 0.0,
		}
	}

	#[test]
	fn screen_and_graph_space_round_trip() {
		let t = ViewTransform { x: 12.0, y: -4.0, k: 2.5 };
		let s = t.graph_to_screen(DVec2::new(3.0, 7.0));
		let (gx, gy) = t.screen_to_graph(s.x, s.y);
		assert!((gx - 3.0).abs() < 1e-9 && (gy - 7.0).abs() < 1e-9);
	}

	#[test]
	fn fit_centers_bounds_in_viewport() {
		let graph = PositionedGraph {
			kind: LayoutKind::Expansive,
			nodes: vec![at(-100.0, -50.0), at(100.0, 50.0)],
			edges: Vec::new(),
		};
		let t = ViewTransform::fit(&graph, Viewport::new(400.0, 300.0), 20.0);
		assert!((t.k - 1.8).abs() < 1e-9);
		let mid = t.graph_to_screen(DVec2::new(0.0, 0.0));
		assert_eq!(mid, DVec2::new(200.0, 150.0));
	}
}
