//! Drawing a positioned graph onto a [`Surface`].
//!
//! Both back-ends read the same [`PositionedGraph`] and [`InteractionState`];
//! neither writes to them. Every frame starts from a cleared surface and draws
//! edges, then nodes, then labels.

use std::cmp::Ordering;

use glam::DVec2;

use super::config::DENSE_LABEL_LIMIT;
use super::interaction::InteractionState;
use super::projection::{Camera, Projected};
use super::types::{
	LayoutKind, NodeKind, PositionedEdge, PositionedGraph, PositionedNode, Rgb, Viewport,
};
use super::view::{View, ViewTransform};

const HOVER_GROWTH: f64 = 0.35;
const NEIGHBOR_GROWTH: f64 = 0.15;
const FIT_PADDING: f64 = 40.0;

const WHITE: Rgb = Rgb(255, 255, 255);
const COMPACT_EDGE: Rgb = Rgb(156, 163, 175);
const COMPACT_TEXT: Rgb = Rgb(75, 85, 99);
const NETWORK_EDGE: Rgb = Rgb(99, 102, 241);
const SKILL_TEXT: Rgb = Rgb(167, 243, 208);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
	pub on: f64,
	pub off: f64,
	pub offset: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	pub color: Rgb,
	pub alpha: f64,
	pub width: f64,
	pub dash: Option<Dash>,
}

/// A pixel drawing target. Text is centered on `at`.
pub trait Surface {
	fn viewport(&self) -> Viewport;
	fn resize(&mut self, viewport: Viewport);
	fn clear(&mut self);
	fn line(&mut self, from: DVec2, to: DVec2, stroke: &Stroke);
	fn disc(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64);
	fn ring(&mut self, center: DVec2, radius: f64, stroke: &Stroke);
	fn text(&mut self, text: &str, at: DVec2, font_px: f64, color: Rgb, alpha: f64);
	/// Drops whatever the surface holds on to; called once on unmount.
	fn release(&mut self) {}
}

pub trait RenderPipeline {
	/// Mapping from pointer coordinates into the scene, for hit-testing.
	fn view(&self, graph: &PositionedGraph, viewport: Viewport, elapsed: f64) -> View;

	/// Draws one frame. A missing surface is a no-op.
	fn render(
		&self,
		graph: &PositionedGraph,
		state: &InteractionState,
		elapsed: f64,
		surface: Option<&mut dyn Surface>,
	);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelPolicy {
	/// Company and Job only.
	Compact,
	/// Every kind on sparse graphs; dense graphs keep Company/Job and the hovered node.
	Density,
}

impl LabelPolicy {
	fn shows(self, kind: NodeKind, node_count: usize, hovered: bool) -> bool {
		match self {
			LabelPolicy::Compact => kind != NodeKind::Skill,
			LabelPolicy::Density => {
				hovered || kind != NodeKind::Skill || node_count <= DENSE_LABEL_LIMIT
			}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
	Base,
	Lit,
	Dim,
}

/// Hover emphasis derived per frame; the graph itself is left alone.
struct Emphasis {
	hovered: Option<usize>,
}

impl Emphasis {
	fn new(graph: &PositionedGraph, state: &InteractionState) -> Self {
		Self {
			hovered: state.hovered.as_deref().and_then(|id| graph.index_of(id)),
		}
	}

	fn is_hovered(&self, idx: usize) -> bool {
		self.hovered == Some(idx)
	}

	fn growth(&self, graph: &PositionedGraph, idx: usize) -> f64 {
		match self.hovered {
			Some(h) if h == idx => 1.0 + HOVER_GROWTH,
			Some(h) if graph.is_neighbor(h, idx) => 1.0 + NEIGHBOR_GROWTH,
			_ => 1.0,
		}
	}

	fn tone(&self, graph: &PositionedGraph, edge: &PositionedEdge) -> Tone {
		match self.hovered {
			None => Tone::Base,
			Some(h) if graph.touches(edge, h) => Tone::Lit,
			Some(_) => Tone::Dim,
		}
	}
}

fn edge_stroke(kind: LayoutKind, tone: Tone, elapsed: f64) -> Stroke {
	let (color, alpha, width) = match kind {
		LayoutKind::Compact => (COMPACT_EDGE, 0.4, 1.0),
		LayoutKind::Expansive => (NETWORK_EDGE, 0.3, 1.5),
	};
	match tone {
		Tone::Base => Stroke {
			color,
			alpha,
			width,
			dash: None,
		},
		Tone::Dim => Stroke {
			color,
			alpha: alpha * 0.4,
			width,
			dash: None,
		},
		Tone::Lit => Stroke {
			color,
			alpha: 0.9,
			width: width * 1.6,
			dash: (kind == LayoutKind::Expansive).then(|| Dash {
				on: 6.0,
				off: 4.0,
				offset: -(elapsed * 30.0) % 10.0,
			}),
		},
	}
}

fn hover_ring() -> Stroke {
	Stroke {
		color: WHITE,
		alpha: 0.7,
		width: 1.5,
		dash: None,
	}
}

/// Name plus one sub-line: the click hint when the node links somewhere,
/// else the company domain.
fn caption(surface: &mut dyn Surface, node: &PositionedNode, at: DVec2, radius: f64) {
	let hint = match (&node.url, node.kind, &node.detail) {
		(Some(_), kind, _) => Some(kind.hint()),
		(None, NodeKind::Company, Some(domain)) => Some(domain.as_str()),
		_ => None,
	};
	let top = at.y + radius + 14.0;
	surface.text(&node.display_name(), DVec2::new(at.x, top), 12.0, WHITE, 0.95);
	if let Some(hint) = hint {
		surface.text(hint, DVec2::new(at.x, top + 14.0), 10.0, WHITE, 0.7);
	}
}

/// 2D back-end: card-sized radial graphs and the static hero fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatRenderer {
	labels: LabelPolicy,
	fit: bool,
}

impl FlatRenderer {
	/// Layout coordinates are already surface pixels.
	pub fn compact() -> Self {
		Self {
			labels: LabelPolicy::Compact,
			fit: false,
		}
	}

	/// Fits the relaxed layout into the surface.
	pub fn expansive() -> Self {
		Self {
			labels: LabelPolicy::Density,
			fit: true,
		}
	}

	fn transform(&self, graph: &PositionedGraph, viewport: Viewport) -> ViewTransform {
		if self.fit {
			ViewTransform::fit(graph, viewport, FIT_PADDING)
		} else {
			ViewTransform::default()
		}
	}

	fn draw_label(&self, surface: &mut dyn Surface, node: &PositionedNode, at: DVec2, k: f64) {
		match self.labels {
			LabelPolicy::Compact => match node.kind {
				NodeKind::Company => surface.text(
					&node.label,
					DVec2::new(at.x, at.y + node.size + 10.0),
					9.0,
					COMPACT_TEXT,
					1.0,
				),
				NodeKind::Job => surface.text(
					&node.label,
					DVec2::new(at.x, at.y - node.size - 6.0),
					7.0,
					COMPACT_TEXT,
					1.0,
				),
				NodeKind::Skill => {}
			},
			LabelPolicy::Density => {
				let (font, color) = network_label_style(node.kind);
				surface.text(
					&node.display_name(),
					DVec2::new(at.x, at.y - (node.size + 4.0) * k),
					font,
					color,
					0.9,
				);
			}
		}
	}
}

fn network_label_style(kind: NodeKind) -> (f64, Rgb) {
	match kind {
		NodeKind::Company => (12.0, WHITE),
		NodeKind::Job => (11.0, WHITE),
		NodeKind::Skill => (9.0, SKILL_TEXT),
	}
}

impl RenderPipeline for FlatRenderer {
	fn view(&self, graph: &PositionedGraph, viewport: Viewport, _elapsed: f64) -> View {
		View::Flat(self.transform(graph, viewport))
	}

	fn render(
		&self,
		graph: &PositionedGraph,
		state: &InteractionState,
		elapsed: f64,
		surface: Option<&mut dyn Surface>,
	) {
		let Some(surface) = surface else {
			return;
		};
		surface.clear();

		let t = self.transform(graph, surface.viewport());
		let emphasis = Emphasis::new(graph, state);
		let screen: Vec<DVec2> = graph
			.nodes
			.iter()
			.map(|n| t.graph_to_screen(n.position.truncate()))
			.collect();

		for edge in &graph.edges {
			let stroke = edge_stroke(graph.kind, emphasis.tone(graph, edge), elapsed);
			surface.line(screen[edge.source], screen[edge.target], &stroke);
		}

		for (i, node) in graph.nodes.iter().enumerate() {
			let radius = node.size * t.k * emphasis.growth(graph, i);
			surface.disc(screen[i], radius, node.kind.color(), 1.0);
			if emphasis.is_hovered(i) {
				surface.ring(screen[i], radius + 2.0, &hover_ring());
			}
		}

		for (i, node) in graph.nodes.iter().enumerate() {
			if self.labels.shows(node.kind, graph.nodes.len(), emphasis.is_hovered(i)) {
				self.draw_label(surface, node, screen[i], t.k);
			}
		}

		if self.labels == LabelPolicy::Density {
			if let Some(h) = emphasis.hovered {
				let node = &graph.nodes[h];
				caption(surface, node, screen[h], node.size * t.k * (1.0 + HOVER_GROWTH));
			}
		}
	}
}

/// 3D back-end: perspective projection through an orbiting [`Camera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedRenderer {
	pub camera: Camera,
}

impl ProjectedRenderer {
	pub fn new(camera: Camera) -> Self {
		Self { camera }
	}
}

impl RenderPipeline for ProjectedRenderer {
	fn view(&self, _graph: &PositionedGraph, viewport: Viewport, elapsed: f64) -> View {
		View::Projected {
			camera: self.camera,
			elapsed,
			viewport,
		}
	}

	fn render(
		&self,
		graph: &PositionedGraph,
		state: &InteractionState,
		elapsed: f64,
		surface: Option<&mut dyn Surface>,
	) {
		let Some(surface) = surface else {
			return;
		};
		surface.clear();

		let viewport = surface.viewport();
		let emphasis = Emphasis::new(graph, state);
		let projected: Vec<Option<Projected>> = graph
			.nodes
			.iter()
			.map(|n| self.camera.project(n.position, elapsed, viewport))
			.collect();

		for edge in &graph.edges {
			if let (Some(a), Some(b)) = (projected[edge.source], projected[edge.target]) {
				let stroke = edge_stroke(LayoutKind::Expansive, emphasis.tone(graph, edge), elapsed);
				surface.line(a.screen, b.screen, &stroke);
			}
		}

		// Painter's order: farthest first.
		let mut order: Vec<(usize, Projected)> = projected
			.iter()
			.enumerate()
			.filter_map(|(i, p)| p.map(|p| (i, p)))
			.collect();
		order.sort_by(|a, b| b.1.depth.partial_cmp(&a.1.depth).unwrap_or(Ordering::Equal));

		for &(i, p) in &order {
			let node = &graph.nodes[i];
			let radius = node.size * p.scale * emphasis.growth(graph, i);
			surface.disc(p.screen, radius, node.kind.color(), 0.95);
			if emphasis.is_hovered(i) {
				surface.ring(p.screen, radius + 2.0, &hover_ring());
			}
		}

		for &(i, p) in &order {
			let node = &graph.nodes[i];
			if !LabelPolicy::Density.shows(node.kind, graph.nodes.len(), emphasis.is_hovered(i)) {
				continue;
			}
			let (font, color) = network_label_style(node.kind);
			let font = (font * p.scale).clamp(6.0, 18.0);
			let lift = (node.size + 8.0) * p.scale;
			surface.text(
				&node.display_name(),
				DVec2::new(p.screen.x, p.screen.y - lift),
				font,
				color,
				0.9,
			);
		}

		if let Some((h, p)) = emphasis.hovered.and_then(|h| projected[h].map(|p| (h, p))) {
			let node = &graph.nodes[h];
			caption(surface, node, p.screen, node.size * p.scale * (1.0 + HOVER_GROWTH));
		}
	}
}
