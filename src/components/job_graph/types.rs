use glam::{DVec2, DVec3};

/// Node taxonomy; governs color, size and label rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Company,
	Job,
	Skill,
}

impl NodeKind {
	/// Character budget for the compact label.
	pub fn label_budget(self) -> usize {
		match self {
			NodeKind::Company => 8,
			NodeKind::Job => 12,
			NodeKind::Skill => 6,
		}
	}

	/// Character budget for expansive labels, which end in `...` when cut.
	pub fn name_budget(self) -> usize {
		match self {
			NodeKind::Job => 30,
			NodeKind::Company | NodeKind::Skill => 25,
		}
	}

	pub fn color(self) -> Rgb {
		match self {
			NodeKind::Company => Rgb(245, 158, 11),
			NodeKind::Job => Rgb(59, 130, 246),
			NodeKind::Skill => Rgb(16, 185, 129),
		}
	}

	pub fn hint(self) -> &'static str {
		match self {
			NodeKind::Company => "View company jobs",
			NodeKind::Job => "View job",
			NodeKind::Skill => "Find jobs with this skill",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Company to Job.
	Employs,
	/// Job to Skill.
	Requires,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	pub fn css(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
	}
}

/// Pixel size of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(self) -> DVec2 {
		DVec2::new(self.width / 2.0, self.height / 2.0)
	}
}

/// One job as supplied by the job-record source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobInput {
	/// Employer shown at the center of the card graph.
	pub company_name: String,
	/// Bare domain such as `acme.io`, shown in the company caption.
	pub company_domain: Option<String>,
	/// Role title, drawn above the company.
	pub job_title: String,
	/// Required skills in priority order; blanks are skipped.
	pub skills: Vec<String>,
}

/// A job row used by the aggregate (hero) graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobRecord {
	/// Role title; also searched by the role filter.
	pub title: String,
	/// Employer; each record gets its own company node.
	pub company_name: String,
	/// Bare domain such as `acme.io`, shown in the company caption.
	pub company_domain: Option<String>,
	/// Department label matched by the category filter, e.g. `Finance`.
	pub category: Option<String>,
	/// Free-form place, e.g. `Remote (EU)`; matched by the location filter.
	pub location: Option<String>,
	/// Link opened when the job node is clicked.
	pub url: Option<String>,
	/// Link opened when the company node is clicked.
	pub company_url: Option<String>,
	/// Required skills in priority order; blanks are skipped.
	pub skills: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	/// Compact label, truncated to the kind's budget.
	pub label: String,
	/// Full trimmed text.
	pub name: String,
	pub detail: Option<String>,
	/// Click target; nodes without one are not clickable.
	pub url: Option<String>,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl JobGraph {
	pub fn count(&self, kind: NodeKind) -> usize {
		self.nodes.iter().filter(|n| n.kind == kind).count()
	}
}

/// Builder output: the graph plus the number of skills left out of it.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltGraph {
	pub graph: JobGraph,
	pub overflow: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
	Compact,
	Expansive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub id: String,
	pub label: String,
	pub name: String,
	pub detail: Option<String>,
	pub url: Option<String>,
	pub kind: NodeKind,
	pub position: DVec3,
	pub size: f64,
}

impl PositionedNode {
	/// Label for the expansive views: full name, cut with `...` past the budget.
	pub fn display_name(&self) -> String {
		let budget = self.kind.name_budget();
		if self.name.chars().count() <= budget {
			self.name.clone()
		} else {
			let head: String = self.name.chars().take(budget - 3).collect();
			format!("{head}...")
		}
	}
}

/// Edge with endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedEdge {
	pub source: usize,
	pub target: usize,
	pub kind: EdgeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedGraph {
	pub kind: LayoutKind,
	pub nodes: Vec<PositionedNode>,
	pub edges: Vec<PositionedEdge>,
}

impl PositionedGraph {
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}

	pub fn touches(&self, edge: &PositionedEdge, idx: usize) -> bool {
		edge.source == idx || edge.target == idx
	}

	pub fn is_neighbor(&self, a: usize, b: usize) -> bool {
		self.edges
			.iter()
			.any(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
	}
}
