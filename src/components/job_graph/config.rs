use super::types::{EdgeKind, NodeKind, Viewport};

pub const DEFAULT_MAX_SKILLS: usize = 4;
/// Past six, skills on the compact ring reach the job node.
pub const MAX_SKILLS_CEILING: usize = 6;

pub const DEFAULT_LIMIT: usize = 20;
pub const LIMIT_CEILING: usize = 50;

pub const DEFAULT_SKILLS_PER_JOB: usize = 3;
pub const DEFAULT_LINKS_PER_SKILL: usize = 3;

/// Extra pointer slack around a node's radius, in screen pixels.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Above this many nodes the expansive views stop labelling skills.
pub const DENSE_LABEL_LIMIT: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
	max_skills: usize,
}

impl BuildOptions {
	pub fn new(max_skills: usize) -> Self {
		Self {
			max_skills: max_skills.min(MAX_SKILLS_CEILING),
		}
	}

	pub fn max_skills(&self) -> usize {
		self.max_skills
	}
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_SKILLS)
	}
}

/// Filters and bounds for the aggregate hero graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateOptions {
	pub category_filter: Option<String>,
	pub role_filter: Option<String>,
	pub location_filter: Option<String>,
	limit: usize,
	skills_per_job: usize,
	links_per_skill: usize,
}

impl AggregateOptions {
	pub fn new(limit: usize) -> Self {
		Self {
			limit: limit.clamp(1, LIMIT_CEILING),
			..Self::default()
		}
	}

	pub fn with_category(mut self, category: Option<String>) -> Self {
		self.category_filter = category.filter(|c| !c.trim().is_empty());
		self
	}

	pub fn with_role(mut self, role: Option<String>) -> Self {
		self.role_filter = role.filter(|r| !r.trim().is_empty());
		self
	}

	pub fn with_location(mut self, location: Option<String>) -> Self {
		self.location_filter = location.filter(|l| !l.trim().is_empty());
		self
	}

	pub fn with_skills_per_job(mut self, n: usize) -> Self {
		self.skills_per_job = n.min(MAX_SKILLS_CEILING);
		self
	}

	pub fn limit(&self) -> usize {
		self.limit
	}

	pub fn skills_per_job(&self) -> usize {
		self.skills_per_job
	}

	pub fn links_per_skill(&self) -> usize {
		self.links_per_skill
	}
}

impl Default for AggregateOptions {
	fn default() -> Self {
		Self {
			category_filter: None,
			role_filter: None,
			location_filter: None,
			limit: DEFAULT_LIMIT,
			skills_per_job: DEFAULT_SKILLS_PER_JOB,
			links_per_skill: DEFAULT_LINKS_PER_SKILL,
		}
	}
}

/// Fixed geometry of the card-sized radial graph, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompactGeometry {
	pub width: f64,
	pub height: f64,
	pub job_offset: f64,
	pub skill_radius: f64,
}

impl CompactGeometry {
	pub fn viewport(&self) -> Viewport {
		Viewport::new(self.width, self.height)
	}

	pub fn node_size(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Company => 16.0,
			NodeKind::Job => 12.0,
			NodeKind::Skill => 6.0,
		}
	}
}

impl Default for CompactGeometry {
	fn default() -> Self {
		Self {
			width: 140.0,
			height: 100.0,
			job_offset: 35.0,
			skill_radius: 38.0,
		}
	}
}

/// Tunables of the expansive relaxation layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxParams {
	pub seed: u64,
	pub iterations: usize,
	pub repulsion: f64,
	pub spring: f64,
	pub rest_employs: f64,
	pub rest_requires: f64,
	pub min_distance: f64,
	pub damping: f64,
	pub max_step: f64,
	/// Let nodes move along z; flat layouts keep z at 0.
	pub depth: bool,
}

impl RelaxParams {
	pub fn rest_length(&self, kind: EdgeKind) -> f64 {
		match kind {
			EdgeKind::Employs => self.rest_employs,
			EdgeKind::Requires => self.rest_requires,
		}
	}

	pub fn node_size(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Company => 10.0,
			NodeKind::Job => 7.0,
			NodeKind::Skill => 4.0,
		}
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	pub fn flat(mut self) -> Self {
		self.depth = false;
		self
	}
}

impl Default for RelaxParams {
	fn default() -> Self {
		Self {
			seed: 0x5EED,
			iterations: 120,
			repulsion: 1800.0,
			spring: 0.08,
			rest_employs: 28.0,
			rest_requires: 55.0,
			min_distance: 4.0,
			damping: 0.85,
			max_step: 12.0,
			depth: true,
		}
	}
}
