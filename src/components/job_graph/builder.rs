//! Job tuples to node/edge sets.

use std::collections::HashMap;

use log::debug;

use super::config::{AggregateOptions, BuildOptions};
use super::types::{
	BuiltGraph, EdgeKind, GraphEdge, GraphNode, JobGraph, JobInput, JobRecord, NodeKind,
};

/// Cuts `text` to the kind's character budget. Same input, same label.
pub fn truncate_label(text: &str, kind: NodeKind) -> String {
	text.trim().chars().take(kind.label_budget()).collect()
}

fn node(id: String, text: &str, kind: NodeKind, detail: Option<String>) -> GraphNode {
	let name = text.trim().to_string();
	GraphNode {
		id,
		label: truncate_label(&name, kind),
		name,
		detail,
		url: None,
		kind,
	}
}

fn clean_skills(skills: &[String]) -> impl Iterator<Item = &str> {
	skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn clean_opt(value: &Option<String>) -> Option<String> {
	value
		.as_deref()
		.map(str::trim)
		.filter(|d| !d.is_empty())
		.map(String::from)
}

/// Builds the single-job graph. `None` when company or title is missing.
pub fn build(input: &JobInput, opts: &BuildOptions) -> Option<BuiltGraph> {
	let company = input.company_name.trim();
	let title = input.job_title.trim();
	if company.is_empty() || title.is_empty() {
		return None;
	}

	let skills: Vec<&str> = clean_skills(&input.skills).collect();
	let kept = skills.len().min(opts.max_skills());

	let mut nodes = Vec::with_capacity(2 + kept);
	let mut edges = Vec::with_capacity(1 + kept);

	nodes.push(node(
		"company".into(),
		company,
		NodeKind::Company,
		clean_opt(&input.company_domain),
	));
	nodes.push(node("job".into(), title, NodeKind::Job, None));
	edges.push(GraphEdge {
		source: "company".into(),
		target: "job".into(),
		kind: EdgeKind::Employs,
	});

	for (i, skill) in skills.iter().take(kept).enumerate() {
		let id = format!("skill-{i}");
		nodes.push(node(id.clone(), skill, NodeKind::Skill, None));
		edges.push(GraphEdge {
			source: "job".into(),
			target: id,
			kind: EdgeKind::Requires,
		});
	}

	Some(BuiltGraph {
		graph: JobGraph { nodes, edges },
		overflow: skills.len() - kept,
	})
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

fn matches_filters(job: &JobRecord, opts: &AggregateOptions) -> bool {
	if job.company_name.trim().is_empty() || job.title.trim().is_empty() {
		return false;
	}
	if let Some(category) = &opts.category_filter {
		let hit = match &job.category {
			Some(c) => c.trim().eq_ignore_ascii_case(category.trim()),
			None => contains_ci(&job.title, category),
		};
		if !hit {
			return false;
		}
	}
	if let Some(role) = &opts.role_filter {
		if !contains_ci(&job.title, role) {
			return false;
		}
	}
	if let Some(location) = &opts.location_filter {
		match &job.location {
			Some(l) if contains_ci(l, location) => {}
			_ => return false,
		}
	}
	true
}

/// Merges many jobs into one graph. Skills shared between jobs collapse into a
/// single node (trimmed, case-insensitive); companies and jobs never do.
pub fn build_aggregate(jobs: &[JobRecord], opts: &AggregateOptions) -> Option<BuiltGraph> {
	let selected: Vec<&JobRecord> = jobs
		.iter()
		.filter(|j| matches_filters(j, opts))
		.take(opts.limit())
		.collect();
	if selected.is_empty() {
		debug!("aggregate graph: no jobs left after filtering {} rows", jobs.len());
		return None;
	}

	let mut graph = JobGraph::default();
	let mut skill_links: HashMap<String, (String, usize)> = HashMap::new();
	let mut overflow = 0;

	for (n, job) in selected.iter().enumerate() {
		let company_id = format!("company-{n}");
		let job_id = format!("job-{n}");
		graph.nodes.push(GraphNode {
			url: clean_opt(&job.company_url),
			..node(
				company_id.clone(),
				&job.company_name,
				NodeKind::Company,
				clean_opt(&job.company_domain),
			)
		});
		graph.nodes.push(GraphNode {
			url: clean_opt(&job.url),
			..node(job_id.clone(), &job.title, NodeKind::Job, None)
		});
		graph.edges.push(GraphEdge {
			source: company_id,
			target: job_id.clone(),
			kind: EdgeKind::Employs,
		});

		let mut seen_here: Vec<String> = Vec::new();
		let mut linked = 0;
		for skill in clean_skills(&job.skills) {
			let key = skill.to_lowercase();
			if seen_here.contains(&key) {
				continue;
			}
			seen_here.push(key.clone());
			// A saturated skill takes none of this job's slots.
			if skill_links
				.get(&key)
				.is_some_and(|(_, links)| *links >= opts.links_per_skill())
			{
				continue;
			}
			if linked == opts.skills_per_job() {
				overflow += 1;
				continue;
			}
			linked += 1;

			let (skill_id, links) = skill_links.entry(key.clone()).or_insert_with(|| {
				let id = format!("skill:{key}");
				graph.nodes.push(node(id.clone(), skill, NodeKind::Skill, None));
				(id, 0)
			});
			*links += 1;
			graph.edges.push(GraphEdge {
				source: job_id.clone(),
				target: skill_id.clone(),
				kind: EdgeKind::Requires,
			});
		}
	}

	debug!(
		"aggregate graph: {} jobs, {} nodes, {} edges, {} skills over budget",
		selected.len(),
		graph.nodes.len(),
		graph.edges.len(),
		overflow
	);
	Some(BuiltGraph { graph, overflow })
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn input(company: &str, title: &str, skills: &[&str]) -> JobInput {
		JobInput {
			company_name: company.into(),
			company_domain: None,
			job_title: title.into(),
			skills: skills.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn record(company: &str, title: &str, category: Option<&str>, skills: &[&str]) -> JobRecord {
		JobRecord {
			title: title.into(),
			company_name: company.into(),
			category: category.map(String::from),
			skills: skills.iter().map(|s| s.to_string()).collect(),
			..JobRecord::default()
		}
	}

	fn skill_labels(built: &BuiltGraph) -> Vec<&str> {
		built
			.graph
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Skill)
			.map(|n| n.label.as_str())
			.collect()
	}

	#[test]
	fn missing_company_yields_nothing() {
		assert_eq!(build(&input("", "CFO", &["Excel"]), &BuildOptions::default()), None);
		assert_eq!(build(&input("Acme", "   ", &[]), &BuildOptions::default()), None);
	}

	#[test]
	fn no_skills_gives_company_and_job_only() {
		let built = build(&input("Acme", "CFO", &[]), &BuildOptions::default()).unwrap();
		assert_eq!(built.graph.nodes.len(), 2);
		assert_eq!(built.graph.edges.len(), 1);
		assert_eq!(built.graph.count(NodeKind::Company), 1);
		assert_eq!(built.graph.count(NodeKind::Job), 1);
		assert_eq!(built.overflow, 0);
	}

	#[test]
	fn excess_skills_are_dropped_and_counted() {
		let skills = ["Excel", "Forecasting", "SAP", "Leadership", "Strategy", "Negotiation"];
		let built = build(&input("Acme", "CFO", &skills), &BuildOptions::new(4)).unwrap();
		assert_eq!(skill_labels(&built), vec!["Excel", "Foreca", "SAP", "Leader"]);
		assert_eq!(built.overflow, 2);
		assert_eq!(built.graph.edges.len(), 5);
	}

	#[test]
	fn edges_form_a_two_level_tree() {
		let built = build(&input("Acme", "CFO", &["A", "B", "C"]), &BuildOptions::default()).unwrap();
		let graph = &built.graph;
		assert_eq!(graph.edges[0].kind, EdgeKind::Employs);
		assert_eq!(graph.edges[0].source, "company");
		for edge in &graph.edges[1..] {
			assert_eq!(edge.source, "job");
			assert_eq!(edge.kind, EdgeKind::Requires);
			assert!(edge.target.starts_with("skill-"));
		}
	}

	#[test]
	fn long_company_name_is_cut_to_budget() {
		let built = build(&input("Globex Corporation", "CFO", &[]), &BuildOptions::default()).unwrap();
		assert_eq!(built.graph.nodes[0].label, "Globex C");
		assert_eq!(built.graph.nodes[0].name, "Globex Corporation");

		let built = build(&input("Initech", "CFO", &[]), &BuildOptions::default()).unwrap();
		assert_eq!(built.graph.nodes[0].label, "Initech");
	}

	#[test]
	fn truncation_counts_characters_not_bytes() {
		assert_eq!(truncate_label("Café Société", NodeKind::Company), "Café Soc");
		assert_eq!(truncate_label("Ünïcödé", NodeKind::Skill), "Ünïcöd");
	}

	#[test]
	fn building_twice_gives_equal_graphs() {
		let job = JobInput {
			company_domain: Some("acme.io".into()),
			..input("Acme", "Fractional CFO", &["Excel", "SAP"])
		};
		let opts = BuildOptions::default();
		assert_eq!(build(&job, &opts), build(&job, &opts));
	}

	#[test]
	fn company_domain_lands_on_company_node() {
		let job = JobInput {
			company_domain: Some(" acme.io ".into()),
			..input("Acme", "CFO", &[])
		};
		let built = build(&job, &BuildOptions::default()).unwrap();
		assert_eq!(built.graph.nodes[0].detail.as_deref(), Some("acme.io"));
	}

	#[test]
	fn aggregate_collapses_shared_skills() {
		let jobs = vec![
			record("Acme", "CFO", None, &["Excel", "SAP"]),
			record("Globex", "CFO", None, &[" excel ", "Strategy"]),
		];
		let built = build_aggregate(&jobs, &AggregateOptions::default()).unwrap();
		let graph = &built.graph;
		assert_eq!(graph.count(NodeKind::Company), 2);
		assert_eq!(graph.count(NodeKind::Job), 2);
		assert_eq!(graph.count(NodeKind::Skill), 3);
		let excel: Vec<_> = graph.edges.iter().filter(|e| e.target == "skill:excel").collect();
		assert_eq!(excel.len(), 2);
	}

	#[test]
	fn aggregate_caps_links_per_skill() {
		let jobs: Vec<JobRecord> = (0..5)
			.map(|i| record(&format!("Co{i}"), "CFO", None, &["Excel"]))
			.collect();
		let built = build_aggregate(&jobs, &AggregateOptions::default()).unwrap();
		let links = built.graph.edges.iter().filter(|e| e.kind == EdgeKind::Requires).count();
		assert_eq!(links, 3);
	}

	#[test]
	fn aggregate_applies_filters_and_limit() {
		let jobs = vec![
			record("Acme", "Fractional CFO", Some("Finance"), &[]),
			record("Globex", "Head of Product", Some("Product"), &[]),
			record("Initech", "Interim Product Director", None, &[]),
			record("Umbrella", "Product Manager", Some("product"), &[]),
		];
		let opts = AggregateOptions::new(2).with_category(Some("Product".into()));
		let built = build_aggregate(&jobs, &opts).unwrap();
		let companies: Vec<_> = built
			.graph
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Company)
			.map(|n| n.name.as_str())
			.collect();
		assert_eq!(companies, vec!["Globex", "Initech"]);

		let opts = AggregateOptions::default().with_role(Some("cfo".into()));
		let built = build_aggregate(&jobs, &opts).unwrap();
		assert_eq!(built.graph.count(NodeKind::Job), 1);
	}

	#[test]
	fn aggregate_filters_by_location_substring() {
		let located = |company: &str, location: Option<&str>| JobRecord {
			location: location.map(String::from),
			..record(company, "CFO", None, &[])
		};
		let jobs = vec![
			located("Acme", Some("Remote (EU)")),
			located("Globex", Some("London")),
			located("Initech", None),
			located("Umbrella", Some("remote - US")),
		];
		let opts = AggregateOptions::default().with_location(Some(" REMOTE ".into()));
		let built = build_aggregate(&jobs, &opts).unwrap();
		let companies: Vec<_> = built
			.graph
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Company)
			.map(|n| n.name.as_str())
			.collect();
		assert_eq!(companies, vec!["Acme", "Umbrella"]);

		let opts = AggregateOptions::default().with_location(Some("Berlin".into()));
		assert_eq!(build_aggregate(&jobs, &opts), None);
	}

	#[test]
	fn saturated_skills_leave_room_for_the_rest() {
		let mut jobs: Vec<JobRecord> = (0..3)
			.map(|i| record(&format!("Co{i}"), "CFO", None, &["Excel"]))
			.collect();
		jobs.push(record("Acme", "Controller", None, &["Excel", "SAP", "Rust", "Go"]));
		let built = build_aggregate(&jobs, &AggregateOptions::default()).unwrap();
		let targets: Vec<_> = built
			.graph
			.edges
			.iter()
			.filter(|e| e.source == "job-3")
			.map(|e| e.target.as_str())
			.collect();
		assert_eq!(targets, vec!["skill:sap", "skill:rust", "skill:go"]);
		assert_eq!(built.overflow, 0);
	}

	#[test]
	fn aggregate_nodes_carry_their_links() {
		let jobs = vec![JobRecord {
			url: Some(" https://jobs.example/cfo ".into()),
			company_url: Some("".into()),
			..record("Acme", "CFO", None, &["Excel"])
		}];
		let built = build_aggregate(&jobs, &AggregateOptions::default()).unwrap();
		let url = |id: &str| {
			built
				.graph
				.nodes
				.iter()
				.find(|n| n.id == id)
				.and_then(|n| n.url.clone())
		};
		assert_eq!(url("job-0").as_deref(), Some("https://jobs.example/cfo"));
		assert_eq!(url("company-0"), None);
		assert_eq!(url("skill:excel"), None);
	}

	#[test]
	fn aggregate_counts_skills_over_the_per_job_budget() {
		let jobs = vec![record("Acme", "CFO", None, &["A", "B", "C", "D", "E"])];
		let built = build_aggregate(&jobs, &AggregateOptions::default()).unwrap();
		assert_eq!(built.graph.count(NodeKind::Skill), 3);
		assert_eq!(built.overflow, 2);
	}

	#[test]
	fn aggregate_without_matches_yields_nothing() {
		let jobs = vec![record("", "CFO", None, &[])];
		assert_eq!(build_aggregate(&jobs, &AggregateOptions::default()), None);
		assert_eq!(build_aggregate(&[], &AggregateOptions::default()), None);
	}
}
