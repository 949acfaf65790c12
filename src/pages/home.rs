use leptos::prelude::*;

use crate::components::job_graph::{JobGraphDisclosure, JobInput, JobRecord, JobsGraphHero};

fn record(
	title: &str,
	company: &str,
	domain: Option<&str>,
	category: &str,
	location: &str,
	skills: &[&str],
) -> JobRecord {
	let slug = title.to_lowercase().replace(' ', "-");
	JobRecord {
		title: title.to_string(),
		company_name: company.to_string(),
		company_domain: domain.map(str::to_string),
		category: Some(category.to_string()),
		location: Some(location.to_string()),
		url: domain.map(|d| format!("https://{d}/careers/{slug}")),
		company_url: domain.map(|d| format!("https://{d}/careers")),
		skills: skills.iter().map(|s| s.to_string()).collect(),
	}
}

/// Sample listings standing in for the job feed.
fn sample_jobs() -> Vec<JobRecord> {
	vec![
		record(
			"Fractional CFO",
			"Northwind Analytics",
			Some("northwind.io"),
			"Finance",
			"Remote (UK)",
			&["Excel", "Forecasting", "SAP", "Leadership", "Strategy", "Negotiation"],
		),
		record(
			"Part-time Finance Director",
			"Brightwater Foods",
			None,
			"Finance",
			"Bristol",
			&["Excel", "Budgeting", "Xero"],
		),
		record(
			"Fractional CTO",
			"Lumen Health",
			Some("lumen.health"),
			"Engineering",
			"Remote (EU)",
			&["Rust", "AWS", "Leadership", "Hiring"],
		),
		record(
			"Interim Head of Engineering",
			"Northwind Analytics",
			Some("northwind.io"),
			"Engineering",
			"London",
			&["Rust", "Kubernetes", "Strategy"],
		),
		record(
			"Fractional CMO",
			"Copperleaf Studio",
			None,
			"Marketing",
			"Manchester",
			&["SEO", "Brand", "Strategy", "Analytics"],
		),
		record(
			"Growth Marketing Lead",
			"Lumen Health",
			Some("lumen.health"),
			"Marketing",
			"Remote (UK)",
			&["Analytics", "SEO", "Paid Social"],
		),
	]
}

fn as_input(job: &JobRecord) -> JobInput {
	JobInput {
		company_name: job.company_name.clone(),
		company_domain: job.company_domain.clone(),
		job_title: job.title.clone(),
		skills: job.skills.clone(),
	}
}

/// Hero network over the sample feed, then one card per listing.
#[component]
pub fn Home() -> impl IntoView {
	let jobs = sample_jobs();
	let hero_jobs = Signal::derive({
		let jobs = jobs.clone();
		move || jobs.clone()
	});

	let cards = jobs
		.iter()
		.map(|job| {
			let related: Vec<JobRecord> = jobs
				.iter()
				.filter(|other| other.title != job.title && other.category == job.category)
				.cloned()
				.collect();
			view! {
				<article class="job-card">
					<h2>{job.title.clone()}</h2>
					<p class="job-card-company">{job.company_name.clone()}</p>
					<JobGraphDisclosure job=as_input(job) related=related />
				</article>
			}
		})
		.collect_view();

	view! {
		<section class="hero">
			<JobsGraphHero jobs=hero_jobs is_hero=true static_fallback=true seed=7 />
			<div class="graph-overlay">
				<h1>"Fractional Jobs"</h1>
				<p class="subtitle">"Companies, roles and the skills that connect them."</p>
			</div>
		</section>

		<section class="job-list">{cards}</section>
	}
}
