//! Background network of many jobs, gated on device capability.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::builder::build_aggregate;
use super::component::{LoopSlot, mount_frame_loop, unmount_on_cleanup};
use super::config::{AggregateOptions, DEFAULT_LIMIT, DEFAULT_SKILLS_PER_JOB, RelaxParams};
use super::error::GraphError;
use super::gate::{Environment, Fallback, Variant, select_variant};
use super::layout::{LayoutMode, layout};
use super::projection::Camera;
use super::render::{FlatRenderer, ProjectedRenderer, RenderPipeline};
use super::scheduler::Cadence;
use super::types::{JobRecord, NodeKind, Viewport};

const FALLBACK_VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

/// Window `resize` listener, removed again on drop.
struct ResizeBinding {
	window: Window,
	callback: Closure<dyn FnMut()>,
}

impl ResizeBinding {
	fn attach(window: &Window, on_resize: impl FnMut() + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut()>::new(on_resize);
		window
			.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			window: window.clone(),
			callback,
		})
	}
}

impl Drop for ResizeBinding {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
	}
}

fn container_viewport(canvas: &HtmlCanvasElement) -> Viewport {
	canvas
		.parent_element()
		.map(|p| Viewport::new(p.client_width() as f64, p.client_height() as f64))
		.filter(|v| v.width > 0.0 && v.height > 0.0)
		.unwrap_or(FALLBACK_VIEWPORT)
}

fn open_link(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.location().set_href(url) {
		warn!("jobs graph: cannot open {url}: {err:?}");
	}
}

fn pipeline_for(variant: Variant) -> (Box<dyn RenderPipeline>, Cadence) {
	match variant {
		Variant::Immersive => (
			Box::new(ProjectedRenderer::new(Camera::default())),
			Cadence::Continuous,
		),
		Variant::Static | Variant::Hidden => (Box::new(FlatRenderer::expansive()), Cadence::OnDemand),
	}
}

#[component]
fn Legend(is_hero: bool) -> impl IntoView {
	let swatch = |kind: NodeKind, px: u32| {
		format!(
			"display: inline-block; width: {px}px; height: {px}px; border-radius: 50%; background: {};",
			kind.color().css(1.0)
		)
	};
	view! {
		<div class="job-graph-legend" class:job-graph-legend-hero=is_hero>
			<span><i style=swatch(NodeKind::Company, 16) />" Companies"</span>
			<span><i style=swatch(NodeKind::Job, 12) />" Jobs"</span>
			<span><i style=swatch(NodeKind::Skill, 8) />" Skills"</span>
			<span class="job-graph-legend-hint">"Hover any node to explore"</span>
		</div>
	}
}

/// Network of companies, jobs and shared skills.
///
/// The capability gate runs before any build or layout work. Capable devices
/// get the orbiting 3D view; others get the flat layout drawn once when
/// `static_fallback` is set, and nothing otherwise.
///
/// Clicking a node that carries a link hands it to `on_node_click`, or
/// navigates to it when no handler is given.
#[component]
pub fn JobsGraphHero(
	#[prop(into)] jobs: Signal<Vec<JobRecord>>,
	#[prop(into, optional)] category_filter: MaybeProp<String>,
	#[prop(into, optional)] role_filter: MaybeProp<String>,
	#[prop(into, optional)] location_filter: MaybeProp<String>,
	#[prop(default = DEFAULT_LIMIT)] limit: usize,
	#[prop(default = DEFAULT_SKILLS_PER_JOB)] max_skills_per_job: usize,
	#[prop(into, default = "500px".to_string())] height: String,
	#[prop(default = false)] is_hero: bool,
	#[prop(default = true)] show_overlay: bool,
	#[prop(default = false)] static_fallback: bool,
	#[prop(optional)] seed: Option<u64>,
	#[prop(optional, into)] on_node_click: Option<Callback<String>>,
) -> impl IntoView {
	let Some(window) = web_sys::window() else {
		warn!("jobs graph: {}", GraphError::NoWindow);
		return ().into_any();
	};
	let fallback = if static_fallback {
		Fallback::Static
	} else {
		Fallback::Hidden
	};
	let variant = select_variant(&Environment::from_window(&window), fallback);
	if variant == Variant::Hidden {
		return ().into_any();
	}

	let params = {
		let params = RelaxParams::default();
		let params = seed.map_or(params, |s| params.with_seed(s));
		if variant == Variant::Static {
			params.flat()
		} else {
			params
		}
	};

	let built = Memo::new(move |_| {
		let opts = AggregateOptions::new(limit)
			.with_category(category_filter.get())
			.with_role(role_filter.get())
			.with_location(location_filter.get())
			.with_skills_per_job(max_skills_per_job);
		jobs.with(|jobs| build_aggregate(jobs, &opts))
	});

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let slot = LoopSlot::default();
	let resize: Rc<RefCell<Option<ResizeBinding>>> = Rc::default();
	unmount_on_cleanup(&slot);
	{
		let resize = StoredValue::new_local(resize.clone());
		on_cleanup(move || {
			let _ = resize.try_with_value(|r| r.borrow_mut().take());
		});
	}

	let (slot_fx, resize_fx) = (slot.clone(), resize.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let positioned = built.with(|b| {
			b.as_ref()
				.map(|b| layout(&b.graph, &LayoutMode::Expansive(params)))
		});
		if let Some(g) = &positioned {
			debug!("jobs graph: {} nodes, {} edges", g.nodes.len(), g.edges.len());
		}

		if !slot_fx.is_mounted() {
			let (renderer, cadence) = pipeline_for(variant);
			match mount_frame_loop(&canvas, container_viewport(&canvas), renderer, cadence) {
				Ok(lp) => slot_fx.install(lp),
				Err(err) => {
					warn!("jobs graph: {err}");
					return;
				}
			}
			let (slot_rs, canvas_rs) = (slot_fx.clone(), canvas.clone());
			*resize_fx.borrow_mut() = ResizeBinding::attach(&window, move || {
				let viewport = container_viewport(&canvas_rs);
				slot_rs.with(|lp| lp.resize(viewport));
			});
		}
		slot_fx.with(|lp| lp.set_graph(positioned));
	});

	let slot_mm = slot.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			slot_mm.pointer_move(&canvas.into(), ev.client_x(), ev.client_y());
		}
	};
	let slot_ml = slot.clone();
	let on_mouseleave = move |_: MouseEvent| slot_ml.pointer_leave();
	let slot_ts = slot.clone();
	let on_touchstart = move |ev: TouchEvent| {
		if let Some(canvas) = canvas_ref.get() {
			slot_ts.touch_start(&canvas.into(), &ev);
		}
	};
	let slot_te = slot.clone();
	let on_touchend = move |_: TouchEvent| slot_te.pointer_leave();
	let slot_cl = slot;
	let on_click = move |_: MouseEvent| {
		let Some(url) = slot_cl.hovered_url() else {
			return;
		};
		debug!("jobs graph: open {url}");
		match on_node_click {
			Some(cb) => cb.run(url),
			None => open_link(&url),
		}
	};

	let has_graph = move || built.with(Option::is_some);

	view! {
		<div
			class="jobs-graph"
			class:jobs-graph-hero=is_hero
			style=format!("position: relative; width: 100%; height: {height};")
		>
			<canvas
				node_ref=canvas_ref
				class="jobs-graph-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:touchstart=on_touchstart
				on:touchend=on_touchend
				style=move || if has_graph() { "display: block;" } else { "display: none;" }
			/>
			<Show when=move || show_overlay && has_graph()>
				<Legend is_hero=is_hero />
			</Show>
		</div>
	}
	.into_any()
}
