use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use leptos::prelude::*;
use log::warn;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use super::builder::build;
use super::canvas::CanvasSurface;
use super::config::{BuildOptions, CompactGeometry, DEFAULT_MAX_SKILLS};
use super::error::GraphError;
use super::hero::JobsGraphHero;
use super::layout::{LayoutMode, layout};
use super::render::{FlatRenderer, RenderPipeline, Surface};
use super::scheduler::{Cadence, FrameLoop, RafScheduler};
use super::types::{JobInput, JobRecord, Viewport};

pub(crate) type SharedLoop = Rc<RefCell<FrameLoop<RafScheduler>>>;

/// Wires a frame loop to `canvas` and `requestAnimationFrame`.
///
/// The rAF closure only holds a weak reference, so dropping the returned
/// handle tears everything down.
pub(crate) fn mount_frame_loop(
	canvas: &HtmlCanvasElement,
	viewport: Viewport,
	renderer: Box<dyn RenderPipeline>,
	cadence: Cadence,
) -> Result<SharedLoop, GraphError> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let shared = Rc::new(RefCell::new(FrameLoop::new(
		RafScheduler::new(window),
		renderer,
		cadence,
	)));
	let weak = Rc::downgrade(&shared);
	shared.borrow().scheduler().bind(move |timestamp| {
		if let Some(lp) = weak.upgrade() {
			lp.borrow_mut().on_frame(timestamp);
		}
	});
	let surface =
		CanvasSurface::acquire(canvas, viewport).map(|s| Box::new(s) as Box<dyn Surface>);
	shared.borrow_mut().acquire_surface(surface);
	Ok(shared)
}

/// Slot shared by a component's effect, event handlers and cleanup.
#[derive(Clone, Default)]
pub(crate) struct LoopSlot(Rc<RefCell<Option<SharedLoop>>>);

impl LoopSlot {
	pub(crate) fn is_mounted(&self) -> bool {
		self.0.borrow().is_some()
	}

	pub(crate) fn install(&self, lp: SharedLoop) {
		*self.0.borrow_mut() = Some(lp);
	}

	pub(crate) fn with<R>(&self, f: impl FnOnce(&mut FrameLoop<RafScheduler>) -> R) -> Option<R> {
		let lp = self.0.borrow().clone()?;
		let mut lp = lp.borrow_mut();
		Some(f(&mut lp))
	}

	pub(crate) fn unmount(&self) {
		if let Some(lp) = self.0.borrow_mut().take() {
			lp.borrow_mut().unmount();
		}
	}

	/// Pointer and touch handlers for a canvas driven by this slot.
	pub(crate) fn pointer_move(&self, canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) {
		let at = canvas_point(canvas, client_x, client_y);
		self.with(|lp| lp.pointer_move(at));
	}

	pub(crate) fn touch_start(&self, canvas: &HtmlCanvasElement, ev: &TouchEvent) {
		if let Some(touch) = ev.touches().get(0) {
			self.pointer_move(canvas, touch.client_x(), touch.client_y());
		}
	}

	pub(crate) fn pointer_leave(&self) {
		self.with(|lp| lp.pointer_leave());
	}

	pub(crate) fn hovered_url(&self) -> Option<String> {
		self.with(|lp| lp.hovered_url().map(String::from)).flatten()
	}
}

/// Unmounts the slot when the owning component is disposed.
pub(crate) fn unmount_on_cleanup(slot: &LoopSlot) {
	let stored = StoredValue::new_local(slot.clone());
	on_cleanup(move || {
		let _ = stored.try_with_value(LoopSlot::unmount);
	});
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> DVec2 {
	let rect = canvas.get_bounding_client_rect();
	DVec2::new(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	)
}

/// Card-sized radial graph of one job: company, title and top skills.
///
/// Renders nothing when the company name or job title is blank. Clicking
/// toggles an expanded flag reported through `on_toggle`.
#[component]
pub fn MiniJobGraph(
	#[prop(into)] company_name: Signal<String>,
	#[prop(into, optional)] company_domain: MaybeProp<String>,
	#[prop(into)] job_title: Signal<String>,
	#[prop(into)] skills: Signal<Vec<String>>,
	#[prop(default = DEFAULT_MAX_SKILLS)] max_skills: usize,
	#[prop(optional)] on_toggle: Option<Callback<bool>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let geometry = CompactGeometry::default();
	let options = BuildOptions::new(max_skills);

	let built = Memo::new(move |_| {
		let input = JobInput {
			company_name: company_name.get(),
			company_domain: company_domain.get(),
			job_title: job_title.get(),
			skills: skills.get(),
		};
		build(&input, &options)
	});

	let slot = LoopSlot::default();
	unmount_on_cleanup(&slot);

	let slot_fx = slot.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let positioned = built.with(|b| {
			b.as_ref()
				.map(|b| layout(&b.graph, &LayoutMode::Compact(geometry)))
		});

		if !slot_fx.is_mounted() {
			match mount_frame_loop(
				&canvas,
				geometry.viewport(),
				Box::new(FlatRenderer::compact()),
				Cadence::OnDemand,
			) {
				Ok(lp) => slot_fx.install(lp),
				Err(err) => {
					warn!("mini job graph: {err}");
					return;
				}
			}
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

	let slot_click = slot.clone();
	let on_click = move |_: MouseEvent| {
		let Some(expanded) = slot_click.with(|lp| lp.click()) else {
			return;
		};
		if let Some(cb) = on_toggle {
			cb.run(expanded);
		}
	};

	let slot_ts = slot.clone();
	let on_touchstart = move |ev: TouchEvent| {
		if let Some(canvas) = canvas_ref.get() {
			slot_ts.touch_start(&canvas.into(), &ev);
		}
	};

	let slot_te = slot;
	let on_touchend = move |_: TouchEvent| slot_te.pointer_leave();

	let overflow = move || {
		built
			.with(|b| b.as_ref().map(|b| b.overflow))
			.filter(|n| *n > 0)
			.map(|n| view! { <span class="job-graph-more">{format!("+{n} more")}</span> })
	};

	view! {
		<div class="job-graph-mini">
			<canvas
				node_ref=canvas_ref
				class="job-graph-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:touchstart=on_touchstart
				on:touchend=on_touchend
				style=move || {
					if built.with(Option::is_some) {
						"display: block; cursor: pointer;"
					} else {
						"display: none;"
					}
				}
			/>
			{overflow}
		</div>
	}
}

/// Mini graph that mounts the network of related jobs while expanded.
#[component]
pub fn JobGraphDisclosure(
	job: JobInput,
	#[prop(optional)] related: Vec<JobRecord>,
	#[prop(default = DEFAULT_MAX_SKILLS)] max_skills: usize,
) -> impl IntoView {
	let (expanded, set_expanded) = signal(false);

	let mut records = vec![JobRecord {
		title: job.job_title.clone(),
		company_name: job.company_name.clone(),
		company_domain: job.company_domain.clone(),
		skills: job.skills.clone(),
		..JobRecord::default()
	}];
	records.extend(related);

	let on_toggle = Callback::new(move |open: bool| set_expanded.set(open));

	view! {
		<div class="job-graph-disclosure">
			<MiniJobGraph
				company_name=job.company_name
				company_domain=job.company_domain
				job_title=job.job_title
				skills=job.skills
				max_skills=max_skills
				on_toggle=on_toggle
			/>
			<Show when=move || expanded.get()>
				<JobsGraphHero
					jobs=records.clone()
					height="260px"
					show_overlay=false
					static_fallback=true
				/>
			</Show>
		</div>
	}
}
