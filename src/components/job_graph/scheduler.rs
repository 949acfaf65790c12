//! One redraw entry point per mounted graph.
//!
//! A [`FrameLoop`] owns the surface lease, the latest positioned graph and the
//! interaction controller. Pointer callbacks and prop changes only mark the
//! loop dirty; drawing happens in [`FrameLoop::on_frame`] when the host fires
//! the scheduled frame. At most one frame is pending at a time.

use std::cell::RefCell;

use glam::DVec2;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::config::HIT_TOLERANCE;
use super::error::GraphError;
use super::interaction::InteractionController;
#[cfg(test)]
use super::interaction::InteractionState;
use super::render::{RenderPipeline, Surface};
use super::types::{PositionedGraph, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host "next paint" primitive.
pub trait FrameScheduler {
	fn request_frame(&self) -> Option<FrameHandle>;
	fn cancel_frame(&self, handle: FrameHandle);
	/// Drops the host callback; no frame fires after this.
	fn release(&self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
	/// One frame per graph or interaction change.
	OnDemand,
	/// A new frame every tick while mounted.
	Continuous,
}

pub struct FrameLoop<S: FrameScheduler> {
	scheduler: S,
	renderer: Box<dyn RenderPipeline>,
	cadence: Cadence,
	surface: Option<Box<dyn Surface>>,
	graph: Option<PositionedGraph>,
	controller: InteractionController,
	pending: Option<FrameHandle>,
	started_at: Option<f64>,
	elapsed: f64,
}

impl<S: FrameScheduler> FrameLoop<S> {
	pub fn new(scheduler: S, renderer: Box<dyn RenderPipeline>, cadence: Cadence) -> Self {
		Self {
			scheduler,
			renderer,
			cadence,
			surface: None,
			graph: None,
			controller: InteractionController::new(HIT_TOLERANCE),
			pending: None,
			started_at: None,
			elapsed: 0.0,
		}
	}

	pub fn scheduler(&self) -> &S {
		&self.scheduler
	}

	#[cfg(test)]
	pub fn interaction(&self) -> &InteractionState {
		self.controller.state()
	}

	#[cfg(test)]
	pub fn has_pending_frame(&self) -> bool {
		self.pending.is_some()
	}

	/// Link of the node under the pointer, if that node has one.
	pub fn hovered_url(&self) -> Option<&str> {
		let id = self.controller.state().hovered.as_deref()?;
		let graph = self.graph.as_ref()?;
		graph.nodes.iter().find(|n| n.id == id)?.url.as_deref()
	}

	/// Takes over a drawing surface. On failure the loop stays inert.
	pub fn acquire_surface(&mut self, surface: Result<Box<dyn Surface>, GraphError>) -> bool {
		self.release_surface();
		match surface {
			Ok(surface) => {
				debug!("job graph: surface acquired ({:?})", surface.viewport());
				self.surface = Some(surface);
				self.invalidate();
				true
			}
			Err(err) => {
				warn!("job graph: {err}; drawing nothing");
				false
			}
		}
	}

	pub fn release_surface(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel_frame(handle);
		}
		if let Some(mut surface) = self.surface.take() {
			surface.release();
			debug!("job graph: surface released");
		}
	}

	/// Swaps in a freshly laid out graph, or `None` to draw nothing.
	pub fn set_graph(&mut self, graph: Option<PositionedGraph>) {
		match &graph {
			Some(g) => {
				self.controller.retain(g);
			}
			None => {
				self.controller.pointer_leave();
			}
		}
		self.graph = graph;
		self.invalidate();
	}

	pub fn resize(&mut self, viewport: Viewport) {
		if let Some(surface) = self.surface.as_mut() {
			surface.resize(viewport);
			self.invalidate();
		}
	}

	/// Requests a frame unless one is already pending.
	pub fn invalidate(&mut self) {
		if self.pending.is_some() || self.surface.is_none() {
			return;
		}
		self.pending = self.scheduler.request_frame();
	}

	/// Draws with the latest graph and interaction state.
	pub fn on_frame(&mut self, timestamp_ms: f64) {
		self.pending = None;
		let Some(surface) = self.surface.as_deref_mut() else {
			return;
		};
		let start = *self.started_at.get_or_insert(timestamp_ms);
		self.elapsed = ((timestamp_ms - start) / 1000.0).max(0.0);

		match &self.graph {
			Some(graph) => {
				self.renderer
					.render(graph, self.controller.state(), self.elapsed, Some(surface))
			}
			None => surface.clear(),
		}

		if self.cadence == Cadence::Continuous && self.graph.is_some() {
			self.invalidate();
		}
	}

	pub fn pointer_move(&mut self, pointer: DVec2) {
		let (Some(graph), Some(surface)) = (&self.graph, &self.surface) else {
			return;
		};
		let view = self.renderer.view(graph, surface.viewport(), self.elapsed);
		if self.controller.pointer_move(graph, &view, pointer) {
			self.invalidate();
		}
	}

	pub fn pointer_leave(&mut self) {
		if self.controller.pointer_leave() {
			self.invalidate();
		}
	}

	/// Toggles and returns the expanded flag.
	pub fn click(&mut self) -> bool {
		let expanded = self.controller.click();
		self.invalidate();
		expanded
	}

	/// Cancels the pending frame and releases the surface and host callback.
	/// Safe to call more than once.
	pub fn unmount(&mut self) {
		self.release_surface();
		self.scheduler.release();
		self.graph = None;
	}
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
	fn drop(&mut self) {
		self.unmount();
	}
}

/// `requestAnimationFrame` on the browser window.
pub struct RafScheduler {
	window: Window,
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl RafScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: RefCell::new(None),
		}
	}

	/// Installs the per-frame callback. Until bound, requests are refused.
	pub fn bind(&self, on_frame: impl FnMut(f64) + 'static) {
		*self.callback.borrow_mut() = Some(Closure::new(on_frame));
	}
}

impl FrameScheduler for RafScheduler {
	fn request_frame(&self) -> Option<FrameHandle> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
			.map(FrameHandle)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}

	fn release(&self) {
		self.callback.borrow_mut().take();
	}
}
