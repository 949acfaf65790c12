use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

use super::render::{Stroke, Surface};
use super::scheduler::{FrameHandle, FrameScheduler};
use super::types::{Rgb, Viewport};

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
	Clear,
	Resize(Viewport),
	Line {
		from: DVec2,
		to: DVec2,
		alpha: f64,
		width: f64,
		dashed: bool,
	},
	Disc {
		center: DVec2,
		radius: f64,
		color: Rgb,
	},
	Ring {
		center: DVec2,
		radius: f64,
	},
	Text {
		text: String,
		at: DVec2,
		font_px: f64,
	},
	Release,
}

/// Surface that logs draw calls instead of drawing. Clones share one log.
#[derive(Clone)]
pub struct RecordingSurface {
	viewport: Viewport,
	log: Rc<RefCell<Vec<Op>>>,
}

impl RecordingSurface {
	pub fn new(viewport: Viewport) -> Self {
		Self {
			viewport,
			log: Rc::default(),
		}
	}

	pub fn ops(&self) -> Vec<Op> {
		self.log.borrow().clone()
	}

	pub fn texts(&self) -> Vec<String> {
		self.log
			.borrow()
			.iter()
			.filter_map(|op| match op {
				Op::Text { text, .. } => Some(text.clone()),
				_ => None,
			})
			.collect()
	}
}

impl Surface for RecordingSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.log.borrow_mut().push(Op::Resize(viewport));
	}

	fn clear(&mut self) {
		self.log.borrow_mut().push(Op::Clear);
	}

	fn line(&mut self, from: DVec2, to: DVec2, stroke: &Stroke) {
		self.log.borrow_mut().push(Op::Line {
			from,
			to,
			alpha: stroke.alpha,
			width: stroke.width,
			dashed: stroke.dash.is_some(),
		});
	}

	fn disc(&mut self, center: DVec2, radius: f64, color: Rgb, _alpha: f64) {
		self.log.borrow_mut().push(Op::Disc { center, radius, color });
	}

	fn ring(&mut self, center: DVec2, radius: f64, _stroke: &Stroke) {
		self.log.borrow_mut().push(Op::Ring { center, radius });
	}

	fn text(&mut self, text: &str, at: DVec2, font_px: f64, _color: Rgb, _alpha: f64) {
		self.log.borrow_mut().push(Op::Text {
			text: text.to_string(),
			at,
			font_px,
		});
	}

	fn release(&mut self) {
		self.log.borrow_mut().push(Op::Release);
	}
}

#[derive(Debug, Default)]
struct Frames {
	next: i32,
	pending: Vec<i32>,
	requested: usize,
	refuse: bool,
	released: bool,
}

/// Scheduler that only counts; tests fire frames by hand.
#[derive(Clone, Debug, Default)]
pub struct CountingScheduler {
	frames: Rc<RefCell<Frames>>,
}

impl CountingScheduler {
	pub fn pending(&self) -> usize {
		self.frames.borrow().pending.len()
	}

	pub fn requested(&self) -> usize {
		self.frames.borrow().requested
	}

	pub fn released(&self) -> bool {
		self.frames.borrow().released
	}

	/// Makes every later request fail, as when the host has no window.
	pub fn refuse(&self) {
		self.frames.borrow_mut().refuse = true;
	}

	/// Pops the oldest pending frame, as the host would when it fires.
	pub fn fire(&self) -> Option<FrameHandle> {
		let mut frames = self.frames.borrow_mut();
		if frames.pending.is_empty() {
			return None;
		}
		Some(FrameHandle(frames.pending.remove(0)))
	}
}

impl FrameScheduler for CountingScheduler {
	fn request_frame(&self) -> Option<FrameHandle> {
		let mut frames = self.frames.borrow_mut();
		if frames.refuse {
			return None;
		}
		frames.next += 1;
		frames.requested += 1;
		let id = frames.next;
		frames.pending.push(id);
		Some(FrameHandle(id))
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		self.frames.borrow_mut().pending.retain(|id| *id != handle.0);
	}

	fn release(&self) {
		self.frames.borrow_mut().released = true;
	}
}
