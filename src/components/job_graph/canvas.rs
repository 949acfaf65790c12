use std::f64::consts::TAU;

use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::GraphError;
use super::render::{Stroke, Surface};
use super::types::{Rgb, Viewport};

/// [`Surface`] backed by a `<canvas>` 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	viewport: Viewport,
}

impl CanvasSurface {
	pub fn acquire(canvas: &HtmlCanvasElement, viewport: Viewport) -> Result<Self, GraphError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| GraphError::SurfaceUnavailable(format!("{e:?}")))?
			.ok_or_else(|| GraphError::SurfaceUnavailable("no 2d context".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| GraphError::SurfaceUnavailable("unexpected context type".into()))?;
		let mut surface = Self {
			canvas: canvas.clone(),
			ctx,
			viewport,
		};
		surface.resize(viewport);
		Ok(surface)
	}

	fn apply(&self, stroke: &Stroke) {
		self.ctx.set_stroke_style_str(&stroke.color.css(stroke.alpha));
		self.ctx.set_line_width(stroke.width);
		match stroke.dash {
			Some(dash) => {
				let _ = self.ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash.on),
					&JsValue::from_f64(dash.off),
				));
				self.ctx.set_line_dash_offset(dash.offset);
			}
			None => {
				let _ = self.ctx.set_line_dash(&js_sys::Array::new());
			}
		}
	}
}

impl Surface for CanvasSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.canvas.set_width(viewport.width.max(1.0) as u32);
		self.canvas.set_height(viewport.height.max(1.0) as u32);
	}

	fn clear(&mut self) {
		self.ctx
			.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}

	fn line(&mut self, from: DVec2, to: DVec2, stroke: &Stroke) {
		self.apply(stroke);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn disc(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
		self.ctx.set_fill_style_str(&color.css(alpha));
		self.ctx.fill();
	}

	fn ring(&mut self, center: DVec2, radius: f64, stroke: &Stroke) {
		self.apply(stroke);
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
		self.ctx.stroke();
	}

	fn text(&mut self, text: &str, at: DVec2, font_px: f64, color: Rgb, alpha: f64) {
		self.ctx.set_font(&format!("{font_px}px sans-serif"));
		self.ctx.set_text_align("center");
		self.ctx.set_text_baseline("middle");
		self.ctx.set_fill_style_str(&color.css(alpha));
		let _ = self.ctx.fill_text(text, at.x, at.y);
	}

	fn release(&mut self) {
		let _ = self.ctx.set_line_dash(&js_sys::Array::new());
		self.clear();
	}
}
