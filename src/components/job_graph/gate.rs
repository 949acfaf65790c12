//! Pre-mount device check for the expensive network view.

use log::debug;
use web_sys::Window;

pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;
pub const MIN_HARDWARE_THREADS: u32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Environment {
	pub viewport_width: f64,
	pub prefers_reduced_motion: bool,
	pub hardware_threads: Option<u32>,
}

impl Environment {
	pub fn from_window(window: &Window) -> Self {
		let viewport_width = window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(0.0);
		let prefers_reduced_motion = window
			.match_media("(prefers-reduced-motion: reduce)")
			.ok()
			.flatten()
			.map(|q| q.matches())
			.unwrap_or(false);
		let threads = window.navigator().hardware_concurrency();
		Self {
			viewport_width,
			prefers_reduced_motion,
			hardware_threads: (threads >= 1.0).then_some(threads as u32),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
	/// Animated 3D network.
	Immersive,
	/// Flat layout drawn once.
	Static,
	Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
	Static,
	Hidden,
}

pub fn should_mount_expansive(env: &Environment) -> bool {
	env.viewport_width >= DESKTOP_MIN_WIDTH
		&& !env.prefers_reduced_motion
		&& env.hardware_threads.is_none_or(|n| n >= MIN_HARDWARE_THREADS)
}

pub fn select_variant(env: &Environment, fallback: Fallback) -> Variant {
	let variant = if should_mount_expansive(env) {
		Variant::Immersive
	} else {
		match fallback {
			Fallback::Static => Variant::Static,
			Fallback::Hidden => Variant::Hidden,
		}
	};
	debug!("capability gate: {env:?} -> {variant:?}");
	variant
}
