//! Orbiting perspective camera for the immersive variant.
//!
//! Projection depends only on the camera and the elapsed time, never on the
//! layout, so the same positioned graph can be drawn from any angle.

use glam::{DQuat, DVec2, DVec3};

use super::types::Viewport;

const NEAR: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// Distance from the orbit center.
	pub distance: f64,
	pub pitch: f64,
	pub yaw: f64,
	/// Auto-rotation, radians per second.
	pub spin: f64,
	/// Focal length in pixels.
	pub focal: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			distance: 320.0,
			pitch: -0.35,
			yaw: 0.0,
			spin: 0.08,
			focal: 420.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub screen: DVec2,
	/// Distance in front of the camera.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	pub origin: DVec3,
	/// Unit length.
	pub direction: DVec3,
}

impl Ray {
	/// Distance along the ray to the point closest to `p`, and the gap at that point.
	pub fn closest_approach(&self, p: DVec3) -> (f64, f64) {
		let v = p - self.origin;
		let t = v.dot(self.direction);
		let gap = (v - self.direction * t).length();
		(t, gap)
	}
}

impl Camera {
	pub fn yaw_at(&self, elapsed: f64) -> f64 {
		self.yaw + self.spin * elapsed
	}

	/// World-to-camera rotation: yaw about y, then pitch about x.
	pub fn orientation(&self, elapsed: f64) -> DQuat {
		DQuat::from_rotation_x(self.pitch) * DQuat::from_rotation_y(self.yaw_at(elapsed))
	}

	/// Screen position of `p`, or `None` when it is behind the near plane.
	pub fn project(&self, p: DVec3, elapsed: f64, viewport: Viewport) -> Option<Projected> {
		let r = self.orientation(elapsed) * p;
		let depth = self.distance - r.z;
		if depth < NEAR {
			return None;
		}
		let scale = self.focal / depth;
		let c = viewport.center();
		Some(Projected {
			screen: DVec2::new(c.x + r.x * scale, c.y + r.y * scale),
			depth,
			scale,
		})
	}

	/// World-space ray through a screen point.
	pub fn ray(&self, screen: DVec2, elapsed: f64, viewport: Viewport) -> Ray {
		let c = viewport.center();
		let focal = self.focal.max(f64::EPSILON);
		let dir = DVec3::new((screen.x - c.x) / focal, (screen.y - c.y) / focal, -1.0);
		let back = self.orientation(elapsed).inverse();
		Ray {
			origin: back * DVec3::new(0.0, 0.0, self.distance),
			direction: (back * dir).normalize_or_zero(),
		}
	}
}
