//! Rendering surface contract and the device-pixel-ratio bookkeeping.
//!
//! Callers draw in logical (CSS) units. [`SurfaceState::configure`] sizes the
//! backing store to `logical * ratio` and installs a `scale(ratio)` transform,
//! so every logical draw call lands 1:1 on device pixels.

use std::f64::consts::TAU;

use kurbo::{Affine, Point};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::theme::Tint;

/// Something discs can be drawn on.
///
/// Resizing the backing store discards its contents.
pub trait Surface {
	/// Set the backing store size in device pixels.
	fn set_backing_size(&mut self, width: u32, height: u32);
	/// Replace the current transform (not compose with it).
	fn set_transform(&mut self, transform: Affine);
	/// Clear the whole backing store to transparent.
	fn clear(&mut self);
	/// Fill a disc given in logical coordinates.
	fn fill_disc(&mut self, center: Point, radius: f64, tint: Tint, alpha: f64);
}

/// Backing-store dimensions and the logical-to-device transform.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
	/// Viewport width in CSS px.
	pub logical_width: f64,
	/// Viewport height in CSS px.
	pub logical_height: f64,
	/// Effective device pixel ratio after sanitising and capping.
	pub pixel_ratio: f64,
	/// Backing store width in device pixels.
	pub backing_width: u32,
	/// Backing store height in device pixels.
	pub backing_height: u32,
	/// Logical-to-device transform, `scale(pixel_ratio)`.
	pub transform: Affine,
	max_ratio: Option<f64>,
}

impl Default for SurfaceState {
	fn default() -> Self {
		Self::new(None)
	}
}

impl SurfaceState {
	/// Unsized state; `max_ratio` caps the device pixel ratio.
	pub fn new(max_ratio: Option<f64>) -> Self {
		Self {
			logical_width: 0.0,
			logical_height: 0.0,
			pixel_ratio: 1.0,
			backing_width: 0,
			backing_height: 0,
			transform: Affine::IDENTITY,
			max_ratio,
		}
	}

	/// Recompute sizes for a new viewport.
	///
	/// A non-finite or non-positive ratio is treated as 1. Fractional device
	/// sizes truncate, the way a canvas `width` attribute does.
	pub fn configure(&mut self, logical_width: f64, logical_height: f64, device_pixel_ratio: f64) {
		let mut ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
			device_pixel_ratio
		} else {
			1.0
		};
		if let Some(max) = self.max_ratio {
			ratio = ratio.min(max);
		}

		self.logical_width = sanitize_extent(logical_width);
		self.logical_height = sanitize_extent(logical_height);
		self.pixel_ratio = ratio;
		self.backing_width = (self.logical_width * ratio).floor() as u32;
		self.backing_height = (self.logical_height * ratio).floor() as u32;
		self.transform = Affine::scale(ratio);
	}

	/// Push the current sizes and transform onto a surface.
	pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
		surface.set_backing_size(self.backing_width, self.backing_height);
		surface.set_transform(Affine::IDENTITY);
		surface.set_transform(self.transform);
	}

	/// `(width, height)` in CSS px.
	pub fn logical_size(&self) -> (f64, f64) {
		(self.logical_width, self.logical_height)
	}

	/// Map a logical point to device pixels.
	pub fn to_device(&self, point: Point) -> Point {
		self.transform * point
	}
}

fn sanitize_extent(v: f64) -> f64 {
	if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// A `<canvas>` 2-D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// `None` when the browser cannot hand out a 2-D context.
	pub fn from_canvas(canvas: HtmlCanvasElement) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self { canvas, ctx })
	}
}

impl Surface for CanvasSurface {
	fn set_backing_size(&mut self, width: u32, height: u32) {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
	}

	fn set_transform(&mut self, transform: Affine) {
		let [a, b, c, d, e, f] = transform.as_coeffs();
		let _ = self.ctx.set_transform(a, b, c, d, e, f);
	}

	fn clear(&mut self) {
		self.ctx.save();
		let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		self.ctx.clear_rect(
			0.0,
			0.0,
			self.canvas.width() as f64,
			self.canvas.height() as f64,
		);
		self.ctx.restore();
	}

	fn fill_disc(&mut self, center: Point, radius: f64, tint: Tint, alpha: f64) {
		self.ctx.set_fill_style_str(&tint.to_css(alpha));
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
		self.ctx.fill();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backing_store_is_logical_times_ratio() {
		let mut state = SurfaceState::default();
		state.configure(800.0, 600.0, 2.0);
		assert_eq!((state.backing_width, state.backing_height), (1600, 1200));
		assert_eq!(state.transform, Affine::scale(2.0));
		assert_eq!(state.to_device(Point::new(400.0, 300.0)), Point::new(800.0, 600.0));

		state.configure(333.0, 100.0, 1.5);
		assert_eq!((state.backing_width, state.backing_height), (499, 150));
		assert_eq!(state.logical_size(), (333.0, 100.0));
	}

	#[test]
	fn bad_ratio_falls_back_to_one() {
		let mut state = SurfaceState::default();
		for ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
			state.configure(100.0, 50.0, ratio);
			assert_eq!(state.pixel_ratio, 1.0);
			assert_eq!((state.backing_width, state.backing_height), (100, 50));
		}
	}

	#[test]
	fn ratio_cap_applies() {
		let mut state = SurfaceState::new(Some(2.0));
		state.configure(100.0, 100.0, 3.0);
		assert_eq!(state.pixel_ratio, 2.0);
		assert_eq!(state.backing_width, 200);
	}

	#[test]
	fn negative_viewport_collapses_to_zero() {
		let mut state = SurfaceState::default();
		state.configure(-10.0, f64::NAN, 2.0);
		assert_eq!(state.logical_size(), (0.0, 0.0));
		assert_eq!((state.backing_width, state.backing_height), (0, 0));
	}
}
