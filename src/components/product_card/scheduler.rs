//! Frame scheduling.
//!
//! [`FrameLoop`] re-arms `requestAnimationFrame` after every callback until it
//! is stopped or dropped. [`FrameClock`] turns the callback timestamps into a
//! step factor for the integrator.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::debug;
use wasm_bindgen::prelude::*;

/// Nominal frame interval the per-step constants are tuned for.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Upper bound on one step factor, so a backgrounded tab does not fling
/// particles across the screen when it resumes.
pub const MAX_STEP_FACTOR: f64 = 4.0;

/// Converts frame timestamps (milliseconds) into step factors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
	time_scaled: bool,
	last: Option<f64>,
}

impl FrameClock {
	pub fn new(time_scaled: bool) -> Self {
		Self {
			time_scaled,
			last: None,
		}
	}

	/// Step factor for a frame at `timestamp_ms`.
	///
	/// Fixed stepping always yields 1. Scaled stepping yields elapsed time in
	/// units of [`FRAME_MS`], clamped to `[0, MAX_STEP_FACTOR]`; the first frame
	/// counts as one nominal step.
	pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
		let previous = self.last.replace(timestamp_ms);
		if !self.time_scaled {
			return 1.0;
		}
		match previous {
			Some(prev) if timestamp_ms.is_finite() && prev.is_finite() => {
				((timestamp_ms - prev) / FRAME_MS).clamp(0.0, MAX_STEP_FACTOR)
			}
			_ => 1.0,
		}
	}

	/// Forget the previous timestamp, e.g. after the loop was paused.
	pub fn reset(&mut self) {
		self.last = None;
	}
}

struct LoopInner {
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	handle: Cell<Option<i32>>,
	running: Cell<bool>,
}

impl LoopInner {
	fn request(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.handle.set(Some(id));
			}
		}
	}
}

/// A `requestAnimationFrame` loop with an explicit stop.
///
/// The callback runs once per display refresh with the frame timestamp.
/// Dropping the loop stops it.
pub struct FrameLoop {
	inner: Rc<LoopInner>,
}

impl FrameLoop {
	pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Self {
		let inner = Rc::new(LoopInner {
			callback: RefCell::new(None),
			handle: Cell::new(None),
			running: Cell::new(true),
		});

		let weak: Weak<LoopInner> = Rc::downgrade(&inner);
		*inner.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.handle.set(None);
			if !inner.running.get() {
				return;
			}
			on_frame(timestamp);
			if inner.running.get() {
				inner.request();
			}
		}));

		inner.request();
		debug!("frame loop started");
		Self { inner }
	}

	pub fn is_running(&self) -> bool {
		self.inner.running.get()
	}

	/// Cancel the pending frame. The callback will not run again.
	pub fn stop(&self) {
		if !self.inner.running.replace(false) {
			return;
		}
		if let Some(id) = self.inner.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		debug!("frame loop stopped");
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_clock_always_steps_once() {
		let mut clock = FrameClock::new(false);
		assert_eq!(clock.advance(0.0), 1.0);
		assert_eq!(clock.advance(100.0), 1.0);
		assert_eq!(clock.advance(100.5), 1.0);
	}

	#[test]
	fn scaled_clock_tracks_elapsed_frames() {
		let mut clock = FrameClock::new(true);
		assert_eq!(clock.advance(1000.0), 1.0);
		assert!((clock.advance(1000.0 + FRAME_MS) - 1.0).abs() < 1e-9);
		assert!((clock.advance(1000.0 + 2.0 * FRAME_MS) - 1.0).abs() < 1e-9);
		assert!((clock.advance(1000.0 + 2.5 * FRAME_MS) - 0.5).abs() < 1e-9);
	}

	#[test]
	fn scaled_clock_clamps_gaps_and_reversals() {
		let mut clock = FrameClock::new(true);
		clock.advance(0.0);
		assert_eq!(clock.advance(10_000.0), MAX_STEP_FACTOR);
		assert_eq!(clock.advance(9_000.0), 0.0);

		clock.reset();
		assert_eq!(clock.advance(50_000.0), 1.0);
	}
}
