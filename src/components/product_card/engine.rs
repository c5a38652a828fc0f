//! The effect engine behind the product card.
//!
//! [`CardFx`] owns the particle pool, the surface state and the pointer
//! mapper, and exposes the handful of operations the DOM glue calls:
//! resize, pointer move/leave, interaction trigger and the per-frame tick.
//! Pointer handlers only do O(1) mapping or enqueue a burst; all per-particle
//! work happens in [`CardFx::tick`].

use kurbo::{Point, Rect, Vec2};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::FxConfig;
use super::integrate::Integrator;
use super::particles::EntityPool;
use super::pointer::{PointerMapper, light_position, map_pointer};
use super::render;
use super::scheduler::FrameClock;
use super::surface::{Surface, SurfaceState};
use super::types::{ButtonTargets, PointerState, PointerTargets, Region};

/// Seed used when the config names none.
pub const DEFAULT_SEED: u64 = 0x5EED_CA4D;

/// Counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	/// Particles still in the pool after culling.
	pub live: usize,
	/// Particles culled this frame.
	pub removed: usize,
	/// Discs drawn; zero when there is no surface.
	pub drawn: usize,
}

/// Particle engine plus pointer mapping for one card.
///
/// The surface is optional: without one, ticks still integrate and cull so
/// state stays consistent for a surface attached later.
pub struct CardFx<S> {
	config: FxConfig,
	surface: Option<S>,
	surface_state: SurfaceState,
	pool: EntityPool,
	integrator: Integrator,
	pointer: PointerMapper,
	pointer_state: PointerState,
	clock: FrameClock,
	rng: SmallRng,
	/// Ambient displacement from the latest pointer move, applied next step.
	scene_shift: Option<Vec2>,
	frames: u64,
}

impl<S: Surface> CardFx<S> {
	/// Engine for `config`, drawing on `surface` when there is one.
	pub fn new(config: FxConfig, surface: Option<S>) -> Self {
		let seed = config.seed.unwrap_or(DEFAULT_SEED);
		info!(
			"card fx: {} ambient, {} per burst, surface {}",
			config.ambient.count,
			config.burst.count,
			if surface.is_some() { "attached" } else { "missing" }
		);
		Self {
			surface_state: SurfaceState::new(config.max_device_pixel_ratio),
			pool: EntityPool::with_burst_cap(config.max_burst_particles),
			integrator: Integrator::from_config(&config),
			pointer: PointerMapper::from_config(&config),
			pointer_state: PointerState::default(),
			clock: FrameClock::new(config.time_scaled),
			rng: SmallRng::seed_from_u64(seed),
			scene_shift: None,
			frames: 0,
			surface,
			config,
		}
	}

	/// Resize the surface and reseed the ambient field for the new viewport.
	///
	/// Drawn content does not survive this call.
	pub fn on_viewport_resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
		self.surface_state.configure(width, height, device_pixel_ratio);
		if let Some(surface) = self.surface.as_mut() {
			self.surface_state.apply(surface);
		}
		let (w, h) = self.surface_state.logical_size();
		self.pool
			.spawn_ambient(&mut self.rng, w, h, &self.config.ambient);
		debug!(
			"viewport {}x{} @{} -> backing {}x{}",
			w,
			h,
			self.surface_state.pixel_ratio,
			self.surface_state.backing_width,
			self.surface_state.backing_height
		);
	}

	/// Map a pointer over the card to tilt/parallax/light targets.
	/// `None` means skip the update (degenerate rect).
	///
	/// Also queues a shift of the ambient field, proportional to the pointer's
	/// offset from the viewport centre, for the next step.
	pub fn on_pointer_move(&mut self, client: Point, rect: Rect) -> Option<PointerTargets> {
		let n = map_pointer(client, rect)?;
		self.pointer_state.set(Region::Card, n);

		let (w, h) = self.surface_state.logical_size();
		if let Some(v) = map_pointer(client, Rect::new(0.0, 0.0, w, h)) {
			self.scene_shift = Some(Vec2::new(v.x, v.y) * self.config.ambient.parallax);
		}
		Some(self.pointer.targets_for(n, light_position(client, rect)))
	}

	/// Rest pose; drops any queued ambient shift.
	pub fn on_pointer_leave(&mut self) -> PointerTargets {
		self.pointer_state.reset(Region::Card);
		self.scene_shift = None;
		self.pointer.reset_to_neutral()
	}

	/// Lean and gleam for a pointer over the button.
	pub fn on_button_move(&mut self, client: Point, rect: Rect) -> Option<ButtonTargets> {
		let n = map_pointer(client, rect)?;
		self.pointer_state.set(Region::Button, n);
		Some(self.pointer.button_targets(n, rect))
	}

	/// Button rest pose.
	pub fn on_button_leave(&mut self) -> ButtonTargets {
		self.pointer_state.reset(Region::Button);
		ButtonTargets::NEUTRAL
	}

	/// Spawn a burst at a logical position. Returns the number spawned.
	pub fn on_interaction_trigger(&mut self, x: f64, y: f64) -> usize {
		if !(x.is_finite() && y.is_finite()) {
			return 0;
		}
		self.pool
			.spawn_burst(&mut self.rng, x, y, &self.config.burst)
	}

	/// One fixed step: integrate, cull, draw.
	pub fn tick(&mut self) -> FrameStats {
		self.step(1.0)
	}

	/// One frame at a `requestAnimationFrame` timestamp. The step factor comes
	/// from the frame clock (always 1 unless `time_scaled`).
	pub fn tick_at(&mut self, timestamp_ms: f64) -> FrameStats {
		let delta = self.clock.advance(timestamp_ms);
		self.step(delta)
	}

	/// Integrate by `delta` steps, remove the dead, then render.
	pub fn step(&mut self, delta: f64) -> FrameStats {
		let bounds = self.surface_state.logical_size();
		if let Some(shift) = self.scene_shift.take() {
			self.integrator.shift_ambient(&mut self.pool, shift, bounds);
		}
		self.integrator.step(&mut self.pool, bounds, delta);
		let removed = self.pool.remove_dead();
		let drawn = match self.surface.as_mut() {
			Some(surface) => render::render(surface, &self.pool),
			None => 0,
		};
		self.frames += 1;
		FrameStats {
			live: self.pool.len(),
			removed,
			drawn,
		}
	}

	/// Attach (or replace) the surface and bring it up to the current size.
	pub fn attach_surface(&mut self, mut surface: S) {
		self.surface_state.apply(&mut surface);
		self.surface = Some(surface);
	}

	/// Take the surface out; later ticks still integrate.
	pub fn detach_surface(&mut self) -> Option<S> {
		self.surface.take()
	}

	/// The attached surface, if any.
	pub fn surface(&self) -> Option<&S> {
		self.surface.as_ref()
	}

	/// Current logical and backing sizes.
	pub fn surface_state(&self) -> &SurfaceState {
		&self.surface_state
	}

	/// Every live particle.
	pub fn pool(&self) -> &EntityPool {
		&self.pool
	}

	/// Direct pool access, e.g. to insert hand-made particles.
	pub fn pool_mut(&mut self) -> &mut EntityPool {
		&mut self.pool
	}

	/// Last normalized pointer offset per region.
	pub fn pointer_state(&self) -> &PointerState {
		&self.pointer_state
	}

	/// The configuration the engine was built with.
	pub fn config(&self) -> &FxConfig {
		&self.config
	}

	/// Frames stepped so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}
}
