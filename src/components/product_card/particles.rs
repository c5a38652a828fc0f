//! Particle records and the pool that owns them.
//!
//! Two kinds share one pool. Bursts are fire-and-forget sparks whose `life`
//! runs down to zero. Ambient particles form the background field: their
//! `life` holds a fixed opacity that never decays, and the whole field is
//! replaced on every reseed.

use std::f64::consts::TAU;

use log::{debug, trace};
use rand::Rng;

use super::config::{AmbientConfig, BurstConfig, BurstShape};
use super::theme::Tint;

/// Liveness at or below this counts as dead. Absorbs the rounding left by
/// repeatedly subtracting the decay rate from 1.0.
pub const DEATH_THRESHOLD: f64 = 1e-9;

/// Kinematic representation chosen at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
	/// Heading in radians and speed per step; the speed is damped.
	Polar { angle: f64, speed: f64 },
	/// Constant velocity per step, except for edge bounces.
	Linear { vx: f64, vy: f64 },
}

impl Motion {
	/// Displacement for one full step.
	pub fn velocity(&self) -> (f64, f64) {
		match *self {
			Motion::Polar { angle, speed } => (angle.cos() * speed, angle.sin() * speed),
			Motion::Linear { vx, vy } => (vx, vy),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
	/// Short-lived spark from an interaction.
	Burst,
	/// Immortal background particle.
	Ambient,
}

/// A single spark or star.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Logical x position.
	pub x: f64,
	/// Logical y position.
	pub y: f64,
	pub motion: Motion,
	/// Disc radius in logical px.
	pub radius: f64,
	pub tint: Tint,
	/// Liveness channel: remaining life for bursts, fixed opacity for ambient.
	pub life: f64,
	pub kind: ParticleKind,
}

impl Particle {
	/// Radial spark at full life.
	pub fn burst(x: f64, y: f64, angle: f64, speed: f64, radius: f64, tint: Tint) -> Self {
		Self {
			x,
			y,
			motion: Motion::Polar { angle, speed },
			radius,
			tint,
			life: 1.0,
			kind: ParticleKind::Burst,
		}
	}

	/// Cartesian spark at full life.
	pub fn scatter(x: f64, y: f64, vx: f64, vy: f64, radius: f64, tint: Tint) -> Self {
		Self {
			motion: Motion::Linear { vx, vy },
			..Self::burst(x, y, 0.0, 0.0, radius, tint)
		}
	}

	/// Background particle with a fixed opacity.
	pub fn ambient(x: f64, y: f64, vx: f64, vy: f64, radius: f64, alpha: f64, tint: Tint) -> Self {
		Self {
			x,
			y,
			motion: Motion::Linear { vx, vy },
			radius,
			tint,
			life: alpha,
			kind: ParticleKind::Ambient,
		}
	}

	pub fn is_alive(&self) -> bool {
		self.life > DEATH_THRESHOLD
	}
}

/// Growable, unordered collection of every live particle.
///
/// Removal compacts in place. Ambient particles sit at the front so they draw
/// underneath the sparks; bursts follow in spawn order, oldest first.
#[derive(Debug, Default)]
pub struct EntityPool {
	particles: Vec<Particle>,
	max_burst: Option<usize>,
}

impl EntityPool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Pool that drops the oldest burst particles beyond `max_burst`.
	pub fn with_burst_cap(max_burst: Option<usize>) -> Self {
		Self {
			particles: Vec::new(),
			max_burst,
		}
	}

	/// Particles in draw order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Number of particles of one kind.
	pub fn count(&self, kind: ParticleKind) -> usize {
		self.particles.iter().filter(|p| p.kind == kind).count()
	}

	/// Insert a prepared particle. Ambient ones go in front of all bursts.
	pub fn insert(&mut self, particle: Particle) {
		match particle.kind {
			ParticleKind::Burst => {
				self.particles.push(particle);
				self.enforce_cap();
			}
			ParticleKind::Ambient => {
				let at = self
					.particles
					.iter()
					.position(|p| p.kind == ParticleKind::Burst)
					.unwrap_or(self.particles.len());
				self.particles.insert(at, particle);
			}
		}
	}

	/// Append `params.count` sparks at one origin. Returns how many were added.
	pub fn spawn_burst<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		x: f64,
		y: f64,
		params: &BurstConfig,
	) -> usize {
		self.particles.reserve(params.count);
		for _ in 0..params.count {
			let radius = params.radius.sample(rng);
			let tint = pick(rng, &params.palette);
			let particle = match params.shape {
				BurstShape::Radial => {
					let angle = rng.random_range(0.0..TAU);
					let speed = params.speed.sample(rng);
					Particle::burst(x, y, angle, speed, radius, tint)
				}
				BurstShape::Scatter => {
					let bound = params.speed.max.abs();
					let (vx, vy) = if bound > 0.0 {
						(
							rng.random_range(-bound..bound),
							rng.random_range(-bound..bound),
						)
					} else {
						(0.0, 0.0)
					};
					Particle::scatter(x, y, vx, vy, radius, tint)
				}
			};
			self.particles.push(particle);
		}
		self.enforce_cap();
		trace!(
			"burst of {} at ({:.1}, {:.1}), pool now {}",
			params.count,
			x,
			y,
			self.particles.len()
		);
		params.count
	}

	/// Replace the ambient field with `params.count` fresh particles spread
	/// over the viewport. Bursts in flight are kept.
	pub fn spawn_ambient<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		width: f64,
		height: f64,
		params: &AmbientConfig,
	) {
		let (width, height) = (width.max(0.0), height.max(0.0));
		let field: Vec<Particle> = (0..params.count)
			.map(|_| {
				let tint = Tint::hsl(params.hue.sample(rng), params.saturation, params.lightness);
				Particle::ambient(
					rng.random::<f64>() * width,
					rng.random::<f64>() * height,
					params.speed_x.sample(rng),
					params.speed_y.sample(rng),
					params.radius.sample(rng),
					params.alpha.sample(rng),
					tint,
				)
			})
			.collect();

		self.particles.retain(|p| p.kind != ParticleKind::Ambient);
		self.particles.splice(0..0, field);
		debug!(
			"ambient field reseeded: {} particles over {}x{}",
			params.count, width, height
		);
	}

	/// Drop every particle whose liveness crossed the death threshold.
	/// Returns the number removed.
	pub fn remove_dead(&mut self) -> usize {
		let before = self.particles.len();
		self.particles.retain(Particle::is_alive);
		before - self.particles.len()
	}

	/// Remove every particle, ambient ones included.
	pub fn clear(&mut self) {
		self.particles.clear();
	}

	fn enforce_cap(&mut self) {
		let Some(cap) = self.max_burst else {
			return;
		};
		let bursts = self.count(ParticleKind::Burst);
		if bursts <= cap {
			return;
		}
		let mut excess = bursts - cap;
		self.particles.retain(|p| {
			if excess > 0 && p.kind == ParticleKind::Burst {
				excess -= 1;
				false
			} else {
				true
			}
		});
	}
}

fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Tint]) -> Tint {
	if palette.is_empty() {
		Tint::default()
	} else {
		palette[rng.random_range(0..palette.len())]
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::product_card::config::Span;

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(0xC0FFEE)
	}

	#[test]
	fn burst_samples_within_ranges() {
		let mut pool = EntityPool::new();
		let params = BurstConfig::default();
		let added = pool.spawn_burst(&mut rng(), 100.0, 100.0, &params);

		assert_eq!(added, 26);
		assert_eq!(pool.len(), 26);
		for p in pool.particles() {
			assert_eq!((p.x, p.y), (100.0, 100.0));
			assert_eq!(p.life, 1.0);
			assert_eq!(p.kind, ParticleKind::Burst);
			assert!(params.radius.contains(p.radius));
			assert!(params.palette.contains(&p.tint));
			let Motion::Polar { angle, speed } = p.motion else {
				panic!("radial burst must be polar");
			};
			assert!((0.0..TAU).contains(&angle));
			assert!(params.speed.contains(speed));
		}
	}

	#[test]
	fn scatter_burst_uses_cartesian_velocity() {
		let mut pool = EntityPool::new();
		let params = BurstConfig {
			shape: BurstShape::Scatter,
			speed: Span::new(0.0, 4.0),
			..BurstConfig::default()
		};
		pool.spawn_burst(&mut rng(), 0.0, 0.0, &params);

		for p in pool.particles() {
			let Motion::Linear { vx, vy } = p.motion else {
				panic!("scatter burst must be linear");
			};
			assert!(vx.abs() <= 4.0 && vy.abs() <= 4.0);
		}
	}

	#[test]
	fn ambient_reseed_replaces_field_and_keeps_bursts() {
		let mut pool = EntityPool::new();
		let mut rng = rng();
		let ambient = AmbientConfig::default();

		pool.spawn_ambient(&mut rng, 800.0, 600.0, &ambient);
		pool.spawn_burst(&mut rng, 10.0, 10.0, &BurstConfig::default());
		pool.spawn_ambient(&mut rng, 400.0, 300.0, &ambient);

		assert_eq!(pool.count(ParticleKind::Ambient), 70);
		assert_eq!(pool.count(ParticleKind::Burst), 26);
		assert!(
			pool.particles()[..70]
				.iter()
				.all(|p| p.kind == ParticleKind::Ambient)
		);
		for p in &pool.particles()[..70] {
			assert!((0.0..=400.0).contains(&p.x));
			assert!((0.0..=300.0).contains(&p.y));
			assert!(ambient.alpha.contains(p.life));
		}
	}

	#[test]
	fn remove_dead_compacts() {
		let mut pool = EntityPool::new();
		for life in [1.0, 0.0, 0.5, -0.1, 1e-12] {
			let mut p = Particle::burst(0.0, 0.0, 0.0, 1.0, 2.0, Tint::default());
			p.life = life;
			pool.insert(p);
		}

		assert_eq!(pool.remove_dead(), 3);
		let lives: Vec<f64> = pool.particles().iter().map(|p| p.life).collect();
		assert_eq!(lives, vec![1.0, 0.5]);
	}

	#[test]
	fn cap_drops_oldest_bursts_first() {
		let mut pool = EntityPool::with_burst_cap(Some(3));
		pool.insert(Particle::ambient(1.0, 1.0, 0.0, 0.0, 1.0, 0.5, Tint::default()));
		for i in 0..5 {
			pool.insert(Particle::burst(i as f64, 0.0, 0.0, 1.0, 2.0, Tint::default()));
		}

		assert_eq!(pool.count(ParticleKind::Ambient), 1);
		let xs: Vec<f64> = pool
			.particles()
			.iter()
			.filter(|p| p.kind == ParticleKind::Burst)
			.map(|p| p.x)
			.collect();
		assert_eq!(xs, vec![2.0, 3.0, 4.0]);

		pool.spawn_burst(&mut rng(), 9.0, 9.0, &BurstConfig::default());
		assert_eq!(pool.count(ParticleKind::Burst), 3);
	}

	#[test]
	fn polar_velocity_conversion() {
		let (vx, vy) = Motion::Polar {
			angle: std::f64::consts::FRAC_PI_2,
			speed: 2.0,
		}
		.velocity();
		assert!(vx.abs() < 1e-12);
		assert!((vy - 2.0).abs() < 1e-12);
	}
}
