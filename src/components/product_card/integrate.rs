//! Per-step particle integration.
//!
//! Stepping is deterministic: all randomness happens at spawn time, so a
//! particle's state after `n` steps depends only on its initial state.
//!
//! Policy per kind:
//! - bursts move, damp their speed when polar, and lose `decay_rate` life;
//! - ambient particles move and are contained by the [`EdgePolicy`], never decaying.

use kurbo::Vec2;

use super::config::{EdgePolicy, FxConfig};
use super::particles::{EntityPool, Motion, Particle, ParticleKind};

/// Step rules for the whole pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
	/// Life lost per step by bursts.
	pub decay_rate: f64,
	/// Speed multiplier per step for polar bursts.
	pub damping: f64,
	/// Ambient containment.
	pub edge: EdgePolicy,
}

impl Default for Integrator {
	fn default() -> Self {
		Self::from_config(&FxConfig::default())
	}
}

impl Integrator {
	/// Integrator with the config's decay, damping and edge policy.
	pub fn from_config(config: &FxConfig) -> Self {
		Self {
			decay_rate: config.decay_rate,
			damping: config.damping,
			edge: config.ambient.edge,
		}
	}

	/// Advance every particle by `delta` steps (1.0 = one frame at 60 Hz).
	///
	/// `bounds` is the logical viewport used to contain ambient particles.
	/// Dead particles stay in the pool until [`EntityPool::remove_dead`].
	pub fn step(&self, pool: &mut EntityPool, bounds: (f64, f64), delta: f64) {
		let delta = if delta.is_finite() { delta.max(0.0) } else { 1.0 };
		for p in pool.particles_mut() {
			self.advance(p, bounds, delta);
		}
	}

	/// Displace the ambient field after a pointer move over the scene.
	///
	/// The `i`-th of `n` ambient particles moves by `offset * ambient_depth(i, n)`
	/// and is then contained like a regular step. Bursts are untouched.
	pub fn shift_ambient(&self, pool: &mut EntityPool, offset: Vec2, (width, height): (f64, f64)) {
		let count = pool.count(ParticleKind::Ambient);
		if count == 0 || !(offset.x.is_finite() && offset.y.is_finite()) {
			return;
		}
		let ambient = pool
			.particles_mut()
			.iter_mut()
			.filter(|p| p.kind == ParticleKind::Ambient);
		for (i, p) in ambient.enumerate() {
			let depth = ambient_depth(i, count);
			p.x += offset.x * depth;
			p.y += offset.y * depth;
			if let Motion::Linear { vx, vy } = &mut p.motion {
				contain(&mut p.x, vx, width, self.edge);
				contain(&mut p.y, vy, height, self.edge);
			}
		}
	}

	fn advance(&self, p: &mut Particle, (width, height): (f64, f64), delta: f64) {
		let (vx, vy) = p.motion.velocity();
		p.x += vx * delta;
		p.y += vy * delta;

		match p.kind {
			ParticleKind::Burst => {
				if let Motion::Polar { speed, .. } = &mut p.motion {
					*speed *= self.damping.powf(delta);
				}
				p.life = (p.life - self.decay_rate * delta).max(0.0);
			}
			ParticleKind::Ambient => {
				if let Motion::Linear { vx, vy } = &mut p.motion {
					contain(&mut p.x, vx, width, self.edge);
					contain(&mut p.y, vy, height, self.edge);
				}
			}
		}
	}
}

/// Parallax weight of the `index`-th of `count` ambient particles, in `[0.4, 1.0)`.
pub fn ambient_depth(index: usize, count: usize) -> f64 {
	index as f64 / count.max(1) as f64 * 0.6 + 0.4
}

/// Keep one coordinate inside `[0, extent]`. A non-positive extent means the
/// surface is not sized yet, and the coordinate is left alone.
fn contain(pos: &mut f64, vel: &mut f64, extent: f64, edge: EdgePolicy) {
	if extent.is_nan() || extent <= 0.0 {
		return;
	}
	match edge {
		EdgePolicy::Bounce => {
			if *pos < 0.0 {
				*pos = -*pos;
				*vel = vel.abs();
			} else if *pos > extent {
				*pos = 2.0 * extent - *pos;
				*vel = -vel.abs();
			}
			// Overshoot larger than the extent itself.
			*pos = pos.clamp(0.0, extent);
		}
		EdgePolicy::Wrap => {
			*pos = pos.rem_euclid(extent);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::product_card::theme::Tint;

	const BOUNDS: (f64, f64) = (300.0, 200.0);

	fn spark(angle: f64, speed: f64) -> Particle {
		Particle::burst(100.0, 100.0, angle, speed, 3.0, Tint::default())
	}

	#[test]
	fn burst_life_decays_linearly() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(spark(0.3, 2.0));

		for n in 1..=49 {
			integrator.step(&mut pool, BOUNDS, 1.0);
			assert_eq!(pool.remove_dead(), 0, "died early at step {n}");
			let expected = (1.0 - 0.02 * n as f64).max(0.0);
			assert!((pool.particles()[0].life - expected).abs() < 1e-9);
		}

		integrator.step(&mut pool, BOUNDS, 1.0);
		assert_eq!(pool.remove_dead(), 1);
		assert!(pool.is_empty());
	}

	#[test]
	fn polar_speed_is_damped_and_moves_along_heading() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(spark(0.0, 4.0));

		integrator.step(&mut pool, BOUNDS, 1.0);
		let p = &pool.particles()[0];
		assert!((p.x - 104.0).abs() < 1e-12);
		assert!((p.y - 100.0).abs() < 1e-12);
		assert_eq!(
			p.motion,
			Motion::Polar {
				angle: 0.0,
				speed: 4.0 * 0.97
			}
		);

		integrator.step(&mut pool, BOUNDS, 1.0);
		assert!((pool.particles()[0].x - (104.0 + 4.0 * 0.97)).abs() < 1e-12);
	}

	#[test]
	fn scatter_sparks_keep_their_velocity() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(Particle::scatter(0.0, 0.0, 1.5, -2.0, 2.4, Tint::default()));

		for _ in 0..10 {
			integrator.step(&mut pool, BOUNDS, 1.0);
		}
		let p = &pool.particles()[0];
		assert!((p.x - 15.0).abs() < 1e-9);
		assert!((p.y + 20.0).abs() < 1e-9);
		assert!((p.life - 0.8).abs() < 1e-9);
	}

	#[test]
	fn ambient_particles_never_die() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(Particle::ambient(10.0, 10.0, 0.08, -0.06, 1.5, 0.4, Tint::default()));

		for _ in 0..10_000 {
			integrator.step(&mut pool, BOUNDS, 1.0);
			pool.remove_dead();
		}
		assert_eq!(pool.len(), 1);
		assert_eq!(pool.particles()[0].life, 0.4);
	}

	#[test]
	fn bounce_keeps_ambient_inside_and_flips_velocity() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(Particle::ambient(299.0, 1.0, 3.0, -2.5, 1.5, 0.5, Tint::default()));

		integrator.step(&mut pool, BOUNDS, 1.0);
		let p = &pool.particles()[0];
		assert!((p.x - 298.0).abs() < 1e-12);
		assert!((p.y - 1.5).abs() < 1e-12);
		assert_eq!(p.motion, Motion::Linear { vx: -3.0, vy: 2.5 });

		for _ in 0..5_000 {
			integrator.step(&mut pool, BOUNDS, 1.0);
			let p = &pool.particles()[0];
			assert!((0.0..=BOUNDS.0).contains(&p.x));
			assert!((0.0..=BOUNDS.1).contains(&p.y));
		}
	}

	#[test]
	fn wrap_reenters_from_opposite_edge() {
		let integrator = Integrator {
			edge: EdgePolicy::Wrap,
			..Integrator::default()
		};
		let mut pool = EntityPool::new();
		pool.insert(Particle::ambient(299.0, 0.5, 3.0, -1.0, 1.5, 0.5, Tint::default()));

		integrator.step(&mut pool, BOUNDS, 1.0);
		let p = &pool.particles()[0];
		assert!((p.x - 2.0).abs() < 1e-9);
		assert!((p.y - 199.5).abs() < 1e-9);
		assert_eq!(p.motion, Motion::Linear { vx: 3.0, vy: -1.0 });

		for _ in 0..5_000 {
			integrator.step(&mut pool, BOUNDS, 1.0);
			let p = &pool.particles()[0];
			assert!((0.0..=BOUNDS.0).contains(&p.x));
			assert!((0.0..=BOUNDS.1).contains(&p.y));
		}
	}

	#[test]
	fn pointer_shift_weights_ambient_by_depth() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(spark(0.0, 2.0));
		for _ in 0..3 {
			pool.insert(Particle::ambient(150.0, 100.0, 0.0, 0.0, 1.5, 0.5, Tint::default()));
		}

		integrator.shift_ambient(&mut pool, Vec2::new(9.0, -6.0), BOUNDS);

		let shifts: Vec<f64> = pool
			.particles()
			.iter()
			.filter(|p| p.kind == ParticleKind::Ambient)
			.map(|p| p.x - 150.0)
			.collect();
		assert_eq!(shifts.len(), 3);
		for (i, dx) in shifts.iter().enumerate() {
			assert!((dx - 9.0 * ambient_depth(i, 3)).abs() < 1e-12);
		}
		assert!(shifts.windows(2).all(|w| w[0] < w[1]));
		assert!((pool.particles()[0].y - (100.0 - 6.0 * 0.4)).abs() < 1e-12);

		let spark = pool
			.particles()
			.iter()
			.find(|p| p.kind == ParticleKind::Burst)
			.unwrap();
		assert_eq!((spark.x, spark.y), (100.0, 100.0));
	}

	#[test]
	fn pointer_shift_stays_inside_viewport() {
		for edge in [EdgePolicy::Bounce, EdgePolicy::Wrap] {
			let integrator = Integrator {
				edge,
				..Integrator::default()
			};
			let mut pool = EntityPool::new();
			for i in 0..10 {
				let x = i as f64 * 30.0;
				pool.insert(Particle::ambient(x, 5.0, 0.1, 0.1, 1.5, 0.5, Tint::default()));
			}
			for _ in 0..200 {
				integrator.shift_ambient(&mut pool, Vec2::new(9.0, -9.0), BOUNDS);
				for p in pool.particles() {
					assert!((0.0..=BOUNDS.0).contains(&p.x), "{edge:?} x {}", p.x);
					assert!((0.0..=BOUNDS.1).contains(&p.y), "{edge:?} y {}", p.y);
				}
			}
		}
	}

	#[test]
	fn fractional_delta_scales_motion_and_decay() {
		let integrator = Integrator::default();
		let mut pool = EntityPool::new();
		pool.insert(Particle::scatter(0.0, 0.0, 2.0, 0.0, 2.0, Tint::default()));

		integrator.step(&mut pool, BOUNDS, 0.5);
		let p = &pool.particles()[0];
		assert!((p.x - 1.0).abs() < 1e-12);
		assert!((p.life - 0.99).abs() < 1e-12);
	}
}
