//! Compositor: clears the surface and paints every live particle as a disc.
//!
//! Painter's order is pool order. Ambient particles sit first in the pool,
//! so sparks land on top of the field.

use kurbo::Point;

use super::particles::EntityPool;
use super::surface::Surface;

/// Draw one frame. Returns the number of discs drawn.
///
/// Opacity is the particle's liveness channel; dead particles are skipped
/// even if `remove_dead` has not run yet.
pub fn render<S: Surface + ?Sized>(surface: &mut S, pool: &EntityPool) -> usize {
	surface.clear();

	let mut drawn = 0;
	for p in pool.particles() {
		if !p.is_alive() || p.radius <= 0.0 {
			continue;
		}
		surface.fill_disc(Point::new(p.x, p.y), p.radius, p.tint, p.life);
		drawn += 1;
	}
	drawn
}

#[cfg(test)]
mod tests {
	use kurbo::Affine;

	use super::*;
	use crate::components::product_card::particles::Particle;
	use crate::components::product_card::theme::Tint;

	/// Records calls instead of drawing.
	#[derive(Default)]
	struct Recorder {
		clears: usize,
		discs: Vec<(Point, f64, f64)>,
	}

	impl Surface for Recorder {
		fn set_backing_size(&mut self, _: u32, _: u32) {}
		fn set_transform(&mut self, _: Affine) {}
		fn clear(&mut self) {
			self.clears += 1;
			self.discs.clear();
		}
		fn fill_disc(&mut self, center: Point, radius: f64, _: Tint, alpha: f64) {
			self.discs.push((center, radius, alpha));
		}
	}

	#[test]
	fn clears_then_draws_live_particles_in_pool_order() {
		let mut pool = EntityPool::new();
		pool.insert(Particle::burst(1.0, 2.0, 0.0, 1.0, 3.0, Tint::default()));
		let mut dead = Particle::burst(5.0, 5.0, 0.0, 1.0, 3.0, Tint::default());
		dead.life = 0.0;
		pool.insert(dead);
		let mut fading = Particle::burst(7.0, 8.0, 0.0, 1.0, 2.0, Tint::default());
		fading.life = 0.25;
		pool.insert(fading);
		pool.insert(Particle::ambient(9.0, 9.0, 0.0, 0.0, 1.5, 0.6, Tint::default()));

		let mut surface = Recorder::default();
		surface.discs.push((Point::ZERO, 99.0, 1.0));
		let drawn = render(&mut surface, &pool);

		assert_eq!(drawn, 3);
		assert_eq!(surface.clears, 1);
		assert_eq!(
			surface.discs,
			vec![
				(Point::new(9.0, 9.0), 1.5, 0.6),
				(Point::new(1.0, 2.0), 3.0, 1.0),
				(Point::new(7.0, 8.0), 2.0, 0.25),
			]
		);
	}
}
