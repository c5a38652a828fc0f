//! Pointer-to-transform mapping.
//!
//! Raw client coordinates are normalised against a reference rect, then turned
//! into card tilt, per-layer parallax offsets and a light/shine position.
//! Nothing here animates; the DOM side eases towards the returned targets.

use kurbo::{Point, Rect, Vec2};

use super::config::FxConfig;
use super::types::{ButtonTargets, Normalized, PointerTargets, Tilt};

/// Pointer offset from the centre of `rect`, in units of its size.
///
/// `None` for a degenerate rect, so callers skip the update instead of
/// propagating NaN or infinite transforms.
pub fn map_pointer(client: Point, rect: Rect) -> Option<Normalized> {
	let (width, height) = (rect.width(), rect.height());
	if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
		return None;
	}
	let n = Normalized::new(
		(client.x - rect.x0) / width - 0.5,
		(client.y - rect.y0) / height - 0.5,
	);
	(n.x.is_finite() && n.y.is_finite()).then_some(n)
}

/// Moving the pointer up tilts the top edge away: `rotate_x = -ny * max`.
pub fn tilt_from_normalized(nx: f64, ny: f64, max_degrees: f64) -> Tilt {
	Tilt {
		rotate_x: -ny * max_degrees,
		rotate_y: nx * max_degrees,
	}
}

/// Translation of one layer at `depth`.
pub fn parallax_offset(nx: f64, ny: f64, depth: f64) -> Vec2 {
	Vec2::new(nx * depth, ny * depth)
}

/// One offset per depth, in the order given (nearest layer first).
pub fn parallax_layers(n: Normalized, depths: &[f64]) -> Vec<Vec2> {
	depths
		.iter()
		.map(|&depth| parallax_offset(n.x, n.y, depth))
		.collect()
}

/// Pointer position inside the rect, in pixels from its top-left corner.
pub fn light_position(client: Point, rect: Rect) -> Point {
	Point::new(client.x - rect.x0, client.y - rect.y0)
}

/// Shine highlight centre in percent of the rect.
pub fn shine_center(n: Normalized) -> Point {
	Point::new(n.x * 100.0 + 50.0, n.y * 100.0 + 50.0)
}

/// Offset from the rect centre, scaled by `strength`, for a button that leans
/// toward the pointer.
pub fn magnetic_offset(client: Point, rect: Rect, strength: f64) -> Option<Vec2> {
	map_pointer(client, rect).map(|n| magnet_from_normalized(n, rect, strength))
}

/// [`magnetic_offset`] for an already normalized pointer.
pub fn magnet_from_normalized(n: Normalized, rect: Rect, strength: f64) -> Vec2 {
	Vec2::new(n.x * rect.width(), n.y * rect.height()) * strength
}

/// Pointer mapping with the card's tuning baked in.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerMapper {
	/// Degrees of tilt per unit of normalized offset.
	pub max_tilt_deg: f64,
	/// Parallax depth per layer, nearest first.
	pub layer_depths: Vec<f64>,
	/// Button lean as a fraction of the pointer offset.
	pub magnet_strength: f64,
}

impl Default for PointerMapper {
	fn default() -> Self {
		Self::from_config(&FxConfig::default())
	}
}

impl PointerMapper {
	pub fn from_config(config: &FxConfig) -> Self {
		Self {
			max_tilt_deg: config.max_tilt_deg,
			layer_depths: config.layer_depths.clone(),
			magnet_strength: config.magnet_strength,
		}
	}

	/// Targets for a pointer over the card, or `None` to skip the update.
	pub fn targets(&self, client: Point, rect: Rect) -> Option<PointerTargets> {
		let n = map_pointer(client, rect)?;
		Some(self.targets_for(n, light_position(client, rect)))
	}

	pub fn targets_for(&self, n: Normalized, light: Point) -> PointerTargets {
		PointerTargets {
			tilt: tilt_from_normalized(n.x, n.y, self.max_tilt_deg),
			layers: parallax_layers(n, &self.layer_depths),
			light: Some(light),
			shine: shine_center(n),
		}
	}

	/// The rest pose eased back to on pointer-leave.
	pub fn reset_to_neutral(&self) -> PointerTargets {
		PointerTargets::neutral(self.layer_depths.len())
	}

	/// Button lean for a pointer, or `None` for a degenerate rect.
	pub fn magnet(&self, client: Point, rect: Rect) -> Option<Vec2> {
		magnetic_offset(client, rect, self.magnet_strength)
	}

	/// Lean and gleam for a pointer already normalized against `rect`.
	pub fn button_targets(&self, n: Normalized, rect: Rect) -> ButtonTargets {
		ButtonTargets {
			lean: magnet_from_normalized(n, rect, self.magnet_strength),
			gleam: shine_center(n),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn card() -> Rect {
		Rect::new(100.0, 50.0, 500.0, 350.0)
	}

	#[test]
	fn centre_maps_to_zero_and_corner_to_minus_half() {
		assert_eq!(
			map_pointer(Point::new(300.0, 200.0), card()),
			Some(Normalized::ZERO)
		);
		assert_eq!(
			map_pointer(Point::new(100.0, 50.0), card()),
			Some(Normalized::new(-0.5, -0.5))
		);
		assert_eq!(
			map_pointer(Point::new(500.0, 350.0), card()),
			Some(Normalized::new(0.5, 0.5))
		);
	}

	#[test]
	fn outside_the_rect_extrapolates() {
		let n = map_pointer(Point::new(900.0, 50.0), card()).unwrap();
		assert_eq!(n, Normalized::new(1.5, -0.5));
	}

	#[test]
	fn degenerate_rect_is_skipped() {
		let flat = Rect::new(10.0, 10.0, 10.0, 40.0);
		assert_eq!(map_pointer(Point::new(10.0, 20.0), flat), None);
		assert_eq!(magnetic_offset(Point::new(10.0, 20.0), flat, 0.15), None);
		assert_eq!(PointerMapper::default().targets(Point::new(10.0, 20.0), flat), None);
		let nan = Rect::new(0.0, 0.0, f64::NAN, 10.0);
		assert_eq!(map_pointer(Point::ZERO, nan), None);
	}

	#[test]
	fn tilt_sign_convention() {
		assert_eq!(
			tilt_from_normalized(0.0, -0.5, 20.0),
			Tilt {
				rotate_x: 10.0,
				rotate_y: 0.0
			}
		);
		assert_eq!(
			tilt_from_normalized(0.5, 0.0, 20.0),
			Tilt {
				rotate_x: -0.0,
				rotate_y: 10.0
			}
		);
	}

	#[test]
	fn nearest_layer_moves_most() {
		let layers = parallax_layers(Normalized::new(0.5, -0.25), &[26.0, 18.0, 12.0, 8.0]);
		assert_eq!(layers.len(), 4);
		assert_eq!(layers[0], Vec2::new(13.0, -6.5));
		assert_eq!(layers[3], Vec2::new(4.0, -2.0));
		assert!(layers.windows(2).all(|w| w[0].length() > w[1].length()));
	}

	#[test]
	fn targets_and_neutral() {
		let mapper = PointerMapper::default();
		let targets = mapper.targets(Point::new(200.0, 125.0), card()).unwrap();
		assert_eq!(
			targets.tilt,
			tilt_from_normalized(-0.25, -0.25, mapper.max_tilt_deg)
		);
		assert_eq!(targets.light, Some(Point::new(100.0, 75.0)));
		assert_eq!(targets.shine, Point::new(25.0, 25.0));
		assert!(!targets.is_neutral());

		let rest = mapper.reset_to_neutral();
		assert!(rest.is_neutral());
		assert_eq!(rest.layers.len(), 4);
		assert_eq!(rest.shine, Point::new(50.0, 50.0));
	}

	#[test]
	fn button_leans_toward_pointer() {
		let button = Rect::new(0.0, 0.0, 120.0, 40.0);
		let offset = magnetic_offset(Point::new(100.0, 30.0), button, 0.15).unwrap();
		assert!((offset.x - 6.0).abs() < 1e-12);
		assert!((offset.y - 1.5).abs() < 1e-12);
	}

	#[test]
	fn button_gleam_follows_pointer_in_percent() {
		let button = Rect::new(20.0, 10.0, 120.0, 50.0);
		let n = map_pointer(Point::new(95.0, 20.0), button).unwrap();
		let targets = PointerMapper::default().button_targets(n, button);
		assert!((targets.gleam.x - 75.0).abs() < 1e-9);
		assert!((targets.gleam.y - 25.0).abs() < 1e-9);
		assert!((targets.lean.x - 25.0 * 0.15).abs() < 1e-9);
		assert!((targets.lean.y + 10.0 * 0.15).abs() < 1e-9);
	}
}
