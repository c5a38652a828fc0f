//! Value types exchanged between the pointer mapper, the engine and the DOM glue.

use kurbo::{Point, Vec2};

/// Pointer position relative to a reference rect, centred on zero.
///
/// Inside the rect both axes fall in `[-0.5, 0.5]`; outside they extrapolate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Normalized {
	/// Horizontal offset, positive to the right.
	pub x: f64,
	/// Vertical offset, positive downward.
	pub y: f64,
}

impl Normalized {
	/// The rect centre.
	pub const ZERO: Normalized = Normalized { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Card rotation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
	/// Rotation about the horizontal axis.
	pub rotate_x: f64,
	/// Rotation about the vertical axis.
	pub rotate_y: f64,
}

impl Tilt {
	/// CSS `transform` value.
	pub fn to_css(self) -> String {
		format!(
			"rotateX({}deg) rotateY({}deg)",
			self.rotate_x, self.rotate_y
		)
	}
}

/// Everything a pointer move over the card produces.
///
/// Consumers ease towards these values; nothing here is animated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerTargets {
	/// Card rotation.
	pub tilt: Tilt,
	/// Translation per parallax layer, nearest layer first.
	pub layers: Vec<Vec2>,
	/// Pointer position inside the reference rect, in pixels. `None` at rest.
	pub light: Option<Point>,
	/// Shine highlight centre in percent of the rect (50, 50 = centre).
	pub shine: Point,
}

impl PointerTargets {
	/// Rest pose for `layer_count` layers.
	pub fn neutral(layer_count: usize) -> Self {
		Self {
			tilt: Tilt::default(),
			layers: vec![Vec2::ZERO; layer_count],
			light: None,
			shine: Point::new(50.0, 50.0),
		}
	}

	pub fn is_neutral(&self) -> bool {
		self.tilt == Tilt::default()
			&& self.layers.iter().all(|l| *l == Vec2::ZERO)
			&& self.light.is_none()
	}
}

/// Button lean and gleam for a pointer over the button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonTargets {
	/// Translation toward the pointer.
	pub lean: Vec2,
	/// Gleam centre in percent of the button (50, 50 = centre).
	pub gleam: Point,
}

impl ButtonTargets {
	/// Button at rest.
	pub const NEUTRAL: ButtonTargets = ButtonTargets {
		lean: Vec2::ZERO,
		gleam: Point::new(50.0, 50.0),
	};
}

/// Regions that track their own pointer offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
	/// The card scene; drives tilt, parallax and light.
	Card,
	/// The call-to-action button; drives the magnet lean.
	Button,
}

/// Last normalized offset per tracked region.
///
/// Derived from the latest pointer event; a leave resets the region to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	card: Normalized,
	button: Normalized,
}

impl PointerState {
	pub fn get(&self, region: Region) -> Normalized {
		match region {
			Region::Card => self.card,
			Region::Button => self.button,
		}
	}

	pub fn set(&mut self, region: Region, offset: Normalized) {
		match region {
			Region::Card => self.card = offset,
			Region::Button => self.button = offset,
		}
	}

	pub fn reset(&mut self, region: Region) {
		self.set(region, Normalized::ZERO);
	}
}
