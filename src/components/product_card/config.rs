//! Tunable constants for the card effects.
//!
//! Every knob is plain data with a working default, so a config blob only has
//! to name what it overrides:
//!
//! ```json
//! { "max_tilt_deg": 25, "burst": { "count": 34, "speed": [1.5, 4] } }
//! ```
//!
//! Ranges are written as `[min, max]` pairs and sampled uniformly.

use rand::Rng;
use serde::Deserialize;

use super::theme::{Tint, spark_palette};

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// A `[min, max]` range that is reversed or not finite.
	#[error("invalid range for `{field}`: [{min}, {max}]")]
	InvalidRange { field: &'static str, min: f64, max: f64 },

	/// A scalar outside the values it can meaningfully take.
	#[error("`{field}` out of bounds: {value}")]
	OutOfBounds { field: &'static str, value: f64 },

	/// Layer depths must shrink from the nearest layer to the farthest.
	#[error("layer depths must be finite and strictly decreasing: {0:?}")]
	LayerDepths(Vec<f64>),

	/// A burst needs at least one tint to pick from.
	#[error("burst palette is empty")]
	EmptyPalette,

	/// A color string that could not be parsed.
	#[error("invalid color `{0}`")]
	InvalidColor(String),
}

/// Inclusive-exclusive sampling range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "(f64, f64)")]
pub struct Span {
	/// Inclusive lower bound.
	pub min: f64,
	/// Exclusive upper bound, unless equal to `min`.
	pub max: f64,
}

impl Span {
	/// Span from its bounds.
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Uniform sample. A degenerate span always yields `min`.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		if self.min < self.max {
			rng.random_range(self.min..self.max)
		} else {
			self.min
		}
	}

	/// Whether `value` can come out of [`Span::sample`].
	pub fn contains(&self, value: f64) -> bool {
		if self.min < self.max {
			value >= self.min && value < self.max
		} else {
			value == self.min
		}
	}

	fn check(&self, field: &'static str) -> Result<(), ConfigError> {
		if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
			Ok(())
		} else {
			Err(ConfigError::InvalidRange {
				field,
				min: self.min,
				max: self.max,
			})
		}
	}
}

impl From<(f64, f64)> for Span {
	fn from((min, max): (f64, f64)) -> Self {
		Self { min, max }
	}
}

/// What an ambient particle does at the viewport edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
	/// Reflect off the edge and flip that velocity component.
	#[default]
	Bounce,
	/// Re-enter from the opposite edge.
	Wrap,
}

/// How burst velocities are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurstShape {
	/// Random angle and speed; the speed is damped every step.
	#[default]
	Radial,
	/// Each velocity component drawn from `[-speed.max, speed.max)`; undamped.
	Scatter,
}

/// One burst of sparks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
	/// Sparks per trigger.
	pub count: usize,
	/// Initial speed in px per step.
	pub speed: Span,
	/// Disc radius in logical px.
	pub radius: Span,
	/// Tints picked uniformly per spark.
	pub palette: Vec<Tint>,
	pub shape: BurstShape,
}

impl Default for BurstConfig {
	fn default() -> Self {
		Self {
			count: 26,
			speed: Span::new(1.5, 4.0),
			radius: Span::new(2.0, 4.0),
			palette: spark_palette(),
			shape: BurstShape::Radial,
		}
	}
}

/// The drifting background field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
	/// Particles seeded per resize.
	pub count: usize,
	/// Horizontal drift in px per step.
	pub speed_x: Span,
	/// Vertical drift in px per step.
	pub speed_y: Span,
	/// Disc radius in logical px.
	pub radius: Span,
	/// Fixed opacity per particle.
	pub alpha: Span,
	/// HSL hue in degrees.
	pub hue: Span,
	/// HSL saturation in percent.
	pub saturation: f64,
	/// HSL lightness in percent.
	pub lightness: f64,
	pub edge: EdgePolicy,
	/// Shift in px applied to the field for a pointer offset of 1.0 across the
	/// viewport, before per-particle depth weighting. Zero disables it.
	pub parallax: f64,
}

impl Default for AmbientConfig {
	fn default() -> Self {
		Self {
			count: 70,
			speed_x: Span::new(-0.08, 0.08),
			speed_y: Span::new(-0.06, 0.06),
			radius: Span::new(1.1, 2.6),
			alpha: Span::new(0.35, 0.85),
			hue: Span::new(180.0, 310.0),
			saturation: 100.0,
			lightness: 70.0,
			edge: EdgePolicy::Bounce,
			parallax: 18.0,
		}
	}
}

/// Complete effect configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FxConfig {
	/// Tilt at the edge of the card, in degrees, for a pointer offset of 1.0.
	pub max_tilt_deg: f64,
	/// Parallax depth per layer, nearest layer first.
	pub layer_depths: Vec<f64>,
	/// Sparks fired by the call-to-action button.
	pub burst: BurstConfig,
	/// Background field seeded across the viewport.
	pub ambient: AmbientConfig,
	/// Liveness lost per step by burst particles.
	pub decay_rate: f64,
	/// Speed multiplier per step for radial bursts.
	pub damping: f64,
	/// Drop the oldest burst particles beyond this many. `None` = unbounded.
	pub max_burst_particles: Option<usize>,
	/// Upper bound on the device pixel ratio used for the backing store.
	pub max_device_pixel_ratio: Option<f64>,
	/// Scale each step by the real frame interval instead of a fixed 1/60 s.
	pub time_scaled: bool,
	/// How far a button leans toward the pointer, as a fraction of the offset.
	pub magnet_strength: f64,
	/// RNG seed for spawning. The browser build seeds from the clock when unset.
	pub seed: Option<u64>,
}

impl Default for FxConfig {
	fn default() -> Self {
		Self {
			max_tilt_deg: 18.0,
			layer_depths: vec![26.0, 18.0, 12.0, 8.0],
			burst: BurstConfig::default(),
			ambient: AmbientConfig::default(),
			decay_rate: 0.02,
			damping: 0.97,
			max_burst_particles: None,
			max_device_pixel_ratio: None,
			time_scaled: false,
			magnet_strength: 0.15,
			seed: None,
		}
	}
}

impl FxConfig {
	/// Parse a JSON override blob and validate it.
	pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Check every range and scalar; the first problem found is returned.
	pub fn validate(&self) -> Result<(), ConfigError> {
		finite("max_tilt_deg", self.max_tilt_deg)?;
		finite("magnet_strength", self.magnet_strength)?;

		if self.layer_depths.iter().any(|d| !d.is_finite())
			|| self.layer_depths.windows(2).any(|w| w[0] <= w[1])
		{
			return Err(ConfigError::LayerDepths(self.layer_depths.clone()));
		}

		if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
			return Err(ConfigError::OutOfBounds {
				field: "decay_rate",
				value: self.decay_rate,
			});
		}
		if !(self.damping > 0.0 && self.damping <= 1.0) {
			return Err(ConfigError::OutOfBounds {
				field: "damping",
				value: self.damping,
			});
		}
		if let Some(ratio) = self.max_device_pixel_ratio {
			if !(ratio.is_finite() && ratio > 0.0) {
				return Err(ConfigError::OutOfBounds {
					field: "max_device_pixel_ratio",
					value: ratio,
				});
			}
		}

		self.burst.speed.check("burst.speed")?;
		self.burst.radius.check("burst.radius")?;
		positive("burst.radius", self.burst.radius.min)?;
		if self.burst.palette.is_empty() {
			return Err(ConfigError::EmptyPalette);
		}

		let ambient = &self.ambient;
		ambient.speed_x.check("ambient.speed_x")?;
		ambient.speed_y.check("ambient.speed_y")?;
		ambient.radius.check("ambient.radius")?;
		positive("ambient.radius", ambient.radius.min)?;
		ambient.alpha.check("ambient.alpha")?;
		if ambient.alpha.min <= 0.0 || ambient.alpha.max > 1.0 {
			return Err(ConfigError::InvalidRange {
				field: "ambient.alpha",
				min: ambient.alpha.min,
				max: ambient.alpha.max,
			});
		}
		ambient.hue.check("ambient.hue")?;
		finite("ambient.saturation", ambient.saturation)?;
		finite("ambient.lightness", ambient.lightness)?;
		finite("ambient.parallax", ambient.parallax)?;

		Ok(())
	}
}

/// Failure to turn a JSON blob into an [`FxConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
	#[error("malformed config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error(transparent)]
	Invalid(#[from] ConfigError),
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(ConfigError::OutOfBounds { field, value })
	}
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value > 0.0 {
		Ok(())
	} else {
		Err(ConfigError::OutOfBounds { field, value })
	}
}
