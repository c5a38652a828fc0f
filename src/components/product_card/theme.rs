//! Particle colors.
//!
//! A particle carries a [`Tint`]: either an HSL triple (rendered as `hsla()`)
//! or a fixed RGB [`Color`]. Either way the particle's liveness is applied as
//! opacity at draw time, so the tint itself never stores alpha.

use serde::Deserialize;

use super::config::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Converts HSL (hue in degrees, saturation and lightness in percent) to RGB.
	pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
		let h = h.rem_euclid(360.0) / 360.0;
		let s = (s / 100.0).clamp(0.0, 1.0);
		let l = (l / 100.0).clamp(0.0, 1.0);

		if s == 0.0 {
			let v = (l * 255.0).round() as u8;
			return Self::rgb(v, v, v);
		}

		let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		let channel = |t: f64| {
			let t = t.rem_euclid(1.0);
			let v = if t < 1.0 / 6.0 {
				p + (q - p) * 6.0 * t
			} else if t < 0.5 {
				q
			} else if t < 2.0 / 3.0 {
				p + (q - p) * (2.0 / 3.0 - t) * 6.0
			} else {
				p
			};
			(v * 255.0).round() as u8
		};

		Self::rgb(
			channel(h + 1.0 / 3.0),
			channel(h),
			channel(h - 1.0 / 3.0),
		)
	}

	/// Parses `#RRGGBB`, `#RGB`, or `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Self> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let hex: String = match hex.len() {
				3 => hex.chars().flat_map(|c| [c, c]).collect(),
				6 => hex.to_string(),
				_ => return None,
			};
			let value = u32::from_str_radix(&hex, 16).ok()?;
			return Some(Self::rgb(
				((value >> 16) & 0xff) as u8,
				((value >> 8) & 0xff) as u8,
				(value & 0xff) as u8,
			));
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = body.split(',').map(str::trim).collect();
		if !(3..=4).contains(&nums.len()) {
			return None;
		}
		let r = nums[0].parse().ok()?;
		let g = nums[1].parse().ok()?;
		let b = nums[2].parse().ok()?;
		let a = match nums.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(r, g, b, a))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value).ok_or(ConfigError::InvalidColor(value))
	}
}

/// The hue/color of one particle.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Tint {
	/// Hue in degrees, saturation and lightness in percent.
	Hsl { h: f64, s: f64, l: f64 },
	/// Fixed color; its own alpha is multiplied with the particle's liveness.
	Rgb(Color),
}

impl Tint {
	pub const fn hsl(h: f64, s: f64, l: f64) -> Self {
		Tint::Hsl { h, s, l }
	}

	/// Resolve to an RGBA color at the given opacity.
	pub fn to_color(self, alpha: f64) -> Color {
		let alpha = alpha.clamp(0.0, 1.0);
		match self {
			Tint::Hsl { h, s, l } => Color::from_hsl(h, s, l).with_alpha(alpha),
			Tint::Rgb(c) => c.with_alpha(c.a * alpha),
		}
	}

	/// CSS fill style at the given opacity.
	pub fn to_css(self, alpha: f64) -> String {
		let alpha = alpha.clamp(0.0, 1.0);
		match self {
			Tint::Hsl { h, s, l } => format!("hsla({h}, {s}%, {l}%, {alpha})"),
			Tint::Rgb(c) => format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a * alpha),
		}
	}
}

impl Default for Tint {
	fn default() -> Self {
		Tint::Rgb(Color::WHITE)
	}
}

/// Spark hues used by the default burst.
pub fn spark_palette() -> Vec<Tint> {
	vec![
		Tint::hsl(166.0, 90.0, 72.0), // Mint
		Tint::hsl(48.0, 90.0, 72.0),  // Gold
		Tint::hsl(200.0, 90.0, 72.0), // Sky
	]
}

/// Cyan/white alternative palette.
pub fn ice_palette() -> Vec<Tint> {
	vec![
		Tint::Rgb(Color::rgb(0x84, 0xed, 0xff)),
		Tint::Rgb(Color::rgb(0x00, 0xc6, 0xe9)),
		Tint::Rgb(Color::WHITE),
	]
}
