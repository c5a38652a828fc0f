//! Headless RGBA8 raster implementing [`Surface`].
//!
//! Used wherever no browser canvas exists (native builds, tests). Discs are
//! rasterised by pixel-centre coverage and blended source-over, matching what
//! a 2-D canvas context produces closely enough to check geometry.

use kurbo::{Affine, Point};

use super::surface::Surface;
use super::theme::Tint;

/// Straight-alpha RGBA8 pixel buffer.
#[derive(Clone, Debug)]
pub struct PixelSurface {
	width: u32,
	height: u32,
	pixels: Vec<[u8; 4]>,
	transform: Affine,
}

impl Default for PixelSurface {
	fn default() -> Self {
		Self::new()
	}
}

impl PixelSurface {
	/// Zero-sized surface; size it with [`Surface::set_backing_size`].
	pub fn new() -> Self {
		Self {
			width: 0,
			height: 0,
			pixels: Vec::new(),
			transform: Affine::IDENTITY,
		}
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn transform(&self) -> Affine {
		self.transform
	}

	/// RGBA at a device pixel, `None` outside the buffer.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x < self.width && y < self.height {
			Some(self.pixels[(y * self.width + x) as usize])
		} else {
			None
		}
	}

	/// Device coordinates of every pixel with non-zero alpha.
	pub fn painted(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
		let width = self.width.max(1);
		self.pixels
			.iter()
			.enumerate()
			.filter(|(_, px)| px[3] > 0)
			.map(move |(i, _)| (i as u32 % width, i as u32 / width))
	}

	/// Mean of painted pixel centres, `None` on an empty surface.
	pub fn painted_centroid(&self) -> Option<Point> {
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
		for (x, y) in self.painted() {
			sx += x as f64 + 0.5;
			sy += y as f64 + 0.5;
			n += 1;
		}
		(n > 0).then(|| Point::new(sx / n as f64, sy / n as f64))
	}

	fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
		let idx = (y * self.width + x) as usize;
		let dst = self.pixels[idx];
		let sa = src[3] as f64 / 255.0;
		let da = dst[3] as f64 / 255.0;
		let out_a = sa + da * (1.0 - sa);
		if out_a <= 0.0 {
			return;
		}
		let mut out = [0u8; 4];
		for c in 0..3 {
			let v = (src[c] as f64 * sa + dst[c] as f64 * da * (1.0 - sa)) / out_a;
			out[c] = v.round().clamp(0.0, 255.0) as u8;
		}
		out[3] = (out_a * 255.0).round() as u8;
		self.pixels[idx] = out;
	}
}

impl Surface for PixelSurface {
	fn set_backing_size(&mut self, width: u32, height: u32) {
		self.width = width;
		self.height = height;
		self.pixels = vec![[0; 4]; width as usize * height as usize];
	}

	fn set_transform(&mut self, transform: Affine) {
		self.transform = transform;
	}

	fn clear(&mut self) {
		self.pixels.fill([0; 4]);
	}

	fn fill_disc(&mut self, center: Point, radius: f64, tint: Tint, alpha: f64) {
		let color = tint.to_color(alpha);
		let a = (color.a * 255.0).round() as u8;
		if a == 0 || radius.is_nan() || radius <= 0.0 || self.width == 0 || self.height == 0 {
			return;
		}

		let c = self.transform * center;
		let r = radius * self.transform.determinant().abs().sqrt();
		if !(c.x.is_finite() && c.y.is_finite() && r.is_finite()) {
			return;
		}

		let x0 = (c.x - r).floor().max(0.0) as u32;
		let y0 = (c.y - r).floor().max(0.0) as u32;
		let x1 = ((c.x + r).ceil().max(0.0) as u32).min(self.width);
		let y1 = ((c.y + r).ceil().max(0.0) as u32).min(self.height);
		let r2 = r * r;

		for y in y0..y1 {
			let dy = y as f64 + 0.5 - c.y;
			for x in x0..x1 {
				let dx = x as f64 + 0.5 - c.x;
				if dx * dx + dy * dy <= r2 {
					self.blend(x, y, [color.r, color.g, color.b, a]);
				}
			}
		}
	}
}
