use std::fmt;

use glam::Vec4;

/// Linear RGBA color with float components, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
	pub r: f32,
	pub g: f32,
	pub b: f32,
	pub a: f32,
}

impl Color {
	pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
	pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
	pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

	pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
		Self { r, g, b, a }
	}

	/// From `0xRRGGBBAA`.
	pub fn from_rgba_u32(rgba: u32) -> Self {
		let [r, g, b, a] = rgba.to_be_bytes();
		Self::from_rgba_u8(r, g, b, a)
	}

	pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self::new(
			f32::from(r) / 255.0,
			f32::from(g) / 255.0,
			f32::from(b) / 255.0,
			f32::from(a) / 255.0,
		)
	}

	pub fn to_array(self) -> [f32; 4] {
		[self.r, self.g, self.b, self.a]
	}

	pub fn from_array(components: [f32; 4]) -> Self {
		let [r, g, b, a] = components;
		Self::new(r, g, b, a)
	}
}

impl From<Vec4> for Color {
	fn from(v: Vec4) -> Self {
		Self::from_array(v.to_array())
	}
}

impl From<Color> for Vec4 {
	fn from(c: Color) -> Self {
		Vec4::from_array(c.to_array())
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
	}
}
