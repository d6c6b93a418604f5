use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::math::Color;
use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker};

use super::{AngleValue, ComponentValue, MaskValue, PropertyValue};

macro_rules! impl_scalar_value {
	($t:ty, $name:literal, $initial:expr, $read:ident, $read_list:ident) => {
		impl PropertyValue for $t {
			const TYPE_NAME: &'static str = $name;
			const NUM_COMPONENTS: usize = 1;

			fn initial() -> Self {
				$initial
			}

			fn read(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
				tracker.$read()
			}

			fn read_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
				tracker.$read_list()
			}

			fn to_attribute(&self) -> String {
				self.to_string()
			}
		}
	};
}

impl_scalar_value!(bool, "Bool", false, attribute_bool, attribute_bools);
impl_scalar_value!(i32, "SInt32", 0, attribute_i32, attribute_i32s);
impl_scalar_value!(u32, "UInt32", 0, attribute_u32, attribute_u32s);
impl_scalar_value!(f32, "Real", 0.0, attribute_f32, attribute_f32s);
impl_scalar_value!(f64, "Double", 0.0, attribute_f64, attribute_f64s);
impl_scalar_value!(Color, "Color", Color::WHITE, attribute_color, attribute_colors);

impl PropertyValue for String {
	const TYPE_NAME: &'static str = "String";
	const NUM_COMPONENTS: usize = 1;

	fn initial() -> Self {
		String::new()
	}

	fn read(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
		tracker.attribute_string(true)
	}

	fn read_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
		tracker.attribute_strings()
	}

	fn to_attribute(&self) -> String {
		self.clone()
	}
}

impl AngleValue for f32 {
	fn read_angle(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
		tracker.attribute_angle_f32()
	}

	fn read_angle_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
		tracker.attribute_angles_f32()
	}
}

impl AngleValue for f64 {
	fn read_angle(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
		tracker.attribute_angle_f64()
	}

	fn read_angle_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
		tracker.attribute_angles_f64()
	}
}

impl MaskValue for u32 {
	fn to_bits(self) -> u32 {
		self
	}

	fn from_bits(bits: u32) -> Self {
		bits
	}
}

impl MaskValue for i32 {
	fn to_bits(self) -> u32 {
		self as u32
	}

	fn from_bits(bits: u32) -> Self {
		bits as i32
	}
}

/// Exactly `N` comma separated floats.
fn read_components<const N: usize>(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<[f32; N]> {
	let values = tracker.attribute_f32s()?;
	<[f32; N]>::try_from(values.as_slice()).map_err(|_| {
		AttributeError::WrongComponentCount {
			expected: N,
			got: values.len(),
		}
		.in_attribute(tracker.attribute_name())
	})
}

/// A flat float list holding `N` components per value.
fn read_component_list<const N: usize>(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<[f32; N]>> {
	let values = tracker.attribute_f32s()?;
	if values.len() % N != 0 {
		return Err(AttributeError::WrongComponentCount {
			expected: N,
			got: values.len(),
		}
		.in_attribute(tracker.attribute_name()));
	}
	Ok(values
		.chunks_exact(N)
		.map(|chunk| {
			let mut components = [0.0; N];
			components.copy_from_slice(chunk);
			components
		})
		.collect())
}

fn join_components(components: &[f32]) -> String {
	components.iter().map(f32::to_string).collect::<Vec<_>>().join(",")
}

macro_rules! impl_vector_value {
	($t:ty, $name:literal, $n:literal) => {
		impl PropertyValue for $t {
			const TYPE_NAME: &'static str = $name;
			const NUM_COMPONENTS: usize = $n;

			fn initial() -> Self {
				<$t>::ZERO
			}

			fn read(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
				read_components::<$n>(tracker).map(<$t>::from_array)
			}

			fn read_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
				read_component_list::<$n>(tracker).map(|list| list.into_iter().map(<$t>::from_array).collect())
			}

			fn to_attribute(&self) -> String {
				join_components(&self.to_array())
			}
		}

		impl ComponentValue for $t {
			fn set_component(&mut self, index: usize, component: f32) -> AttributeResult<()> {
				if index >= $n {
					return Err(AttributeError::IndexOutOfRange { index, limit: $n });
				}
				self[index] = component;
				Ok(())
			}
		}
	};
}

impl_vector_value!(Vec2, "Vector2", 2);
impl_vector_value!(Vec3, "Vector3", 3);
impl_vector_value!(Vec4, "Vector", 4);

/// Matrices are written row by row.
impl PropertyValue for Mat4 {
	const TYPE_NAME: &'static str = "Matrix";
	const NUM_COMPONENTS: usize = 16;

	fn initial() -> Self {
		Mat4::IDENTITY
	}

	fn read(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self> {
		read_components::<16>(tracker).map(|rows| Mat4::from_cols_array(&rows).transpose())
	}

	fn read_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>> {
		read_component_list::<16>(tracker)
			.map(|list| list.iter().map(|rows| Mat4::from_cols_array(rows).transpose()).collect())
	}

	fn to_attribute(&self) -> String {
		join_components(&self.transpose().to_cols_array())
	}
}

impl ComponentValue for Color {
	fn set_component(&mut self, index: usize, component: f32) -> AttributeResult<()> {
		let channel = match index {
			0 => &mut self.r,
			1 => &mut self.g,
			2 => &mut self.b,
			3 => &mut self.a,
			_ => return Err(AttributeError::IndexOutOfRange { index, limit: 4 }),
		};
		*channel = component;
		Ok(())
	}
}
