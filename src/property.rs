//! Typed attribute properties.
//!
//! A property stores a value (or a fixed field or bounded array of values) together with its
//! default. Every `deserialize_*` method reads the tracker's current attribute and is a successful
//! no-op when the attribute has no value, so defaults survive partially specified resources.

pub mod array;
pub mod enums;
pub mod field;
pub mod holder;
pub mod mask;
pub mod single;
pub mod value;

use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::math::Color;
use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker};

pub use array::ArrayProperty;
pub use enums::PropertyEnum;
pub use field::FieldProperty;
pub use holder::{deserialize_attributes, PropertyHolder};
pub use mask::{MaskOperation, MaskProperty};
pub use single::Property;

/// A type that can be stored in a property and read from attribute text.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + 'static {
	const TYPE_NAME: &'static str;
	/// Number of scalar components in one value, e.g. 4 for a vector.
	const NUM_COMPONENTS: usize;

	/// Value of new elements when nothing else is given.
	fn initial() -> Self;

	fn read(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self>;

	fn read_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>>;

	/// Text that reads back as this value.
	fn to_attribute(&self) -> String;
}

/// Values that may be given with a `deg`/`rad` unit and are stored in radians.
pub trait AngleValue: PropertyValue {
	fn read_angle(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Self>;

	fn read_angle_list(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<Self>>;
}

/// Integer values usable as a 32 bit mask.
pub trait MaskValue: PropertyValue + Copy {
	fn to_bits(self) -> u32;

	fn from_bits(bits: u32) -> Self;
}

/// Values made of float components that can be set one at a time.
pub trait ComponentValue: PropertyValue {
	fn set_component(&mut self, index: usize, component: f32) -> AttributeResult<()>;
}

/// How the value of a property is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertySemantic {
	Value,
	Mask,
	Angle,
	Id,
	Object,
}

impl PropertySemantic {
	pub const VALUES: [PropertySemantic; 5] = [
		PropertySemantic::Value,
		PropertySemantic::Mask,
		PropertySemantic::Angle,
		PropertySemantic::Id,
		PropertySemantic::Object,
	];

	pub fn name(self) -> &'static str {
		match self {
			PropertySemantic::Value => "VALUE",
			PropertySemantic::Mask => "MASK",
			PropertySemantic::Angle => "ANGLE",
			PropertySemantic::Id => "ID",
			PropertySemantic::Object => "OBJECT",
		}
	}
}

impl fmt::Display for PropertySemantic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Introspection data of a property, for editing tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
	pub type_name: &'static str,
	pub semantic: PropertySemantic,
	pub num_components: usize,
	pub min_elements: usize,
	pub max_elements: usize,
	/// Default value as attribute text.
	pub default_value: String,
}

impl fmt::Display for PropertyInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} ({}, {} components, [{}, {}] elements, default {:?})",
			self.type_name, self.semantic, self.num_components, self.min_elements, self.max_elements, self.default_value
		)
	}
}

/// Object safe view of any property, used by attribute tables.
pub trait TypedProperty {
	fn info(&self) -> PropertyInfo;

	/// Restore the default value.
	fn reset(&mut self);

	/// Read the tracker's current attribute into the property.
	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()>;

	/// Current value as attribute text.
	fn value_string(&self) -> String;
}

/// Reading functions of a property, chosen by its semantic.
pub struct Codec<T> {
	semantic: PropertySemantic,
	read: fn(&dyn DeserializeAttributeTracker) -> AttributeResult<T>,
	read_list: fn(&dyn DeserializeAttributeTracker) -> AttributeResult<Vec<T>>,
}

impl<T> Clone for Codec<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Codec<T> {}

impl<T> fmt::Debug for Codec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Codec").field(&self.semantic).finish()
	}
}

impl<T: PropertyValue> Codec<T> {
	pub fn value() -> Self {
		Self {
			semantic: PropertySemantic::Value,
			read: T::read,
			read_list: T::read_list,
		}
	}

	/// Read as plain values, but report `semantic` for introspection.
	pub fn tagged(semantic: PropertySemantic) -> Self {
		Self {
			semantic,
			..Self::value()
		}
	}

	pub fn semantic(&self) -> PropertySemantic {
		self.semantic
	}

	pub fn read(&self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<T> {
		(self.read)(tracker)
	}

	pub fn read_list(&self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<T>> {
		(self.read_list)(tracker)
	}
}

impl<T: AngleValue> Codec<T> {
	pub fn angle() -> Self {
		Self {
			semantic: PropertySemantic::Angle,
			read: T::read_angle,
			read_list: T::read_angle_list,
		}
	}
}

/// Slot index of a positional attribute, `None` for a plain one.
///
/// `node2` selected with prefix `node` gives `Some(2)`.
pub(crate) fn positional_index(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Option<usize>> {
	let base = tracker.base_attribute_name();
	if base == tracker.attribute_name() {
		return Ok(None);
	}
	base.parse::<usize>()
		.map(Some)
		.map_err(|_| AttributeError::NotAnIndex(base.to_owned()).in_attribute(tracker.attribute_name()))
}

pub(crate) fn join_values<'a, T: PropertyValue>(values: impl IntoIterator<Item = &'a T>) -> String {
	values.into_iter().map(T::to_attribute).collect::<Vec<_>>().join(",")
}

pub type BoolProperty = Property<bool>;
pub type SInt32Property = Property<i32>;
pub type UInt32Property = Property<u32>;
pub type RealProperty = Property<f32>;
pub type DoubleProperty = Property<f64>;
/// Constructed with [`Property::angle`].
pub type RealAngleProperty = Property<f32>;
/// Constructed with [`Property::angle`].
pub type DoubleAngleProperty = Property<f64>;
pub type Vector2Property = Property<Vec2>;
pub type Vector3Property = Property<Vec3>;
pub type VectorProperty = Property<Vec4>;
pub type MatrixProperty = Property<Mat4>;
pub type ColorProperty = Property<Color>;
pub type StringProperty = Property<String>;
/// Constructed with [`Property::id`].
pub type IdProperty = Property<String>;
pub type EnumProperty<E> = Property<E>;

pub type UInt32MaskProperty = MaskProperty<u32>;
pub type SInt32MaskProperty = MaskProperty<i32>;

pub type BoolFieldProperty<const N: usize> = FieldProperty<bool, N>;
pub type SInt32FieldProperty<const N: usize> = FieldProperty<i32, N>;
pub type UInt32FieldProperty<const N: usize> = FieldProperty<u32, N>;
pub type RealFieldProperty<const N: usize> = FieldProperty<f32, N>;
pub type DoubleFieldProperty<const N: usize> = FieldProperty<f64, N>;
pub type VectorFieldProperty<const N: usize> = FieldProperty<Vec4, N>;
pub type MatrixFieldProperty<const N: usize> = FieldProperty<Mat4, N>;
pub type ColorFieldProperty<const N: usize> = FieldProperty<Color, N>;
pub type StringFieldProperty<const N: usize> = FieldProperty<String, N>;
pub type EnumFieldProperty<E, const N: usize> = FieldProperty<E, N>;

pub type BoolArrayProperty = ArrayProperty<bool>;
pub type SInt32ArrayProperty = ArrayProperty<i32>;
pub type UInt32ArrayProperty = ArrayProperty<u32>;
pub type RealArrayProperty = ArrayProperty<f32>;
pub type DoubleArrayProperty = ArrayProperty<f64>;
pub type VectorArrayProperty = ArrayProperty<Vec4>;
pub type MatrixArrayProperty = ArrayProperty<Mat4>;
pub type ColorArrayProperty = ArrayProperty<Color>;
pub type StringArrayProperty = ArrayProperty<String>;
pub type EnumArrayProperty<E> = ArrayProperty<E>;
