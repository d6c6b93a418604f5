use crate::tracker::{AttributeResult, DeserializeAttributeTracker};

use super::{AngleValue, Codec, ComponentValue, PropertyInfo, PropertySemantic, PropertyValue, TypedProperty};

/// A single value with a default.
#[derive(Debug, Clone)]
pub struct Property<T: PropertyValue> {
	value: T,
	default: T,
	codec: Codec<T>,
}

impl<T: PropertyValue> Property<T> {
	pub fn new(default: T) -> Self {
		Self::with_codec(default, Codec::value())
	}

	pub fn with_codec(default: T, codec: Codec<T>) -> Self {
		Self {
			value: default.clone(),
			default,
			codec,
		}
	}

	pub fn get(&self) -> &T {
		&self.value
	}

	pub fn get_mut(&mut self) -> &mut T {
		&mut self.value
	}

	pub fn set(&mut self, value: T) {
		self.value = value;
	}

	pub fn default_value(&self) -> &T {
		&self.default
	}

	pub fn is_default(&self) -> bool {
		self.value == self.default
	}

	pub fn deserialize_value(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		self.value = self.codec.read(tracker)?;
		Ok(())
	}
}

impl<T: AngleValue> Property<T> {
	/// Angle in radians, read with an optional unit suffix.
	pub fn angle(default: T) -> Self {
		Self::with_codec(default, Codec::angle())
	}
}

impl Property<String> {
	/// Id of another object, e.g. a resource or a node.
	pub fn id(default: &str) -> Self {
		Self::with_codec(default.to_owned(), Codec::tagged(PropertySemantic::Id))
	}
}

impl<T: ComponentValue> Property<T> {
	/// Set one float component, e.g. the `y` of a vector from an attribute named `positionY`.
	pub fn deserialize_component(
		&mut self,
		tracker: &dyn DeserializeAttributeTracker,
		index: usize,
	) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let component = tracker.attribute_f32()?;
		self.value
			.set_component(index, component)
			.map_err(|e| e.in_attribute(tracker.attribute_name()))
	}
}

impl<T: PropertyValue + Default> Default for Property<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: PropertyValue> TypedProperty for Property<T> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: T::TYPE_NAME,
			semantic: self.codec.semantic(),
			num_components: T::NUM_COMPONENTS,
			min_elements: 1,
			max_elements: 1,
			default_value: self.default.to_attribute(),
		}
	}

	fn reset(&mut self) {
		self.value = self.default.clone();
	}

	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		self.deserialize_value(tracker)
	}

	fn value_string(&self) -> String {
		self.value.to_attribute()
	}
}
