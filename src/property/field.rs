use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker};

use super::{join_values, positional_index, AngleValue, Codec, PropertyInfo, PropertyValue, TypedProperty};

/// A fixed number of values, each with its own default.
#[derive(Debug, Clone)]
pub struct FieldProperty<T: PropertyValue, const N: usize> {
	values: [T; N],
	defaults: [T; N],
	codec: Codec<T>,
}

impl<T: PropertyValue, const N: usize> FieldProperty<T, N> {
	pub const NUM_ELEMENTS: usize = N;

	pub fn new(defaults: [T; N]) -> Self {
		Self::with_codec(defaults, Codec::value())
	}

	/// Every element defaults to `default`.
	pub fn filled(default: T) -> Self {
		Self::new(std::array::from_fn(|_| default.clone()))
	}

	pub fn with_codec(defaults: [T; N], codec: Codec<T>) -> Self {
		Self {
			values: defaults.clone(),
			defaults,
			codec,
		}
	}

	pub fn values(&self) -> &[T; N] {
		&self.values
	}

	pub fn get(&self, index: usize) -> Option<&T> {
		self.values.get(index)
	}

	pub fn set(&mut self, index: usize, value: T) -> AttributeResult<()> {
		let slot = self
			.values
			.get_mut(index)
			.ok_or(AttributeError::IndexOutOfRange { index, limit: N })?;
		*slot = value;
		Ok(())
	}

	pub fn defaults(&self) -> &[T; N] {
		&self.defaults
	}

	pub fn is_default(&self) -> bool {
		self.values == self.defaults
	}

	/// Set the leading elements from a list of at most `N` values. Elements past the list keep their value.
	pub fn deserialize_values(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let values = self.codec.read_list(tracker)?;
		if values.len() > N {
			return Err(AttributeError::TooManyValues {
				max: N,
				got: values.len(),
			}
			.in_attribute(tracker.attribute_name()));
		}
		for (slot, value) in self.values.iter_mut().zip(values) {
			*slot = value;
		}
		Ok(())
	}

	pub fn deserialize_value(&mut self, tracker: &dyn DeserializeAttributeTracker, index: usize) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		if index >= N {
			return Err(AttributeError::IndexOutOfRange { index, limit: N }.in_attribute(tracker.attribute_name()));
		}
		self.values[index] = self.codec.read(tracker)?;
		Ok(())
	}
}

impl<T: AngleValue, const N: usize> FieldProperty<T, N> {
	pub fn angle(defaults: [T; N]) -> Self {
		Self::with_codec(defaults, Codec::angle())
	}
}

impl<T: PropertyValue, const N: usize> TypedProperty for FieldProperty<T, N> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: T::TYPE_NAME,
			semantic: self.codec.semantic(),
			num_components: T::NUM_COMPONENTS,
			min_elements: N,
			max_elements: N,
			default_value: join_values(&self.defaults),
		}
	}

	fn reset(&mut self) {
		self.values = self.defaults.clone();
	}

	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		match positional_index(tracker)? {
			Some(index) => self.deserialize_value(tracker, index),
			None => self.deserialize_values(tracker),
		}
	}

	fn value_string(&self) -> String {
		join_values(&self.values)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::EngineConfiguration;
	use crate::property::{BoolFieldProperty, RealFieldProperty, TypedProperty};
	use crate::testing::with_attribute;
	use crate::tracker::{AttributeList, AttributeTracker, InitTracker};

	#[test]
	fn list_sets_leading_elements() {
		let mut field = RealFieldProperty::<3>::new([1.0, 2.0, 3.0]);
		with_attribute(Some("7, 8"), |tracker| field.deserialize_values(tracker).unwrap());
		assert_eq!(field.values(), &[7.0, 8.0, 3.0]);

		with_attribute(Some("1,2,3,4"), |tracker| assert!(field.deserialize_values(tracker).is_err()));
		assert_eq!(field.values(), &[7.0, 8.0, 3.0]);

		with_attribute(None, |tracker| field.deserialize_values(tracker).unwrap());
		assert_eq!(field.value_string(), "7,8,3");

		field.reset();
		assert!(field.is_default());
	}

	#[test]
	fn positional_elements() {
		let config = EngineConfiguration::new();
		let graph = InitTracker::new(&config);
		let attributes = AttributeList::new().with("enabled1", "yes").with("enabled5", "yes");
		let mut tracker = AttributeTracker::new(attributes, &graph);

		let mut field = BoolFieldProperty::<4>::filled(false);
		tracker.select_prefixed("enabled1", "enabled");
		field.deserialize(&tracker).unwrap();
		assert_eq!(field.values(), &[false, true, false, false]);

		tracker.select_prefixed("enabled5", "enabled");
		assert!(field.deserialize(&tracker).is_err());
		assert!(field.set(4, true).is_err());

		let info = field.info();
		assert_eq!((info.min_elements, info.max_elements), (4, 4));
		assert_eq!(info.default_value, "false,false,false,false");
	}
}
