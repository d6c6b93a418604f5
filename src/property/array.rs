use crate::bounds::CountBounds;
use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker};

use super::{join_values, positional_index, AngleValue, Codec, PropertyInfo, PropertyValue, TypedProperty};

/// A variable number of values within `bounds`.
///
/// Starts with `bounds.initial()` elements. Writing past the end grows the array up to
/// `bounds.max`, filling new elements with the element default.
#[derive(Debug, Clone)]
pub struct ArrayProperty<T: PropertyValue> {
	values: Vec<T>,
	bounds: CountBounds,
	element_default: T,
	codec: Codec<T>,
}

impl<T: PropertyValue> ArrayProperty<T> {
	pub fn new(bounds: CountBounds) -> Self {
		Self::with_codec(bounds, T::initial(), Codec::value())
	}

	pub fn with_default(bounds: CountBounds, element_default: T) -> Self {
		Self::with_codec(bounds, element_default, Codec::value())
	}

	pub fn with_codec(bounds: CountBounds, element_default: T, codec: Codec<T>) -> Self {
		Self {
			values: vec![element_default.clone(); bounds.initial()],
			bounds,
			element_default,
			codec,
		}
	}

	pub fn values(&self) -> &[T] {
		&self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn bounds(&self) -> CountBounds {
		self.bounds
	}

	pub fn get(&self, index: usize) -> Option<&T> {
		self.values.get(index)
	}

	/// Set element `index`, growing the array if needed.
	pub fn set(&mut self, index: usize, value: T) -> AttributeResult<()> {
		self.grow_to(index)?;
		self.values[index] = value;
		Ok(())
	}

	pub fn push(&mut self, value: T) -> AttributeResult<()> {
		self.set(self.values.len(), value)
	}

	pub fn set_count(&mut self, count: usize) -> AttributeResult<()> {
		if !self.bounds.contains(count) {
			return Err(AttributeError::CountOutOfBounds {
				count,
				bounds: self.bounds,
			});
		}
		self.values.resize(count, self.element_default.clone());
		Ok(())
	}

	pub fn is_default(&self) -> bool {
		self.values.len() == self.bounds.initial() && self.values.iter().all(|value| *value == self.element_default)
	}

	/// Replace all elements with a list whose length is within bounds.
	pub fn deserialize_values(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let values = self.codec.read_list(tracker)?;
		if !self.bounds.contains(values.len()) {
			return Err(AttributeError::CountOutOfBounds {
				count: values.len(),
				bounds: self.bounds,
			}
			.in_attribute(tracker.attribute_name()));
		}
		self.values = values;
		Ok(())
	}

	pub fn deserialize_value(&mut self, tracker: &dyn DeserializeAttributeTracker, index: usize) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let value = self.codec.read(tracker)?;
		self.set(index, value).map_err(|e| e.in_attribute(tracker.attribute_name()))
	}

	fn grow_to(&mut self, index: usize) -> AttributeResult<()> {
		if index >= self.bounds.max {
			return Err(AttributeError::IndexOutOfRange {
				index,
				limit: self.bounds.max,
			});
		}
		if index >= self.values.len() {
			self.values.resize(index + 1, self.element_default.clone());
		}
		Ok(())
	}
}

impl<T: AngleValue> ArrayProperty<T> {
	pub fn angle(bounds: CountBounds, element_default: T) -> Self {
		Self::with_codec(bounds, element_default, Codec::angle())
	}
}

impl<T: PropertyValue> TypedProperty for ArrayProperty<T> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: T::TYPE_NAME,
			semantic: self.codec.semantic(),
			num_components: T::NUM_COMPONENTS,
			min_elements: self.bounds.min,
			max_elements: self.bounds.max,
			default_value: self.element_default.to_attribute(),
		}
	}

	fn reset(&mut self) {
		self.values = vec![self.element_default.clone(); self.bounds.initial()];
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
	use glam::Vec4;

	use crate::bounds::CountBounds;
	use crate::property::{ArrayProperty, StringArrayProperty, TypedProperty, UInt32ArrayProperty};
	use crate::testing::with_attribute;
	use crate::tracker::AttributeError;

	#[test]
	fn starts_reserved_and_grows() {
		let mut array = UInt32ArrayProperty::with_default(CountBounds::new(1, 4, 2), 9);
		assert_eq!(array.values(), &[9, 9]);
		assert!(array.is_default());

		with_attribute(Some("5"), |tracker| array.deserialize_value(tracker, 3).unwrap());
		assert_eq!(array.values(), &[9, 9, 9, 5]);

		with_attribute(Some("5"), |tracker| {
			let Err(AttributeError::InAttribute { inner, .. }) = array.deserialize_value(tracker, 4) else {
				panic!("expected an index error");
			};
			assert_eq!(*inner, AttributeError::IndexOutOfRange { index: 4, limit: 4 });
		});

		array.reset();
		assert_eq!(array.len(), 2);
	}

	#[test]
	fn list_must_fit_bounds() {
		let mut array = StringArrayProperty::new(CountBounds::new(1, 3, 0));
		assert!(array.is_empty());
		assert!(array.is_default());

		with_attribute(Some("a, b"), |tracker| array.deserialize(tracker).unwrap());
		assert_eq!(array.values(), &["a".to_owned(), "b".to_owned()]);
		assert_eq!(array.value_string(), "a,b");

		with_attribute(Some("a,b,c,d"), |tracker| assert!(array.deserialize_values(tracker).is_err()));
		with_attribute(Some(""), |tracker| assert!(array.deserialize_values(tracker).is_err()));
		with_attribute(None, |tracker| assert!(array.deserialize_values(tracker).is_ok()));
		assert_eq!(array.len(), 2);

		assert!(array.set_count(0).is_err());
		assert!(array.set_count(3).is_ok());
		assert_eq!(array.get(2).map(String::as_str), Some(""));
		assert!(array.push("x".to_owned()).is_err());
	}

	#[test]
	fn vectors() {
		let mut array = ArrayProperty::<Vec4>::new(CountBounds::unbounded());
		with_attribute(Some("1,2,3,4, 0,0,0,1"), |tracker| array.deserialize(tracker).unwrap());
		assert_eq!(array.values(), &[Vec4::new(1.0, 2.0, 3.0, 4.0), Vec4::W]);
		assert_eq!(array.info().num_components, 4);
	}
}
