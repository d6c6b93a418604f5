use crate::tracker::{AttributeResult, DeserializeAttributeTracker};

use super::enums::PropertyEnum;
use super::{MaskValue, PropertyInfo, PropertySemantic, TypedProperty};

/// What deserializing a mask attribute through [`TypedProperty`] does.
///
/// Every operation only sets or clears bits of the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOperation {
	/// Comma separated bit numbers to set.
	BitsToSet,
	/// Comma separated bit numbers to clear.
	BitsToClear,
	/// Bool that sets the given mask when true and clears it when false.
	FlagToSet(u32),
	/// Bool that clears the given mask when true and sets it when false.
	FlagToClear(u32),
	/// Comma separated enum names whose bits are set.
	EnumBitsToSet(&'static [&'static str]),
	/// Comma separated enum names whose bits are cleared.
	EnumBitsToClear(&'static [&'static str]),
}

/// Integer bit mask composed from several attributes.
#[derive(Debug, Clone)]
pub struct MaskProperty<T: MaskValue> {
	value: T,
	default: T,
	operation: MaskOperation,
}

impl<T: MaskValue> MaskProperty<T> {
	pub fn new(default: T) -> Self {
		Self {
			value: default,
			default,
			operation: MaskOperation::BitsToSet,
		}
	}

	pub fn with_operation(mut self, operation: MaskOperation) -> Self {
		self.operation = operation;
		self
	}

	/// Mask of `E` bits, deserialized from enum names.
	pub fn enum_bits<E: PropertyEnum>(default: T) -> Self {
		Self::new(default).with_operation(MaskOperation::EnumBitsToSet(E::NAMES))
	}

	pub fn get(&self) -> T {
		self.value
	}

	pub fn set(&mut self, value: T) {
		self.value = value;
	}

	pub fn is_set(&self, mask: u32) -> bool {
		self.value.to_bits() & mask == mask
	}

	pub fn default_value(&self) -> T {
		self.default
	}

	pub fn is_default(&self) -> bool {
		self.value == self.default
	}

	pub fn operation(&self) -> MaskOperation {
		self.operation
	}

	pub fn deserialize_flag_to_set(&mut self, tracker: &dyn DeserializeAttributeTracker, mask: u32) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_flag_to_set(mask, bits))
	}

	pub fn deserialize_flag_to_clear(
		&mut self,
		tracker: &dyn DeserializeAttributeTracker,
		mask: u32,
	) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_flag_to_clear(mask, bits))
	}

	pub fn deserialize_bits_to_set(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_bits_to_set(bits))
	}

	pub fn deserialize_bits_to_clear(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_bits_to_clear(bits))
	}

	pub fn deserialize_enum_bits_to_set<E: PropertyEnum>(
		&mut self,
		tracker: &dyn DeserializeAttributeTracker,
	) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_enum_bits_to_set(E::NAMES, bits))
	}

	pub fn deserialize_enum_bits_to_clear<E: PropertyEnum>(
		&mut self,
		tracker: &dyn DeserializeAttributeTracker,
	) -> AttributeResult<()> {
		self.apply(tracker, |bits| tracker.attribute_enum_bits_to_clear(E::NAMES, bits))
	}

	fn apply<F>(&mut self, tracker: &dyn DeserializeAttributeTracker, update: F) -> AttributeResult<()>
	where
		F: FnOnce(u32) -> AttributeResult<u32>,
	{
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		self.value = T::from_bits(update(self.value.to_bits())?);
		Ok(())
	}
}

impl<T: MaskValue> TypedProperty for MaskProperty<T> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: T::TYPE_NAME,
			semantic: PropertySemantic::Mask,
			num_components: 1,
			min_elements: 1,
			max_elements: 1,
			default_value: self.default.to_attribute(),
		}
	}

	fn reset(&mut self) {
		self.value = self.default;
	}

	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		match self.operation {
			MaskOperation::BitsToSet => self.deserialize_bits_to_set(tracker),
			MaskOperation::BitsToClear => self.deserialize_bits_to_clear(tracker),
			MaskOperation::FlagToSet(mask) => self.deserialize_flag_to_set(tracker, mask),
			MaskOperation::FlagToClear(mask) => self.deserialize_flag_to_clear(tracker, mask),
			MaskOperation::EnumBitsToSet(names) => {
				self.apply(tracker, |bits| tracker.attribute_enum_bits_to_set(names, bits))
			}
			MaskOperation::EnumBitsToClear(names) => {
				self.apply(tracker, |bits| tracker.attribute_enum_bits_to_clear(names, bits))
			}
		}
	}

	fn value_string(&self) -> String {
		self.value.to_attribute()
	}
}

#[cfg(test)]
mod tests {
	use super::{MaskOperation, MaskProperty};
	use crate::property::enums::tests::Axis;
	use crate::property::{PropertySemantic, TypedProperty, UInt32MaskProperty};
	use crate::testing::with_attribute;

	#[test]
	fn flags_only_touch_their_mask() {
		let mut mask = UInt32MaskProperty::new(0b0011);
		with_attribute(Some("true"), |tracker| {
			mask.deserialize_flag_to_set(tracker, 0b0100).unwrap();
			assert_eq!(mask.get(), 0b0111);
			mask.deserialize_flag_to_clear(tracker, 0b0001).unwrap();
			assert_eq!(mask.get(), 0b0110);
		});
		with_attribute(Some("false"), |tracker| {
			mask.deserialize_flag_to_set(tracker, 0b0010).unwrap();
			assert_eq!(mask.get(), 0b0100);
			mask.deserialize_flag_to_clear(tracker, 0b1000).unwrap();
			assert_eq!(mask.get(), 0b1100);
		});
	}

	#[test]
	fn bits_and_enum_bits() {
		let mut mask = UInt32MaskProperty::new(0b1000_0001);
		with_attribute(Some("1, 2"), |tracker| mask.deserialize_bits_to_set(tracker).unwrap());
		assert_eq!(mask.get(), 0b1000_0111);
		with_attribute(Some("0,7"), |tracker| mask.deserialize_bits_to_clear(tracker).unwrap());
		assert_eq!(mask.get(), 0b0000_0110);
		with_attribute(Some("32"), |tracker| assert!(mask.deserialize_bits_to_set(tracker).is_err()));
		assert_eq!(mask.get(), 0b0000_0110);

		with_attribute(Some("X_AXIS,Z_AXIS"), |tracker| {
			mask.deserialize_enum_bits_to_set::<Axis>(tracker).unwrap();
			assert_eq!(mask.get(), 0b0000_0111);
			mask.deserialize_enum_bits_to_clear::<Axis>(tracker).unwrap();
			assert_eq!(mask.get(), 0b0000_0010);
		});
	}

	#[test]
	fn missing_value_keeps_bits() {
		let mut mask = UInt32MaskProperty::new(0b0011).with_operation(MaskOperation::FlagToSet(0b0100));
		with_attribute(None, |tracker| {
			assert!(mask.deserialize(tracker).is_ok());
			assert!(mask.deserialize_bits_to_clear(tracker).is_ok());
		});
		assert!(mask.is_default());
	}

	#[test]
	fn typed_deserialize_uses_operation() {
		let mut mask = MaskProperty::<i32>::enum_bits::<Axis>(0);
		with_attribute(Some("Y_AXIS"), |tracker| mask.deserialize(tracker).unwrap());
		assert_eq!(mask.get(), 0b010);
		assert!(mask.is_set(0b010));
		assert_eq!(mask.info().semantic, PropertySemantic::Mask);
		assert_eq!(mask.value_string(), "2");

		mask.reset();
		assert_eq!(mask.get(), 0);
	}
}
