use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker};

/// An enum with a table of attribute names, in declaration order.
///
/// The position of a value in `VALUES` is also its bit in enum bit masks.
pub trait PropertyEnum: Copy + PartialEq + 'static {
	const VALUES: &'static [Self];
	/// Attribute name of each entry of `VALUES`.
	const NAMES: &'static [&'static str];

	fn position(self) -> Option<usize> {
		Self::VALUES.iter().position(|value| *value == self)
	}

	fn name(self) -> &'static str {
		self.position()
			.and_then(|position| Self::NAMES.get(position))
			.copied()
			.unwrap_or_default()
	}

	fn from_name(name: &str) -> Option<Self> {
		let position = Self::NAMES.iter().position(|n| *n == name)?;
		Self::VALUES.get(position).copied()
	}

	/// Mask bit of this value, 0 if it has none.
	fn bit(self) -> u32 {
		self.position()
			.filter(|position| *position < u32::BITS as usize)
			.map(|position| 1 << position)
			.unwrap_or(0)
	}
}

pub fn read_enum<E: PropertyEnum>(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<E> {
	let position = tracker.attribute_enum_value(E::NAMES)?;
	value_at(position, tracker)
}

pub fn read_enums<E: PropertyEnum>(tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<Vec<E>> {
	tracker
		.attribute_enum_values(E::NAMES)?
		.into_iter()
		.map(|position| value_at(position, tracker))
		.collect()
}

fn value_at<E: PropertyEnum>(position: usize, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<E> {
	E::VALUES.get(position).copied().ok_or_else(|| {
		AttributeError::IndexOutOfRange {
			index: position,
			limit: E::VALUES.len(),
		}
		.in_attribute(tracker.attribute_name())
	})
}

/// Implement [`PropertyEnum`] and `PropertyValue` for a fieldless enum from a name table.
///
/// ```ignore
/// impl_property_enum!(BlendMode, default = BlendMode::Normal, {
/// 	BlendMode::Normal => "NORMAL",
/// 	BlendMode::Additive => "ADDITIVE",
/// });
/// ```
#[macro_export]
macro_rules! impl_property_enum {
	($t:ty, default = $default:expr, { $($value:expr => $name:literal),+ $(,)? }) => {
		impl $crate::property::enums::PropertyEnum for $t {
			const VALUES: &'static [Self] = &[$($value),+];
			const NAMES: &'static [&'static str] = &[$($name),+];
		}

		impl $crate::property::PropertyValue for $t {
			const TYPE_NAME: &'static str = stringify!($t);
			const NUM_COMPONENTS: usize = 1;

			fn initial() -> Self {
				$default
			}

			fn read(
				tracker: &dyn $crate::tracker::DeserializeAttributeTracker,
			) -> $crate::tracker::AttributeResult<Self> {
				$crate::property::enums::read_enum(tracker)
			}

			fn read_list(
				tracker: &dyn $crate::tracker::DeserializeAttributeTracker,
			) -> $crate::tracker::AttributeResult<Vec<Self>> {
				$crate::property::enums::read_enums(tracker)
			}

			fn to_attribute(&self) -> String {
				$crate::property::enums::PropertyEnum::name(*self).to_owned()
			}
		}
	};
}
