use tracing::{debug, trace};

use crate::tracker::{AttributeError, AttributeResult, AttributeTracker};

use super::{PropertyInfo, TypedProperty};

/// An object exposing its properties by attribute name.
///
/// Names ending in `*` are positional entries: `collider*` takes `collider0`, `collider1`, ...
/// with the base attribute name set to the index.
pub trait PropertyHolder {
	fn property_names(&self) -> &'static [&'static str];

	fn property(&self, name: &str) -> Option<&dyn TypedProperty>;

	fn property_mut(&mut self, name: &str) -> Option<&mut dyn TypedProperty>;

	fn describe(&self) -> Vec<(&'static str, PropertyInfo)> {
		self.property_names()
			.iter()
			.filter_map(|name| self.property(name).map(|property| (*name, property.info())))
			.collect()
	}

	fn reset_properties(&mut self) {
		for name in self.property_names() {
			if let Some(property) = self.property_mut(name) {
				property.reset();
			}
		}
	}
}

/// Table entry for attribute `name`, and the length of the prefix it matched.
fn match_entry(names: &'static [&'static str], name: &str) -> Option<(&'static str, usize)> {
	if let Some(entry) = names.iter().find(|entry| **entry == name) {
		return Some((*entry, 0));
	}
	names.iter().find_map(|entry| {
		let prefix = entry.strip_suffix('*')?;
		(name.len() > prefix.len() && name.starts_with(prefix)).then_some((*entry, prefix.len()))
	})
}

/// Feed every attribute of `tracker` to the holder property it names.
///
/// Stops at the first unknown attribute or failing property. Returns the number of attributes read.
pub fn deserialize_attributes(
	holder: &mut (impl PropertyHolder + ?Sized),
	tracker: &mut AttributeTracker<'_>,
) -> AttributeResult<usize> {
	let names = holder.property_names();
	let mut count = 0;
	for index in 0..tracker.attributes().len() {
		let Some(name) = tracker.attributes().get(index).map(|attr| attr.name.clone()) else {
			continue;
		};
		let (entry, prefix_len) =
			match_entry(names, &name).ok_or_else(|| AttributeError::UnknownAttribute(name.clone()))?;
		let property = holder
			.property_mut(entry)
			.ok_or_else(|| AttributeError::UnknownAttribute(name.clone()))?;

		tracker.select_index(index, prefix_len);
		trace!("Deserializing attribute {name:?} into {entry:?}");
		let result = property.deserialize(&*tracker);
		tracker.deselect();
		result.map_err(|e| e.in_attribute(&name))?;
		count += 1;
	}
	debug!("Deserialized {count} attributes");
	Ok(count)
}

/// Implement [`PropertyHolder`] from a table of attribute names and fields.
///
/// ```ignore
/// impl_property_holder!(Collision, {
/// 	"radius" => radius,
/// 	"collider*" => colliders,
/// });
/// ```
#[macro_export]
macro_rules! impl_property_holder {
	($t:ty, { $($name:literal => $field:ident),* $(,)? }) => {
		impl $crate::property::holder::PropertyHolder for $t {
			fn property_names(&self) -> &'static [&'static str] {
				&[$($name),*]
			}

			fn property(&self, name: &str) -> Option<&dyn $crate::property::TypedProperty> {
				match name {
					$($name => Some(&self.$field as &dyn $crate::property::TypedProperty),)*
					_ => None,
				}
			}

			fn property_mut(&mut self, name: &str) -> Option<&mut dyn $crate::property::TypedProperty> {
				match name {
					$($name => Some(&mut self.$field as &mut dyn $crate::property::TypedProperty),)*
					_ => None,
				}
			}
		}
	};
}
