use std::fmt;
use std::rc::Rc;

use tracing::{debug, error};

use crate::property::{PropertyInfo, PropertySemantic, TypedProperty};
use crate::tracker::{AttributeResult, DeserializeAttributeTracker, GraphTracker};

use super::{GenericNodeTarget, Slot, TargetError, TargetFlags, TargetResult};

/// Reference to at most one node with capability `T`.
///
/// `MIN` is 1 for a mandatory reference and 0 for an optional one.
pub struct NodeTarget<T: ?Sized, const MIN: usize = 0> {
	slot: Slot<T>,
	count: usize,
	flags: TargetFlags,
}

impl<T: ?Sized + 'static, const MIN: usize> NodeTarget<T, MIN> {
	pub fn new() -> Self {
		Self {
			slot: Slot::default(),
			count: 1,
			flags: TargetFlags::default(),
		}
	}

	pub fn with_node_id(id: &str) -> Self {
		let mut target = Self::new();
		target.slot.assign_id(id);
		target
	}

	/// Store the current attribute as the node id. Without an attribute value nothing changes.
	pub fn deserialize_node_id(&mut self, tracker: &(impl DeserializeAttributeTracker + ?Sized)) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let id = tracker.attribute_string(true)?;
		if self.count == 0 {
			self.count = 1;
			self.set_modified(true);
		}
		if self.slot.assign_id(&id) {
			self.set_modified(true);
		}
		Ok(())
	}

	/// The referenced object, once resolved or set.
	pub fn node(&self) -> Option<&Rc<T>> {
		self.get_node(0)
	}

	pub fn node_id(&self) -> &str {
		self.get_node_id(0).unwrap_or_default()
	}

	fn check_index(&self, index: usize) -> TargetResult<()> {
		if index >= self.count {
			return Err(TargetError::IndexOutOfRange {
				index,
				count: self.count,
			});
		}
		Ok(())
	}
}

impl<T: ?Sized + 'static, const MIN: usize> Default for NodeTarget<T, MIN> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: ?Sized, const MIN: usize> fmt::Debug for NodeTarget<T, MIN> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeTarget")
			.field("id", &self.slot.id)
			.field("has_object", &self.slot.object.is_some())
			.field("count", &self.count)
			.field("flags", &self.flags)
			.finish()
	}
}

impl<T: ?Sized + 'static, const MIN: usize> GenericNodeTarget<T> for NodeTarget<T, MIN> {
	fn init(&mut self, tracker: &dyn GraphTracker) -> TargetResult<()> {
		if self.is_initialized() {
			return Ok(());
		}

		if MIN > 1 {
			let err = TargetError::InvalidMinimum(MIN);
			error!("{err}");
			return Err(err);
		}
		if self.count < MIN {
			let err = TargetError::CountOutOfBounds {
				count: self.count,
				min: MIN,
				max: 1,
			};
			error!("{err}");
			return Err(err);
		}

		if self.count == 1 {
			self.slot.resolve(tracker, 0)?;
		}

		if MIN == 1 && self.slot.object.is_none() && self.slot.id.is_empty() {
			let err = TargetError::MandatoryUnresolved { index: 0 };
			error!("{err}: no node id or object specified");
			return Err(err);
		}

		debug!("Initialized node target {:?}", self.slot.id);
		self.set_initialized(true);
		self.set_modified(false);
		Ok(())
	}

	fn deinit(&mut self, _tracker: &dyn GraphTracker) -> TargetResult<()> {
		if !self.is_initialized() {
			return Ok(());
		}

		let result = self.slot.release();
		self.set_initialized(false);
		self.set_modified(false);
		result
	}

	fn flags(&self) -> TargetFlags {
		self.flags
	}

	fn flags_mut(&mut self) -> &mut TargetFlags {
		&mut self.flags
	}

	fn get_min_number_of_nodes(&self) -> usize {
		MIN
	}

	fn get_max_number_of_nodes(&self) -> usize {
		1
	}

	fn set_number_of_nodes(&mut self, count: usize) -> TargetResult<()> {
		if count > 1 {
			return Err(TargetError::CountOutOfBounds { count, min: 0, max: 1 });
		}
		if count == self.count {
			return Ok(());
		}
		if count == 0 {
			self.slot.assign_id("");
			self.slot.assign_object(None);
		}
		self.count = count;
		self.set_modified(true);
		Ok(())
	}

	fn get_number_of_nodes(&self) -> usize {
		self.count
	}

	fn set_node_id(&mut self, id: &str, index: usize) -> TargetResult<()> {
		self.check_index(index)?;
		if self.slot.assign_id(id) {
			self.set_modified(true);
		}
		Ok(())
	}

	fn get_node_id(&self, index: usize) -> Option<&str> {
		(index < self.count).then_some(self.slot.id.as_str())
	}

	fn set_node(&mut self, object: Option<Rc<T>>, index: usize) -> TargetResult<()> {
		self.check_index(index)?;
		if self.slot.assign_object(object) {
			self.set_modified(true);
		}
		Ok(())
	}

	fn get_node(&self, index: usize) -> Option<&Rc<T>> {
		if index < self.count {
			self.slot.object.as_ref()
		} else {
			None
		}
	}
}

impl<T: ?Sized + 'static, const MIN: usize> TypedProperty for NodeTarget<T, MIN> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: "NodeTarget",
			semantic: PropertySemantic::Object,
			num_components: 1,
			min_elements: MIN,
			max_elements: 1,
			default_value: String::new(),
		}
	}

	fn reset(&mut self) {
		if self.is_initialized() {
			tracing::warn!("Cannot reset initialized node target {:?}", self.slot.id);
			return;
		}
		self.slot = Slot::default();
		self.count = 1;
		self.set_modified(true);
	}

	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		self.deserialize_node_id(tracker)
	}

	fn value_string(&self) -> String {
		self.slot.id.clone()
	}
}
