use std::fmt;
use std::rc::Rc;

use tracing::{debug, error};

use crate::bounds::CountBounds;
use crate::property::{PropertyInfo, PropertySemantic, TypedProperty};
use crate::tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker, GraphTracker};

use super::{GenericNodeTarget, Slot, TargetError, TargetFlags, TargetResult};

/// References to a bounded number of nodes with capability `T`.
///
/// Every slot independently holds nothing, an id or an object. Slots below `bounds.min`
/// must be resolved after `init()`.
pub struct NodeArrayTarget<T: ?Sized> {
	slots: Vec<Slot<T>>,
	bounds: CountBounds,
	flags: TargetFlags,
}

impl<T: ?Sized + 'static> NodeArrayTarget<T> {
	/// Target with `bounds.initial()` empty slots. Inconsistent bounds make `init()` fail.
	pub fn new(bounds: CountBounds) -> Self {
		let mut slots = Vec::new();
		slots.resize_with(bounds.initial(), Slot::default);
		Self {
			slots,
			bounds,
			flags: TargetFlags::default(),
		}
	}

	pub fn bounds(&self) -> CountBounds {
		self.bounds
	}

	/// Store a comma separated id list, one id per slot, resizing to the number of ids.
	/// Without an attribute value nothing changes.
	pub fn deserialize_node_ids(&mut self, tracker: &(impl DeserializeAttributeTracker + ?Sized)) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let ids = tracker.attribute_strings()?;
		if !self.bounds.contains(ids.len()) {
			return Err(AttributeError::CountOutOfBounds {
				count: ids.len(),
				bounds: self.bounds,
			}
			.in_attribute(tracker.attribute_name()));
		}

		let mut modified = self.resize(ids.len());
		for (slot, id) in self.slots.iter_mut().zip(&ids) {
			modified |= slot.assign_id(id);
		}
		if modified {
			self.set_modified(true);
		}
		Ok(())
	}

	/// Store the current attribute as the id of the slot named by the base attribute name,
	/// e.g. slot 2 for `node2` matched with prefix `node`. Grows the slots as needed.
	pub fn deserialize_node_id(&mut self, tracker: &(impl DeserializeAttributeTracker + ?Sized)) -> AttributeResult<()> {
		if !tracker.has_attribute_value() {
			return Ok(());
		}
		let base = tracker.base_attribute_name();
		let index = base
			.parse::<usize>()
			.map_err(|_| AttributeError::NotAnIndex(base.to_owned()).in_attribute(tracker.attribute_name()))?;
		if index >= self.bounds.max {
			return Err(AttributeError::IndexOutOfRange {
				index,
				limit: self.bounds.max,
			}
			.in_attribute(tracker.attribute_name()));
		}

		let id = tracker.attribute_string(true)?;
		let mut modified = false;
		if index >= self.slots.len() {
			modified |= self.resize(index + 1);
		}
		modified |= self.slots[index].assign_id(&id);
		if modified {
			self.set_modified(true);
		}
		Ok(())
	}

	/// Append a slot holding `id`, returning its index.
	pub fn add_node_id(&mut self, id: &str) -> TargetResult<usize> {
		let index = self.push_slot()?;
		self.slots[index].assign_id(id);
		Ok(index)
	}

	/// Append a slot holding `object`, returning its index.
	pub fn add_node(&mut self, object: Rc<T>) -> TargetResult<usize> {
		let index = self.push_slot()?;
		self.slots[index].assign_object(Some(object));
		Ok(index)
	}

	/// Remove slot `index`, giving back its reference if it holds one.
	pub fn remove_node(&mut self, index: usize) -> TargetResult<()> {
		self.check_index(index)?;
		self.check_count(self.slots.len() - 1)?;
		let mut slot = self.slots.remove(index);
		self.set_modified(true);
		slot.release()
	}

	/// All present objects, in slot order.
	pub fn nodes(&self) -> impl Iterator<Item = &Rc<T>> {
		self.slots.iter().filter_map(|slot| slot.object.as_ref())
	}

	/// Give back every reference taken for an id. Objects set directly are kept, as are all ids.
	///
	/// Leaves the target uninitialized. Every slot is released even if some releases fail;
	/// the first failure is returned.
	pub fn clear_named_nodes(&mut self) -> TargetResult<()> {
		let mut result = Ok(());
		for slot in &mut self.slots {
			if slot.id.is_empty() {
				continue;
			}
			if let Err(e) = slot.release() {
				if result.is_ok() {
					result = Err(e);
				}
			}
		}
		self.set_initialized(false);
		result
	}

	/// Release, then roll back references taken so far, keeping `err` as the outcome.
	fn abort_init(&mut self, err: TargetError) -> TargetResult<()> {
		debug!("Rolling back node array target init");
		// release failures are logged by the slots
		let _ = self.clear_named_nodes();
		Err(err)
	}

	/// Returns whether the slot count changed.
	fn resize(&mut self, count: usize) -> bool {
		if count == self.slots.len() {
			return false;
		}
		for slot in self.slots.iter_mut().skip(count) {
			// release failures are logged by the slots
			let _ = slot.release();
		}
		self.slots.resize_with(count, Slot::default);
		true
	}

	/// Only the upper bound applies, so a target can grow from below `min`.
	fn push_slot(&mut self) -> TargetResult<usize> {
		let index = self.slots.len();
		if !self.bounds.allows_growth_to(index + 1) {
			return Err(TargetError::CountOutOfBounds {
				count: index + 1,
				min: self.bounds.min,
				max: self.bounds.max,
			});
		}
		self.slots.push(Slot::default());
		self.set_modified(true);
		Ok(index)
	}

	fn check_count(&self, count: usize) -> TargetResult<()> {
		if !self.bounds.contains(count) {
			return Err(TargetError::CountOutOfBounds {
				count,
				min: self.bounds.min,
				max: self.bounds.max,
			});
		}
		Ok(())
	}

	fn check_index(&self, index: usize) -> TargetResult<()> {
		if index >= self.slots.len() {
			return Err(TargetError::IndexOutOfRange {
				index,
				count: self.slots.len(),
			});
		}
		Ok(())
	}
}

impl<T: ?Sized> fmt::Debug for NodeArrayTarget<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeArrayTarget")
			.field("ids", &self.slots.iter().map(|slot| slot.id.as_str()).collect::<Vec<_>>())
			.field("bounds", &self.bounds)
			.field("flags", &self.flags)
			.finish()
	}
}

impl<T: ?Sized + 'static> GenericNodeTarget<T> for NodeArrayTarget<T> {
	fn init(&mut self, tracker: &dyn GraphTracker) -> TargetResult<()> {
		if self.is_initialized() {
			return Ok(());
		}

		if let Err(e) = self.bounds.validate() {
			error!("{e}");
			return Err(e.into());
		}
		if let Err(e) = self.check_count(self.slots.len()) {
			error!("{e}");
			return Err(e);
		}

		for index in 0..self.slots.len() {
			if let Err(e) = self.slots[index].resolve(tracker, index) {
				return self.abort_init(e);
			}
		}

		if let Some(index) = (0..self.bounds.min).find(|i| self.slots[*i].object.is_none()) {
			let err = TargetError::MandatoryUnresolved { index };
			error!("{err}");
			return self.abort_init(err);
		}

		debug!("Initialized node array target with {} nodes", self.slots.len());
		self.set_initialized(true);
		self.set_modified(false);
		Ok(())
	}

	fn deinit(&mut self, _tracker: &dyn GraphTracker) -> TargetResult<()> {
		if !self.is_initialized() {
			return Ok(());
		}

		let result = self.clear_named_nodes();
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
		self.bounds.min
	}

	fn get_max_number_of_nodes(&self) -> usize {
		self.bounds.max
	}

	fn set_number_of_nodes(&mut self, count: usize) -> TargetResult<()> {
		self.check_count(count)?;
		if self.resize(count) {
			self.set_modified(true);
		}
		Ok(())
	}

	fn get_number_of_nodes(&self) -> usize {
		self.slots.len()
	}

	fn set_node_id(&mut self, id: &str, index: usize) -> TargetResult<()> {
		self.check_index(index)?;
		if self.slots[index].assign_id(id) {
			self.set_modified(true);
		}
		Ok(())
	}

	fn get_node_id(&self, index: usize) -> Option<&str> {
		self.slots.get(index).map(|slot| slot.id.as_str())
	}

	fn set_node(&mut self, object: Option<Rc<T>>, index: usize) -> TargetResult<()> {
		self.check_index(index)?;
		if self.slots[index].assign_object(object) {
			self.set_modified(true);
		}
		Ok(())
	}

	fn get_node(&self, index: usize) -> Option<&Rc<T>> {
		self.slots.get(index)?.object.as_ref()
	}
}

impl<T: ?Sized + 'static> TypedProperty for NodeArrayTarget<T> {
	fn info(&self) -> PropertyInfo {
		PropertyInfo {
			type_name: "NodeArrayTarget",
			semantic: PropertySemantic::Object,
			num_components: 1,
			min_elements: self.bounds.min,
			max_elements: self.bounds.max,
			default_value: String::new(),
		}
	}

	fn reset(&mut self) {
		if self.is_initialized() {
			tracing::warn!("Cannot reset initialized node array target");
			return;
		}
		self.slots.clear();
		self.slots.resize_with(self.bounds.initial(), Slot::default);
		self.set_modified(true);
	}

	/// Positional attributes (with a base name) set one slot, others set the whole list.
	fn deserialize(&mut self, tracker: &dyn DeserializeAttributeTracker) -> AttributeResult<()> {
		if tracker.base_attribute_name() == tracker.attribute_name() {
			self.deserialize_node_ids(tracker)
		} else {
			self.deserialize_node_id(tracker)
		}
	}

	fn value_string(&self) -> String {
		self.slots.iter().map(|slot| slot.id.as_str()).collect::<Vec<_>>().join(",")
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::NodeArrayTarget;
	use crate::bounds::CountBounds;
	use crate::config::{EngineConfiguration, ResultAction};
	use crate::target::{GenericNodeTarget, TargetError};
	use crate::testing::*;
	use crate::tracker::{AttributeError, AttributeList, AttributeTracker, InitTracker};

	fn colliders() -> NodeArrayTarget<dyn Collider> {
		NodeArrayTarget::new(CountBounds::new(1, 4, 0))
	}

	#[test]
	fn reference_count_round_trip() {
		init_logging();
		let a = body_node("a", 1.0);
		let b = body_node("b", 2.0);
		let tree = namespace_with(&[&a, &b]);
		let config = EngineConfiguration::new();
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		for id in ["a", "b", "a"] {
			target.add_node_id(id).unwrap();
		}
		let direct = b.as_capability::<dyn Collider>().unwrap();
		target.add_node(direct).unwrap();

		assert!(target.init(&tracker).is_ok());
		assert_eq!(a.reference_count(), 2);
		assert_eq!(b.reference_count(), 1);
		assert_eq!(target.nodes().map(|n| n.radius()).collect::<Vec<_>>(), vec![1.0, 2.0, 1.0, 2.0]);

		assert!(target.init(&tracker).is_ok());
		assert_eq!(a.reference_count(), 2);

		assert!(target.deinit(&tracker).is_ok());
		assert_eq!(a.reference_count(), 0);
		assert_eq!(b.reference_count(), 0);
		// the directly set object stays
		assert_eq!(target.nodes().count(), 1);
		assert!(target.get_node(3).is_some());
	}

	#[test]
	fn failed_init_rolls_back() {
		init_logging();
		let a = body_node("a", 1.0);
		let b = body_node("b", 2.0);
		let tree = namespace_with(&[&a, &b]);
		let config = EngineConfiguration::new();
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		for id in ["a", "b", "missing"] {
			target.add_node_id(id).unwrap();
		}

		assert_eq!(
			target.init(&tracker),
			Err(TargetError::NodeNotFound {
				id: "missing".to_owned()
			})
		);
		assert!(!target.is_initialized());
		assert_eq!(a.reference_count(), 0);
		assert_eq!(b.reference_count(), 0);
		assert!(target.get_node(0).is_none());
		assert_eq!(target.get_node_id(2), Some("missing"));

		// a retry after fixing the id resolves everything again
		target.set_node_id("a", 2).unwrap();
		assert!(target.init(&tracker).is_ok());
		assert_eq!(a.reference_count(), 2);
		assert_eq!(b.reference_count(), 1);
	}

	#[test]
	fn ignored_lookup_leaves_slot_empty() {
		init_logging();
		let a = body_node("a", 1.0);
		let t = transform_node("t");
		let tree = namespace_with(&[&a, &t]);
		let config = config_with(ResultAction::Ignore, ResultAction::Warn);
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		for id in ["a", "missing", "t"] {
			target.add_node_id(id).unwrap();
		}
		assert!(target.init(&tracker).is_ok());
		assert!(target.get_node(1).is_none());
		assert!(target.get_node(2).is_none());
		assert_eq!(a.reference_count(), 1);
		assert_eq!(t.reference_count(), 0);
	}

	#[test]
	fn unresolved_mandatory_slot_rolls_back() {
		init_logging();
		let a = body_node("a", 1.0);
		let tree = namespace_with(&[&a]);
		let config = config_with(ResultAction::Ignore, ResultAction::Abort);
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = NodeArrayTarget::<dyn Collider>::new(CountBounds::new(2, 4, 0));
		target.add_node_id("a").unwrap();
		target.add_node_id("missing").unwrap();

		assert_eq!(target.init(&tracker), Err(TargetError::MandatoryUnresolved { index: 1 }));
		assert_eq!(a.reference_count(), 0);
	}

	#[test]
	fn starts_with_reserved_slots() {
		let a = body_node("a", 1.0);
		let tree = namespace_with(&[&a]);
		let config = EngineConfiguration::new();
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		assert_eq!(target.get_number_of_nodes(), 0);
		assert_eq!(target.add_node_id("a"), Ok(0));
		assert!(target.init(&tracker).is_ok());
		assert_eq!(a.reference_count(), 1);

		let reserved = NodeArrayTarget::<dyn Collider>::new(CountBounds::new(0, 4, 2));
		assert_eq!(reserved.get_number_of_nodes(), 2);
		assert_eq!(reserved.get_node_id(1), Some(""));
	}

	#[test]
	fn bounds_enforcement() {
		let config = EngineConfiguration::new();
		let tracker = InitTracker::new(&config);

		let mut target = colliders();
		assert_eq!(
			target.init(&tracker),
			Err(TargetError::CountOutOfBounds { count: 0, min: 1, max: 4 })
		);
		assert_eq!(
			target.set_number_of_nodes(0),
			Err(TargetError::CountOutOfBounds { count: 0, min: 1, max: 4 })
		);
		assert!(target.set_number_of_nodes(5).is_err());
		assert!(target.set_number_of_nodes(4).is_ok());
		assert!(target.add_node_id("x").is_err());
		assert!(target.set_node_id("x", 4).is_err());
		assert!(target.remove_node(0).is_ok());
		assert_eq!(target.get_number_of_nodes(), 3);

		// the mandatory slot is still empty
		assert_eq!(target.init(&tracker), Err(TargetError::MandatoryUnresolved { index: 0 }));

		let mut inconsistent = NodeArrayTarget::<dyn Collider>::new(CountBounds::new(3, 2, 0));
		assert!(matches!(inconsistent.init(&tracker), Err(TargetError::InvalidBounds(_))));
	}

	#[test]
	fn failed_release_still_clears_every_slot() {
		init_logging();
		let a = body_node("a", 1.0);
		let b = body_node("b", 2.0);
		let tree = namespace_with(&[&a, &b]);
		let config = EngineConfiguration::new();
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		target.add_node_id("a").unwrap();
		target.add_node_id("b").unwrap();
		target.init(&tracker).unwrap();
		assert_eq!(a.reference_count(), 1);

		// someone else gives back the reference the target holds on a
		assert!(a.remove_reference());
		assert_eq!(
			target.deinit(&tracker),
			Err(TargetError::RemoveReferenceFailed("a".to_owned()))
		);
		assert_eq!(b.reference_count(), 0);
		assert!(!target.is_initialized());
		assert_eq!(target.nodes().count(), 0);
		assert_eq!(target.get_node_id(0), Some("a"));
	}

	#[test]
	fn deserialize_ids() {
		let config = EngineConfiguration::new();
		let graph = InitTracker::new(&config);
		let attributes = AttributeList::new()
			.with("colliders", "a, b, c")
			.with("collider3", "d")
			.with("collider9", "e")
			.with("colliderX", "f")
			.with("many", "a,b,c,d,e");
		let mut tracker = AttributeTracker::new(attributes, &graph);

		let mut target = colliders();
		tracker.select("colliders");
		target.deserialize_node_ids(&tracker).unwrap();
		assert_eq!(target.get_number_of_nodes(), 3);
		assert_eq!(target.get_node_id(1), Some("b"));
		assert!(target.is_modified());

		tracker.select_prefixed("collider3", "collider");
		target.deserialize_node_id(&tracker).unwrap();
		assert_eq!(target.get_number_of_nodes(), 4);
		assert_eq!(target.get_node_id(3), Some("d"));

		tracker.select_prefixed("collider9", "collider");
		assert!(matches!(
			target.deserialize_node_id(&tracker),
			Err(AttributeError::InAttribute { .. })
		));

		tracker.select_prefixed("colliderX", "collider");
		assert!(target.deserialize_node_id(&tracker).is_err());

		tracker.select("many");
		assert!(target.deserialize_node_ids(&tracker).is_err());
		assert_eq!(target.get_number_of_nodes(), 4);

		tracker.deselect();
		assert!(target.deserialize_node_ids(&tracker).is_ok());
		assert_eq!(target.get_node_id(0), Some("a"));
	}

	#[test]
	fn set_node_releases_resolved_reference() {
		let a = body_node("a", 1.0);
		let tree = namespace_with(&[&a]);
		let config = EngineConfiguration::new();
		let tracker = InitTracker::with_namespace(&tree, tree.root(), &config);

		let mut target = colliders();
		target.add_node_id("a").unwrap();
		target.init(&tracker).unwrap();
		assert_eq!(a.reference_count(), 1);

		let other: Rc<dyn Collider> = Rc::new(TestBody { depth: 0.0, radius: 3.0 });
		target.set_node(Some(other), 0).unwrap();
		assert_eq!(a.reference_count(), 0);
		assert!(target.is_modified());
		assert_eq!(target.get_node_id(0), Some(""));
	}
}
