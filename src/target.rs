//! Node targets: containers referencing graph nodes by id or by object.
//!
//! Ids are stored while deserializing and resolved through the current namespace on `init()`,
//! which also takes a reference on every resolved node. `deinit()` gives these references back.
//! Objects set directly with `set_node()` bypass the namespace and are never reference counted here.

pub mod array;
pub mod single;

use std::rc::Rc;

use tracing::{error, trace, warn};

use crate::bounds::InvalidBoundsError;
use crate::config::{ResultAction, ResultCode};
use crate::node::NodeRef;
use crate::tracker::{AttributeError, GraphTracker};

pub use array::NodeArrayTarget;
pub use single::NodeTarget;

pub type TargetResult<T> = Result<T, TargetError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetError {
	#[error("Node slot {index} has both id {id:?} and an object set")]
	BothIdAndObject { index: usize, id: String },
	#[error("No current namespace to resolve node id {0:?}")]
	NoNamespace(String),
	#[error("Node {id:?} not found")]
	NodeNotFound { id: String },
	#[error("Node {id:?} does not provide interface {interface}")]
	WrongInterface { id: String, interface: &'static str },
	#[error("Node count {count} is outside of [{min}, {max}]")]
	CountOutOfBounds { count: usize, min: usize, max: usize },
	#[error(transparent)]
	InvalidBounds(#[from] InvalidBoundsError),
	#[error("Minimum node count {0} of a single node target must be 0 or 1")]
	InvalidMinimum(usize),
	#[error("Node index {index} is out of range, node count is {count}")]
	IndexOutOfRange { index: usize, count: usize },
	#[error("Mandatory node {index} is not resolved")]
	MandatoryUnresolved { index: usize },
	#[error("Failed to add a reference to node {0:?}")]
	AddReferenceFailed(String),
	#[error("Failed to remove a reference from node {0:?}")]
	RemoveReferenceFailed(String),
	#[error(transparent)]
	Attribute(#[from] AttributeError),
}

/// Initialized and modified state of a target, packed in one bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFlags(u32);

impl TargetFlags {
	pub const FLAG_IS_INITIALIZED: u32 = 1 << 0;
	pub const FLAG_IS_MODIFIED: u32 = 1 << 1;

	pub fn is_set(self, flag: u32) -> bool {
		self.0 & flag != 0
	}

	pub fn set(&mut self, flag: u32, enabled: bool) {
		if enabled {
			self.0 |= flag;
		} else {
			self.0 &= !flag;
		}
	}

	pub fn bits(self) -> u32 {
		self.0
	}
}

/// Common interface of node targets holding references to nodes with capability `T`.
pub trait GenericNodeTarget<T: ?Sized> {
	/// Resolve ids and take references. Calling it on an initialized target does nothing.
	fn init(&mut self, tracker: &dyn GraphTracker) -> TargetResult<()>;

	/// Give back references taken by `init()`. Calling it on an uninitialized target does nothing.
	fn deinit(&mut self, tracker: &dyn GraphTracker) -> TargetResult<()>;

	fn flags(&self) -> TargetFlags;

	fn flags_mut(&mut self) -> &mut TargetFlags;

	fn is_initialized(&self) -> bool {
		self.flags().is_set(TargetFlags::FLAG_IS_INITIALIZED)
	}

	fn set_initialized(&mut self, initialized: bool) {
		self.flags_mut().set(TargetFlags::FLAG_IS_INITIALIZED, initialized);
	}

	fn is_modified(&self) -> bool {
		self.flags().is_set(TargetFlags::FLAG_IS_MODIFIED)
	}

	fn set_modified(&mut self, modified: bool) {
		self.flags_mut().set(TargetFlags::FLAG_IS_MODIFIED, modified);
	}

	fn get_min_number_of_nodes(&self) -> usize;

	fn get_max_number_of_nodes(&self) -> usize;

	fn set_number_of_nodes(&mut self, count: usize) -> TargetResult<()>;

	fn get_number_of_nodes(&self) -> usize;

	/// Set the id of slot `index`, clearing any object in it.
	fn set_node_id(&mut self, id: &str, index: usize) -> TargetResult<()>;

	fn get_node_id(&self, index: usize) -> Option<&str>;

	/// Set the object of slot `index`, clearing any id in it.
	fn set_node(&mut self, object: Option<Rc<T>>, index: usize) -> TargetResult<()>;

	fn get_node(&self, index: usize) -> Option<&Rc<T>>;
}

/// One reference: empty, a pending id, or an object.
///
/// `node` is only present for objects resolved from `id`, and then holds one reference on it.
pub(crate) struct Slot<T: ?Sized> {
	pub(crate) id: String,
	pub(crate) object: Option<Rc<T>>,
	pub(crate) node: Option<NodeRef>,
}

impl<T: ?Sized> Default for Slot<T> {
	fn default() -> Self {
		Self {
			id: String::new(),
			object: None,
			node: None,
		}
	}
}

impl<T: ?Sized> Slot<T> {
	/// Returns whether the slot changed.
	pub(crate) fn assign_id(&mut self, id: &str) -> bool {
		if self.id == id {
			return false;
		}
		// a failed release is logged by release()
		let _ = self.release();
		self.id = id.to_owned();
		self.object = None;
		true
	}

	/// Returns whether the slot changed.
	pub(crate) fn assign_object(&mut self, object: Option<Rc<T>>) -> bool {
		let same = match (&self.object, &object) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		if same && self.node.is_none() {
			return false;
		}
		let _ = self.release();
		self.id.clear();
		self.object = object;
		true
	}

	pub(crate) fn is_resolved(&self) -> bool {
		self.node.is_some()
	}

	/// Give back the reference taken when resolving `id`, dropping the resolved object.
	/// Directly set objects are left alone.
	pub(crate) fn release(&mut self) -> TargetResult<()> {
		let Some(node) = self.node.take() else {
			return Ok(());
		};
		self.object = None;
		if node.remove_reference() {
			trace!("Released node {:?}", self.id);
			Ok(())
		} else {
			error!("Failed to remove reference from node {:?}", self.id);
			Err(TargetError::RemoveReferenceFailed(self.id.clone()))
		}
	}

	pub(crate) fn resolve(&mut self, tracker: &dyn GraphTracker, index: usize) -> TargetResult<()>
	where
		T: 'static,
	{
		if self.id.is_empty() || self.is_resolved() {
			return Ok(());
		}
		if self.object.is_some() {
			let err = TargetError::BothIdAndObject {
				index,
				id: self.id.clone(),
			};
			error!("{err}");
			return Err(err);
		}

		if let Some((node, object)) = resolve_node::<T>(tracker, &self.id)? {
			self.node = Some(node);
			self.object = Some(object);
		}
		Ok(())
	}
}

/// Look up `id` in the tracker's namespace and take a reference on the node.
///
/// `Ok(None)` means the lookup failed and the configured result action let it pass.
pub(crate) fn resolve_node<T: ?Sized + 'static>(
	tracker: &dyn GraphTracker,
	id: &str,
) -> TargetResult<Option<(NodeRef, Rc<T>)>> {
	let Some(namespace) = tracker.current_namespace() else {
		let err = TargetError::NoNamespace(id.to_owned());
		error!("{err}");
		return Err(err);
	};

	let Some(node) = namespace.find_node(id) else {
		let err = TargetError::NodeNotFound { id: id.to_owned() };
		return apply_result_action(tracker, ResultCode::GraphNodeNotFound, err).map(|()| None);
	};

	let Some(object) = node.as_capability::<T>() else {
		let err = TargetError::WrongInterface {
			id: id.to_owned(),
			interface: std::any::type_name::<T>(),
		};
		return apply_result_action(tracker, ResultCode::GraphNodeWrongInterface, err).map(|()| None);
	};

	if !node.add_reference() {
		let err = TargetError::AddReferenceFailed(id.to_owned());
		error!("{err}");
		return Err(err);
	}

	trace!("Resolved node {id:?}, {} references", node.reference_count());
	Ok(Some((node, object)))
}

fn apply_result_action(tracker: &dyn GraphTracker, code: ResultCode, err: TargetError) -> TargetResult<()> {
	match tracker.graph_object_result_action(code) {
		ResultAction::Ignore => Ok(()),
		ResultAction::Warn => {
			warn!("{err}");
			Ok(())
		}
		ResultAction::Abort => {
			error!("{err}");
			Err(err)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::TargetFlags;

	#[test]
	fn flags_are_independent() {
		let mut flags = TargetFlags::default();
		flags.set(TargetFlags::FLAG_IS_MODIFIED, true);
		assert!(!flags.is_set(TargetFlags::FLAG_IS_INITIALIZED));
		assert!(flags.is_set(TargetFlags::FLAG_IS_MODIFIED));

		flags.set(TargetFlags::FLAG_IS_INITIALIZED, true);
		flags.set(TargetFlags::FLAG_IS_MODIFIED, false);
		assert_eq!(flags.bits(), TargetFlags::FLAG_IS_INITIALIZED);
	}
}
