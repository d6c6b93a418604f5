pub mod capabilities;

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use capabilities::Capabilities;

/// Shared handle to a graph node.
pub type NodeRef = Rc<dyn GraphNode>;

/// Identity and lifetime contract of a scene graph node, as seen by node targets.
///
/// Reference counting is intrusive: every holder that wants the node to stay alive
/// calls `add_reference()` once and `remove_reference()` once when done.
pub trait GraphNode: fmt::Debug {
	fn node_id(&self) -> &str;

	fn reference_count(&self) -> u32;

	/// Returns `false` if the count cannot be increased.
	fn add_reference(&self) -> bool;

	/// Returns `false` if the node holds no reference.
	fn remove_reference(&self) -> bool;

	/// Type-erased capability lookup. The returned value is an `Rc<T>` for the capability `T`.
	fn capability(&self, type_id: TypeId) -> Option<&dyn Any>;
}

impl dyn GraphNode {
	/// Query the node for the capability interface `T`, typically a trait object type.
	pub fn as_capability<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
		self.capability(TypeId::of::<T>())?.downcast_ref::<Rc<T>>().cloned()
	}

	pub fn has_capability<T: ?Sized + 'static>(&self) -> bool {
		self.capability(TypeId::of::<T>()).is_some()
	}
}

/// Plain graph node entity: an id, a reference count and a fixed set of capabilities.
pub struct Node {
	id: String,
	references: Cell<u32>,
	capabilities: Capabilities,
}

impl Node {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			references: Cell::new(0),
			capabilities: Capabilities::new(),
		}
	}

	/// Attach the capability `T` implemented by `object`.
	pub fn with_capability<T: ?Sized + 'static>(mut self, object: Rc<T>) -> Self {
		self.capabilities.add(object);
		self
	}

	pub fn capabilities(&self) -> &Capabilities {
		&self.capabilities
	}

	pub fn into_ref(self) -> NodeRef {
		Rc::new(self)
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("id", &self.id)
			.field("references", &self.references.get())
			.field("capabilities", &self.capabilities.len())
			.finish()
	}
}

impl GraphNode for Node {
	fn node_id(&self) -> &str {
		&self.id
	}

	fn reference_count(&self) -> u32 {
		self.references.get()
	}

	fn add_reference(&self) -> bool {
		match self.references.get().checked_add(1) {
			Some(count) => {
				self.references.set(count);
				true
			}
			None => false,
		}
	}

	fn remove_reference(&self) -> bool {
		match self.references.get().checked_sub(1) {
			Some(count) => {
				self.references.set(count);
				true
			}
			None => false,
		}
	}

	fn capability(&self, type_id: TypeId) -> Option<&dyn Any> {
		self.capabilities.get_erased(type_id)
	}
}
