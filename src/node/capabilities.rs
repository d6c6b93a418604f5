use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Capability interfaces of one node, keyed by the interface type.
///
/// Each entry holds an `Rc<T>` boxed as `dyn Any`, where `T` is usually a trait object type,
/// so a node can expose several independent interfaces backed by one object.
#[derive(Default)]
pub struct Capabilities {
	entries: HashMap<TypeId, Box<dyn Any>>,
}

impl Capabilities {
	pub fn new() -> Self {
		Self {
			entries: HashMap::new(),
		}
	}

	/// adding a second object for a same capability
	/// - panics in debug
	/// - replaces the previous object in release
	pub fn add<T: ?Sized + 'static>(&mut self, object: Rc<T>) {
		let previous = self.entries.insert(TypeId::of::<T>(), Box::new(object));
		debug_assert!(previous.is_none(), "duplicate capability {}", std::any::type_name::<T>());
	}

	pub fn get<T: ?Sized + 'static>(&self) -> Option<&Rc<T>> {
		self.entries.get(&TypeId::of::<T>())?.downcast_ref::<Rc<T>>()
	}

	pub fn has<T: ?Sized + 'static>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<T>())
	}

	pub(crate) fn get_erased(&self, type_id: TypeId) -> Option<&dyn Any> {
		self.entries.get(&type_id).map(|entry| &**entry)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::Capabilities;

	trait Named {
		fn name(&self) -> &str;
	}

	struct CompA {
		name: String,
	}

	impl Named for CompA {
		fn name(&self) -> &str {
			&self.name
		}
	}

	struct CompB {
		i: u32,
	}

	#[test]
	fn add_and_get() {
		let mut caps = Capabilities::new();
		assert!(caps.get::<CompB>().is_none());

		caps.add::<dyn Named>(Rc::new(CompA { name: "a".to_owned() }));
		caps.add(Rc::new(CompB { i: 114 }));

		assert!(caps.has::<dyn Named>());
		assert!(!caps.has::<CompA>());
		assert_eq!(caps.get::<dyn Named>().unwrap().name(), "a");
		assert_eq!(caps.get::<CompB>().unwrap().i, 114);
		assert_eq!(caps.len(), 2);
	}
}
