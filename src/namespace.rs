pub mod path;

use std::collections::HashMap;
use std::fmt::{self, Display};

use indextree::{Arena, NodeId};

use crate::node::NodeRef;
use self::path::{NodePath, Segment};

/// Resolves node ids and paths relative to one scope of the graph.
pub trait Namespace {
	fn find_node(&self, path: &str) -> Option<NodeRef>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ScopeId(NodeId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
	#[error("Id {id:?} is already used in namespace {scope:?}")]
	DuplicateId { scope: String, id: String },
	#[error("Scope does not belong to this namespace tree")]
	UnknownScope,
}

#[derive(Debug)]
struct Scope {
	name: String,
	/// Node owning this scope, if the namespace is itself a graph node.
	node: Option<NodeRef>,
	nodes: HashMap<String, NodeRef>,
	/// Node ids in insertion order, for display.
	order: Vec<String>,
}

impl Scope {
	fn new(name: String, node: Option<NodeRef>) -> Self {
		Self {
			name,
			node,
			nodes: HashMap::new(),
			order: Vec::new(),
		}
	}
}

/// Tree of named scopes, each holding nodes by id.
#[derive(Debug)]
pub struct NamespaceTree {
	root: NodeId,
	arena: Arena<Scope>,
}

impl NamespaceTree {
	pub fn new() -> Self {
		let mut arena = Arena::new();
		let root = arena.new_node(Scope::new(String::new(), None));
		Self { root, arena }
	}

	pub fn root(&self) -> ScopeId {
		ScopeId(self.root)
	}

	fn scope(&self, scope: ScopeId) -> Result<&Scope, NamespaceError> {
		match self.arena.get(scope.0) {
			Some(node) if !node.is_removed() => Ok(node.get()),
			_ => Err(NamespaceError::UnknownScope),
		}
	}

	fn scope_mut(&mut self, scope: ScopeId) -> Result<&mut Scope, NamespaceError> {
		match self.arena.get_mut(scope.0) {
			Some(node) if !node.is_removed() => Ok(node.get_mut()),
			_ => Err(NamespaceError::UnknownScope),
		}
	}

	fn ensure_free(&self, parent: ScopeId, id: &str) -> Result<(), NamespaceError> {
		let scope = self.scope(parent)?;
		if scope.nodes.contains_key(id) || self.child_scope(parent, id).is_some() {
			return Err(NamespaceError::DuplicateId {
				scope: scope.name.clone(),
				id: id.to_owned(),
			});
		}
		Ok(())
	}

	/// Add an anonymous-node namespace named `name` below `parent`.
	pub fn add_namespace(&mut self, parent: ScopeId, name: &str) -> Result<ScopeId, NamespaceError> {
		self.ensure_free(parent, name)?;
		let id = self.arena.new_node(Scope::new(name.to_owned(), None));
		parent.0.append(id, &mut self.arena);
		Ok(ScopeId(id))
	}

	/// Add a namespace owned by `node`, named after the node id.
	pub fn add_namespace_node(&mut self, parent: ScopeId, node: NodeRef) -> Result<ScopeId, NamespaceError> {
		let name = node.node_id().to_owned();
		self.ensure_free(parent, &name)?;
		let id = self.arena.new_node(Scope::new(name, Some(node)));
		parent.0.append(id, &mut self.arena);
		Ok(ScopeId(id))
	}

	pub fn add_node(&mut self, scope: ScopeId, node: NodeRef) -> Result<(), NamespaceError> {
		let id = node.node_id().to_owned();
		self.ensure_free(scope, &id)?;
		let scope = self.scope_mut(scope)?;
		scope.order.push(id.clone());
		scope.nodes.insert(id, node);
		Ok(())
	}

	pub fn remove_node(&mut self, scope: ScopeId, id: &str) -> Option<NodeRef> {
		let scope = self.scope_mut(scope).ok()?;
		let node = scope.nodes.remove(id)?;
		scope.order.retain(|other| other != id);
		Some(node)
	}

	pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
		self.arena.get(scope.0)?.parent().map(ScopeId)
	}

	pub fn child_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
		scope
			.0
			.children(&self.arena)
			.find(|child| self.arena.get(*child).map(|c| c.get().name == name).unwrap_or(false))
			.map(ScopeId)
	}

	fn step(&self, scope: ScopeId, segment: &Segment<'_>) -> Option<ScopeId> {
		match segment {
			Segment::Current => Some(scope),
			Segment::Parent => self.parent(scope),
			Segment::Name(name) => self.child_scope(scope, name),
		}
	}

	/// Resolve a path naming a namespace.
	pub fn find_scope(&self, scope: ScopeId, path: &str) -> Option<ScopeId> {
		let path = NodePath::parse(path).ok()?;
		let start = if path.absolute { self.root() } else { scope };
		path.segments.iter().try_fold(start, |current, segment| self.step(current, segment))
	}

	/// Resolve a node id or path, starting at `scope`.
	///
	/// The last segment is looked up among the nodes of the reached scope first, then among
	/// its child namespaces. `.` and `..` as the last segment name the node owning that namespace.
	pub fn find_node(&self, scope: ScopeId, path: &str) -> Option<NodeRef> {
		let path = match NodePath::parse(path) {
			Ok(path) => path,
			Err(e) => {
				tracing::debug!("Invalid node path: {e}");
				return None;
			}
		};
		let start = if path.absolute { self.root() } else { scope };

		let Some((last, leading)) = path.split_last() else {
			return self.scope(start).ok()?.node.clone();
		};
		let parent = leading
			.iter()
			.try_fold(start, |current, segment| self.step(current, segment))?;

		match last {
			Segment::Name(name) => {
				if let Some(node) = self.scope(parent).ok()?.nodes.get(*name) {
					return Some(node.clone());
				}
				let child = self.child_scope(parent, name)?;
				self.scope(child).ok()?.node.clone()
			}
			other => {
				let target = self.step(parent, other)?;
				self.scope(target).ok()?.node.clone()
			}
		}
	}

	pub fn view(&self, scope: ScopeId) -> NamespaceView<'_> {
		NamespaceView { tree: self, scope }
	}
}

impl Default for NamespaceTree {
	fn default() -> Self {
		Self::new()
	}
}

/// A namespace tree seen from one of its scopes.
#[derive(Clone, Copy)]
pub struct NamespaceView<'a> {
	tree: &'a NamespaceTree,
	scope: ScopeId,
}

impl<'a> NamespaceView<'a> {
	pub fn tree(&self) -> &'a NamespaceTree {
		self.tree
	}

	pub fn scope(&self) -> ScopeId {
		self.scope
	}
}

impl Namespace for NamespaceView<'_> {
	fn find_node(&self, path: &str) -> Option<NodeRef> {
		self.tree.find_node(self.scope, path)
	}
}

fn rec_fmt(indent: usize, f: &mut fmt::Formatter<'_>, scope_id: NodeId, arena: &Arena<Scope>) -> fmt::Result {
	let Some(scope) = arena.get(scope_id) else {
		return Ok(());
	};
	let scope = scope.get();

	let name = if scope.name.is_empty() { "/" } else { scope.name.as_str() };
	#[cfg(feature = "owo")]
	let name = {
		use owo_colors::OwoColorize;
		name.magenta()
	};
	writeln!(f, "{}- [namespace] {}", "  ".repeat(indent), name)?;

	for id in &scope.order {
		let references = scope.nodes.get(id).map(|n| n.reference_count()).unwrap_or_default();
		writeln!(f, "{}- {} ({} refs)", "  ".repeat(indent + 1), id, references)?;
	}
	for child in scope_id.children(arena) {
		rec_fmt(indent + 1, f, child, arena)?;
	}

	Ok(())
}

impl Display for NamespaceTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		rec_fmt(0, f, self.root, &self.arena)
	}
}

#[cfg(test)]
mod tests {
	use super::{NamespaceError, NamespaceTree};
	use crate::node::Node;

	fn id_of(node: Option<crate::node::NodeRef>) -> Option<String> {
		node.map(|n| n.node_id().to_owned())
	}

	#[test]
	fn resolve_paths() {
		let mut tree = NamespaceTree::new();
		let root = tree.root();
		tree.add_node(root, Node::new("camera").into_ref()).unwrap();
		let level = tree.add_namespace_node(root, Node::new("level").into_ref()).unwrap();
		tree.add_node(level, Node::new("floor").into_ref()).unwrap();
		let props = tree.add_namespace(level, "props").unwrap();
		tree.add_node(props, Node::new("chair").into_ref()).unwrap();

		assert_eq!(id_of(tree.find_node(props, "chair")), Some("chair".to_owned()));
		assert_eq!(id_of(tree.find_node(props, "../floor")), Some("floor".to_owned()));
		assert_eq!(id_of(tree.find_node(props, "/camera")), Some("camera".to_owned()));
		assert_eq!(id_of(tree.find_node(props, "/level/props/chair")), Some("chair".to_owned()));
		assert_eq!(id_of(tree.find_node(root, "level")), Some("level".to_owned()));
		assert_eq!(id_of(tree.find_node(props, "..")), Some("level".to_owned()));
		assert_eq!(id_of(tree.find_node(level, ".")), Some("level".to_owned()));

		assert!(tree.find_node(props, "floor").is_none());
		assert!(tree.find_node(root, "..").is_none());
		assert!(tree.find_node(root, "props").is_none());
		assert!(tree.find_node(root, "level//floor").is_none());

		assert_eq!(tree.find_scope(root, "level/props"), Some(props));
		assert_eq!(tree.find_scope(props, "/"), Some(root));
	}

	#[test]
	fn reject_duplicates() {
		let mut tree = NamespaceTree::new();
		let root = tree.root();
		tree.add_node(root, Node::new("a").into_ref()).unwrap();

		assert_eq!(
			tree.add_node(root, Node::new("a").into_ref()),
			Err(NamespaceError::DuplicateId {
				scope: String::new(),
				id: "a".to_owned()
			})
		);
		assert!(tree.add_namespace(root, "a").is_err());

		assert!(tree.remove_node(root, "a").is_some());
		assert!(tree.add_namespace(root, "a").is_ok());
	}

	#[test]
	fn display() {
		let mut tree = NamespaceTree::new();
		let root = tree.root();
		let ns = tree.add_namespace(root, "ns").unwrap();
		tree.add_node(ns, Node::new("n").into_ref()).unwrap();

		let text = tree.to_string();
		assert!(text.contains("- [namespace] "));
		assert!(text.contains("ns"));
		assert!(text.contains("- n (0 refs)"));
	}
}
