use std::collections::HashMap;

use crate::config::EngineConfiguration;
use crate::formats::json::{as_attribute_text, JsonObject, JsonResult};
use crate::namespace::{Namespace, NamespaceTree, NamespaceView, ScopeId};

use super::{parse, AttributeError, AttributeResult, DeserializeAttributeTracker, GraphTracker};

/// One resource attribute. `value` is `None` when the attribute is present without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList(Vec<Attribute>);

impl AttributeList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, name: &str, value: &str) -> &mut Self {
		self.0.push(Attribute {
			name: name.to_owned(),
			value: Some(value.to_owned()),
		});
		self
	}

	pub fn push_without_value(&mut self, name: &str) -> &mut Self {
		self.0.push(Attribute {
			name: name.to_owned(),
			value: None,
		});
		self
	}

	pub fn with(mut self, name: &str, value: &str) -> Self {
		self.push(name, value);
		self
	}

	/// Attributes from the keys of a JSON object, in document order.
	pub fn from_json(payload: &json::JsonValue) -> JsonResult<Self> {
		let obj = JsonObject::from_value("(attributes)", payload)?;
		let mut list = Self::new();
		for (name, val) in obj.entries() {
			list.0.push(Attribute {
				name: name.to_owned(),
				value: as_attribute_text(name, val)?,
			});
		}
		Ok(list)
	}

	pub fn get(&self, index: usize) -> Option<&Attribute> {
		self.0.get(index)
	}

	pub fn position(&self, name: &str) -> Option<usize> {
		self.0.iter().position(|attr| attr.name == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Graph context for the init and de-init passes: a stack of entered namespaces and the engine configuration.
pub struct InitTracker<'a> {
	tree: Option<&'a NamespaceTree>,
	scopes: Vec<NamespaceView<'a>>,
	config: &'a EngineConfiguration,
}

impl<'a> InitTracker<'a> {
	/// Tracker without any namespace. Id based references cannot be resolved with it.
	pub fn new(config: &'a EngineConfiguration) -> Self {
		Self {
			tree: None,
			scopes: Vec::new(),
			config,
		}
	}

	/// Tracker positioned at `scope` of `tree`.
	pub fn with_namespace(tree: &'a NamespaceTree, scope: ScopeId, config: &'a EngineConfiguration) -> Self {
		Self {
			tree: Some(tree),
			scopes: vec![tree.view(scope)],
			config,
		}
	}

	/// Make `scope` the current namespace until the matching `leave_namespace()`.
	pub fn enter_namespace(&mut self, scope: ScopeId) -> bool {
		match self.tree {
			Some(tree) => {
				self.scopes.push(tree.view(scope));
				true
			}
			None => false,
		}
	}

	pub fn leave_namespace(&mut self) -> bool {
		// the namespace passed at construction stays
		if self.scopes.len() > 1 {
			self.scopes.pop();
			true
		} else {
			false
		}
	}

	pub fn current_scope(&self) -> Option<ScopeId> {
		self.scopes.last().map(NamespaceView::scope)
	}
}

impl GraphTracker for InitTracker<'_> {
	fn current_namespace(&self) -> Option<&dyn Namespace> {
		self.scopes.last().map(|view| view as &dyn Namespace)
	}

	fn engine_configuration(&self) -> &EngineConfiguration {
		self.config
	}
}

/// Cursor over an [`AttributeList`], resolving `{param}` references from its parameter table.
pub struct AttributeTracker<'a> {
	attributes: AttributeList,
	current: Option<usize>,
	base_start: usize,
	params: HashMap<String, String>,
	graph: &'a dyn GraphTracker,
}

impl<'a> AttributeTracker<'a> {
	pub fn new(attributes: AttributeList, graph: &'a dyn GraphTracker) -> Self {
		Self {
			attributes,
			current: None,
			base_start: 0,
			params: HashMap::new(),
			graph,
		}
	}

	pub fn set_param(&mut self, name: &str, value: &str) -> &mut Self {
		self.params.insert(name.to_owned(), value.to_owned());
		self
	}

	pub fn attributes(&self) -> &AttributeList {
		&self.attributes
	}

	/// Make the attribute called `name` current. Its base name is the full name.
	pub fn select(&mut self, name: &str) -> bool {
		let index = self.attributes.position(name);
		self.current = index;
		self.base_start = 0;
		index.is_some()
	}

	/// Make the attribute called `name` current, with a base name of what follows `prefix`.
	pub fn select_prefixed(&mut self, name: &str, prefix: &str) -> bool {
		if !name.starts_with(prefix) {
			self.deselect();
			return false;
		}
		let found = self.select(name);
		if found {
			self.base_start = prefix.len();
		}
		found
	}

	pub(crate) fn select_index(&mut self, index: usize, prefix_len: usize) -> bool {
		match self.attributes.get(index) {
			Some(attr) if attr.name.is_char_boundary(prefix_len) => {
				self.current = Some(index);
				self.base_start = prefix_len;
				true
			}
			_ => {
				self.deselect();
				false
			}
		}
	}

	pub fn deselect(&mut self) {
		self.current = None;
		self.base_start = 0;
	}

	fn current(&self) -> Option<&Attribute> {
		self.attributes.get(self.current?)
	}
}

impl GraphTracker for AttributeTracker<'_> {
	fn current_namespace(&self) -> Option<&dyn Namespace> {
		self.graph.current_namespace()
	}

	fn engine_configuration(&self) -> &EngineConfiguration {
		self.graph.engine_configuration()
	}
}

impl DeserializeAttributeTracker for AttributeTracker<'_> {
	fn has_attribute_value(&self) -> bool {
		self.current().map(|attr| attr.value.is_some()).unwrap_or(false)
	}

	fn attribute_name(&self) -> &str {
		self.current().map(|attr| attr.name.as_str()).unwrap_or_default()
	}

	fn base_attribute_name(&self) -> &str {
		self.current()
			.map(|attr| &attr.name[self.base_start..])
			.unwrap_or_default()
	}

	fn raw_attribute_value(&self, evaluate_params: bool) -> AttributeResult<String> {
		let value = self
			.current()
			.and_then(|attr| attr.value.as_deref())
			.ok_or(AttributeError::NoValue)?;
		if evaluate_params {
			parse::evaluate_params(value, &self.params)
		} else {
			Ok(value.to_owned())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{AttributeList, AttributeTracker, InitTracker};
	use crate::config::EngineConfiguration;
	use crate::namespace::NamespaceTree;
	use crate::node::Node;
	use crate::tracker::{AttributeError, DeserializeAttributeTracker, GraphTracker};

	#[test]
	fn select_and_read() {
		let config = EngineConfiguration::new();
		let graph = InitTracker::new(&config);
		let attributes = AttributeList::new()
			.with("visible", "yes")
			.with("node3", "foo")
			.with("angle", "{a}deg");
		let mut tracker = AttributeTracker::new(attributes, &graph);
		tracker.set_param("a", "90");

		assert!(!tracker.has_attribute_value());
		assert_eq!(tracker.attribute_bool(), Err(AttributeError::NoValue.in_attribute("")));

		assert!(tracker.select("visible"));
		assert_eq!(tracker.attribute_bool(), Ok(true));

		assert!(tracker.select_prefixed("node3", "node"));
		assert_eq!(tracker.base_attribute_name(), "3");
		assert_eq!(tracker.attribute_name(), "node3");

		assert!(tracker.select("angle"));
		assert_eq!(tracker.attribute_string(false), Ok("{a}deg".to_owned()));
		let angle = tracker.attribute_angle_f64().unwrap();
		assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

		assert!(!tracker.select("missing"));
		assert!(!tracker.has_attribute_value());
	}

	#[test]
	fn parse_errors_name_the_attribute() {
		let config = EngineConfiguration::new();
		let graph = InitTracker::new(&config);
		let mut tracker = AttributeTracker::new(AttributeList::new().with("count", "many"), &graph);
		tracker.select("count");

		assert_eq!(
			tracker.attribute_u32(),
			Err(AttributeError::InAttribute {
				name: "count".to_owned(),
				inner: Box::new(AttributeError::NotInteger("many".to_owned())),
			})
		);
	}

	#[test]
	fn from_json() {
		let payload = json::parse(r#"{"id": "box", "size": [1, 2, 3], "parent": null}"#).unwrap();
		let list = AttributeList::from_json(&payload).unwrap();

		assert_eq!(list.len(), 3);
		assert_eq!(list.get(1).unwrap().value.as_deref(), Some("1,2,3"));
		assert_eq!(list.get(2).unwrap().value, None);
	}

	#[test]
	fn namespace_stack() {
		let mut tree = NamespaceTree::new();
		let root = tree.root();
		let inner = tree.add_namespace(root, "inner").unwrap();
		tree.add_node(inner, Node::new("x").into_ref()).unwrap();

		let config = EngineConfiguration::new();
		let mut tracker = InitTracker::with_namespace(&tree, root, &config);
		assert!(tracker.current_namespace().unwrap().find_node("x").is_none());

		assert!(tracker.enter_namespace(inner));
		assert!(tracker.current_namespace().unwrap().find_node("x").is_some());
		assert!(tracker.leave_namespace());
		assert!(!tracker.leave_namespace());
		assert_eq!(tracker.current_scope(), Some(root));

		assert!(InitTracker::new(&config).current_namespace().is_none());
	}
}
