//! Fixtures shared by unit tests.

use std::rc::Rc;

use crate::config::{EngineConfiguration, ResultAction, ResultCode};
use crate::namespace::NamespaceTree;
use crate::node::{Node, NodeRef};
use crate::tracker::{AttributeList, AttributeTracker, InitTracker};

pub(crate) trait Transform {
	fn depth(&self) -> f32;
}

pub(crate) trait Collider {
	fn radius(&self) -> f32;
}

pub(crate) struct TestTransform(pub f32);

impl Transform for TestTransform {
	fn depth(&self) -> f32 {
		self.0
	}
}

pub(crate) struct TestBody {
	pub depth: f32,
	pub radius: f32,
}

impl Transform for TestBody {
	fn depth(&self) -> f32 {
		self.depth
	}
}

impl Collider for TestBody {
	fn radius(&self) -> f32 {
		self.radius
	}
}

pub(crate) fn init_logging() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Node providing `Transform` only.
pub(crate) fn transform_node(id: &str) -> NodeRef {
	Node::new(id)
		.with_capability::<dyn Transform>(Rc::new(TestTransform(1.0)))
		.into_ref()
}

/// Node providing both `Transform` and `Collider`.
pub(crate) fn body_node(id: &str, radius: f32) -> NodeRef {
	let body = Rc::new(TestBody { depth: 0.0, radius });
	Node::new(id)
		.with_capability::<dyn Transform>(body.clone())
		.with_capability::<dyn Collider>(body)
		.into_ref()
}

/// Namespace tree with `nodes` in its root scope.
pub(crate) fn namespace_with(nodes: &[&NodeRef]) -> NamespaceTree {
	let mut tree = NamespaceTree::new();
	let root = tree.root();
	for node in nodes {
		tree.add_node(root, Rc::clone(node)).unwrap();
	}
	tree
}

pub(crate) fn config_with(not_found: ResultAction, wrong_interface: ResultAction) -> EngineConfiguration {
	let mut config = EngineConfiguration::new();
	config
		.set_graph_object_result_action(ResultCode::GraphNodeNotFound, not_found)
		.set_graph_object_result_action(ResultCode::GraphNodeWrongInterface, wrong_interface);
	config
}

/// Run `f` with a tracker positioned on a single attribute, without a value if `value` is `None`.
pub(crate) fn with_attribute<R>(value: Option<&str>, f: impl FnOnce(&AttributeTracker) -> R) -> R {
	let config = EngineConfiguration::new();
	let graph = InitTracker::new(&config);
	let mut attributes = AttributeList::new();
	match value {
		Some(value) => attributes.push("value", value),
		None => attributes.push_without_value("value"),
	};
	let mut tracker = AttributeTracker::new(attributes, &graph);
	tracker.select("value");
	f(&tracker)
}
