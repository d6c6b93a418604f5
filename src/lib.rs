pub mod bounds;
pub mod config;
pub mod formats;
pub mod math;
pub mod namespace;
pub mod node;
pub mod property;
pub mod target;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use bounds::CountBounds;
pub use config::{EngineConfiguration, ResultAction, ResultCode};
pub use namespace::{Namespace, NamespaceTree, NamespaceView, ScopeId};
pub use node::{GraphNode, Node, NodeRef};
pub use property::{
	ArrayProperty, FieldProperty, MaskProperty, Property, PropertyEnum, PropertyHolder, PropertyInfo, PropertySemantic,
	PropertyValue, TypedProperty,
};
pub use target::{GenericNodeTarget, NodeArrayTarget, NodeTarget, TargetError, TargetResult};
pub use tracker::{AttributeError, AttributeResult, DeserializeAttributeTracker, GraphTracker};
