//! Tracker contracts consumed by node targets and properties.
//!
//! A tracker is the per-pass cursor handed down by the traversal engine. The init pass only needs
//! the graph context ([`GraphTracker`]), deserialization additionally needs the attribute
//! currently being read ([`DeserializeAttributeTracker`]).

pub mod attributes;
pub mod parse;

use crate::bounds::CountBounds;
use crate::config::{EngineConfiguration, ResultAction, ResultCode};
use crate::math::Color;
use crate::namespace::Namespace;

pub use attributes::{Attribute, AttributeList, AttributeTracker, InitTracker};

pub type AttributeResult<T> = Result<T, AttributeError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
	#[error("No attribute value present")]
	NoValue,
	#[error("Value {0:?} is not a bool")]
	NotBool(String),
	#[error("Value {0:?} is not an integer")]
	NotInteger(String),
	#[error("Value {0:?} is not a number")]
	NotNumber(String),
	#[error("Value {0:?} is not an angle")]
	NotAngle(String),
	#[error("Value {0:?} is not a color")]
	NotColor(String),
	#[error("Value {0:?} is not a bit number in [0, 31]")]
	NotBitNumber(String),
	#[error("Unknown enum name {name:?}, expected one of {expected:?}")]
	UnknownEnumName { name: String, expected: Vec<String> },
	#[error("Expected a multiple of {expected} components in list, got {got}")]
	WrongComponentCount { expected: usize, got: usize },
	#[error("Expected at most {max} values, got {got}")]
	TooManyValues { max: usize, got: usize },
	#[error("Value count {count} is outside of {bounds}")]
	CountOutOfBounds { count: usize, bounds: CountBounds },
	#[error("Index {index} is out of range, limit is {limit}")]
	IndexOutOfRange { index: usize, limit: usize },
	#[error("Base attribute name {0:?} is not an index")]
	NotAnIndex(String),
	#[error("Unknown parameter {0:?}")]
	UnknownParameter(String),
	#[error("Unterminated parameter reference in {0:?}")]
	UnterminatedParameter(String),
	#[error("Unknown attribute {0:?}")]
	UnknownAttribute(String),
	#[error("Error in attribute {name:?}\n  - {inner}")]
	InAttribute { name: String, inner: Box<AttributeError> },
}

impl AttributeError {
	pub fn in_attribute(self, name: &str) -> Self {
		match self {
			// already carries the attribute name
			AttributeError::InAttribute { .. } => self,
			_ => AttributeError::InAttribute {
				name: name.to_owned(),
				inner: Box::new(self),
			},
		}
	}
}

/// Graph context of a traversal pass.
pub trait GraphTracker {
	/// Namespace that relative node ids are resolved in, if any.
	fn current_namespace(&self) -> Option<&dyn Namespace>;

	fn engine_configuration(&self) -> &EngineConfiguration;

	fn graph_object_result_action(&self, code: ResultCode) -> ResultAction {
		self.engine_configuration().graph_object_result_action(code)
	}
}

/// Stateful cursor over the attributes of a resource object.
///
/// Implementors only provide the raw attribute text; typed getters parse it with the
/// functions in [`parse`]. All getters fail with [`AttributeError::NoValue`] when
/// `has_attribute_value()` is false, so callers check that first.
pub trait DeserializeAttributeTracker: GraphTracker {
	fn has_attribute_value(&self) -> bool;

	/// Full name of the current attribute.
	fn attribute_name(&self) -> &str;

	/// Name of the current attribute without the prefix it was matched with.
	fn base_attribute_name(&self) -> &str;

	/// Text of the current attribute, with `{param}` references substituted if `evaluate_params` is set.
	fn raw_attribute_value(&self, evaluate_params: bool) -> AttributeResult<String>;

	fn attribute_string(&self, evaluate_params: bool) -> AttributeResult<String> {
		self.raw_attribute_value(evaluate_params)
			.map_err(|e| e.in_attribute(self.attribute_name()))
	}

	fn attribute_bool(&self) -> AttributeResult<bool> {
		parse_current(self, parse::parse_bool)
	}

	fn attribute_u32(&self) -> AttributeResult<u32> {
		parse_current(self, parse::parse_u32)
	}

	fn attribute_i32(&self) -> AttributeResult<i32> {
		parse_current(self, parse::parse_i32)
	}

	fn attribute_f32(&self) -> AttributeResult<f32> {
		parse_current(self, parse::parse_f32)
	}

	fn attribute_f64(&self) -> AttributeResult<f64> {
		parse_current(self, parse::parse_f64)
	}

	fn attribute_color(&self) -> AttributeResult<Color> {
		parse_current(self, parse::parse_color)
	}

	/// Angle with optional `deg`/`d` or `rad`/`r` suffix, in radians.
	fn attribute_angle_f32(&self) -> AttributeResult<f32> {
		parse_current(self, |text| parse::parse_angle(text).map(|angle| angle as f32))
	}

	fn attribute_angle_f64(&self) -> AttributeResult<f64> {
		parse_current(self, parse::parse_angle)
	}

	fn attribute_strings(&self) -> AttributeResult<Vec<String>> {
		parse_current(self, |text| {
			Ok(parse::split_list(text).into_iter().map(str::to_owned).collect())
		})
	}

	fn attribute_bools(&self) -> AttributeResult<Vec<bool>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_bool))
	}

	fn attribute_u32s(&self) -> AttributeResult<Vec<u32>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_u32))
	}

	fn attribute_i32s(&self) -> AttributeResult<Vec<i32>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_i32))
	}

	fn attribute_f32s(&self) -> AttributeResult<Vec<f32>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_f32))
	}

	fn attribute_f64s(&self) -> AttributeResult<Vec<f64>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_f64))
	}

	fn attribute_colors(&self) -> AttributeResult<Vec<Color>> {
		parse_current(self, parse::parse_colors)
	}

	fn attribute_angles_f32(&self) -> AttributeResult<Vec<f32>> {
		parse_current(self, |text| parse::parse_list(text, |item| parse::parse_angle(item).map(|a| a as f32)))
	}

	fn attribute_angles_f64(&self) -> AttributeResult<Vec<f64>> {
		parse_current(self, |text| parse::parse_list(text, parse::parse_angle))
	}

	/// Bool attribute that sets `mask` in `value` if true and clears it if false.
	fn attribute_flag_to_set(&self, mask: u32, value: u32) -> AttributeResult<u32> {
		let flag = self.attribute_bool()?;
		Ok(if flag { value | mask } else { value & !mask })
	}

	/// Bool attribute that clears `mask` in `value` if true and sets it if false.
	fn attribute_flag_to_clear(&self, mask: u32, value: u32) -> AttributeResult<u32> {
		let flag = self.attribute_bool()?;
		Ok(if flag { value & !mask } else { value | mask })
	}

	/// Comma separated bit numbers to set in `value`.
	fn attribute_bits_to_set(&self, value: u32) -> AttributeResult<u32> {
		Ok(value | parse_current(self, parse::parse_bits)?)
	}

	/// Comma separated bit numbers to clear in `value`.
	fn attribute_bits_to_clear(&self, value: u32) -> AttributeResult<u32> {
		Ok(value & !parse_current(self, parse::parse_bits)?)
	}

	/// Position of the attribute text in `names`.
	fn attribute_enum_value(&self, names: &[&str]) -> AttributeResult<usize> {
		parse_current(self, |text| parse::parse_enum(text, names))
	}

	fn attribute_enum_values(&self, names: &[&str]) -> AttributeResult<Vec<usize>> {
		parse_current(self, |text| parse::parse_list(text, |item| parse::parse_enum(item, names)))
	}

	/// Comma separated enum names, setting bit `1 << position` in `value` for each.
	fn attribute_enum_bits_to_set(&self, names: &[&str], value: u32) -> AttributeResult<u32> {
		Ok(value | parse_current(self, |text| parse::parse_enum_bits(text, names))?)
	}

	fn attribute_enum_bits_to_clear(&self, names: &[&str], value: u32) -> AttributeResult<u32> {
		Ok(value & !parse_current(self, |text| parse::parse_enum_bits(text, names))?)
	}
}

fn parse_current<T, F>(tracker: &(impl DeserializeAttributeTracker + ?Sized), parse: F) -> AttributeResult<T>
where
	F: FnOnce(&str) -> AttributeResult<T>,
{
	let text = tracker.attribute_string(true)?;
	parse(&text).map_err(|e| e.in_attribute(tracker.attribute_name()))
}
