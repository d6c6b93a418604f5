//! Accessors over `json` objects, used to load engine configuration and attribute lists.

use json::JsonValue;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Key {0:?} does not exist")]
	KeyDoesNotExist(String),
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a string")]
	ValueIsNotString(String),
	#[error("Value at {0:?} cannot be used as an attribute value")]
	ValueIsNotScalar(String),
	#[error("Unknown name {name:?} at {key:?}")]
	UnknownName { key: String, name: String },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}
}

#[derive(Clone, Copy)]
pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	pub fn from_value(msg: &str, val: &'a JsonValue) -> JsonResult<Self> {
		match val {
			JsonValue::Object(obj) => Ok(JsonObject(obj)),
			_ => Err(JsonError::ValueIsNotObject(msg.to_owned())),
		}
	}

	fn get(&self, key: &str) -> JsonResult<&'a JsonValue> {
		match self.0.get(key) {
			Some(value) => Ok(value),
			None => Err(JsonError::KeyDoesNotExist(key.to_owned())),
		}
	}

	pub fn contains(&self, key: &str) -> bool {
		self.0.get(key).is_some()
	}

	pub fn get_object(&self, key: &str) -> JsonResult<JsonObject<'a>> {
		Self::from_value(key, self.get(key)?)
	}

	pub fn get_str(&self, key: &str) -> JsonResult<&'a str> {
		match self.get(key)?.as_str() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotString(key.to_owned())),
		}
	}

	/// Iterate over the key/value pairs in document order.
	pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a JsonValue)> {
		self.0.iter()
	}
}

/// Textual attribute form of a scalar or a flat list of scalars.
///
/// Lists are joined with commas, `null` becomes `None` (attribute present without a value).
pub fn as_attribute_text(key: &str, val: &JsonValue) -> JsonResult<Option<String>> {
	match val {
		JsonValue::Null => Ok(None),
		JsonValue::Array(items) => {
			let mut parts = Vec::with_capacity(items.len());
			for item in items {
				match scalar_text(item) {
					Some(text) => parts.push(text),
					None => return Err(JsonError::ValueIsNotScalar(key.to_owned())),
				}
			}
			Ok(Some(parts.join(",")))
		}
		other => match scalar_text(other) {
			Some(text) => Ok(Some(text)),
			None => Err(JsonError::ValueIsNotScalar(key.to_owned())),
		},
	}
}

fn scalar_text(val: &JsonValue) -> Option<String> {
	match val {
		JsonValue::Short(_) | JsonValue::String(_) => val.as_str().map(str::to_owned),
		JsonValue::Number(_) => Some(val.dump()),
		JsonValue::Boolean(b) => Some(b.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::{as_attribute_text, JsonError, JsonObject};

	#[test]
	fn attribute_text_forms() {
		let doc = json::parse(r#"{"a": "foo", "b": 1.5, "c": [1, 2, 3], "d": null, "e": true, "f": {"x": 1}}"#).unwrap();
		let obj = JsonObject::from_value("(doc)", &doc).unwrap();

		let texts = obj
			.entries()
			.filter(|(key, _)| *key != "f")
			.map(|(key, val)| as_attribute_text(key, val).unwrap())
			.collect::<Vec<_>>();
		assert_eq!(
			texts,
			vec![
				Some("foo".to_owned()),
				Some("1.5".to_owned()),
				Some("1,2,3".to_owned()),
				None,
				Some("true".to_owned()),
			]
		);

		let f = obj.get_object("f").unwrap();
		assert_eq!(
			as_attribute_text("f", &json::JsonValue::Object(f.0.clone())),
			Err(JsonError::ValueIsNotScalar("f".to_owned()))
		);
		assert_eq!(obj.get_str("b"), Err(JsonError::ValueIsNotString("b".to_owned())));
	}
}
