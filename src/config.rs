use std::collections::HashMap;
use std::fmt;

use crate::formats::json::{JsonError, JsonObject, JsonResult};

/// Graph object errors whose severity is decided by the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
	/// A referenced node id could not be found in the namespace.
	GraphNodeNotFound,
	/// A referenced node does not provide the expected capability.
	GraphNodeWrongInterface,
}

impl ResultCode {
	pub const VALUES: [ResultCode; 2] = [ResultCode::GraphNodeNotFound, ResultCode::GraphNodeWrongInterface];

	pub fn name(self) -> &'static str {
		match self {
			ResultCode::GraphNodeNotFound => "GraphNodeNotFound",
			ResultCode::GraphNodeWrongInterface => "GraphNodeWrongInterface",
		}
	}
}

impl fmt::Display for ResultCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown result code {0:?}")]
pub struct UnknownResultCodeError(String);

impl TryFrom<&str> for ResultCode {
	type Error = UnknownResultCodeError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		match value {
			"GraphNodeNotFound" => Ok(ResultCode::GraphNodeNotFound),
			"GraphNodeWrongInterface" => Ok(ResultCode::GraphNodeWrongInterface),
			unknown => Err(UnknownResultCodeError(unknown.to_owned())),
		}
	}
}

/// What to do when a graph object error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultAction {
	/// Proceed silently.
	Ignore,
	/// Log a warning and proceed.
	Warn,
	/// Log an error and fail the operation.
	#[default]
	Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown result action {0:?}")]
pub struct UnknownResultActionError(String);

impl TryFrom<&str> for ResultAction {
	type Error = UnknownResultActionError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		match value {
			"Ignore" => Ok(ResultAction::Ignore),
			"Warn" => Ok(ResultAction::Warn),
			"Abort" => Ok(ResultAction::Abort),
			unknown => Err(UnknownResultActionError(unknown.to_owned())),
		}
	}
}

/// Engine-wide settings consulted while initializing the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfiguration {
	result_actions: HashMap<ResultCode, ResultAction>,
}

impl EngineConfiguration {
	pub fn new() -> Self {
		Self::default()
	}

	/// Action for `code`, `ResultAction::Abort` unless configured otherwise.
	pub fn graph_object_result_action(&self, code: ResultCode) -> ResultAction {
		self.result_actions.get(&code).copied().unwrap_or_default()
	}

	pub fn set_graph_object_result_action(&mut self, code: ResultCode, action: ResultAction) -> &mut Self {
		self.result_actions.insert(code, action);
		self
	}

	/// Apply the same action to every result code.
	pub fn set_all_graph_object_result_actions(&mut self, action: ResultAction) -> &mut Self {
		for code in ResultCode::VALUES {
			self.result_actions.insert(code, action);
		}
		self
	}

	/// Load from `{"graphObjectResultActions": {"GraphNodeNotFound": "Warn", ...}}`.
	///
	/// A missing `graphObjectResultActions` key yields the default configuration.
	pub fn from_json(payload: &json::JsonValue) -> JsonResult<Self> {
		const KEY: &str = "graphObjectResultActions";

		let obj = JsonObject::from_value("(configuration)", payload)?;
		let mut config = Self::new();
		if !obj.contains(KEY) {
			return Ok(config);
		}

		let actions = obj.get_object(KEY)?;
		for (code_name, _) in actions.entries() {
			let code = ResultCode::try_from(code_name).map_err(|_| {
				JsonError::UnknownName {
					key: KEY.to_owned(),
					name: code_name.to_owned(),
				}
			})?;
			let action_name = actions.get_str(code_name).map_err(|e| e.nested(KEY))?;
			let action = ResultAction::try_from(action_name).map_err(|_| {
				JsonError::UnknownName {
					key: code_name.to_owned(),
					name: action_name.to_owned(),
				}
				.nested(KEY)
			})?;
			config.set_graph_object_result_action(code, action);
		}

		Ok(config)
	}
}
