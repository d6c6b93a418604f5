pub mod json;

pub use json::{JsonError, JsonObject, JsonResult};
