//! Backend error-body shapes and the precedence used to turn them into user-facing text.
//!
//! The backend answers failures with a handful of JSON shapes: a bare string, an object
//! carrying `detail`, `error`, or `message`, or a serializer-style object mapping field
//! names to message arrays. [`ErrorBody::parse`] resolves a body to exactly one
//! [`ErrorBody`] variant, checking the shapes in that order, so callers never inspect
//! optional properties themselves.

// crates.io
use serde_json::Map;
// self
use crate::_prelude::*;

/// Fallback message when a failure body carries nothing readable.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred.";

/// Known backend error-body shapes, listed in precedence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorBody {
	/// The whole body is a string (JSON string or non-JSON text).
	Text(String),
	/// Object with a non-empty `detail` string.
	Detail(String),
	/// Object with a non-empty `error` string.
	Error(String),
	/// Object with a non-empty `message` string.
	Message(String),
	/// Object whose first field maps to a message or message array.
	Fields(FieldErrors),
	/// JSON that matches none of the shapes above.
	Unrecognized,
	/// No body at all.
	Empty,
}
impl ErrorBody {
	/// Resolves raw response bytes into a known shape.
	pub fn parse(bytes: &[u8]) -> Self {
		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Self::Empty;
		}

		match serde_json::from_slice::<Value>(bytes) {
			Ok(value) => Self::from_value(value),
			Err(_) => Self::Text(String::from_utf8_lossy(bytes).trim().to_owned()),
		}
	}

	/// Resolves an already-decoded JSON value into a known shape.
	pub fn from_value(value: Value) -> Self {
		match value {
			Value::Null => Self::Empty,
			Value::String(text) if text.trim().is_empty() => Self::Empty,
			Value::String(text) => Self::Text(text),
			Value::Object(map) => Self::from_object(map),
			_ => Self::Unrecognized,
		}
	}

	fn from_object(map: Map<String, Value>) -> Self {
		if let Some(text) = non_empty_str(&map, "detail") {
			return Self::Detail(text);
		}
		if let Some(text) = non_empty_str(&map, "error") {
			return Self::Error(text);
		}
		if let Some(text) = non_empty_str(&map, "message") {
			return Self::Message(text);
		}

		FieldErrors::from_object(map).map_or(Self::Unrecognized, Self::Fields)
	}

	/// Human-readable message carried by the body, if any.
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Text(text) | Self::Detail(text) | Self::Error(text) | Self::Message(text) =>
				Some(text),
			Self::Fields(fields) => fields.first_message(),
			Self::Unrecognized | Self::Empty => None,
		}
	}
}

/// Messages attached to a single request field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
	/// Field name as reported by the backend (`non_field_errors` included).
	pub field: String,
	/// Messages for the field, in backend order.
	pub messages: Vec<String>,
}

/// Ordered field-keyed validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);
impl FieldErrors {
	/// Collects field messages from a serializer-style object.
	///
	/// The first field decides the shape: when its value is neither a string nor an array
	/// containing strings, the object is not treated as field errors at all. Later fields
	/// that carry no strings are skipped.
	fn from_object(map: Map<String, Value>) -> Option<Self> {
		let mut fields = Vec::new();

		for (idx, (field, value)) in map.into_iter().enumerate() {
			let messages = match value {
				Value::String(text) if !text.is_empty() => vec![text],
				Value::Array(items) => items
					.into_iter()
					.filter_map(|item| match item {
						Value::String(text) if !text.is_empty() => Some(text),
						_ => None,
					})
					.collect(),
				_ => Vec::new(),
			};

			if messages.is_empty() {
				if idx == 0 {
					return None;
				}

				continue;
			}

			fields.push(FieldError { field, messages });
		}

		if fields.is_empty() { None } else { Some(Self(fields)) }
	}

	/// First message of the first field.
	pub fn first_message(&self) -> Option<&str> {
		self.0.first().and_then(|field| field.messages.first()).map(String::as_str)
	}

	/// Messages reported for `field`, if any.
	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.0.iter().find(|entry| entry.field == field).map(|entry| entry.messages.as_slice())
	}

	/// Iterates over fields in backend order.
	pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
		self.0.iter()
	}

	/// Number of fields with messages.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no field carried a message.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
	map.get(key).and_then(Value::as_str).filter(|text| !text.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn precedence_follows_documented_order() {
		let body = ErrorBody::parse(
			br#"{"quantity":["bad"],"message":"m","error":"e","detail":"d"}"#,
		);

		assert_eq!(body, ErrorBody::Detail("d".into()));

		let body = ErrorBody::parse(br#"{"quantity":["bad"],"message":"m","error":"e"}"#);

		assert_eq!(body, ErrorBody::Error("e".into()));

		let body = ErrorBody::parse(br#"{"quantity":["bad"],"message":"m"}"#);

		assert_eq!(body, ErrorBody::Message("m".into()));
	}

	#[test]
	fn string_bodies_win_over_everything() {
		assert_eq!(ErrorBody::parse(br#""Service paused""#), ErrorBody::Text("Service paused".into()));
		assert_eq!(
			ErrorBody::parse(b"<h1>Bad Gateway</h1>").message(),
			Some("<h1>Bad Gateway</h1>")
		);
	}

	#[test]
	fn first_field_message_is_surfaced() {
		let body = ErrorBody::parse(
			br#"{"email":["user with this email already exists."],"password":["Too short.","Too common."]}"#,
		);

		assert_eq!(body.message(), Some("user with this email already exists."));

		let ErrorBody::Fields(fields) = body else {
			panic!("Serializer errors should resolve to field errors.");
		};

		assert_eq!(fields.len(), 2);
		assert_eq!(
			fields.get("password"),
			Some(&["Too short.".to_owned(), "Too common.".to_owned()][..])
		);
	}

	#[test]
	fn single_string_field_counts_as_field_error() {
		let body = ErrorBody::parse(br#"{"non_field_errors":"Passwords do not match."}"#);

		assert_eq!(body.message(), Some("Passwords do not match."));
	}

	#[test]
	fn unreadable_shapes_fall_back() {
		assert_eq!(ErrorBody::parse(b""), ErrorBody::Empty);
		assert_eq!(ErrorBody::parse(b"null"), ErrorBody::Empty);
		assert_eq!(ErrorBody::parse(b"[1,2]"), ErrorBody::Unrecognized);
		assert_eq!(ErrorBody::parse(br#"{"count":3,"items":["x"]}"#), ErrorBody::Unrecognized);
		assert_eq!(ErrorBody::parse(br#"{"detail":""}"#), ErrorBody::Unrecognized);
		assert_eq!(ErrorBody::Unrecognized.message(), None);
	}
}
