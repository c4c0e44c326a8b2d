//! Call-site request context: method, path, query, headers, body, and refresh policy.

// self
use crate::{_prelude::*, endpoints, http::Method};

/// Request context for a single backend call, owned by the call site.
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Endpoint path relative to the base URL.
	pub path: String,
	/// Query pairs appended to the URL.
	pub query: Vec<(String, String)>,
	/// Extra headers; a name matching a default header replaces it.
	pub headers: Vec<(String, String)>,
	/// JSON body, if any.
	pub body: Option<Value>,
	/// Whether a 401 may trigger the refresh-and-retry cycle.
	pub refreshable: bool,
	pub(crate) retried: bool,
}
impl ApiRequest {
	/// Creates a request for `path`.
	///
	/// Requests are refreshable unless `path` is one of the credential endpoints
	/// (register, login, email verification, token refresh), where a 401 reports bad input.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		let path = path.into();
		let refreshable = !endpoints::is_auth_endpoint(&path);

		Self {
			method,
			path,
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
			refreshable,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query pair.
	pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Appends a query pair when `value` is present.
	pub fn query_opt<V>(self, name: impl Into<String>, value: Option<V>) -> Self
	where
		V: ToString,
	{
		match value {
			Some(value) => self.query(name, value),
			None => self,
		}
	}

	/// Adds or replaces a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();

		self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));

		self
	}

	/// Sets the JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes `body` and sets it as the JSON body.
	pub fn json_from<B>(self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let value =
			serde_json::to_value(body).map_err(crate::error::ConfigError::RequestEncode)?;

		Ok(self.json(value))
	}

	/// Disables the refresh-and-retry cycle; a 401 surfaces as [`Error::Unauthorized`].
	pub fn without_refresh(mut self) -> Self {
		self.refreshable = false;

		self
	}

	/// Returns `true` once the request has been re-issued after a refresh.
	pub fn is_retried(&self) -> bool {
		self.retried
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("query", &self.query)
			.field("header_names", &self.headers.iter().map(|(name, _)| name).collect::<Vec<_>>())
			.field("has_body", &self.body.is_some())
			.field("refreshable", &self.refreshable)
			.field("retried", &self.retried)
			.finish()
	}
}
