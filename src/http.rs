//! Transport primitives for backend calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. The client resolves
//! URLs, headers, bodies, and timeouts into a plain [`HttpRequest`], hands it to the
//! transport, and interprets the returned [`HttpResponse`] itself, so custom transports only
//! move bytes and report whether a response arrived at all.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::TokenSecret};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing backend requests.
///
/// Implementations must honor [`HttpRequest::timeout`] and report an elapsed deadline as
/// [`TransportError::Timeout`]; every other failure to obtain a response is a
/// [`TransportError::Network`]. Non-2xx statuses are not errors at this layer.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and returns the full response.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, HttpResponse>;
}

/// HTTP methods used by the backend API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to a transport.
#[derive(Clone)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Header pairs in send order.
	pub headers: Vec<(String, String)>,
	/// Encoded body, if any.
	pub body: Option<Vec<u8>>,
	/// Deadline for the whole exchange.
	pub timeout: StdDuration,
}
impl HttpRequest {
	/// Attaches `Authorization: Bearer <token>`, replacing any existing authorization header.
	pub fn with_bearer(mut self, token: &TokenSecret) -> Self {
		self.headers.retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
		self.headers.push(("Authorization".into(), format!("Bearer {}", token.expose())));

		self
	}

	/// Returns the first value of the named header (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Response returned by a transport, regardless of status.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header pairs as received (values that are not valid UTF-8 are dropped).
	pub headers: Vec<(String, String)>,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl HttpResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the first value of the named header (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Decodes the body as JSON; an empty body decodes as `null`.
	pub fn json<R>(&self) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let bytes: &[u8] =
			if self.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &self.body };
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}

/// Failures that prevent a response from being received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The deadline elapsed before the exchange completed.
	#[error("Request timed out.")]
	Timeout,
	/// Underlying HTTP client reported a network failure (DNS, TCP, TLS, reset).
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request could not be constructed (invalid header, URL, or body).
	#[error("Request could not be constructed.")]
	Request {
		/// Transport-specific builder error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific request construction error.
	pub fn request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Request { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else if e.is_builder() {
			Self::request(e)
		} else {
			Self::network(e)
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The per-request timeout from [`HttpRequest::timeout`] is applied on every call, so a
/// custom [`ReqwestClient`] does not need its own timeout configured.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, HttpResponse> {
		Box::pin(async move {
			let HttpRequest { method, url, headers, body, timeout } = request;
			let mut builder = self.0.request(Self::method(method), url).timeout(timeout);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body, retry_after })
		})
	}
}

/// Parses a `Retry-After` value given either as delta-seconds or as an RFC 2822 date.
pub fn parse_retry_after_value(raw: &str) -> Option<Duration> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	headers.get(RETRY_AFTER)?.to_str().ok().and_then(parse_retry_after_value)
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}
