//! Client-level error taxonomy shared by the transport, session, and service layers.

// self
use crate::{
	_prelude::*,
	http::{HttpResponse, TransportError},
	message::{ErrorBody, FieldErrors, GENERIC_ERROR_MESSAGE},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message surfaced when the backend does not answer within the configured timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";
/// Message surfaced to users when their session can no longer be refreshed.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The refresh token is missing or was rejected; stored credentials have been cleared.
	#[error("Session expired: {reason}.")]
	AuthenticationExpired {
		/// Why the session could not be refreshed.
		reason: String,
	},
	/// The backend answered 401 for a request that cannot (or can no longer) be refreshed.
	#[error("{message}")]
	Unauthorized {
		/// Backend-supplied message.
		message: String,
	},
	/// The backend rejected the payload with field-keyed validation errors.
	#[error("{message}")]
	Validation {
		/// HTTP status code (4xx).
		status: u16,
		/// Summary message (first message of the first field).
		message: String,
		/// Every field-keyed message returned by the backend.
		fields: FieldErrors,
	},
	/// Any other 4xx response.
	#[error("{message}")]
	Rejected {
		/// HTTP status code (4xx).
		status: u16,
		/// Backend-supplied message.
		message: String,
	},
	/// No response was received from the backend.
	#[error("{message}")]
	NetworkUnavailable {
		/// Human-readable summary naming the unreachable server.
		message: String,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The backend did not answer within the configured timeout.
	#[error("{message}")]
	Timeout {
		/// Human-readable summary.
		message: String,
	},
	/// The backend failed with a 5xx status.
	#[error("{message}")]
	Server {
		/// HTTP status code (5xx).
		status: u16,
		/// Backend-supplied message.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Anything the taxonomy does not classify (unexpected statuses, malformed requests).
	#[error("{message}")]
	Unknown {
		/// HTTP status code, when a response was received.
		status: Option<u16>,
		/// Best-effort message.
		message: String,
	},
	/// A successful response body did not match the expected shape.
	#[error("Backend returned a response that could not be decoded.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
}
impl Error {
	/// Classifies a non-successful response into the client taxonomy.
	///
	/// The message is extracted through [`ErrorBody`], so the precedence
	/// (string body, `detail`, `error`, `message`, first field error) is the same for every
	/// status.
	pub fn from_response(response: &HttpResponse) -> Self {
		let body = ErrorBody::parse(&response.body);
		let message = body.message().unwrap_or(GENERIC_ERROR_MESSAGE).to_owned();
		let status = response.status;

		match status {
			401 => Self::Unauthorized { message },
			400..=499 => match body {
				ErrorBody::Fields(fields) => Self::Validation { status, message, fields },
				_ => Self::Rejected { status, message },
			},
			500..=599 => Self::Server { status, message, retry_after: response.retry_after },
			_ => Self::Unknown { status: Some(status), message },
		}
	}

	/// HTTP status code associated with the failure, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Unauthorized { .. } => Some(401),
			Self::Validation { status, .. }
			| Self::Rejected { status, .. }
			| Self::Server { status, .. }
			| Self::Decode { status, .. } => Some(*status),
			Self::Unknown { status, .. } => *status,
			_ => None,
		}
	}

	/// Per-field validation messages, when the backend returned them.
	pub fn field_errors(&self) -> Option<&FieldErrors> {
		match self {
			Self::Validation { fields, .. } => Some(fields),
			_ => None,
		}
	}

	/// Returns `true` when the caller must route the user back to sign-in.
	pub fn requires_reauthentication(&self) -> bool {
		matches!(self, Self::AuthenticationExpired { .. })
	}

	/// Single human-readable summary suitable for a dialog.
	pub fn user_message(&self) -> String {
		match self {
			Self::AuthenticationExpired { .. } => SESSION_EXPIRED_MESSAGE.into(),
			Self::Unauthorized { message }
			| Self::Validation { message, .. }
			| Self::Rejected { message, .. }
			| Self::NetworkUnavailable { message, .. }
			| Self::Timeout { message }
			| Self::Server { message, .. }
			| Self::Unknown { message, .. } => message.clone(),
			Self::Storage(_) | Self::Config(_) | Self::Decode { .. } => self.to_string(),
		}
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("Base URL scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// A zero timeout would fail every request immediately.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// Timeout override from the environment is not a number of milliseconds.
	#[error("Timeout `{value}` is not a valid number of milliseconds.")]
	InvalidTimeout {
		/// Raw value that failed to parse.
		value: String,
	},
	/// Endpoint path cannot be joined onto the base URL.
	#[error("Endpoint path `{path}` is invalid.")]
	InvalidPath {
		/// Path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A path parameter cannot be expressed as a single URL path segment.
	#[error("Path segment `{segment}` is invalid.")]
	InvalidPathSegment {
		/// Rejected raw value.
		segment: String,
	},
	/// Request payload could not be encoded as JSON.
	#[error("Request body could not be encoded as JSON.")]
	RequestEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
