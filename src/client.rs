//! Authenticated HTTP client with bearer injection and a single refresh-and-retry cycle.
//!
//! Every call reads the access token from the session's [`CredentialStore`] and attaches it
//! as a bearer credential. A 401 on a refreshable request triggers one refresh-token
//! exchange (serialized across concurrent callers, see [`refresh`]) followed by exactly one
//! re-issue of the original request; anything else is classified into [`Error`].

pub mod refresh;
pub mod request;

pub use refresh::RefreshMetrics;
pub use request::ApiRequest;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	config::ClientConfig,
	error::{ConfigError, TIMEOUT_MESSAGE},
	http::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError},
	obs::{self, CallOutcome, CallSpan, Operation},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Authenticated client for the backend API.
///
/// Cloning is cheap; clones share the transport, the session, the refresh guard, and the
/// refresh counters.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Validated configuration.
	pub config: Arc<ClientConfig>,
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	session: Session,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			config: Arc::new(config),
			transport: transport.into(),
			refresh_metrics: Default::default(),
			session: Session::new(store),
			refresh_guard: Default::default(),
		}
	}

	/// Session shared by this client and its clones.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Issues `method path` with an optional JSON body and extra headers, returning the parsed
	/// response body (`null` when empty).
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		body: Option<Value>,
		headers: &[(&str, &str)],
	) -> Result<Value> {
		let mut request = ApiRequest::new(method, path);

		request.body = body;

		for (name, value) in headers {
			request = request.header(*name, *value);
		}

		self.send_json(request).await
	}

	/// Sends a `GET` request and decodes the response.
	pub async fn get<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send_json(ApiRequest::get(path)).await
	}

	/// Sends a `POST` request with a JSON body and decodes the response.
	pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.send_json(ApiRequest::post(path).json_from(body)?).await
	}

	/// Sends a `PUT` request with a JSON body and decodes the response.
	pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.send_json(ApiRequest::put(path).json_from(body)?).await
	}

	/// Sends a `PATCH` request with a JSON body and decodes the response.
	pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.send_json(ApiRequest::patch(path).json_from(body)?).await
	}

	/// Sends a `DELETE` request and decodes the response.
	pub async fn delete<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send_json(ApiRequest::delete(path)).await
	}

	/// Sends `request` and decodes the successful body into `R`.
	pub async fn send_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send(request).await?.json()
	}

	/// Sends `request`, running the refresh-and-retry cycle on a first 401, and returns the
	/// raw 2xx response.
	pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
		const OP: Operation = Operation::Request;

		let span = CallSpan::new(OP, "send");

		obs::record_call_outcome(OP, CallOutcome::Attempt);

		let result = span.instrument(self.send_with_refresh(request)).await;

		span.record_outcome(CallOutcome::of(&result));
		obs::record_call_outcome(OP, CallOutcome::of(&result));

		result
	}

	async fn send_with_refresh(&self, request: ApiRequest) -> Result<HttpResponse> {
		let response = self.send_unchecked(request).await?;

		if response.is_success() { Ok(response) } else { Err(Error::from_response(&response)) }
	}

	/// Runs the refresh-and-retry cycle and returns the final response whatever its status.
	pub(crate) async fn send_unchecked(&self, mut request: ApiRequest) -> Result<HttpResponse> {
		loop {
			let token = self.session.store().access_token().await?;
			let response = self.dispatch(&request, token.as_ref()).await?;

			if response.status == 401 && request.refreshable && !request.retried {
				request.retried = true;

				self.refresh_after_unauthorized(token.as_ref()).await?;

				continue;
			}

			return Ok(response);
		}
	}

	/// Resolves `request` into a transport request and executes it once, with no refresh
	/// handling.
	pub(crate) async fn dispatch(
		&self,
		request: &ApiRequest,
		token: Option<&TokenSecret>,
	) -> Result<HttpResponse> {
		let prepared = self.prepare(request, token)?;

		self.transport.execute(prepared).await.map_err(|e| self.map_transport_error(e))
	}

	fn prepare(&self, request: &ApiRequest, token: Option<&TokenSecret>) -> Result<HttpRequest> {
		let url = self.config.endpoint_url(&request.path, &request.query)?;
		let mut headers = vec![
			("Content-Type".to_owned(), "application/json".to_owned()),
			("Accept".to_owned(), "application/json".to_owned()),
		];

		if let Some(user_agent) = &self.config.user_agent {
			headers.push(("User-Agent".into(), user_agent.clone()));
		}

		for (name, value) in &request.headers {
			headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
			headers.push((name.clone(), value.clone()));
		}

		let body = request
			.body
			.as_ref()
			.map(serde_json::to_vec)
			.transpose()
			.map_err(ConfigError::RequestEncode)?;
		let prepared =
			HttpRequest { method: request.method, url, headers, body, timeout: self.config.timeout };

		Ok(match token {
			Some(token) => prepared.with_bearer(token),
			None => prepared,
		})
	}

	fn map_transport_error(&self, e: TransportError) -> Error {
		match e {
			TransportError::Timeout => Error::Timeout { message: TIMEOUT_MESSAGE.into() },
			TransportError::Request { .. } => Error::Unknown { status: None, message: e.to_string() },
			TransportError::Network { .. } | TransportError::Io(_) => Error::NetworkUnavailable {
				message: format!(
					"Cannot connect to server at {}. Please check your network connection.",
					self.config.base_url.as_str().trim_end_matches('/'),
				),
				source: e,
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}

	/// Creates a client from environment configuration.
	pub fn from_env(store: Arc<dyn CredentialStore>) -> Result<Self> {
		Ok(Self::new(ClientConfig::from_env()?, store))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			session: self.session.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("timeout", &self.config.timeout)
			.field("session", &self.session)
			.finish()
	}
}
