//! Registration, sign-in, email verification, and sign-out.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionIdentity, SessionState, TokenSecret, UserType},
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
	obs::{self, CallOutcome, CallSpan, Operation},
};

/// Input for [`ApiClient::register`].
#[derive(Clone)]
pub struct Registration {
	/// Account email.
	pub email: String,
	/// Chosen password; also sent as the confirmation field.
	pub password: String,
	/// Account role.
	pub user_type: UserType,
}
impl Registration {
	/// Bundles the registration fields.
	pub fn new(email: impl Into<String>, password: impl Into<String>, user_type: UserType) -> Self {
		Self { email: email.into(), password: password.into(), user_type }
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("user_type", &self.user_type)
			.finish()
	}
}

/// Successful registration body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
	/// Backend confirmation message.
	pub message: String,
	/// New account identifier; not every backend version returns it.
	#[serde(default)]
	pub user_id: Option<Value>,
	/// Registered email.
	pub email: String,
	/// Registered role.
	pub user_type: UserType,
}

/// Account summary embedded in [`LoginResponse`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
	/// Account email.
	pub email: String,
	/// Account role.
	pub user_type: UserType,
	/// Whether the role-specific profile has been filled in.
	#[serde(default)]
	pub is_profile_complete: bool,
}

/// Successful sign-in body.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
	/// Access token.
	pub access: TokenSecret,
	/// Refresh token.
	pub refresh: TokenSecret,
	/// Backend confirmation message.
	#[serde(default)]
	pub message: String,
	/// Signed-in account.
	pub user: LoginUser,
}

/// Plain `{message}` acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
	/// Backend message.
	#[serde(default)]
	pub message: String,
}

/// Profile completion status of the signed-in account.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProfileStatus {
	/// Account role.
	pub user_type: UserType,
	/// Whether the role-specific profile has been filled in.
	pub is_profile_complete: bool,
	/// Profile fields, when a profile exists.
	#[serde(default)]
	pub profile: Option<Value>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an account; the backend emails a verification token.
	pub async fn register(&self, registration: &Registration) -> Result<RegisterResponse> {
		let body = json!({
			"email": registration.email,
			"password": registration.password,
			"password2": registration.password,
			"user_type": registration.user_type,
		});

		observe(
			Operation::Register,
			"register",
			self.send_json(ApiRequest::post(endpoints::AUTH_REGISTER).json(body)),
		)
		.await
	}

	/// Signs in, then persists the token pair and identity before returning.
	///
	/// A 401 here means bad credentials and surfaces as [`Error::Unauthorized`].
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
		observe(Operation::Login, "login", async move {
			let request = ApiRequest::post(endpoints::AUTH_LOGIN)
				.json(json!({ "email": email, "password": password }));
			let response: LoginResponse = self.send_json(request).await?;

			self.session()
				.establish(
					CredentialPair {
						access_token: response.access.clone(),
						refresh_token: response.refresh.clone(),
					},
					SessionIdentity::new(response.user.user_type, response.user.email.clone()),
				)
				.await?;

			Ok(response)
		})
		.await
	}

	/// Confirms an email address with the emailed token.
	pub async fn verify_email(&self, token: &str) -> Result<MessageResponse> {
		observe(
			Operation::VerifyEmail,
			"verify_email",
			self.send_json(
				ApiRequest::post(endpoints::AUTH_VERIFY_EMAIL).json(json!({ "token": token })),
			),
		)
		.await
	}

	/// Asks the backend to send a new verification email.
	pub async fn resend_verification(&self, email: &str) -> Result<MessageResponse> {
		observe(
			Operation::VerifyEmail,
			"resend_verification",
			self.send_json(
				ApiRequest::post(endpoints::AUTH_RESEND_VERIFICATION)
					.json(json!({ "email": email })),
			),
		)
		.await
	}

	/// Signs out.
	///
	/// The server-side call is best effort; local credentials are cleared whatever it
	/// returns, and only a storage failure is reported.
	pub async fn logout(&self) -> Result<()> {
		observe(Operation::Logout, "logout", async move {
			if self.session().is_authenticated().await? {
				let request = ApiRequest::post(endpoints::AUTH_LOGOUT).without_refresh();

				// Best effort.
				let _ = self.send(request).await;
			}

			self.session().end().await?;
			obs::record_credentials_cleared("logout");

			Ok(())
		})
		.await
	}

	/// Returns `true` when an access token is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.session().is_authenticated().await?)
	}

	/// Cached identity of the signed-in account, read from storage.
	pub async fn current_user(&self) -> Result<Option<SessionIdentity>> {
		Ok(self.session().store().identity().await?)
	}

	/// Rebuilds the session state from storage, as done at application start.
	pub async fn restore_session(&self) -> Result<SessionState> {
		Ok(self.session().restore().await?)
	}

	/// Profile completion status of the signed-in account.
	pub async fn profile_status(&self) -> Result<ProfileStatus> {
		self.get(endpoints::AUTH_PROFILE_STATUS).await
	}
}

async fn observe<F, R>(op: Operation, stage: &'static str, fut: F) -> Result<R>
where
	F: Future<Output = Result<R>>,
{
	let span = CallSpan::new(op, stage);

	obs::record_call_outcome(op, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	span.record_outcome(CallOutcome::of(&result));
	obs::record_call_outcome(op, CallOutcome::of(&result));

	result
}
