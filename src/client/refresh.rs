//! Refresh-token orchestration with a single-flight guard and CAS rotation.
//!
//! A caller that received 401 while holding access token `A` acquires the client-wide
//! refresh guard and re-reads the store. When the stored access token is no longer `A`,
//! another caller already rotated the pair and this caller simply retries. Otherwise it
//! exchanges the stored refresh token at the refresh endpoint and rotates both tokens through
//! [`CredentialStore::rotate_credentials`], so the pair is replaced as a unit and a concurrent
//! sign-out is never overwritten. Any failure ends the session.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	client::{ApiClient, ApiRequest},
	endpoints,
	http::HttpTransport,
	obs::{self, CallOutcome, CallSpan, Operation},
	store::CompareAndSwapOutcome,
};

/// Successful body of the refresh endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// New access token.
	pub access: TokenSecret,
	/// Rotated refresh token; absent when the backend does not rotate.
	#[serde(default)]
	pub refresh: Option<TokenSecret>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Recovers from a 401 received while holding `stale` (the access token that was sent).
	///
	/// Returns `Ok(())` when the caller should re-issue its request, or
	/// [`Error::AuthenticationExpired`] after clearing the stored credentials.
	pub(crate) async fn refresh_after_unauthorized(
		&self,
		stale: Option<&TokenSecret>,
	) -> Result<()> {
		const OP: Operation = Operation::Refresh;

		let span = CallSpan::new(OP, "refresh_after_unauthorized");

		obs::record_call_outcome(OP, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.refresh_guard.lock().await;
				let store = self.session.store();
				let current = store.access_token().await?;

				if current.is_some() && current.as_ref() != stale {
					self.refresh_metrics.record_coalesced();

					return Ok(());
				}

				self.refresh_metrics.record_attempt();

				let Some(refresh_token) = store.refresh_token().await? else {
					return Err(self.expire_session("no refresh token is stored".into()).await);
				};
				let replacement = match self.exchange_refresh_token(&refresh_token).await {
					Ok(pair) => pair,
					Err(e) => {
						let reason = format!("refresh failed: {}", e.user_message());

						return Err(self.expire_session(reason).await);
					},
				};

				match store.rotate_credentials(refresh_token.expose(), replacement).await? {
					CompareAndSwapOutcome::Updated | CompareAndSwapOutcome::RefreshMismatch => {
						self.refresh_metrics.record_success();

						Ok(())
					},
					CompareAndSwapOutcome::Missing =>
						Err(self.expire_session("credentials were cleared during refresh".into()).await),
				}
			})
			.await;

		span.record_outcome(CallOutcome::of(&result));
		obs::record_call_outcome(OP, CallOutcome::of(&result));

		result
	}

	/// Exchanges `refresh_token` for a new pair without touching the store.
	///
	/// The call is sent unauthenticated and is never itself refreshed. When the backend omits
	/// `refresh`, the current refresh token is kept in the returned pair.
	pub async fn exchange_refresh_token(
		&self,
		refresh_token: &TokenSecret,
	) -> Result<CredentialPair> {
		let request = ApiRequest::post(endpoints::AUTH_TOKEN_REFRESH)
			.json(json!({ "refresh": refresh_token.expose() }))
			.without_refresh();
		let response = self.dispatch(&request, None).await?;

		if !response.is_success() {
			return Err(Error::from_response(&response));
		}

		let RefreshResponse { access, refresh } = response.json()?;

		Ok(CredentialPair {
			access_token: access,
			refresh_token: refresh.unwrap_or_else(|| refresh_token.clone()),
		})
	}

	async fn expire_session(&self, reason: String) -> Error {
		self.refresh_metrics.record_failure();

		if let Err(e) = self.session.end().await {
			return e.into();
		}

		obs::record_credentials_cleared(&reason);

		Error::AuthenticationExpired { reason }
	}
}
