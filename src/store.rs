//! Storage contracts and built-in credential stores.
//!
//! Stores hold four string entries under fixed keys (see [`StoreKey`]). The write surface is
//! deliberately narrow: tokens can only be written as a [`CredentialPair`], either
//! unconditionally on sign-in or through a refresh-token compare-and-swap on rotation, so no
//! caller can leave a mismatched access/refresh pair behind.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionIdentity, TokenSecret, UserType},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the raw value stored under `key`.
	fn fetch(&self, key: StoreKey) -> StoreFuture<'_, Option<String>>;

	/// Replaces both tokens unconditionally.
	fn save_credentials(&self, credentials: CredentialPair) -> StoreFuture<'_, ()>;

	/// Replaces both tokens if the stored refresh token still equals `expected_refresh`.
	fn rotate_credentials<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: CredentialPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome>;

	/// Persists the session identity (user type and email).
	fn save_identity(&self, identity: SessionIdentity) -> StoreFuture<'_, ()>;

	/// Removes every entry listed in [`StoreKey::ALL`].
	fn clear(&self) -> StoreFuture<'_, ()>;
}
impl dyn CredentialStore {
	/// Returns the stored access token, if any.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.fetch(StoreKey::AccessToken).await?.map(TokenSecret::from))
	}

	/// Returns the stored refresh token, if any.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.fetch(StoreKey::RefreshToken).await?.map(TokenSecret::from))
	}

	/// Returns the stored identity when a recognizable user type is present.
	pub async fn identity(&self) -> Result<Option<SessionIdentity>, StoreError> {
		let Some(user_type) = self.fetch(StoreKey::UserType).await? else {
			return Ok(None);
		};
		let Ok(user_type) = user_type.parse::<UserType>() else {
			return Ok(None);
		};
		let email = self.fetch(StoreKey::UserEmail).await?.unwrap_or_default();

		Ok(Some(SessionIdentity::new(user_type, email)))
	}

	/// Returns `true` when an access token is stored.
	pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
		Ok(self.fetch(StoreKey::AccessToken).await?.is_some())
	}
}

/// Fixed keys under which credential entries are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
	/// Bearer credential.
	AccessToken,
	/// Refresh credential.
	RefreshToken,
	/// Cached account role.
	UserType,
	/// Cached account email.
	UserEmail,
}
impl StoreKey {
	/// Every key owned by the client; `clear` removes all of them.
	pub const ALL: [StoreKey; 4] =
		[StoreKey::AccessToken, StoreKey::RefreshToken, StoreKey::UserType, StoreKey::UserEmail];

	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreKey::AccessToken => "@chainsync_access_token",
			StoreKey::RefreshToken => "@chainsync_refresh_token",
			StoreKey::UserType => "@chainsync_user_type",
			StoreKey::UserEmail => "@chainsync_user_email",
		}
	}

	/// Maps a persisted key name back to its [`StoreKey`].
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|key| key.as_str() == name)
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of a refresh-token compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The refresh token matched and both tokens were replaced.
	Updated,
	/// A different refresh token is stored; another rotation already happened.
	RefreshMismatch,
	/// No refresh token is stored; the session was cleared meanwhile.
	Missing,
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

pub(crate) type Entries = HashMap<StoreKey, String>;

pub(crate) fn write_credentials(entries: &mut Entries, credentials: CredentialPair) {
	entries.insert(StoreKey::AccessToken, credentials.access_token.expose().to_owned());
	entries.insert(StoreKey::RefreshToken, credentials.refresh_token.expose().to_owned());
}

pub(crate) fn rotate_credentials(
	entries: &mut Entries,
	expected_refresh: &str,
	replacement: CredentialPair,
) -> CompareAndSwapOutcome {
	let outcome = match entries.get(&StoreKey::RefreshToken) {
		Some(current) if current == expected_refresh => CompareAndSwapOutcome::Updated,
		Some(_) => CompareAndSwapOutcome::RefreshMismatch,
		None => CompareAndSwapOutcome::Missing,
	};

	if matches!(outcome, CompareAndSwapOutcome::Updated) {
		write_credentials(entries, replacement);
	}

	outcome
}

pub(crate) fn write_identity(entries: &mut Entries, identity: SessionIdentity) {
	entries.insert(StoreKey::UserType, identity.user_type.as_str().to_owned());
	entries.insert(StoreKey::UserEmail, identity.email);
}

pub(crate) fn clear_entries(entries: &mut Entries) {
	for key in StoreKey::ALL {
		entries.remove(&key);
	}
}
