//! Explicit session object shared by the client and its service wrappers.
//!
//! A [`Session`] pairs a [`CredentialStore`] with an in-memory [`SessionState`] so the
//! signed-in status can be observed without touching storage, and so every mutation of the
//! stored credentials goes through one place.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionIdentity},
	store::{CredentialStore, StoreError},
};

/// In-memory view of the signed-in status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
	/// No usable credentials.
	#[default]
	Anonymous,
	/// Credentials are stored for the given identity.
	Authenticated(SessionIdentity),
}
impl SessionState {
	/// Returns the identity when authenticated.
	pub fn identity(&self) -> Option<&SessionIdentity> {
		match self {
			Self::Authenticated(identity) => Some(identity),
			Self::Anonymous => None,
		}
	}
}

/// Shared handle over the credential store and the observable session state.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn CredentialStore>,
	state: Arc<RwLock<SessionState>>,
}
impl Session {
	/// Creates an anonymous session over `store`; call [`Session::restore`] to load prior state.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store, state: Arc::new(RwLock::new(SessionState::Anonymous)) }
	}

	/// Underlying credential store.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Snapshot of the current state.
	pub fn state(&self) -> SessionState {
		self.state.read().clone()
	}

	/// Identity of the signed-in account, if any.
	pub fn identity(&self) -> Option<SessionIdentity> {
		self.state.read().identity().cloned()
	}

	/// Rebuilds the in-memory state from storage.
	///
	/// The session is authenticated only when both an access token and a recognizable
	/// identity are stored.
	pub async fn restore(&self) -> Result<SessionState, StoreError> {
		let state = if self.store.is_authenticated().await? {
			self.store.identity().await?.map_or(SessionState::Anonymous, SessionState::Authenticated)
		} else {
			SessionState::Anonymous
		};

		*self.state.write() = state.clone();

		Ok(state)
	}

	/// Persists a freshly issued pair plus identity and marks the session authenticated.
	pub async fn establish(
		&self,
		credentials: CredentialPair,
		identity: SessionIdentity,
	) -> Result<(), StoreError> {
		self.store.save_credentials(credentials).await?;
		self.store.save_identity(identity.clone()).await?;

		*self.state.write() = SessionState::Authenticated(identity);

		Ok(())
	}

	/// Marks the session anonymous and removes every stored entry.
	pub async fn end(&self) -> Result<(), StoreError> {
		*self.state.write() = SessionState::Anonymous;

		self.store.clear().await
	}

	/// Returns `true` when an access token is currently stored.
	pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
		self.store.is_authenticated().await
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("state", &*self.state.read()).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::{
		auth::UserType,
		store::{MemoryStore, StoreKey},
	};

	fn session() -> (Session, MemoryStore) {
		let backend = MemoryStore::default();
		let store: Arc<dyn CredentialStore> = Arc::new(backend.clone());

		(Session::new(store), backend)
	}

	#[test]
	fn establish_then_end_round_trips_state() {
		let rt = Runtime::new().expect("Failed to build Tokio runtime for session test.");
		let (session, backend) = session();
		let identity = SessionIdentity::new(UserType::Retailer, "r@example.com");

		rt.block_on(session.establish(CredentialPair::new("a", "r"), identity.clone()))
			.expect("Establishing a session should succeed.");

		assert_eq!(session.identity(), Some(identity));
		assert_eq!(backend.peek(StoreKey::UserEmail).as_deref(), Some("r@example.com"));

		rt.block_on(session.end()).expect("Ending a session should succeed.");

		assert_eq!(session.state(), SessionState::Anonymous);
		assert!(backend.is_empty());
	}

	#[test]
	fn restore_requires_token_and_identity() {
		let rt = Runtime::new().expect("Failed to build Tokio runtime for session test.");
		let (session, backend) = session();

		rt.block_on(backend.save_credentials(CredentialPair::new("a", "r")))
			.expect("Seeding credentials should succeed.");

		assert_eq!(
			rt.block_on(session.restore()).expect("Restore should succeed."),
			SessionState::Anonymous
		);

		rt.block_on(backend.save_identity(SessionIdentity::new(UserType::Supplier, "s@x.io")))
			.expect("Seeding identity should succeed.");

		let restored = rt.block_on(session.restore()).expect("Restore should succeed.");

		assert_eq!(
			restored,
			SessionState::Authenticated(SessionIdentity::new(UserType::Supplier, "s@x.io"))
		);
		assert!(rt.block_on(session.is_authenticated()).expect("Lookup should succeed."));
	}
}
