//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionIdentity},
	store::{
		self, CompareAndSwapOutcome, CredentialStore, Entries, StoreError, StoreFuture, StoreKey,
	},
};

type StoreMap = Arc<RwLock<Entries>>;

/// Credential store that keeps entries in-process; contents vanish with the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns a copy of the raw entry stored under `key`, bypassing the async contract.
	pub fn peek(&self, key: StoreKey) -> Option<String> {
		self.0.read().get(&key).cloned()
	}

	/// Returns `true` when no entry is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: StoreMap, credentials: CredentialPair) -> Result<(), StoreError> {
		store::write_credentials(&mut map.write(), credentials);

		Ok(())
	}

	fn rotate_now(
		map: StoreMap,
		expected_refresh: &str,
		replacement: CredentialPair,
	) -> CompareAndSwapOutcome {
		store::rotate_credentials(&mut map.write(), expected_refresh, replacement)
	}
}
impl CredentialStore for MemoryStore {
	fn fetch(&self, key: StoreKey) -> StoreFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn save_credentials(&self, credentials: CredentialPair) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, credentials) })
	}

	fn rotate_credentials<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: CredentialPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::rotate_now(map, expected_refresh, replacement)) })
	}

	fn save_identity(&self, identity: SessionIdentity) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			store::write_identity(&mut map.write(), identity);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			store::clear_entries(&mut map.write());

			Ok(())
		})
	}
}
