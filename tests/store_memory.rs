// std
use std::sync::Arc;
// self
use chainsync_client::{
	auth::{CredentialPair, SessionIdentity, UserType},
	store::{CompareAndSwapOutcome, CredentialStore, MemoryStore, StoreKey},
};

async fn seeded() -> MemoryStore {
	let store = MemoryStore::default();

	store
		.save_credentials(CredentialPair::new("access-old", "refresh-old"))
		.await
		.expect("Saving credential fixture into memory store should succeed.");
	store
		.save_identity(SessionIdentity::new(UserType::Retailer, "shop@example.com"))
		.await
		.expect("Saving identity fixture into memory store should succeed.");

	store
}

#[tokio::test]
async fn typed_reads_expose_stored_entries() {
	let store: Arc<dyn CredentialStore> = Arc::new(seeded().await);

	assert_eq!(
		store.access_token().await.expect("Access token lookup should succeed.").as_ref().map(
			|secret| secret.expose().to_owned()
		),
		Some("access-old".to_owned())
	);
	assert_eq!(
		store.identity().await.expect("Identity lookup should succeed."),
		Some(SessionIdentity::new(UserType::Retailer, "shop@example.com"))
	);
	assert!(store.is_authenticated().await.expect("Authentication lookup should succeed."));
}

#[tokio::test]
async fn cas_success_and_mismatch() {
	let store = seeded().await;
	let outcome = store
		.rotate_credentials("refresh-old", CredentialPair::new("access-new", "refresh-new"))
		.await
		.expect("Rotation with the current refresh token should succeed.");

	assert_eq!(outcome, CompareAndSwapOutcome::Updated);
	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-new"));
	assert_eq!(store.peek(StoreKey::RefreshToken).as_deref(), Some("refresh-new"));

	let outcome = store
		.rotate_credentials("refresh-old", CredentialPair::new("access-stale", "refresh-stale"))
		.await
		.expect("Rotation with a stale refresh token should not error.");

	assert_eq!(outcome, CompareAndSwapOutcome::RefreshMismatch);
	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-new"));
}

#[tokio::test]
async fn rotation_after_clear_reports_missing() {
	let store = seeded().await;

	store.clear().await.expect("Clearing the memory store should succeed.");

	let outcome = store
		.rotate_credentials("refresh-old", CredentialPair::new("access-new", "refresh-new"))
		.await
		.expect("Rotation against an empty store should not error.");

	assert_eq!(outcome, CompareAndSwapOutcome::Missing);
	assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_user_type_yields_no_identity() {
	let backend = MemoryStore::default();
	let store: Arc<dyn CredentialStore> = Arc::new(backend.clone());

	backend
		.save_credentials(CredentialPair::new("access", "refresh"))
		.await
		.expect("Saving credential fixture should succeed.");

	assert_eq!(store.identity().await.expect("Identity lookup should succeed."), None);
	assert!(store.is_authenticated().await.expect("Authentication lookup should succeed."));
}
