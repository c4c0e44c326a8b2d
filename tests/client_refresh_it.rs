#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use chainsync_client::{
	_preludet::*,
	auth::CredentialPair,
	config::ClientConfig,
	store::{CredentialStore, MemoryStore, StoreKey},
};

async fn seed_pair(store: &MemoryStore, access: &str, refresh: &str) {
	store
		.save_credentials(CredentialPair::new(access, refresh))
		.await
		.expect("Failed to seed credential pair into the store.");
}

#[tokio::test]
async fn stored_access_token_is_sent_as_bearer() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-live", "refresh-live").await;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/cart/").header("authorization", "Bearer access-live");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":1,\"items\":[],\"total_items\":0,\"total_amount\":\"0.00\"}");
		})
		.await;
	let cart = client.cart().await.expect("Authenticated cart request should succeed.");

	mock.assert_async().await;

	assert_eq!(cart.total_items, 0);
}

#[tokio::test]
async fn unauthorized_triggers_one_refresh_and_one_retry() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-old", "refresh-old").await;

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/").header("authorization", "Bearer access-old");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Given token not valid for any token type\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/token/refresh/")
				.json_body(json!({ "refresh": "refresh-old" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"access-new\",\"refresh\":\"refresh-new\"}");
		})
		.await;
	let retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/").header("authorization", "Bearer access-new");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let orders = client.orders(None).await.expect("Request should succeed after a refresh.");

	assert!(orders.is_empty());

	expired.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	retried.assert_calls_async(1).await;

	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-new"));
	assert_eq!(store.peek(StoreKey::RefreshToken).as_deref(), Some("refresh-new"));
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.successes(), 1);
}

#[tokio::test]
async fn refresh_without_rotation_keeps_refresh_token() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-old", "refresh-keep").await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sales/daily/").header("authorization", "Bearer access-old");
			then.status(401).body("");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200).header("content-type", "application/json").body("{\"access\":\"access-2\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sales/daily/").header("authorization", "Bearer access-2");
			then.status(200).header("content-type", "application/json").body("{\"total\":0}");
		})
		.await;

	client.daily_sales().await.expect("Request should succeed after a refresh.");

	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-2"));
	assert_eq!(store.peek(StoreKey::RefreshToken).as_deref(), Some("refresh-keep"));
}

#[tokio::test]
async fn rejected_refresh_clears_credentials() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-old", "refresh-revoked").await;
	store
		.save_identity(chainsync_client::auth::SessionIdentity::new(
			chainsync_client::auth::UserType::Retailer,
			"shop@example.com",
		))
		.await
		.expect("Failed to seed identity into the store.");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/finance/loan/suggestion/");
			then.status(401).body("{\"detail\":\"Token is invalid or expired\"}");
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Token is blacklisted\",\"code\":\"token_not_valid\"}");
		})
		.await;
	let err = client.loan_suggestion().await.expect_err("Request should fail once refresh fails.");

	refresh.assert_calls_async(1).await;

	assert!(matches!(err, Error::AuthenticationExpired { .. }));
	assert!(err.requires_reauthentication());
	assert!(store.is_empty());
	assert!(!client.is_authenticated().await.expect("Authentication lookup should succeed."));
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn refresh_timeout_clears_credentials() {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder(server.base_url())
		.timeout(std::time::Duration::from_millis(200))
		.build()
		.expect("Short-timeout config should build.");
	let (client, store) = build_reqwest_test_client(config);

	seed_pair(&store, "access-old", "refresh-1").await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/sales/daily/");
			then.status(401).body("{\"detail\":\"Token expired\"}");
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.delay(std::time::Duration::from_secs(2))
				.body("{\"access\":\"too-late\"}");
		})
		.await;

	let err = client.daily_sales().await.expect_err("Request should fail once refresh times out.");

	assert!(matches!(err, Error::AuthenticationExpired { .. }));
	assert!(store.is_empty());
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn missing_refresh_token_fails_without_calling_refresh() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/inventory/low-stock/");
			then.status(401).body("{\"detail\":\"Authentication credentials were not provided.\"}");
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200).body("{\"access\":\"never\"}");
		})
		.await;
	let err = client.low_stock().await.expect_err("Anonymous request should fail on 401.");

	refresh.assert_calls_async(0).await;

	assert!(matches!(err, Error::AuthenticationExpired { .. }));
	assert!(store.is_empty());
}

#[tokio::test]
async fn second_unauthorized_does_not_refresh_again() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-old", "refresh-old").await;

	let protected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/products/supplier/products/");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"You do not have permission.\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"access-new\",\"refresh\":\"refresh-new\"}");
		})
		.await;
	let err = client.supplier_products().await.expect_err("Second 401 should surface.");

	protected.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	match err {
		Error::Unauthorized { message } => assert_eq!(message, "You do not have permission."),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-new"));
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_pair(&store, "access-old", "refresh-old").await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/cart/").header("authorization", "Bearer access-old");
			then.status(401).body("{\"detail\":\"Token expired\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/cart/").header("authorization", "Bearer access-new");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":9,\"items\":[],\"total_items\":3,\"total_amount\":\"42.00\"}");
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(100))
				.body("{\"access\":\"access-new\",\"refresh\":\"refresh-new\"}");
		})
		.await;
	let (first, second) = tokio::join!(client.cart(), client.cart_item_count());
	let first = first.expect("First concurrent request should succeed.");

	assert_eq!(first.total_items, 3);
	assert_eq!(second, 3);

	refresh.assert_calls_async(1).await;

	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert_eq!(client.refresh_metrics.coalesced(), 1);
}
