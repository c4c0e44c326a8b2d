#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use chainsync_client::{
	_preludet::*,
	api::Registration,
	auth::{CredentialPair, SessionIdentity, SessionState, UserType},
	store::{CredentialStore, StoreKey},
};

const LOGIN_BODY: &str = r#"{
	"message": "Login successful",
	"access": "access-x",
	"refresh": "refresh-y",
	"user": { "email": "shop@example.com", "user_type": "retailer", "is_profile_complete": true }
}"#;

#[tokio::test]
async fn login_persists_tokens_and_authenticates_later_calls() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/login/")
				.json_body(json!({ "email": "shop@example.com", "password": "hunter22" }));
			then.status(200).header("content-type", "application/json").body(LOGIN_BODY);
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/profile-status/").header("authorization", "Bearer access-x");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"user_type\":\"retailer\",\"is_profile_complete\":true}");
		})
		.await;
	let response =
		client.login("shop@example.com", "hunter22").await.expect("Login should succeed.");

	login.assert_async().await;

	assert_eq!(response.user.user_type, UserType::Retailer);
	assert_eq!(store.peek(StoreKey::AccessToken).as_deref(), Some("access-x"));
	assert_eq!(store.peek(StoreKey::RefreshToken).as_deref(), Some("refresh-y"));
	assert_eq!(store.peek(StoreKey::UserType).as_deref(), Some("retailer"));
	assert_eq!(store.peek(StoreKey::UserEmail).as_deref(), Some("shop@example.com"));
	assert_eq!(
		client.current_user().await.expect("Identity lookup should succeed."),
		Some(SessionIdentity::new(UserType::Retailer, "shop@example.com"))
	);

	let status = client.profile_status().await.expect("Profile status should succeed.");

	profile.assert_async().await;

	assert!(status.is_profile_complete);
}

#[tokio::test]
async fn bad_credentials_do_not_trigger_refresh() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login/");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"Invalid credentials\"}");
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200).body("{\"access\":\"never\"}");
		})
		.await;
	let err = client.login("shop@example.com", "wrong").await.expect_err("Login should fail.");

	refresh.assert_calls_async(0).await;

	match err {
		Error::Unauthorized { message } => assert_eq!(message, "Invalid credentials"),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert!(store.is_empty());
}

#[tokio::test]
async fn logout_clears_every_stored_key() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));

	store
		.save_credentials(CredentialPair::new("access-x", "refresh-y"))
		.await
		.expect("Failed to seed credential pair into the store.");
	store
		.save_identity(SessionIdentity::new(UserType::Supplier, "wholesale@example.com"))
		.await
		.expect("Failed to seed identity into the store.");

	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/logout/").header("authorization", "Bearer access-x");
			then.status(500).body("{\"detail\":\"Logout failed\"}");
		})
		.await;

	client.logout().await.expect("Logout should succeed even when the backend fails.");

	logout.assert_async().await;

	for key in StoreKey::ALL {
		assert_eq!(store.peek(key), None, "{key} should be cleared.");
	}

	assert!(!client.is_authenticated().await.expect("Authentication lookup should succeed."));
	assert_eq!(
		client.restore_session().await.expect("Session restore should succeed."),
		SessionState::Anonymous
	);
}

#[tokio::test]
async fn logout_without_session_skips_backend() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_reqwest_test_client(test_config(&server.base_url()));
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/logout/");
			then.status(200).body("{}");
		})
		.await;

	client.logout().await.expect("Anonymous logout should succeed.");

	logout.assert_calls_async(0).await;
}

#[tokio::test]
async fn register_sends_password_confirmation() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_config(&server.base_url()));
	let register = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/register/").json_body(json!({
				"email": "new@example.com",
				"password": "s3cret-pass",
				"password2": "s3cret-pass",
				"user_type": "supplier",
			}));
			then.status(201).header("content-type", "application/json").body(
				"{\"message\":\"Signup successful! Please verify your email.\",\"user_id\":12,\"email\":\"new@example.com\",\"user_type\":\"supplier\"}",
			);
		})
		.await;
	let response = client
		.register(&Registration::new("new@example.com", "s3cret-pass", UserType::Supplier))
		.await
		.expect("Registration should succeed.");

	register.assert_async().await;

	assert_eq!(response.user_type, UserType::Supplier);
	assert_eq!(response.user_id, Some(json!(12)));
	assert!(store.is_empty());
}

#[tokio::test]
async fn verify_email_posts_token() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_reqwest_test_client(test_config(&server.base_url()));
	let verify = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/verify-email/").json_body(json!({ "token": "tok-1" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"message\":\"Email verified successfully.\"}");
		})
		.await;
	let response = client.verify_email("tok-1").await.expect("Verification should succeed.");

	verify.assert_async().await;

	assert_eq!(response.message, "Email verified successfully.");
}
