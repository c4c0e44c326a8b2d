//! Signs in against a mock backend, persists the session to disk, and lets the client refresh
//! an expired access token on its own.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use chainsync_client::{
	client::ReqwestApiClient,
	config::ClientConfig,
	http::ReqwestTransport,
	reqwest::Client,
	store::{CredentialStore, FileStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login/");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access":"demo-access","refresh":"demo-refresh","message":"Login successful","user":{"email":"shop@example.com","user_type":"retailer","is_profile_complete":true}}"#,
			);
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/cart/").header("authorization", "Bearer demo-access");
			then.status(401).body(r#"{"detail":"Given token not valid for any token type"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access":"demo-access-2","refresh":"demo-refresh-2"}"#);
		})
		.await;
	let cart = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/cart/").header("authorization", "Bearer demo-access-2");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":1,"items":[],"total_items":2,"total_amount":"18.40"}"#);
		})
		.await;
	let path = std::env::temp_dir().join("chainsync-demo-session.json");
	let store: Arc<dyn CredentialStore> = Arc::new(FileStore::open(path.clone())?);
	let config = ClientConfig::builder(server.base_url()).user_agent("chainsync-demo/0.1").build()?;
	// The mock server speaks TLS with a self-signed certificate.
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = ReqwestApiClient::with_transport(config, store, transport);
	let response = client.login("shop@example.com", "demo-password").await?;

	println!("{} as {}.", response.message, response.user.email);
	println!("Cart holds {} line(s).", client.cart_item_count().await);
	println!("Session persisted to {}.", path.display());

	login.assert_async().await;
	expired.assert_async().await;
	refresh.assert_async().await;
	cart.assert_async().await;

	client.logout().await?;

	Ok(())
}
