//! Plugs an in-process transport into the client instead of reqwest.
//!
//! 1. Implement [`HttpTransport`] and answer every [`HttpRequest`] with an [`HttpResponse`].
//! 2. Report failures to obtain a response as [`TransportError`]; non-2xx statuses are plain
//!    responses.
//! 3. Pass the transport to [`ApiClient::with_transport`].

// std
use std::{io, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use chainsync_client::{
	auth::CredentialPair,
	client::ApiClient,
	config::ClientConfig,
	error::Error,
	http::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportFuture},
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::default());

	store.save_credentials(CredentialPair::new("offline-access", "offline-refresh")).await?;

	let config = ClientConfig::builder("http://chainsync.invalid").build()?;
	let client: ApiClient<OfflineTransport> =
		ApiClient::with_transport(config, store.clone() as Arc<dyn CredentialStore>, OfflineTransport);
	let categories: serde_json::Value = client.product_categories().await?;

	println!("Categories: {categories}.");

	match client.loan_history().await {
		Err(Error::NetworkUnavailable { message, .. }) => println!("{message}"),
		other => println!("Unexpected outcome: {other:?}."),
	}

	Ok(())
}

/// Serves the category listing and treats everything else as unreachable.
struct OfflineTransport;
impl HttpTransport for OfflineTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, HttpResponse> {
		Box::pin(async move {
			if request.header("authorization") != Some("Bearer offline-access") {
				return Ok(HttpResponse { status: 401, ..Default::default() });
			}

			match request.url.path() {
				"/api/products/categories/" => Ok(HttpResponse {
					status: 200,
					headers: vec![("content-type".into(), "application/json".into())],
					body: br#"[{"id":1,"name":"Grains"},{"id":2,"name":"Beverages"}]"#.to_vec(),
					retry_after: None,
				}),
				_ => Err(TransportError::Io(io::Error::new(
					io::ErrorKind::NotConnected,
					"offline transport has no route",
				))),
			}
		})
	}
}
