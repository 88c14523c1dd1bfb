//! Signs a OneRoster `users` query with OAuth 1.0a HMAC-SHA256 and sends it to a local mock
//! server, then shows the sentinel returned when the host cannot be reached.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use classlink_oauth::oauth1::{Credentials, RequestSigner};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/ims/oneroster/v1p1/users")
				.query_param("limit", "2")
				.header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"users\":[{\"sourcedId\":\"u-1\"},{\"sourcedId\":\"u-2\"}]}");
		})
		.await;
	let signer = RequestSigner::new(Credentials::new("demo-key", "demo-secret"));
	let url = format!(
		"{}?limit=2&filter=role%3D'teacher'",
		server.url("/ims/oneroster/v1p1/users")
	);
	let signed = signer.sign(&url)?;

	println!("Signature base string: {}.", signed.base_string);
	println!("Authorization: {}.", signed.authorization);

	let response = signer.sign_and_send(&url).await;

	println!("HTTP {}: {}.", response.status_code, response.response);

	users_mock.assert_async().await;

	let unreachable = signer.sign_and_send("http://127.0.0.1:9/ims/oneroster/v1p1/users").await;

	println!(
		"Unreachable host -> status {} ({}).",
		unreachable.status_code, unreachable.response
	);

	Ok(())
}
