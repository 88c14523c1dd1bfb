//! Walks through the OneClick authorization-code flow against a local mock of the ClassLink
//! launchpad and info API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use classlink_oauth::oneclick::{CodeRequest, OneClick, OneClickConfig};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/v2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-bearer\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let info_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/my/info").header("authorization", "Bearer demo-bearer");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"UserId\":7,\"DisplayName\":\"Demo Teacher\"}");
		})
		.await;
	let config = OneClickConfig::builder("demo-client", "demo-secret")
		.authorization_endpoint(Url::parse(&server.url("/oauth2/v2/auth"))?)
		.token_endpoint(Url::parse(&server.url("/oauth2/v2/token"))?)
		.info_endpoint(Url::parse(&server.url("/"))?)
		.build()?;
	let oneclick = OneClick::new(config);
	let request =
		CodeRequest::default().with_redirect_uri("https://app.example.com/classlink/callback");

	println!("Send your user to {}.", oneclick.authorize_url(&request));

	// The redirect handler receives `?code=...`; a fixed code stands in for it here.
	let token = oneclick.exchange_code("demo-code").await?;
	let info = oneclick.user_info(token.access_token.secret()).await?;

	println!("Signed-in user: {info}.");

	token_mock.assert_async().await;
	info_mock.assert_async().await;

	Ok(())
}
