use faultline_core::{Client, ClientSettings};

use crate::VALID_API_KEY;

/// Helper for testing the settings endpoint using wiremock.
///
/// Returns a client with a valid API key whose server url points at the mock server.
///
/// Warning: when using `Mock::expected` ensure `server` is not dropped before the test completes,
pub async fn start_settings_mock(mocks: Vec<wiremock::Mock>) -> (wiremock::MockServer, Client) {
    let server = wiremock::MockServer::start().await;

    for mock in mocks {
        server.register(mock).await;
    }

    let client = Client::new(Some(ClientSettings {
        api_key: Some(VALID_API_KEY.to_string()),
        server_url: server.uri(),
        user_agent: "test-agent".to_string(),
        ..Default::default()
    }));

    (server, client)
}
