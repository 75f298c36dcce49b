use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use faultline_core::{
    submission::{SettingsResponse, SubmissionClient},
    ApiError, Client, ClientSettings, Configuration, SettingsMap,
};

/// An API key long enough to pass configuration validation.
pub const VALID_API_KEY: &str = "LhhP1C9gijpSKCslHHCvwdSIz298twx271nTest";

/// [`SubmissionClient`] which replays scripted responses and records every request.
///
/// Responses are returned in the order they were pushed. Once the script runs out every request
/// receives an unsuccessful response.
#[derive(Default)]
pub struct MockSubmissionClient {
    responses: Mutex<VecDeque<Result<SettingsResponse, ApiError>>>,
    requests: Mutex<Vec<i64>>,
}

impl MockSubmissionClient {
    /// A client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next settings request.
    pub fn push_response(&self, response: SettingsResponse) {
        self.responses
            .lock()
            .expect("Mock lock poisoned")
            .push_back(Ok(response));
    }

    /// Queue a transport error for the next settings request.
    pub fn push_error(&self, error: ApiError) {
        self.responses
            .lock()
            .expect("Mock lock poisoned")
            .push_back(Err(error));
    }

    /// The `after_version` of every settings request received so far.
    pub fn requests(&self) -> Vec<i64> {
        self.requests.lock().expect("Mock lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl SubmissionClient for MockSubmissionClient {
    async fn get_settings(
        &self,
        _config: &Configuration,
        after_version: i64,
    ) -> Result<SettingsResponse, ApiError> {
        self.requests
            .lock()
            .expect("Mock lock poisoned")
            .push(after_version);

        self.responses
            .lock()
            .expect("Mock lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(SettingsResponse::failure("No scripted response")))
    }
}

/// Build a client with the given API key and local settings that talks to `submission_client`.
pub fn client_with_submission_client(
    api_key: Option<&str>,
    settings: SettingsMap,
    submission_client: Arc<dyn SubmissionClient>,
) -> Client {
    Client::new_with_submission_client(
        Some(ClientSettings {
            api_key: api_key.map(str::to_string),
            settings,
            ..Default::default()
        }),
        submission_client,
    )
}
