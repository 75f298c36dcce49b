use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use tracing::warn;

use super::internal::InternalClient;
use crate::{
    client::{
        client_settings::{ClientSettings, DEFAULT_USER_AGENT},
        Configuration,
    },
    error_parser::SourceChainErrorParser,
    submission::{DefaultSubmissionClient, SubmissionClient},
};

/// The main struct to interact with the Faultline SDK.
#[derive(Debug, Clone)]
pub struct Client {
    // Important: The [`Client`] struct requires its `Clone` implementation to return an owned
    // reference to the same instance. Plugins and settings handlers hold clones of the client, so
    // any mutable state needs to be behind an Arc, ideally as part of the existing
    // [`InternalClient`] struct.
    #[doc(hidden)]
    pub internal: Arc<InternalClient>,
}

impl Client {
    /// Create a new client which talks to the configured server over HTTP.
    pub fn new(settings: Option<ClientSettings>) -> Self {
        let settings = settings.unwrap_or_default();

        let http_client = new_http_client_builder()
            .default_headers(build_default_headers(&settings))
            .build()
            .expect("HTTP Client build should not fail");

        Self::new_with_submission_client(
            Some(settings),
            Arc::new(DefaultSubmissionClient::new(http_client)),
        )
    }

    /// Create a new client using a custom submission client, for hosts that provide their own
    /// transport.
    pub fn new_with_submission_client(
        settings: Option<ClientSettings>,
        submission_client: Arc<dyn SubmissionClient>,
    ) -> Self {
        let settings = settings.unwrap_or_default();

        Self {
            internal: Arc::new(InternalClient {
                configuration: Configuration::new(
                    settings,
                    submission_client,
                    Some(Arc::new(SourceChainErrorParser)),
                ),
            }),
        }
    }

    /// The configuration shared by every component of this client.
    pub fn config(&self) -> &Configuration {
        &self.internal.configuration
    }
}

fn new_http_client_builder() -> reqwest::ClientBuilder {
    #[allow(unused_mut)]
    let mut client_builder = reqwest::Client::builder();

    // Enforce HTTPS for all requests in non-debug builds
    #[cfg(not(debug_assertions))]
    {
        client_builder = client_builder.https_only(true);
    }

    client_builder
}

/// Build default headers for the Faultline HttpClient
fn build_default_headers(settings: &ClientSettings) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();

    let user_agent = HeaderValue::from_str(&settings.user_agent).unwrap_or_else(|e| {
        warn!("Invalid user agent {:?}, using the default: {e}", settings.user_agent);
        HeaderValue::from_static(DEFAULT_USER_AGENT)
    });
    headers.append(header::USER_AGENT, user_agent);

    headers
}
