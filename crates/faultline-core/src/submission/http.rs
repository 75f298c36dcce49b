use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{SettingsResponse, SubmissionClient};
use crate::{ApiError, Configuration, SettingsMap};

/// Settings payload returned by the configuration endpoint.
#[derive(Deserialize)]
struct ServerSettingsModel {
    version: i64,
    settings: Option<SettingsMap>,
}

/// [`SubmissionClient`] which talks to the Faultline server over HTTP.
#[derive(Debug, Clone)]
pub struct DefaultSubmissionClient {
    http_client: reqwest::Client,
}

impl DefaultSubmissionClient {
    /// Create a submission client on top of a preconfigured HTTP client.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait::async_trait]
impl SubmissionClient for DefaultSubmissionClient {
    async fn get_settings(
        &self,
        config: &Configuration,
        after_version: i64,
    ) -> Result<SettingsResponse, ApiError> {
        let url = format!(
            "{}/api/v2/projects/config",
            config.config_server_url().trim_end_matches('/')
        );

        let mut request = self.http_client.get(url).query(&[("v", after_version)]);
        if let Some(api_key) = config.api_key() {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let content = response.text().await?;
        debug!(%status, after_version, "Received settings response");

        if status == StatusCode::NOT_MODIFIED {
            return Ok(SettingsResponse::failure("No settings changes"));
        }

        if !status.is_success() {
            return Ok(SettingsResponse::failure(format!(
                "Unable to retrieve configuration settings: [{status}] {content}"
            )));
        }

        let model: ServerSettingsModel = serde_json::from_str(&content)?;
        Ok(SettingsResponse {
            success: true,
            message: None,
            settings: model.settings,
            settings_version: model.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{Client, ClientSettings};

    const API_KEY: &str = "LhhP1C9gijpSKCslHHCvwdSIz298twx271nTest";

    async fn start(mock: Mock) -> (MockServer, Client) {
        let server = MockServer::start().await;
        server.register(mock).await;

        let client = Client::new(Some(ClientSettings {
            api_key: Some(API_KEY.to_string()),
            server_url: server.uri(),
            ..Default::default()
        }));

        (server, client)
    }

    #[tokio::test]
    async fn test_get_settings_success() {
        let (_server, client) = start(
            Mock::given(method("GET"))
                .and(path("/api/v2/projects/config"))
                .and(query_param("v", "4"))
                .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "version": 5,
                    "settings": { "@@log:*": "Warn" },
                })))
                .expect(1),
        )
        .await;

        let config = client.config();
        let response = config
            .submission_client()
            .get_settings(config, 4)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.settings_version, 5);
        assert_eq!(
            response.settings,
            Some(HashMap::from([("@@log:*".to_string(), "Warn".to_string())]))
        );
    }

    #[tokio::test]
    async fn test_get_settings_not_modified() {
        let (_server, client) = start(
            Mock::given(method("GET"))
                .and(path("/api/v2/projects/config"))
                .respond_with(ResponseTemplate::new(304)),
        )
        .await;

        let config = client.config();
        let response = config
            .submission_client()
            .get_settings(config, 5)
            .await
            .unwrap();

        assert!(!response.success);
        assert!(response.settings.is_none());
    }

    #[tokio::test]
    async fn test_get_settings_server_error() {
        let (_server, client) = start(
            Mock::given(method("GET"))
                .and(path("/api/v2/projects/config"))
                .respond_with(ResponseTemplate::new(401).set_body_string("Invalid api key")),
        )
        .await;

        let config = client.config();
        let response = config
            .submission_client()
            .get_settings(config, 0)
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Unable to retrieve configuration settings: [401 Unauthorized] Invalid api key")
        );
    }

    #[tokio::test]
    async fn test_get_settings_invalid_body() {
        let (_server, client) = start(
            Mock::given(method("GET"))
                .and(path("/api/v2/projects/config"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json")),
        )
        .await;

        let config = client.config();
        let result = config.submission_client().get_settings(config, 0).await;

        assert!(matches!(result, Err(crate::ApiError::Serde(_))));
    }
}
