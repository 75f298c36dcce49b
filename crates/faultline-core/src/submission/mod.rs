//! Communication with the Faultline server.

mod http;

pub use http::DefaultSubmissionClient;

use crate::{ApiError, Configuration, SettingsMap};

/// Outcome of a settings fetch.
///
/// An unsuccessful response is not an error: the server may simply have nothing newer than the
/// requested version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsResponse {
    #[allow(missing_docs)]
    pub success: bool,
    /// Human readable reason for an unsuccessful response.
    pub message: Option<String>,
    /// The complete set of server-managed settings.
    pub settings: Option<SettingsMap>,
    /// Version of `settings`.
    pub settings_version: i64,
}

impl SettingsResponse {
    /// A successful response carrying `settings` at `settings_version`.
    pub fn success(settings: SettingsMap, settings_version: i64) -> Self {
        Self {
            success: true,
            message: None,
            settings: Some(settings),
            settings_version,
        }
    }

    /// An unsuccessful response explaining why no settings were returned.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            settings: None,
            settings_version: 0,
        }
    }
}

/// Transport used to talk to the server.
#[async_trait::async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Fetches the server-managed settings if they are newer than `after_version`.
    async fn get_settings(
        &self,
        config: &Configuration,
        after_version: i64,
    ) -> Result<SettingsResponse, ApiError>;
}
