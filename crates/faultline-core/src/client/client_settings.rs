use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Basic client behavior settings. These settings specify the collector the client talks to and
/// the credential it authenticates with. They are optional and uneditable once the client is
/// initialized.
///
/// Defaults to
///
/// ```
/// # use faultline_core::ClientSettings;
/// let settings = ClientSettings {
///     api_key: None,
///     server_url: "https://collector.faultline.dev".to_string(),
///     config_server_url: None,
///     user_agent: format!("faultline-rust/{}", env!("CARGO_PKG_VERSION")),
///     settings: Default::default(),
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
    /// The project API key. Settings synchronization is disabled while this is missing or too
    /// short to be a real key.
    pub api_key: Option<String>,
    /// The url events are submitted to. Defaults to `https://collector.faultline.dev`
    pub server_url: String,
    /// The url server-side settings are fetched from. Defaults to `server_url`
    pub config_server_url: Option<String>,
    /// The user agent sent with every request. Defaults to `faultline-rust/<version>`
    pub user_agent: String,
    /// Local settings applied before any server-side settings are known.
    pub settings: HashMap<String, String>,
}

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("faultline-rust/", env!("CARGO_PKG_VERSION"));

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            server_url: "https://collector.faultline.dev".into(),
            config_server_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settings: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: ClientSettings = serde_json::from_str(
            r#"{"apiKey":"LhhP1C9gijpSKCslHHCvwdSIz298twx271nTest","settings":{"@@log:*":"Info"}}"#,
        )
        .unwrap();

        assert_eq!(
            settings.api_key.as_deref(),
            Some("LhhP1C9gijpSKCslHHCvwdSIz298twx271nTest")
        );
        assert_eq!(settings.server_url, "https://collector.faultline.dev");
        assert_eq!(settings.settings.get("@@log:*").map(String::as_str), Some("Info"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<ClientSettings>(r#"{"apiKeys":"typo"}"#);
        assert!(result.is_err());
    }
}
