use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use faultline_state::registry::StateRegistry;

use crate::{error_parser::ErrorParser, submission::SubmissionClient, ClientSettings};

/// Effective key/value settings of a client.
pub type SettingsMap = HashMap<String, String>;

/// API keys shorter than this are rejected as placeholders.
const MIN_API_KEY_LENGTH: usize = 10;

/// Runtime configuration shared by every component of a [`Client`](crate::Client).
///
/// The connection details are fixed at construction. The settings map and the collaborators
/// are interior-mutable so that the settings manager and the host can update them through a
/// shared reference.
pub struct Configuration {
    api_key: Option<String>,
    server_url: String,
    config_server_url: String,
    user_agent: String,
    settings: RwLock<SettingsMap>,
    submission_client: RwLock<Arc<dyn SubmissionClient>>,
    error_parser: RwLock<Option<Arc<dyn ErrorParser>>>,
    state: StateRegistry,
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("server_url", &self.server_url)
            .field("config_server_url", &self.config_server_url)
            .field("user_agent", &self.user_agent)
            .field("settings", &self.settings())
            .finish_non_exhaustive()
    }
}

impl Configuration {
    pub(crate) fn new(
        settings: ClientSettings,
        submission_client: Arc<dyn SubmissionClient>,
        error_parser: Option<Arc<dyn ErrorParser>>,
    ) -> Self {
        let config_server_url = settings
            .config_server_url
            .unwrap_or_else(|| settings.server_url.clone());

        Self {
            api_key: settings.api_key,
            server_url: settings.server_url,
            config_server_url,
            user_agent: settings.user_agent,
            settings: RwLock::new(settings.settings),
            submission_client: RwLock::new(submission_client),
            error_parser: RwLock::new(error_parser),
            state: StateRegistry::new(),
        }
    }

    /// Whether a usable API key is configured. Every settings operation is skipped otherwise.
    pub fn is_valid(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| key.len() >= MIN_API_KEY_LENGTH)
    }

    /// The configured API key.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The url events are submitted to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Url server-side settings are fetched from.
    pub fn config_server_url(&self) -> &str {
        &self.config_server_url
    }

    /// The user agent requested by the host.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// A copy of the current effective settings.
    pub fn settings(&self) -> SettingsMap {
        self.settings
            .read()
            .expect("RwLock should not be poisoned")
            .clone()
    }

    /// The current value of a single setting.
    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings
            .read()
            .expect("RwLock should not be poisoned")
            .get(key)
            .cloned()
    }

    /// Sets a local setting, overwriting any previous value.
    pub fn set_setting(&self, key: impl Into<String>, value: impl Into<String>) {
        self.settings
            .write()
            .expect("RwLock should not be poisoned")
            .insert(key.into(), value.into());
    }

    /// Removes a setting and returns its previous value.
    pub fn remove_setting(&self, key: &str) -> Option<String> {
        self.settings
            .write()
            .expect("RwLock should not be poisoned")
            .remove(key)
    }

    /// Applies server-provided values on top of the current settings, then drops every key in
    /// `removed`.
    ///
    /// Keys that are neither in `values` nor in `removed` are left untouched. Both steps happen
    /// under one write lock so readers never observe a half-applied update.
    pub fn apply_settings<'a>(
        &self,
        values: &SettingsMap,
        removed: impl IntoIterator<Item = &'a String>,
    ) {
        let mut settings = self
            .settings
            .write()
            .expect("RwLock should not be poisoned");

        settings.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        for key in removed {
            settings.remove(key);
        }
    }

    /// The collaborator used to talk to the server.
    pub fn submission_client(&self) -> Arc<dyn SubmissionClient> {
        Arc::clone(
            &self
                .submission_client
                .read()
                .expect("RwLock should not be poisoned"),
        )
    }

    /// Replaces the collaborator used to talk to the server.
    pub fn set_submission_client(&self, submission_client: Arc<dyn SubmissionClient>) {
        *self
            .submission_client
            .write()
            .expect("RwLock should not be poisoned") = submission_client;
    }

    /// The parser used to turn captured exceptions into structured error data, if any.
    pub fn error_parser(&self) -> Option<Arc<dyn ErrorParser>> {
        self.error_parser
            .read()
            .expect("RwLock should not be poisoned")
            .clone()
    }

    /// Replaces the error parser. Passing `None` leaves the client without one.
    pub fn set_error_parser(&self, error_parser: Option<Arc<dyn ErrorParser>>) {
        *self
            .error_parser
            .write()
            .expect("RwLock should not be poisoned") = error_parser;
    }

    /// Repositories used to persist state across process restarts.
    pub fn state(&self) -> &StateRegistry {
        &self.state
    }
}
