use std::sync::Arc;

use faultline_core::{submission::SettingsResponse, ApiError, Client};
use faultline_state::{
    memory::MemoryRepository,
    repository::{Repository, RepositoryError},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    SettingsChangeRegistry, SettingsChangedHandler, VersionedSettings, SERVER_SETTINGS_KEY,
};

/// Errors that can occur while synchronizing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No usable API key is configured.
    #[error("Unable to update settings: API key is not set")]
    InvalidConfiguration,
    /// The server could not be reached or returned an unreadable response.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The server answered without new settings.
    #[error("Unable to update settings: {message}")]
    Rejected {
        #[allow(missing_docs)]
        message: String,
    },
    /// The server answered with settings older than the persisted ones.
    #[error("Received settings v{received} which is older than the saved v{current}")]
    StaleVersion {
        #[allow(missing_docs)]
        current: i64,
        #[allow(missing_docs)]
        received: i64,
    },
    /// Reading or writing the persisted snapshot failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Summary of a successful settings update.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUpdate {
    /// Version of the snapshot that was replaced.
    pub previous_version: i64,
    /// Version of the snapshot now persisted.
    pub version: i64,
    /// Server-managed keys which were removed from the effective settings.
    pub removed: Vec<String>,
}

/// Keeps the settings of a [`Client`] in sync with the server.
///
/// The latest server snapshot is persisted in the client's [`VersionedSettings`] repository. When
/// the host hasn't registered one, an in-memory repository is used.
///
/// Create a single manager per client and clone it where it is needed. Clones share the change
/// handlers and the update lock, while independently created managers do not.
#[derive(Clone)]
pub struct SettingsManager {
    client: Client,
    event_registry: Arc<SettingsChangeRegistry>,
    // Held while the persisted snapshot is read and applied.
    update_lock: Arc<Mutex<()>>,
}

impl SettingsManager {
    /// Create a settings manager for `client`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            event_registry: Arc::new(SettingsChangeRegistry::new()),
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Register a handler called after every successful settings change.
    pub fn on_changed(&self, handler: Arc<dyn SettingsChangedHandler>) {
        self.event_registry.register(handler);
    }

    /// Apply the snapshot persisted by a previous run without contacting the server.
    ///
    /// Does nothing when the configuration is invalid.
    pub async fn apply_saved_server_settings(&self) -> Result<(), SettingsError> {
        let config = self.client.config();
        if !config.is_valid() {
            return Ok(());
        }

        let _guard = self.update_lock.lock().await;

        let saved = self.saved_server_settings().await?;
        info!(version = saved.version, "Applying saved settings");
        config.apply_settings(&saved.settings, std::iter::empty());

        self.event_registry.notify(config);
        Ok(())
    }

    /// Version of the persisted snapshot, or `0` when there is none or the configuration is
    /// invalid.
    pub async fn get_version(&self) -> Result<i64, SettingsError> {
        if !self.client.config().is_valid() {
            return Ok(0);
        }

        Ok(self.saved_server_settings().await?.version)
    }

    /// Fetch new settings if `version`, as announced by the server, is newer than the persisted
    /// one.
    ///
    /// Returns `None` without contacting the server when the persisted settings are up to date.
    pub async fn check_version(
        &self,
        version: i64,
    ) -> Result<Option<SettingsUpdate>, SettingsError> {
        let current_version = self.get_version().await?;
        if version <= current_version {
            return Ok(None);
        }

        info!(
            from = current_version,
            to = version,
            "Updating settings from v{current_version} to v{version}"
        );
        self.update_settings(Some(current_version)).await.map(Some)
    }

    /// Fetch the settings newer than `version` from the server and apply them.
    ///
    /// A missing or negative `version` means the persisted version. On success the server settings
    /// overwrite local keys of the same name, server-managed keys the server no longer sends are
    /// removed, the new snapshot is persisted and the change handlers are notified once.
    ///
    /// Failures leave the settings untouched and notify nobody.
    pub async fn update_settings(
        &self,
        version: Option<i64>,
    ) -> Result<SettingsUpdate, SettingsError> {
        let config = self.client.config();
        if !config.is_valid() {
            error!("Unable to update settings: API key is not set.");
            return Err(SettingsError::InvalidConfiguration);
        }

        let _guard = self.update_lock.lock().await;

        let repository = self.repository();
        let previous = load_snapshot(repository.as_ref()).await?;
        let version = match version {
            Some(version) if version >= 0 => version,
            _ => previous.version,
        };

        info!(version, "Checking for updated settings from v{version}.");
        let response = match config.submission_client().get_settings(config, version).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Unable to update settings: {e}");
                return Err(e.into());
            }
        };

        let (settings, settings_version) = match response {
            SettingsResponse {
                success: true,
                settings: Some(settings),
                settings_version,
                ..
            } => (settings, settings_version),
            SettingsResponse { message, .. } => {
                let message = message.unwrap_or_else(|| "No settings returned".to_string());
                warn!("Unable to update settings: {message}");
                return Err(SettingsError::Rejected { message });
            }
        };

        if settings_version < previous.version {
            warn!(
                current = previous.version,
                received = settings_version,
                "Ignoring settings older than the saved settings"
            );
            return Err(SettingsError::StaleVersion {
                current: previous.version,
                received: settings_version,
            });
        }

        let mut removed: Vec<String> = previous
            .settings
            .keys()
            .filter(|key| !settings.contains_key(*key))
            .cloned()
            .collect();
        removed.sort();

        let snapshot = VersionedSettings {
            version: settings_version,
            settings,
        };
        repository
            .set(SERVER_SETTINGS_KEY.to_string(), snapshot.clone())
            .await?;

        config.apply_settings(&snapshot.settings, removed.iter());
        info!(version = snapshot.version, "Updated settings: v{}", snapshot.version);

        self.event_registry.notify(config);

        Ok(SettingsUpdate {
            previous_version: previous.version,
            version: snapshot.version,
            removed,
        })
    }

    fn repository(&self) -> Arc<dyn Repository<VersionedSettings>> {
        self.client
            .config()
            .state()
            .get_or_register_with::<VersionedSettings, _>(|| Arc::new(MemoryRepository::new()))
    }

    async fn saved_server_settings(&self) -> Result<VersionedSettings, SettingsError> {
        load_snapshot(self.repository().as_ref()).await
    }
}

async fn load_snapshot(
    repository: &dyn Repository<VersionedSettings>,
) -> Result<VersionedSettings, SettingsError> {
    match repository.get(SERVER_SETTINGS_KEY.to_string()).await? {
        Some(snapshot) if snapshot.version > 0 => Ok(snapshot),
        _ => Ok(VersionedSettings::default()),
    }
}
