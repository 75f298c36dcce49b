use faultline_core::SettingsMap;
use serde::{Deserialize, Serialize};

/// Key the latest snapshot is stored under in the [`VersionedSettings`] repository.
pub const SERVER_SETTINGS_KEY: &str = "server_settings";

/// One snapshot of the server-managed settings, as persisted or received from the server.
///
/// Version `0` means no settings have been received yet. A stored snapshot carrying version `0`
/// is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionedSettings {
    #[allow(missing_docs)]
    pub version: i64,
    #[allow(missing_docs)]
    pub settings: SettingsMap,
}

faultline_state::register_repository_item!(VersionedSettings, "ServerSettings");
