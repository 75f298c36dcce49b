#![doc = include_str!("../README.md")]

mod events;
mod manager;
mod snapshot;

pub use events::{SettingsChangeRegistry, SettingsChangedHandler, SettingsHandlerError};
pub use manager::{SettingsError, SettingsManager, SettingsUpdate};
pub use snapshot::{VersionedSettings, SERVER_SETTINGS_KEY};
