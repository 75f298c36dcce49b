//! Plugins registered by [`EventPluginManager::with_default_plugins`](crate::EventPluginManager::with_default_plugins).

mod error_plugin;

pub use error_plugin::ErrorPlugin;
