#![doc = include_str!("../README.md")]

mod default;
mod manager;
mod plugin;

pub use default::ErrorPlugin;
pub use manager::{EventPluginManager, PipelineOutcome};
pub use plugin::{EventPlugin, FnPlugin, PluginError, PluginFlow};
