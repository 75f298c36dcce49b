//! Event model processed by the plugin pipeline.

mod context_data;
#[allow(clippy::module_inception)]
mod event;
mod plugin_context;

pub use context_data::{ContextData, Exception};
pub use event::{event_types, known_data, Event};
pub use plugin_context::EventPluginContext;
