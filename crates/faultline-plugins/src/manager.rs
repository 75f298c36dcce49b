use std::sync::{Arc, RwLock};

use faultline_core::event::EventPluginContext;
use tracing::{debug, error, warn};

use crate::{ErrorPlugin, EventPlugin, FnPlugin, PluginError, PluginFlow};

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every plugin ran.
    Completed,
    /// A plugin stopped the pipeline.
    Halted {
        /// Name of the plugin that returned [`PluginFlow::Halt`].
        plugin: String,
    },
}

impl PipelineOutcome {
    /// Whether the event made it through every plugin.
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed)
    }
}

/// Ordered set of [`EventPlugin`]s events are run through.
///
/// Plugins are kept sorted by ascending priority at registration time. Plugins with equal
/// priority run in registration order.
pub struct EventPluginManager {
    plugins: RwLock<Vec<Arc<dyn EventPlugin>>>,
}

impl EventPluginManager {
    /// Create a pipeline without any plugins.
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(Vec::new()),
        }
    }

    /// Create a pipeline with the plugins every client needs.
    pub fn with_default_plugins() -> Self {
        let manager = Self::new();
        manager.add_plugin(Arc::new(ErrorPlugin));
        manager
    }

    /// Register a plugin.
    ///
    /// Returns `false` and leaves the pipeline unchanged when a plugin with the same name is
    /// already registered.
    pub fn add_plugin(&self, plugin: Arc<dyn EventPlugin>) -> bool {
        let mut plugins = self.plugins.write().expect("Plugin lock poisoned");
        if plugins.iter().any(|p| p.name() == plugin.name()) {
            warn!(plugin = plugin.name(), "A plugin with this name is already registered");
            return false;
        }

        debug!(
            plugin = plugin.name(),
            priority = plugin.priority(),
            "Adding plugin"
        );
        plugins.push(plugin);
        // `sort_by_key` is stable, so equal priorities keep their registration order.
        plugins.sort_by_key(|p| p.priority());
        true
    }

    /// Register a closure as a plugin.
    pub fn add_fn<F>(&self, name: impl Into<String>, priority: i32, run: F) -> bool
    where
        F: Fn(&mut EventPluginContext) -> Result<PluginFlow, PluginError> + Send + Sync + 'static,
    {
        self.add_plugin(Arc::new(FnPlugin::new(name, priority, run)))
    }

    /// Unregister the plugin with the given name. Returns whether a plugin was removed.
    pub fn remove_plugin(&self, name: &str) -> bool {
        let mut plugins = self.plugins.write().expect("Plugin lock poisoned");
        let before = plugins.len();
        plugins.retain(|p| p.name() != name);
        before != plugins.len()
    }

    /// Names of the registered plugins in execution order.
    pub fn plugins(&self) -> Vec<String> {
        self.plugins
            .read()
            .expect("Plugin lock poisoned")
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Run the event in `context` through every plugin in order.
    ///
    /// A plugin returning an error is logged and skipped. A plugin returning
    /// [`PluginFlow::Halt`] stops the run.
    pub fn run(&self, context: &mut EventPluginContext) -> PipelineOutcome {
        // Plugins may register other plugins, so don't hold the lock while running them.
        let plugins = self.plugins.read().expect("Plugin lock poisoned").clone();

        for plugin in plugins {
            match plugin.run(context) {
                Ok(PluginFlow::Continue) => {}
                Ok(PluginFlow::Halt) => {
                    debug!(plugin = plugin.name(), "Event processing halted by plugin");
                    return PipelineOutcome::Halted {
                        plugin: plugin.name().to_string(),
                    };
                }
                Err(e) => {
                    error!(plugin = plugin.name(), "Error running plugin {}: {e}", plugin.name());
                }
            }
        }

        PipelineOutcome::Completed
    }
}

impl Default for EventPluginManager {
    fn default() -> Self {
        Self::new()
    }
}
