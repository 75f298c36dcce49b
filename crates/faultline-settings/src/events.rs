//! Change notification for settings updates
//!
//! Other crates respond to settings changes by implementing [`SettingsChangedHandler`] and
//! registering with a [`SettingsManager`](crate::SettingsManager).

use std::sync::{Arc, RwLock};

use faultline_core::Configuration;
use tracing::error;

/// Type alias for change handler error results
pub type SettingsHandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for handling settings changes
///
/// Handlers are called sequentially in registration order on the task that applied the change,
/// so they must not block for long.
pub trait SettingsChangedHandler: Send + Sync {
    /// Called after the effective settings of `config` changed.
    fn on_settings_changed(&self, config: &Configuration) -> Result<(), SettingsHandlerError>;
}

impl<F> SettingsChangedHandler for F
where
    F: Fn(&Configuration) -> Result<(), SettingsHandlerError> + Send + Sync,
{
    fn on_settings_changed(&self, config: &Configuration) -> Result<(), SettingsHandlerError> {
        self(config)
    }
}

/// Registry for managing settings change handlers
///
/// Handlers are called in the order they were registered. A handler returning an error is
/// logged and the remaining handlers still run. Handlers cannot be unregistered.
pub struct SettingsChangeRegistry {
    handlers: RwLock<Vec<Arc<dyn SettingsChangedHandler>>>,
}

impl SettingsChangeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a new handler
    pub fn register(&self, handler: Arc<dyn SettingsChangedHandler>) {
        self.handlers
            .write()
            .expect("Handler registry lock poisoned")
            .push(handler);
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .expect("Handler registry lock poisoned")
            .len()
    }

    /// Whether no handler has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every registered handler with `config`
    ///
    /// Returns the number of handlers that failed.
    pub fn notify(&self, config: &Configuration) -> usize {
        // Handlers may register further handlers, so don't hold the lock while calling them.
        let handlers = self
            .handlers
            .read()
            .expect("Handler registry lock poisoned")
            .clone();

        let mut failed = 0;
        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler.on_settings_changed(config) {
                error!(handler = index, "Error calling settings changed handler: {e}");
                failed += 1;
            }
        }

        failed
    }
}

impl Default for SettingsChangeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use faultline_core::Client;

    use super::*;

    struct TestHandler {
        name: String,
        execution_log: Arc<Mutex<Vec<String>>>,
        should_fail: bool,
    }

    impl SettingsChangedHandler for TestHandler {
        fn on_settings_changed(&self, _config: &Configuration) -> Result<(), SettingsHandlerError> {
            self.execution_log.lock().unwrap().push(self.name.clone());
            if self.should_fail {
                Err("Handler failed".into())
            } else {
                Ok(())
            }
        }
    }

    fn handler(name: &str, log: &Arc<Mutex<Vec<String>>>, should_fail: bool) -> Arc<TestHandler> {
        Arc::new(TestHandler {
            name: name.to_string(),
            execution_log: log.clone(),
            should_fail,
        })
    }

    #[test]
    fn test_handlers_execute_in_registration_order() {
        let registry = SettingsChangeRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(handler("first", &log, false));
        registry.register(handler("second", &log, false));
        registry.register(handler("third", &log, false));

        let client = Client::new(None);
        let failed = registry.notify(client.config());

        assert_eq!(failed, 0);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "third"],
            "Handlers should execute in registration order"
        );
    }

    #[test]
    fn test_handler_error_does_not_stop_subsequent_handlers() {
        let registry = SettingsChangeRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(handler("first", &log, true));
        registry.register(handler("second", &log, false));
        registry.register(handler("third", &log, false));

        let client = Client::new(None);
        let failed = registry.notify(client.config());

        assert_eq!(failed, 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "third"],
            "Handlers after a failing handler should still execute"
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = SettingsChangeRegistry::new();
        assert!(registry.is_empty());

        let client = Client::new(None);
        assert_eq!(registry.notify(client.config()), 0);
    }

    #[test]
    fn test_closure_handler_receives_configuration() {
        let registry = SettingsChangeRegistry::new();
        let seen = Arc::new(Mutex::new(None));

        let captured = seen.clone();
        registry.register(Arc::new(move |config: &Configuration| {
            *captured.lock().unwrap() = config.setting("@@DataExclusions");
            Ok::<(), SettingsHandlerError>(())
        }));
        assert_eq!(registry.len(), 1);

        let client = Client::new(None);
        client.config().set_setting("@@DataExclusions", "password");
        registry.notify(client.config());

        assert_eq!(seen.lock().unwrap().as_deref(), Some("password"));
    }
}
