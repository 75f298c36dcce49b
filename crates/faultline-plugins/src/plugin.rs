use faultline_core::event::EventPluginContext;
use thiserror::Error;

/// What the pipeline should do after a plugin ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginFlow {
    /// Hand the event to the next plugin.
    Continue,
    /// Stop processing this event. Later plugins never see it.
    Halt,
}

/// Errors raised by plugins.
///
/// The pipeline logs these and carries on with the next plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The client has no error parser configured.
    #[error("No error parser was defined.")]
    MissingErrorParser,
    #[allow(missing_docs)]
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    /// Any other plugin specific failure.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

/// A stage of the event pipeline.
pub trait EventPlugin: Send + Sync {
    /// Unique name of the plugin.
    fn name(&self) -> &str;

    /// Position in the pipeline, lower runs first.
    fn priority(&self) -> i32;

    /// Inspect or enrich the event.
    fn run(&self, context: &mut EventPluginContext) -> Result<PluginFlow, PluginError>;
}

/// Adapts a closure into an [`EventPlugin`].
pub struct FnPlugin<F> {
    name: String,
    priority: i32,
    run: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&mut EventPluginContext) -> Result<PluginFlow, PluginError> + Send + Sync,
{
    /// Wrap `run` as a plugin called `name` at `priority`.
    pub fn new(name: impl Into<String>, priority: i32, run: F) -> Self {
        Self {
            name: name.into(),
            priority,
            run,
        }
    }
}

impl<F> EventPlugin for FnPlugin<F>
where
    F: Fn(&mut EventPluginContext) -> Result<PluginFlow, PluginError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&self, context: &mut EventPluginContext) -> Result<PluginFlow, PluginError> {
        (self.run)(context)
    }
}
