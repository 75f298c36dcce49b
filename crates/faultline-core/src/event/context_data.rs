use std::{collections::HashMap, error::Error, sync::Arc};

/// A captured exception, shared between the host and the plugins inspecting it.
pub type Exception = Arc<dyn Error + Send + Sync + 'static>;

/// Ambient data captured alongside an event but not submitted with it.
#[derive(Clone, Default)]
pub struct ContextData {
    exception: Option<Exception>,
    unhandled: bool,
    submission_method: Option<String>,
    values: HashMap<String, serde_json::Value>,
}

impl std::fmt::Debug for ContextData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextData")
            .field("exception", &self.exception.as_ref().map(|e| e.to_string()))
            .field("unhandled", &self.unhandled)
            .field("submission_method", &self.submission_method)
            .field("values", &self.values)
            .finish()
    }
}

impl ContextData {
    /// Attaches the exception the event describes.
    pub fn set_exception<E>(&mut self, exception: E)
    where
        E: Error + Send + Sync + 'static,
    {
        self.exception = Some(Arc::new(exception));
    }

    /// Attaches an exception that is already shared elsewhere.
    pub fn set_shared_exception(&mut self, exception: Exception) {
        self.exception = Some(exception);
    }

    /// The captured exception, if any.
    pub fn get_exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    /// Whether an exception was captured.
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Marks the exception as not handled by the host application. `submission_method` names the
    /// hook that caught it, e.g. `panic_hook`.
    pub fn mark_as_unhandled_error(&mut self, submission_method: impl Into<String>) {
        self.unhandled = true;
        self.submission_method = Some(submission_method.into());
    }

    /// Whether the exception escaped the host application.
    pub fn is_unhandled_error(&self) -> bool {
        self.unhandled
    }

    /// The hook that caught an unhandled exception.
    pub fn submission_method(&self) -> Option<&str> {
        self.submission_method.as_deref()
    }

    /// Stores an arbitrary value for plugins further down the pipeline.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    /// A value stored with [`insert`](Self::insert).
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }
}
