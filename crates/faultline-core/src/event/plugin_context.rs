use crate::{
    event::{ContextData, Event},
    Client,
};

/// Everything a plugin can see and change while an event moves through the pipeline.
///
/// One context is created per event and dropped once the pipeline has finished with it.
#[derive(Debug, Clone)]
pub struct EventPluginContext {
    /// The client the event is submitted through, used to reach configured capabilities such as
    /// the error parser.
    pub client: Client,
    /// The event being enriched.
    pub event: Event,
    /// Ambient data captured alongside the event.
    pub context_data: ContextData,
}

impl EventPluginContext {
    /// Bundles an event with the client and context data it is processed with.
    pub fn new(client: Client, event: Event, context_data: ContextData) -> Self {
        Self {
            client,
            event,
            context_data,
        }
    }
}
