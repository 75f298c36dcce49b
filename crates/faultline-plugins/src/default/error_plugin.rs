use faultline_core::event::{event_types, known_data, EventPluginContext};

use crate::{EventPlugin, PluginError, PluginFlow};

/// Attaches structured error data to events carrying a captured exception.
///
/// Events without an exception pass through untouched. Events with one become `error` events, and
/// unless the host already supplied error data, the configured
/// [`ErrorParser`](faultline_core::error_parser::ErrorParser) describes the exception.
///
/// Running without an error parser is a misconfiguration and fails the stage with
/// [`PluginError::MissingErrorParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorPlugin;

impl EventPlugin for ErrorPlugin {
    fn name(&self) -> &str {
        "ErrorPlugin"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn run(&self, context: &mut EventPluginContext) -> Result<PluginFlow, PluginError> {
        let Some(exception) = context.context_data.get_exception().cloned() else {
            return Ok(PluginFlow::Continue);
        };

        context.event.event_type = Some(event_types::ERROR.to_string());

        let has_error_data = context
            .event
            .data
            .get(known_data::ERROR)
            .is_some_and(|value| !value.is_null());
        if !has_error_data {
            let parser = context
                .client
                .config()
                .error_parser()
                .ok_or(PluginError::MissingErrorParser)?;

            if let Some(info) = parser.parse(context, exception.as_ref()) {
                context
                    .event
                    .data
                    .insert(known_data::ERROR.to_string(), serde_json::to_value(info)?);
            }
        }

        Ok(PluginFlow::Continue)
    }
}
