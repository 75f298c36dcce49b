//! Conversion of captured exceptions into structured error data.

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::event::EventPluginContext;

/// Structured description of a captured exception, stored on the event under
/// [`known_data::ERROR`](crate::event::known_data::ERROR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// The error type, when the parser can determine it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// The rendered error message.
    pub message: String,
    /// The error that caused this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<ErrorInfo>>,
}

/// Turns a captured exception into [`ErrorInfo`].
///
/// Returning `None` means the parser could not make sense of the exception; the event is then
/// submitted without structured error data.
pub trait ErrorParser: Send + Sync {
    /// Describe `exception`, or return `None` when it can't be interpreted.
    fn parse(
        &self,
        context: &EventPluginContext,
        exception: &(dyn Error + Send + Sync + 'static),
    ) -> Option<ErrorInfo>;
}

/// Default parser, which records the message of the exception and of every error in its
/// [`source`](Error::source) chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceChainErrorParser;

impl ErrorParser for SourceChainErrorParser {
    fn parse(
        &self,
        _context: &EventPluginContext,
        exception: &(dyn Error + Send + Sync + 'static),
    ) -> Option<ErrorInfo> {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn Error + 'static)> =
            Some(exception as &(dyn Error + 'static));
        while let Some(error) = current {
            chain.push(error.to_string());
            current = error.source();
        }

        chain.into_iter().rev().fold(None, |inner, message| {
            Some(ErrorInfo {
                type_name: None,
                message,
                inner: inner.map(Box::new),
            })
        })
    }
}
