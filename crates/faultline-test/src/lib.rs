#![doc = include_str!("../README.md")]

mod api;
mod submission;

pub use api::start_settings_mock;
pub use submission::{client_with_submission_client, MockSubmissionClient, VALID_API_KEY};
