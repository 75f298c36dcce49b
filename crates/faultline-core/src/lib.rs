#![doc = include_str!("../README.md")]

pub mod client;
mod error;
pub mod error_parser;
pub mod event;
pub mod submission;

pub use client::{Client, ClientSettings, Configuration, SettingsMap};
pub use error::ApiError;
