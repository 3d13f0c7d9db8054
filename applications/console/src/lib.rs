//! Encore Console
//!
//! Headless host for the Encore player. Reads one command per line, drives a
//! [`encore_playback::Player`] over a simulated media element and persists
//! state to a JSON file.

pub mod command;
pub mod config;
pub mod error;
pub mod session;

pub use command::Command;
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use session::{Flow, Session};
