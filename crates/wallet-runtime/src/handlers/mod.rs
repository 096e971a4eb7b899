//! # Command Handlers
//!
//! Typed store commands and their dispatcher.

pub mod commands;

pub use commands::{handle, CommandError, CommandResult, StoreCommand};
