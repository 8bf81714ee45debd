//! pagechunk CLI library
//!
//! This library provides the command-line interface for the pagechunk
//! streaming chunking pipeline.

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

pub use error::{CliError, CliResult};
