//! Command-line interface module.
//!
//! Provides argument parsing, credential prompts, and subcommand handling.

pub mod args;
pub mod commands;
pub mod prompt;
