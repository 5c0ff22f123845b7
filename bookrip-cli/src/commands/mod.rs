//! Command implementations for the CLI.

/// Module containing the book conversion command.
pub mod convert;
