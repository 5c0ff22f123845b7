// ============================================================================
// bookrip-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type. Fatal errors reach `main`, which prints
// them and exits with status 1.

// ---- Internal crate imports ----
use bookrip_core::{CoreError, CoreResult};

// ---- External crate imports ----
use owo_colors::OwoColorize;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Prints a fatal error to stderr.
pub fn report_error(err: &CoreError) {
    eprintln!("{} {}", "Error:".red().bold(), err);
}
