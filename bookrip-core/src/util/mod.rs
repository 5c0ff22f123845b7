//! Small shared helpers.

pub mod command;

pub use command::{format_args_for_display, format_command, run_command};
