//! Commands shipped with the `cmdkit` binary.

pub mod start;
pub mod status;

use crate::cli::command::CommandDescriptor;

/// Every built-in command, in help order.
pub fn all() -> Vec<CommandDescriptor> {
    vec![start::command(), status::command()]
}
