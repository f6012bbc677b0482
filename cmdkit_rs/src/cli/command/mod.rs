//! Command descriptors and everything derived from them.
//!
//! - `types`: the declarative descriptor plus handler inputs and outputs
//! - `usage`: positional slots parsed from the usage string
//! - `options`: option tuples turned into parser-agnostic specs
//! - `help`: top-level listing and per-command help layout

pub mod help;
pub mod options;
mod types;
pub mod usage;

pub use help::{format_command_help, format_help};
pub use options::{OptionSpec, ValueType, options_to_specs};
pub use types::{
    ArgValue, CliArgs, CommandArg, CommandDescriptor, CommandGroup, CommandInput, CommandOption,
    Example, FlagValue, Flags, JsonHandler, OutputModes, Report, ReportHandler,
};
pub use usage::{Positional, args_from_usage, parse_usage};
