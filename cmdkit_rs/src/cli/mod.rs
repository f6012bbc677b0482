//! Command registration, parsing, dispatch and help rendering.
//!
//! # Architecture
//!
//! ```text
//! argv ──► entrypoint (version check)
//!             │
//!             ▼
//!          CliParser ── unknown command? ──► error path (exit 1)
//!             │
//!             ▼
//!        clap engine  ── failure? ──► command help + reason
//!             │
//!             ▼
//!      CommandAdapter ── --help? ──► formatted command help
//!             │
//!             ▼
//!         Dispatcher  ──► json / report handler ──► Outcome
//! ```
//!
//! # Module Structure
//!
//! - [`command`] - descriptors, usage/option derivation, help formatting
//! - [`parser`] - clap configuration and the command adapter
//! - [`dispatch`] - handler selection, `Outcome`, uniform error path
//! - [`entrypoint`] - the function the binary calls

pub mod command;
pub mod dispatch;
pub mod entrypoint;
pub mod parser;

pub use command::{CommandDescriptor, CommandGroup, CommandInput, Flags, Report};
pub use dispatch::{Dispatcher, Outcome, handle_error};
pub use entrypoint::run;
pub use parser::{CliParser, CommandAdapter};
