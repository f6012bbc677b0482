//! Command-line parsing on top of clap.
//!
//! - [`core`](self::core) - `CliParser`: registration, help interception, unknown
//!   command detection, failure handling
//! - [`adapter`] - `CommandAdapter`: one descriptor as a clap subcommand
//! - [`helpers`] - suggestions and raw argument checks

pub mod adapter;
pub mod core;
mod helpers;

pub use adapter::CommandAdapter;
pub use self::core::CliParser;
