//! # cmdkit
//!
//! **Command-line front-end scaffold.** Commands are described declaratively
//! (name, usage string, options, examples and one or two handlers); cmdkit
//! turns them into a strict clap parser, renders grouped help, runs the right
//! handler and funnels every result and error into one exit path.
//!
//! ## Features
//!
//! - **Declarative commands** - `usage("deploy <target> [region]")` defines
//!   the positionals, option tuples define the flags
//! - **Two output modes** - a human-readable report or JSON behind `--json`
//! - **Help that reads well** - grouped command listing, re-colored
//!   per-command help with examples
//! - **Did you mean** - unknown commands get a suggestion
//! - **Uniform errors** - one formatting path, exit code 1, `--log` for details
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmdkit::cli::{CommandDescriptor, CommandGroup, Report, run};
//! use cmdkit::context::CliContext;
//!
//! # async fn demo() {
//! let greet = CommandDescriptor::new("greet")
//!     .usage("greet <name>")
//!     .description("say hello")
//!     .group(CommandGroup::General)
//!     .report(|input| async move {
//!         Ok(Report::from(format!("hello {}", input.arg(0).unwrap_or("you"))))
//!     });
//!
//! let args = std::env::args().skip(1).collect();
//! let outcome = run(args, [greet], CliContext::plain("greet")).await;
//! outcome.write().ok();
//! std::process::exit(outcome.code);
//! # }
//! ```

// ============================================================================
// Command layer
// ============================================================================

/// Descriptors, parser, dispatcher and help rendering.
///
/// # Submodules
///
/// - [`cli::command`] - descriptor types, usage and option derivation, help
/// - [`cli::parser`] - clap configuration and per-command adapter
/// - [`cli::dispatch`] - handler selection and the error exit path
/// - [`cli::entrypoint`] - version bootstrap and `run`
pub mod cli;

/// Built-in `start` and `status` commands.
pub mod commands;

// ============================================================================
// Ambient modules
// ============================================================================

pub mod colors;

/// Program metadata plus `config.toml` and environment overrides.
pub mod config;

pub mod context;

/// Typed, user-reportable errors.
pub mod error;

/// `tracing` subscriber setup and runtime verbosity switch.
pub mod logger;

pub mod progress;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use cli::{CommandDescriptor, Outcome, Report};
pub use context::CliContext;
pub use error::CliError;
