//! Shared CLI entry point.
//!
//! The binary collects `argv`, builds a [`CliContext`] and hands both to
//! [`run`] together with its commands; the returned [`Outcome`] is the only
//! thing it has to write out.

use super::command::CommandDescriptor;
use super::dispatch::{Outcome, handle_error};
use super::parser::CliParser;
use crate::context::CliContext;

/// Tokens that print the version when they come first.
const VERSION_TOKENS: &[&str] = &["-V", "-v", "--version"];

/// Version banner if the first argument asks for it.
pub fn print_version_if_asked(args: &[String], ctx: &CliContext) -> Option<Outcome> {
    let first = args.first()?;
    VERSION_TOKENS
        .contains(&first.as_str())
        .then(|| Outcome::success(format!("you are using {} for now.\n", ctx.version)))
}

/// Bootstrap, register `commands`, parse `args` (program name excluded).
pub async fn run<I>(args: Vec<String>, commands: I, ctx: CliContext) -> Outcome
where
    I: IntoIterator<Item = CommandDescriptor>,
{
    if let Some(outcome) = print_version_if_asked(&args, &ctx) {
        return outcome;
    }

    match CliParser::new(commands, ctx.clone()) {
        Ok(parser) => parser.parse(args).await,
        Err(err) => {
            let name = args.first().cloned().unwrap_or_default();
            handle_error(&err.into(), &name, &ctx)
        }
    }
}
