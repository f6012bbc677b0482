//! Top-level command-line orchestration.
//!
//! [`CliParser`] owns the registered commands. A parse goes through:
//! unknown-command check, engine configuration, parsing, then help,
//! dispatch or failure handling. Every path ends in an [`Outcome`].

use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches};
use tracing::debug;

use super::adapter::CommandAdapter;
use super::helpers::{GLOBAL_FLAG_TOKENS, is_help_requested, suggest_similar_command};
use crate::cli::command::options::GLOBAL_GROUP;
use crate::cli::command::{CommandDescriptor, format_command_help, format_help};
use crate::cli::dispatch::{Outcome, handle_error};
use crate::context::CliContext;
use crate::error::CliError;

/// Root flags sort after every command's own flags in help output.
const ROOT_FLAG_ORDER: usize = 1000;

pub struct CliParser {
    commands: Vec<CommandAdapter>,
    ctx: CliContext,
}

impl CliParser {
    /// Register `commands`; fails on the first invalid descriptor.
    pub fn new<I>(commands: I, ctx: CliContext) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = CommandDescriptor>,
    {
        let commands = commands
            .into_iter()
            .map(|descriptor| CommandAdapter::new(Arc::new(descriptor)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { commands, ctx })
    }

    pub fn descriptors(&self) -> Vec<Arc<CommandDescriptor>> {
        self.commands
            .iter()
            .map(|adapter| adapter.descriptor().clone())
            .collect()
    }

    fn find_command(&self, token: &str) -> Option<&CommandAdapter> {
        self.commands
            .iter()
            .find(|adapter| adapter.descriptor().matches(token))
    }

    /// Reject an unknown first token before the engine sees it.
    pub fn check_command_exists(&self, first: Option<&str>) -> Result<(), CliError> {
        let Some(token) = first else {
            return Ok(());
        };
        if token.is_empty()
            || token.starts_with('-')
            || GLOBAL_FLAG_TOKENS.contains(&token)
            || self.find_command(token).is_some()
        {
            return Ok(());
        }

        let names: Vec<&str> = self.commands.iter().map(CommandAdapter::name).collect();
        Err(CliError::CommandNotFound {
            command: token.to_string(),
            suggestion: suggest_similar_command(token, &names).map(str::to_string),
        })
    }

    /// Root command with global flags and every registered subcommand.
    fn build(&self) -> clap::Command {
        let bin = self.ctx.binary_name.clone();
        let mut root = clap::Command::new(bin.clone())
            .bin_name(bin.clone())
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true)
            .arg(
                Arg::new("help")
                    .short('h')
                    .long("help")
                    .help("show help")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .display_order(ROOT_FLAG_ORDER)
                    .help_heading(GLOBAL_GROUP),
            )
            .arg(
                Arg::new("version")
                    .short('v')
                    .long("version")
                    .help("show version")
                    .action(ArgAction::SetTrue)
                    .display_order(ROOT_FLAG_ORDER + 1)
                    .help_heading(GLOBAL_GROUP),
            );
        for adapter in &self.commands {
            root = root.subcommand(adapter.builder(&bin));
        }
        root
    }

    pub fn top_level_help(&self) -> String {
        format_help(&self.descriptors(), &self.ctx.binary_name, &self.ctx.painter)
    }

    /// Formatted help for a registered command (by name or alias).
    pub fn command_help(&self, token: &str) -> String {
        let Some(adapter) = self.find_command(token) else {
            return self.top_level_help();
        };
        let mut root = self.build();
        root.build();
        let raw = root
            .find_subcommand_mut(adapter.name())
            .map(|cmd| cmd.render_help().to_string())
            .unwrap_or_default();
        format_command_help(
            &raw,
            adapter.descriptor().extended_description.as_deref(),
            &self.ctx.painter,
        )
    }

    /// Parse `args` (program name excluded) and run whatever they select.
    pub async fn parse(self, args: Vec<String>) -> Outcome {
        if let Err(err) = self.check_command_exists(args.first().map(String::as_str)) {
            let name = args.first().cloned().unwrap_or_default();
            return handle_error(&err.into(), &name, &self.ctx);
        }

        debug!("CLI-INPUT: {}", args.join(" "));
        let argv = std::iter::once(self.ctx.binary_name.clone()).chain(args.iter().cloned());
        match self.build().try_get_matches_from(argv) {
            Ok(matches) => self.run_matches(&matches).await,
            Err(err) => self.failure(&err, &args),
        }
    }

    async fn run_matches(&self, matches: &ArgMatches) -> Outcome {
        let Some((name, sub_matches)) = matches.subcommand() else {
            if flag(matches, "version") && !flag(matches, "help") {
                return Outcome::success(format!("you are using {} for now.\n", self.ctx.version));
            }
            return Outcome::success(format!("{}\n", self.top_level_help()));
        };
        let Some(adapter) = self.find_command(name) else {
            return Outcome::success(format!("{}\n", self.top_level_help()));
        };

        if flag(matches, "help") || flag(sub_matches, "help") {
            return Outcome::success(format!("{}\n", self.command_help(name)));
        }
        adapter.handler(sub_matches, self.ctx.clone()).run().await
    }

    /// Engine rejected the input: show the relevant help plus the reason.
    fn failure(&self, err: &clap::Error, args: &[String]) -> Outcome {
        let help_requested = is_help_requested(args);
        let help = args
            .iter()
            .find(|arg| !arg.starts_with('-'))
            .filter(|token| self.find_command(token).is_some())
            .map(|token| self.command_help(token))
            .unwrap_or_else(|| self.top_level_help());

        let outcome = Outcome::exit(if help_requested { 0 } else { 1 }, format!("{}\n", help));
        if help_requested {
            return outcome;
        }
        let message = failure_message(err);
        outcome.with_stderr(format!("\n{}\n", self.ctx.painter.warn(&message)))
    }
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.try_get_one::<bool>(id), Ok(Some(true)))
}

/// Engine message without the `error: ` prefix, usage and hint lines.
fn failure_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    rendered
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(|line| line.strip_prefix("error: ").unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}
