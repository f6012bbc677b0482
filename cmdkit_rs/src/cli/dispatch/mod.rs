//! Handler selection and execution for a parsed command.
//!
//! The [`Dispatcher`] owns one invocation: it decides between the JSON and
//! report handlers, gates console output (spinner and log verbosity), runs
//! the handler and turns its result into an [`Outcome`]. Errors go through
//! [`handle_error`] so every failure looks the same to the user.

mod error_exit;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

pub use error_exit::{handle_error, is_rendering_error, panic_message};

use super::command::{CliArgs, CommandDescriptor, CommandInput, Flags};
use crate::context::CliContext;
use crate::error::CliError;

/// What a run produced: exit code plus optional stdout and stderr text.
///
/// Nothing in the library writes to the real streams; the binary does,
/// through [`Outcome::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl Outcome {
    /// Exit 0 with `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::exit(0, stdout)
    }

    pub fn exit(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code,
            stdout: Some(stdout.into()),
            stderr: None,
        }
    }

    /// Exit 1 with `stderr`.
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            code: 1,
            stdout: None,
            stderr: Some(stderr.into()),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    /// Write stdout then stderr, flushing both.
    pub fn write(&self) -> io::Result<()> {
        if let Some(out) = &self.stdout {
            let mut stdout = io::stdout().lock();
            stdout.write_all(out.as_bytes())?;
            stdout.flush()?;
        }
        if let Some(err) = &self.stderr {
            let mut stderr = io::stderr().lock();
            stderr.write_all(err.as_bytes())?;
            stderr.flush()?;
        }
        Ok(())
    }
}

/// Runs one command invocation. Consumed by [`Dispatcher::run`].
pub struct Dispatcher {
    command: Arc<CommandDescriptor>,
    args: CliArgs,
    flags: Flags,
    ctx: CliContext,
}

impl Dispatcher {
    pub fn new(command: Arc<CommandDescriptor>, args: CliArgs, flags: Flags, ctx: CliContext) -> Self {
        Self {
            command,
            args,
            flags,
            ctx,
        }
    }

    /// Run the selected handler; any error ends in the uniform error path.
    pub async fn run(self) -> Outcome {
        let name = self.command.name.clone();
        let ctx = self.ctx.clone();
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) => handle_error(&err, &name, &ctx),
        }
    }

    async fn execute(self) -> anyhow::Result<Outcome> {
        debug!(
            "[*] started a new command: \"{}\" with args {:?} and flags {:?}",
            self.command.name, self.args, self.flags
        );
        self.set_console_mode();

        let modes = self.command.output_modes();
        if modes.is_empty() {
            return Err(CliError::configuration(format!(
                "command \"{}\" doesn't implement either \"json\" or \"report\" handler",
                self.command.name
            ))
            .into());
        }

        let outcome = if self.flags.json() {
            self.run_json().await?
        } else {
            self.run_report().await?
        };
        if self.ctx.loader.is_loading() {
            self.ctx.loader.stop();
        }
        Ok(outcome)
    }

    /// JSON output keeps stdout clean: no spinner, no verbose logs.
    fn set_console_mode(&self) {
        if self.flags.json() {
            self.ctx.loader.off();
            self.ctx.logger.should_write_to_console(false);
        } else {
            self.ctx.loader.on();
            self.ctx.logger.should_write_to_console(self.flags.log());
        }
    }

    fn input(&self) -> CommandInput {
        CommandInput {
            args: self.args.clone(),
            flags: self.flags.clone(),
            loader: self.ctx.loader.clone(),
        }
    }

    async fn run_json(&self) -> anyhow::Result<Outcome> {
        let handler = self.command.json_handler().ok_or_else(|| {
            CliError::configuration(format!(
                "command \"{}\" doesn't implement \"json\" method",
                self.command.name
            ))
        })?;
        let result = handler(self.input()).await?;
        let data = match result {
            serde_json::Value::Object(mut map)
                if map.get("data").is_some_and(|data| !data.is_null()) =>
            {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        let pretty = serde_json::to_string_pretty(&data)
            .with_context(|| format!("serializing output of \"{}\"", self.command.name))?;
        Ok(Outcome::success(format!("{}\n", pretty)))
    }

    async fn run_report(&self) -> anyhow::Result<Outcome> {
        let handler = self.command.report_handler().ok_or_else(|| {
            CliError::configuration(format!(
                "command \"{}\" doesn't implement \"report\" method",
                self.command.name
            ))
        })?;
        let report = handler(self.input()).await?;
        Ok(Outcome::exit(report.code(), format!("{}\n", report.message())))
    }
}
