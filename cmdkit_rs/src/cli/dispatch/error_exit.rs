//! Uniform exit path for every error raised during a run.

use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, trace};

use super::Outcome;
use crate::context::CliContext;
use crate::error::CliError;

const FULL_ERROR_HINT: &str = "use the '--log' flag for the full error.";
const NO_STACK: &str = "<no error stack was found>";

thread_local! {
    static RENDERING: Cell<bool> = const { Cell::new(false) };
}

/// Whether this thread is inside [`handle_error`].
///
/// A process-wide panic hook must return without exiting while this is
/// true, so the panic unwinds into the fallback below.
pub fn is_rendering_error() -> bool {
    RENDERING.with(Cell::get)
}

/// Marks the current thread as rendering until dropped.
struct RenderingGuard {
    previous: bool,
}

impl RenderingGuard {
    fn enter() -> Self {
        Self {
            previous: RENDERING.with(|rendering| rendering.replace(true)),
        }
    }
}

impl Drop for RenderingGuard {
    fn drop(&mut self) {
        RENDERING.with(|rendering| rendering.set(self.previous));
    }
}

/// Turn `err` into warning-colored stderr output and exit code 1.
///
/// Stops the spinner and logs the error (the cause chain at trace level).
/// If formatting itself panics, both the failure and the original error are
/// written without styling.
pub fn handle_error(err: &anyhow::Error, command_name: &str, ctx: &CliContext) -> Outcome {
    let _guard = RenderingGuard::enter();
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| render(err, command_name, ctx)));
    match rendered {
        Ok(message) => Outcome::failure(message),
        Err(payload) => Outcome::failure(format!(
            "failed to log the error properly, failure error {}\n\
             failed to log the error properly, original error {}\n",
            panic_message(payload.as_ref()),
            unformatted(err)
        )),
    }
}

/// The error's `Debug` form; falls back to the `Debug` of each cause when
/// the error's own formatting panics.
fn unformatted(err: &anyhow::Error) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| format!("{:?}", err))).unwrap_or_else(|_| {
        err.chain()
            .map(|cause| format!("{:?}", cause))
            .collect::<Vec<_>>()
            .join(": ")
    })
}

fn render(err: &anyhow::Error, command_name: &str, ctx: &CliContext) -> String {
    ctx.loader.off();
    error!("got an error from command {}: {}", command_name, err);
    trace!("{}", error_stack(err));

    let report = CliError::find_in(err).and_then(|cli_error| cli_error.report(&ctx.painter));
    let message = report
        .into_iter()
        .chain(std::iter::once(FULL_ERROR_HINT.to_string()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n", ctx.painter.warn(&message))
}

fn error_stack(err: &anyhow::Error) -> String {
    let mut lines: Vec<String> = err
        .chain()
        .skip(1)
        .map(|cause| format!("caused by: {}", cause))
        .collect();
    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        lines.push(backtrace.to_string());
    }
    if lines.is_empty() {
        NO_STACK.to_string()
    } else {
        lines.join("\n")
    }
}

/// Text of a panic payload (`&str` or `String`), if it has one.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic payload>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn ctx() -> CliContext {
        CliContext::plain("cmdkit")
    }

    #[test]
    fn test_plain_error_gets_only_the_hint() {
        let outcome = handle_error(&anyhow::anyhow!("boom"), "start", &ctx());
        assert_eq!(outcome.code, 1);
        assert!(outcome.stdout.is_none());
        assert_eq!(
            outcome.stderr.as_deref(),
            Some("use the '--log' flag for the full error.\n")
        );
    }

    #[test]
    fn test_reportable_error_is_rendered_first() {
        let err = Err::<(), _>(CliError::message("project not found"))
            .context("loading workspace")
            .unwrap_err();
        let outcome = handle_error(&err, "start", &ctx());
        assert_eq!(
            outcome.stderr.as_deref(),
            Some("project not found\n\nuse the '--log' flag for the full error.\n")
        );
    }

    #[test]
    fn test_configuration_error_is_not_reported() {
        let err = anyhow::Error::new(CliError::configuration("bad usage"));
        let outcome = handle_error(&err, "start", &ctx());
        assert!(!outcome.stderr.unwrap_or_default().contains("bad usage"));
    }

    #[test]
    fn test_error_stack_placeholder() {
        let alone = anyhow::anyhow!("alone");
        if alone.backtrace().status() != BacktraceStatus::Captured {
            assert_eq!(error_stack(&alone), NO_STACK);
        }

        let chained = Err::<(), _>(std::io::Error::other("disk"))
            .context("saving")
            .unwrap_err();
        assert!(error_stack(&chained).starts_with("caused by: disk"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
    }

    #[derive(Debug)]
    struct Unprintable;

    impl std::fmt::Display for Unprintable {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            assert!(is_rendering_error());
            panic!("display blew up")
        }
    }

    impl std::error::Error for Unprintable {}

    #[test]
    fn test_formatting_panic_falls_back_to_plain_output() {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .finish();
        let err = anyhow::Error::new(Unprintable);
        let outcome = tracing::subscriber::with_default(subscriber, || {
            handle_error(&err, "boom", &ctx())
        });

        assert_eq!(outcome.code, 1);
        assert!(outcome.stdout.is_none());
        assert_eq!(
            outcome.stderr.as_deref(),
            Some(
                "failed to log the error properly, failure error display blew up\n\
                 failed to log the error properly, original error Unprintable\n"
            )
        );
        assert!(!is_rendering_error());
    }

    #[test]
    fn test_rendering_flag_is_scoped_to_handle_error() {
        assert!(!is_rendering_error());
        handle_error(&anyhow::anyhow!("boom"), "start", &ctx());
        assert!(!is_rendering_error());
    }

    #[test]
    fn test_loader_is_switched_off() {
        let ctx = ctx();
        ctx.loader.on();
        ctx.loader.start("working");
        handle_error(&anyhow::anyhow!("boom"), "start", &ctx);
        assert!(!ctx.loader.is_active());
    }
}
