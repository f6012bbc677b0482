use std::io;
use std::panic;

use cmdkit::cli::dispatch::{Outcome, handle_error, is_rendering_error, panic_message};
use cmdkit::cli::run;
use cmdkit::commands;
use cmdkit::config::AppConfig;
use cmdkit::context::CliContext;

/// Last-resort handler: a panic anywhere goes through the error path and
/// exits 1. A broken pipe (e.g. piping to `head`) exits quietly with 0.
/// Panics raised while the error path itself is rendering are left to
/// unwind into its fallback.
fn install_panic_hook(ctx: CliContext, command: String) {
    panic::set_hook(Box::new(move |info| {
        if is_rendering_error() {
            return;
        }
        let msg = panic_message(info.payload());
        if msg.contains("Broken pipe") || msg.contains("os error 32") {
            std::process::exit(0);
        }

        let location = info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        let err = anyhow::anyhow!("panic{}: {}", location, msg);
        let _ = handle_error(&err, &command, &ctx).write();
        std::process::exit(1);
    }));
}

fn finish(outcome: Outcome) -> ! {
    match outcome.write() {
        Ok(()) => std::process::exit(outcome.code),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
        Err(err) => {
            eprintln!("[cmdkit] failed to write output: {}", err);
            std::process::exit(outcome.code)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let config = AppConfig::load();
    let verbose = args.iter().any(|arg| arg == "--log")
        && !args.iter().any(|arg| arg == "--json" || arg == "-j");
    let ctx = CliContext::from_config(&config, verbose);
    install_panic_hook(ctx.clone(), args.first().cloned().unwrap_or_default());

    finish(run(args, commands::all(), ctx).await)
}
