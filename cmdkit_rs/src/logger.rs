//! Process-wide log output.
//!
//! Code logs with the plain `tracing` macros. This module installs the
//! subscriber: an `EnvFilter` behind a reload handle (so the dispatcher can
//! turn verbose console output on and off per command) and an fmt layer that
//! writes to stderr with the spinner suspended.

use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::progress::Loader;

/// Filter used while the user asked for log output (`--log`).
pub const VERBOSE_FILTER: &str = "trace";

/// Filter used otherwise: informational lines, warnings and errors only.
pub const DEFAULT_FILTER: &str = "info";

/// Writer that keeps log lines from tearing the spinner.
#[derive(Clone)]
pub struct ConsoleWriter {
    loader: Loader,
}

impl ConsoleWriter {
    pub fn new(loader: Loader) -> Self {
        Self { loader }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.loader.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Handle to the installed subscriber's verbosity.
#[derive(Clone, Default)]
pub struct Logger {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    base_filter: Option<String>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("installed", &self.handle.is_some())
            .field("base_filter", &self.base_filter)
            .finish()
    }
}

impl Logger {
    /// Install the global subscriber.
    ///
    /// `base_filter` replaces [`DEFAULT_FILTER`] when set (config file or
    /// `CMDKIT_LOG`); `RUST_LOG` wins over both. When a subscriber is already
    /// installed the returned logger only tracks state.
    pub fn init(loader: Loader, base_filter: Option<String>, verbose: bool, ansi: bool) -> Self {
        let base_filter = std::env::var("RUST_LOG").ok().or(base_filter);
        let initial = Self::filter_for(base_filter.as_deref(), verbose);
        let (filter_layer, handle) = reload::Layer::new(initial);

        let installed = tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(ConsoleWriter::new(loader))
                    .with_target(false)
                    .with_ansi(ansi)
                    .without_time(),
            )
            .try_init()
            .is_ok();

        Self {
            handle: installed.then_some(handle),
            base_filter,
        }
    }

    /// A logger that never touches the global subscriber.
    pub fn disabled() -> Self {
        Self::default()
    }

    fn filter_for(base_filter: Option<&str>, verbose: bool) -> EnvFilter {
        if verbose {
            return EnvFilter::new(VERBOSE_FILTER);
        }
        base_filter
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    }

    /// Switch console output between verbose and the base filter.
    pub fn should_write_to_console(&self, verbose: bool) {
        let Some(handle) = &self.handle else {
            return;
        };
        let filter = Self::filter_for(self.base_filter.as_deref(), verbose);
        if let Err(err) = handle.reload(filter) {
            eprintln!("[cmdkit][warn] failed to change log verbosity: {}", err);
        }
    }
}
