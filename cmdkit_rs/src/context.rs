//! Per-process handles shared by the parser, dispatcher and error path.

use crate::colors::Painter;
use crate::config::AppConfig;
use crate::logger::Logger;
use crate::progress::Loader;

/// Spinner, log verbosity, color decision and program metadata.
///
/// Every field is a cheap handle, so the context is cloned freely instead of
/// living in globals.
#[derive(Clone, Debug)]
pub struct CliContext {
    pub loader: Loader,
    pub logger: Logger,
    pub painter: Painter,
    pub binary_name: String,
    pub version: String,
}

impl CliContext {
    /// Context for a real run: visible spinner, installed subscriber.
    ///
    /// `verbose` sets the console log level until a command is dispatched.
    pub fn from_config(config: &AppConfig, verbose: bool) -> Self {
        let loader = Loader::new();
        let painter = Painter::new(config.color);
        let logger = Logger::init(
            loader.clone(),
            config.log_level.clone(),
            verbose,
            painter.enabled(),
        );
        Self {
            loader,
            logger,
            painter,
            binary_name: config.binary_name.clone(),
            version: config.version.clone(),
        }
    }

    /// Context that never draws, colors or touches the global subscriber.
    pub fn plain(binary_name: impl Into<String>) -> Self {
        Self {
            loader: Loader::hidden(),
            logger: Logger::disabled(),
            painter: Painter::plain(),
            binary_name: binary_name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
