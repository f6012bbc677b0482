//! Terminal color utilities for CLI output.
//!
//! Every piece of colored text goes through a [`Painter`], so a single
//! decision (color mode + terminal detection) controls the whole run and
//! tests can render deterministic plain text.

use std::io::IsTerminal;
use std::str::FromStr;

use console::Style;
use serde::Deserialize;

// ============================================================================
// Color State
// ============================================================================

/// When to emit ANSI styling.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" | "yes" | "true" => Ok(ColorMode::Always),
            "never" | "no" | "false" => Ok(ColorMode::Never),
            _ => Err(format!(
                "Invalid color mode '{}'. Use: auto, always, or never.",
                value
            )),
        }
    }
}

/// Determines if colors should be used based on ColorMode and terminal detection.
///
/// Help goes to stdout and diagnostics to stderr; auto mode only colors when
/// both are attached to a terminal.
pub fn is_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal() && std::io::stderr().is_terminal(),
    }
}

/// Colorizer that can be passed around to format functions.
#[derive(Clone, Copy, Debug)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: is_enabled(mode),
        }
    }

    /// Painter that never styles; used for piped output and tests.
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    // === Semantic colors ===

    /// Errors - RED
    pub fn error(&self, s: &str) -> String {
        self.paint(s, Style::new().red())
    }

    /// Warnings, hints, failures shown to the user - YELLOW
    pub fn warn(&self, s: &str) -> String {
        self.paint(s, Style::new().yellow())
    }

    /// Command names, flags, argument names - GREEN
    pub fn ok(&self, s: &str) -> String {
        self.paint(s, Style::new().green())
    }

    /// Headers, descriptions - BOLD
    pub fn header(&self, s: &str) -> String {
        self.paint(s, Style::new().bold())
    }

    /// Group titles in the command listing
    pub fn title(&self, s: &str) -> String {
        self.paint(s, Style::new().underlined().bold().blue())
    }

    // === Raw style access ===

    pub fn paint(&self, s: &str, style: Style) -> String {
        if self.enabled {
            style.force_styling(true).apply_to(s).to_string()
        } else {
            s.to_string()
        }
    }
}
