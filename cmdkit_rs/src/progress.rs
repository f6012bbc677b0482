//! Progress UI utilities (spinner, status lines)
//!
//! A [`Loader`] is a cheap, clonable handle to at most one spinner. The
//! dispatcher switches it on or off per invocation, command handlers start
//! and finish it, and the logger suspends it while writing a line.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Spinner slot: the bar plus whether `start` set it ticking.
struct Spinner {
    bar: ProgressBar,
    ticking: bool,
}

/// Shared spinner handle
#[derive(Clone, Default)]
pub struct Loader {
    spinner: Arc<Mutex<Option<Spinner>>>,
    hidden: bool,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("active", &self.is_active())
            .field("loading", &self.is_loading())
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader that keeps full state but never draws or prints.
    pub fn hidden() -> Self {
        Self {
            spinner: Arc::default(),
            hidden: true,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Spinner>> {
        self.spinner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn create_spinner(&self) -> Spinner {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        if let Ok(spinner_style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(spinner_style);
        }
        Spinner {
            bar,
            ticking: false,
        }
    }

    /// Make the spinner available. Does not start ticking.
    pub fn on(&self) {
        let mut slot = self.slot();
        if slot.is_none() {
            *slot = Some(self.create_spinner());
        }
    }

    /// Stop and drop the spinner; later calls become no-ops until `on`.
    pub fn off(&self) {
        if let Some(spinner) = self.slot().take() {
            spinner.bar.finish_and_clear();
        }
    }

    /// Whether `on` was called and `off` was not.
    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Whether `start` set the spinner ticking and nothing stopped it since.
    pub fn is_loading(&self) -> bool {
        self.slot().as_ref().is_some_and(|spinner| spinner.ticking)
    }

    /// Change the message. Does not start ticking.
    pub fn set_text(&self, text: &str) {
        if let Some(spinner) = self.slot().as_ref() {
            spinner.bar.set_message(text.to_string());
        }
    }

    pub fn start(&self, text: &str) {
        let mut slot = self.slot();
        let Some(spinner) = slot.as_mut() else {
            return;
        };
        // A finished bar cannot tick again, swap in a fresh one
        if spinner.bar.is_finished() {
            *spinner = self.create_spinner();
        }
        spinner.bar.set_message(text.to_string());
        spinner.bar.enable_steady_tick(TICK_INTERVAL);
        spinner.ticking = true;
    }

    /// Clear the spinner line without a message.
    pub fn stop(&self) {
        if let Some(spinner) = self.slot().as_mut() {
            spinner.bar.finish_and_clear();
            spinner.ticking = false;
        }
    }

    /// Stop ticking and leave the current line on screen.
    pub fn stop_and_persist(&self) {
        if let Some(spinner) = self.slot().as_mut().filter(|spinner| spinner.ticking) {
            spinner.bar.abandon();
            spinner.ticking = false;
        }
    }

    /// Finish with success message (green checkmark)
    pub fn succeed(&self, text: &str) {
        self.finish_with(text, style("✓").green().bold().to_string());
    }

    /// Finish with error message (red)
    pub fn fail(&self, text: &str) {
        self.finish_with(text, style("✗").red().bold().to_string());
    }

    /// Finish with warning message (yellow)
    pub fn warn(&self, text: &str) {
        self.finish_with(text, style("⚠").yellow().bold().to_string());
    }

    /// Finish with info message (blue)
    pub fn info(&self, text: &str) {
        self.finish_with(text, style("ℹ").blue().bold().to_string());
    }

    fn finish_with(&self, text: &str, symbol: String) {
        let mut slot = self.slot();
        let Some(spinner) = slot.as_mut() else {
            return;
        };
        spinner.bar.finish_and_clear();
        spinner.ticking = false;
        if !self.hidden {
            eprintln!("{} {}", symbol, text);
        }
    }

    /// Run `f` with the spinner temporarily hidden.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        let bar = self.slot().as_ref().map(|spinner| spinner.bar.clone());
        match bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}
