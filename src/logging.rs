//! Logging capability handed to the tracking pipeline.
//!
//! The pipeline never calls the global `log` macros directly; it writes to a
//! [`Logger`] it was given. [`LogFacade`] forwards to the `log` crate behind a
//! verbosity gate, [`MemoryLogger`] keeps the lines for inspection.

use log::{Level, LevelFilter};
use std::fmt;
use std::sync::Mutex;

pub trait Logger {
    /// Whether messages at `level` would be kept.
    fn enabled(&self, level: Level) -> bool;

    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn info(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Info) {
            self.log(Level::Info, args);
        }
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Debug) {
            self.log(Level::Debug, args);
        }
    }
}

/// Forwards to the `log` facade under a fixed target.
#[derive(Clone, Copy, Debug)]
pub struct LogFacade {
    verbosity: LevelFilter,
    target: &'static str,
}

impl LogFacade {
    pub fn new(verbosity: LevelFilter) -> Self {
        Self {
            verbosity,
            target: "hypotheses_tracking",
        }
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl Logger for LogFacade {
    fn enabled(&self, level: Level) -> bool {
        level <= self.verbosity
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{args}");
    }
}

/// Records formatted lines in memory.
#[derive(Debug)]
pub struct MemoryLogger {
    verbosity: LevelFilter,
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new(verbosity: LevelFilter) -> Self {
        Self {
            verbosity,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Logger for MemoryLogger {
    fn enabled(&self, level: Level) -> bool {
        level <= self.verbosity
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, args.to_string()));
        }
    }
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        (**self).log(level, args)
    }
}
