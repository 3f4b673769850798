//! Progress presentation for batch operations
//!
//! Batches such as `update --all` report through the [`ProgressReporter`]
//! trait. The CLI uses [`InteractiveProgressReporter`]; tests use
//! `SilentProgressReporter`.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for long-running batches
pub trait ProgressReporter {
    /// Begin a batch of `total` items
    fn start(&mut self, total: u64);

    /// Show the item currently being processed
    fn update(&mut self, item: &str);

    /// Mark the current item done
    fn inc(&mut self);

    fn finish(&mut self);

    /// Stop without completing, leaving the bar as is
    fn abandon(&mut self);
}

/// Progress bar on stderr; hidden when stderr is not a terminal
#[derive(Debug)]
pub struct InteractiveProgressReporter {
    bar: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&mut self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn update(&mut self, item: &str) {
        let count = item.chars().count();
        let display = if count > 50 {
            let tail: String = item.chars().skip(count - 47).collect();
            format!("...{tail}")
        } else {
            item.to_string()
        };
        self.bar.set_message(display);
    }

    fn inc(&mut self) {
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.bar.abandon();
    }
}

/// No-op reporter
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReporter;

#[cfg(test)]
impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _total: u64) {}

    fn update(&mut self, _item: &str) {}

    fn inc(&mut self) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
