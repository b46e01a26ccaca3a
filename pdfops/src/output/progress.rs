//! Per-page progress counter.
//!
//! Multi-page operations (watermarking, splitting, OCR) report a
//! `label page N/M` counter on stderr, rewriting the line in place when
//! stderr is a terminal and falling back to one line per page otherwise.

use std::io::{self, IsTerminal, Write};

/// Counter-style progress indicator for page-by-page work.
pub struct PageProgress {
    total: usize,
    current: usize,
    label: String,
    interactive: bool,
    enabled: bool,
}

impl PageProgress {
    /// Create a progress counter over `total` pages.
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            total,
            current: 0,
            label: label.into(),
            interactive: io::stderr().is_terminal(),
            enabled: true,
        }
    }

    /// Create a disabled counter that prints nothing.
    pub fn disabled() -> Self {
        Self {
            total: 0,
            current: 0,
            label: String::new(),
            interactive: false,
            enabled: false,
        }
    }

    /// Record one completed page and render the counter.
    pub fn tick(&mut self) {
        self.current += 1;
        if !self.enabled {
            return;
        }

        if self.interactive {
            eprint!("\r  {} {}/{}", self.label, self.current, self.total);
            io::stderr().flush().ok();
        } else {
            eprintln!("  {} {}/{}", self.label, self.current, self.total);
        }
    }

    /// Number of pages recorded so far.
    pub fn completed(&self) -> usize {
        self.current
    }

    /// Finish the counter, terminating the in-place line.
    pub fn finish(&mut self) {
        if self.enabled && self.interactive && self.current > 0 {
            eprintln!();
        }
    }
}
