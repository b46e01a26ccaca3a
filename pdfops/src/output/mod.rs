//! Diagnostic output for pdfops.
//!
//! Commands report progress and outcomes on stderr; stdout is reserved for
//! primary command output (form-field listings). [`OutputFormatter`]
//! handles leveled messages with quiet/verbose switches, and
//! [`PageProgress`] covers the per-page counters used by multi-page
//! operations.

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::PageProgress;
