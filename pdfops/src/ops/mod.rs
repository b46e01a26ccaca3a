//! PDF operations, one module per command.
//!
//! Each module exposes a small number of entry points that take already
//! validated configuration and return plain data; all user-facing output
//! stays in the CLI.

pub mod form;
pub mod merge;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod protect;
pub mod split;
pub mod tables;
pub mod text;
pub mod watermark;

pub use merge::{MergeOutcome, expand_inputs, merge_paths};
pub use protect::DecryptOutcome;
pub use split::split_document;
pub use watermark::apply_watermark;
