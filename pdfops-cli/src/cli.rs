//! CLI argument parsing for pdfops.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is deliberately self-contained (types from the library are parsed in
//! `main`) so the build script can reuse it for man-page generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line toolkit for PDF manipulation.
///
/// pdfops bundles the everyday PDF chores - watermarking, table and text
/// extraction, form filling, merging, password protection, and page
/// splitting - behind one binary. Progress is reported on stderr; failures
/// exit non-zero.
#[derive(Parser, Debug)]
#[command(name = "pdfops")]
#[command(version)]
#[command(about = "Watermark, extract, merge, protect, and split PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Suppress all non-warning output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show detailed information while processing
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per operation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stamp a text watermark onto every page
    Watermark {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        output: PathBuf,

        /// Watermark text
        text: String,

        /// Watermark opacity (0.0-1.0)
        #[arg(long, default_value_t = 0.5)]
        opacity: f64,

        /// Watermark rotation in degrees
        #[arg(long, default_value_t = 45.0)]
        rotation: f64,

        /// Font size in points
        #[arg(long = "font-size", default_value_t = 60.0)]
        font_size: f64,
    },

    /// Extract the first table found to CSV
    Tables {
        /// Input PDF file
        input: PathBuf,

        /// Output CSV file
        output: PathBuf,

        /// Extract from a specific page number
        #[arg(long, value_name = "N")]
        page: Option<u32>,

        /// Scan every page instead of only the first
        #[arg(long)]
        all_pages: bool,

        /// Table detection strategy
        ///
        /// - lines: build the cell grid from ruling lines drawn on the page
        /// - text: infer columns from gaps in the text
        #[arg(long, value_name = "STRATEGY", default_value = "lines")]
        #[arg(value_parser = ["lines", "text"])]
        strategy: String,
    },

    /// Extract text, one labeled block per page
    Text {
        /// Input PDF file
        input: PathBuf,

        /// Output text file
        output: PathBuf,

        /// Reconstruct reading order and spacing from glyph positions
        #[arg(long)]
        layout: bool,

        /// Rasterize pages and recognize text with the OCR engine
        ///
        /// For scanned documents with no text layer. Requires the ocrs
        /// model files; see --ocr-models.
        #[arg(long, conflicts_with = "layout")]
        ocr: bool,

        /// Directory containing the OCR model files
        ///
        /// Defaults to $XDG_CACHE_HOME/ocrs (typically ~/.cache/ocrs).
        #[arg(long, value_name = "DIR")]
        ocr_models: Option<PathBuf>,
    },

    /// List or fill interactive form fields
    Form {
        #[command(subcommand)]
        action: FormCommand,
    },

    /// Concatenate PDF files into a single document
    ///
    /// Inputs that fail to load are skipped with a warning; the merge
    /// continues with the remaining files.
    Merge {
        /// Output PDF file
        output: PathBuf,

        /// Input PDF files to merge, in order (glob patterns allowed)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Number of inputs to load concurrently
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Add or remove password protection
    Protect {
        /// Action to perform
        #[arg(value_parser = ["encrypt", "decrypt"])]
        action: String,

        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        output: PathBuf,

        /// Password to apply or remove
        password: String,
    },

    /// Split into one PDF file per selected page
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output directory for the page files
        output_dir: PathBuf,

        /// Page ranges to extract (e.g. "1-3,5,7-9"); defaults to all pages
        #[arg(long, value_name = "RANGE")]
        pages: Option<String>,

        /// Prefix for output files, producing {prefix}{page}.pdf
        #[arg(long, default_value = "page_")]
        prefix: String,
    },
}

/// Form subcommands.
#[derive(Subcommand, Debug)]
pub enum FormCommand {
    /// Print each text field's name and current value
    List {
        /// Input PDF file
        input: PathBuf,
    },

    /// Fill named text fields on the first page
    Fill {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        output: PathBuf,

        /// JSON file with a name-to-value mapping
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Field value as name=value (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
}
