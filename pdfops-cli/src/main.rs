//! pdfops - Command-line toolkit for PDF manipulation.
//!
//! Watermark, extract, merge, protect, and split PDF documents.

mod cli;

use clap::Parser;
use std::path::Path;
use std::process;
use std::str::FromStr;

use crate::cli::{Cli, Command, FormCommand};
use pdfops::config::{PageScan, ProtectAction, TableStrategy, TextMode, WatermarkOptions};
use pdfops::error::PdfOpsError;
use pdfops::io::{PdfReader, PdfWriter, read_bytes, write_bytes};
use pdfops::ops;
use pdfops::output::{OutputFormatter, PageProgress};
use pdfops::pages::resolve_selection;
use pdfops::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    if let Err(err) = run(cli.command, &formatter).await {
        formatter.error(&format!("{err}"));
        process::exit(err.exit_code());
    }
}

/// Dispatch the parsed subcommand.
async fn run(command: Command, formatter: &OutputFormatter) -> Result<(), PdfOpsError> {
    match command {
        Command::Watermark {
            input,
            output,
            text,
            opacity,
            rotation,
            font_size,
        } => {
            let options = WatermarkOptions {
                text,
                opacity,
                rotation,
                font_size,
            };
            watermark(&input, &output, &options, formatter).await
        }

        Command::Tables {
            input,
            output,
            page,
            all_pages,
            strategy,
        } => {
            let scan = PageScan::from_args(page, all_pages)?;
            let strategy = TableStrategy::from_str(&strategy)?;
            tables(&input, &output, scan, strategy, formatter).await
        }

        Command::Text {
            input,
            output,
            layout,
            ocr,
            ocr_models,
        } => {
            let mode = TextMode::from_flags(layout, ocr)?;
            text(&input, &output, mode, ocr_models.as_deref(), formatter).await
        }

        Command::Form { action } => match action {
            FormCommand::List { input } => form_list(&input, formatter).await,
            FormCommand::Fill {
                input,
                output,
                json,
                fields,
            } => form_fill(&input, &output, json.as_deref(), &fields, formatter).await,
        },

        Command::Merge {
            output,
            inputs,
            jobs,
        } => merge(&output, &inputs, jobs, formatter).await,

        Command::Protect {
            action,
            input,
            output,
            password,
        } => {
            let action = ProtectAction::from_str(&action)?;
            protect(action, &input, &output, &password, formatter).await
        }

        Command::Split {
            input,
            output_dir,
            pages,
            prefix,
        } => split(&input, &output_dir, pages.as_deref(), &prefix, formatter).await,
    }
}

async fn watermark(
    input: &Path,
    output: &Path,
    options: &WatermarkOptions,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    options.validate()?;

    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;

    formatter.info(&format!("Creating watermark: '{}'", options.text));
    formatter.info(&format!("Adding watermark to {} pages...", loaded.page_count));

    let mut progress = if formatter.should_print() {
        PageProgress::new("Stamping page", loaded.page_count)
    } else {
        PageProgress::disabled()
    };

    let stamped = ops::apply_watermark(&mut doc, options, |_, _| progress.tick())?;
    progress.finish();

    formatter.info(&format!("Writing watermarked PDF to {}...", output.display()));
    PdfWriter::new().save(&doc, output).await?;

    formatter.success(&format!("Successfully added watermark to {stamped} pages"));
    Ok(())
}

async fn tables(
    input: &Path,
    output: &Path,
    scan: PageScan,
    strategy: TableStrategy,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let data = read_bytes(input).await?;

    match scan {
        PageScan::First => formatter.info("Extracting tables from first page..."),
        PageScan::All => formatter.info("Extracting tables from all pages..."),
        PageScan::Single(n) => formatter.info(&format!("Extracting tables from page {n}...")),
    }

    let found = ops::tables::extract_tables(&data, scan, strategy, |done, total| {
        formatter.debug(&format!("Scanned page {done}/{total}"));
    })?;

    let Some(table) = found.first() else {
        formatter.warning("No tables found");
        return Ok(());
    };

    ops::tables::write_csv(table, output)?;
    formatter.success(&format!(
        "Saved {} rows to {}",
        table.rows.len(),
        output.display()
    ));

    if found.len() > 1 {
        formatter.info(&format!(
            "Note: Found {} tables, saved first one only",
            found.len()
        ));
    }

    Ok(())
}

async fn text(
    input: &Path,
    output: &Path,
    mode: TextMode,
    ocr_models: Option<&Path>,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let data = read_bytes(input).await?;

    let pages = match mode {
        TextMode::Ocr => ocr_pages(&data, ocr_models, formatter)?,
        _ => ops::text::extract_pages(&data, mode, |page, total| {
            formatter.debug(&format!("Processing page {page}/{total}"));
        })?,
    };

    let report = ops::text::render_report(&pages);
    write_bytes(output, report.as_bytes()).await?;

    formatter.success(&format!("Text extracted to {}", output.display()));
    Ok(())
}

#[cfg(feature = "ocr")]
fn ocr_pages(
    data: &[u8],
    models: Option<&Path>,
    formatter: &OutputFormatter,
) -> Result<Vec<ops::text::ExtractedPage>, PdfOpsError> {
    use pdfops::ops::ocr::OcrConfig;

    let config = match models {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };

    formatter.info("Converting PDF pages to images...");

    let pages = pdfops::ops::ocr::recognize_pages(data, &config, |page, total| {
        formatter.info(&format!("OCR processing page {page}/{total}..."));
    })?;

    Ok(pages)
}

#[cfg(not(feature = "ocr"))]
fn ocr_pages(
    _data: &[u8],
    _models: Option<&Path>,
    _formatter: &OutputFormatter,
) -> Result<Vec<ops::text::ExtractedPage>, PdfOpsError> {
    Err(PdfOpsError::invalid_config(
        "This build has no OCR support; rebuild with the 'ocr' feature",
    ))
}

async fn form_list(input: &Path, formatter: &OutputFormatter) -> Result<(), PdfOpsError> {
    let data = read_bytes(input).await?;
    let fields = ops::form::list_fields(&data)?;

    if fields.is_empty() {
        formatter.warning("No form fields found in PDF");
        return Ok(());
    }

    // Field listings are the command's primary output and go to stdout.
    println!("Found {} form fields:\n", fields.len());
    for field in fields {
        let value = field.value.as_deref().unwrap_or("(empty)");
        println!("  {}: {}", field.name, value);
    }

    Ok(())
}

async fn form_fill(
    input: &Path,
    output: &Path,
    json: Option<&Path>,
    field_args: &[String],
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let values = ops::form::load_field_data(json, field_args).await?;
    let data = read_bytes(input).await?;

    formatter.info("Filling form fields...");
    formatter.detail("Fields to fill", &values.len().to_string());

    let (bytes, outcome) = ops::form::fill_fields(&data, &values)?;

    if !outcome.unknown.is_empty() {
        formatter.warning(&format!(
            "Unknown fields: {}",
            outcome.unknown.join(", ")
        ));
    }

    write_bytes(output, &bytes).await?;

    formatter.success(&format!(
        "Form filled ({} fields) and saved to {}",
        outcome.filled.len(),
        output.display()
    ));
    Ok(())
}

async fn merge(
    output: &Path,
    inputs: &[String],
    jobs: Option<usize>,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let paths = ops::expand_inputs(inputs)?;

    for path in &paths {
        if path == output {
            return Err(PdfOpsError::invalid_config(format!(
                "Output file cannot be one of the input files: {}",
                output.display()
            )));
        }
    }

    let workers = jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    formatter.info(&format!("Merging {} file(s)...", paths.len()));

    let outcome = ops::merge_paths(&paths, workers).await?;

    for (path, reason) in &outcome.skipped {
        formatter.warning(&format!("Skipping {}: {reason}", path.display()));
    }

    formatter.info(&format!("Writing merged PDF to {}...", output.display()));
    PdfWriter::new().save(&outcome.document, output).await?;

    formatter.success(&format!(
        "Successfully merged {} file(s) into {} ({} pages)",
        outcome.merged.len(),
        output.display(),
        outcome.total_pages
    ));
    Ok(())
}

async fn protect(
    action: ProtectAction,
    input: &Path,
    output: &Path,
    password: &str,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let data = read_bytes(input).await?;

    match action {
        ProtectAction::Encrypt => {
            formatter.info("Encrypting PDF...");
            let bytes = ops::protect::encrypt(input, &data, password)?;
            write_bytes(output, &bytes).await?;
            formatter.success(&format!("PDF encrypted and saved to {}", output.display()));
        }
        ProtectAction::Decrypt => {
            let (bytes, outcome) = ops::protect::decrypt(input, &data, password)?;

            if outcome == ops::DecryptOutcome::NotEncrypted {
                formatter.warning("PDF is not encrypted");
            }

            write_bytes(output, &bytes).await?;
            formatter.success(&format!("PDF decrypted and saved to {}", output.display()));
        }
    }

    Ok(())
}

async fn split(
    input: &Path,
    output_dir: &Path,
    pages: Option<&str>,
    prefix: &str,
    formatter: &OutputFormatter,
) -> Result<(), PdfOpsError> {
    let result = Validator::new().validate_file(input).await?;
    let loaded = PdfReader::new().load(input).await?;

    let selection = resolve_selection(pages, result.page_count as u32)?;

    formatter.info(&format!(
        "Splitting {} pages from {}...",
        selection.len(),
        input.display()
    ));

    let outcome = ops::split_document(
        &loaded.document,
        &selection,
        output_dir,
        prefix,
        |_, path: &Path| {
            formatter.info(&format!("  Created {}", path.display()));
        },
    )
    .await?;

    formatter.success(&format!(
        "Successfully split {} pages",
        outcome.files.len()
    ));
    Ok(())
}
