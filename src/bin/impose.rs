//! Booklet imposition CLI tool
//!
//! Reorders the pages of a PDF for printing as a saddle-stitched booklet.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use pdf_booklet::impose::{impose_pdf, plan_imposition, ImposeOptions, ImposeReport};
use pdf_booklet::order::sheets;
use pdf_booklet::pdf::LopdfService;
use pdf_booklet::MINIMUM_BOOKLET_PAGES;

const USAGE: &str = "Usage:
  impose -i input.pdf -o output.pdf
  impose input.pdf output.pdf";

/// Impose - Reorder PDF pages for booklet printing
#[derive(Parser)]
#[command(name = "impose")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Impose with flags
    impose -i handout.pdf -o booklet.pdf

    # Impose with positional arguments
    impose handout.pdf booklet.pdf

    # Show the sheet layout without writing anything
    impose --dry-run handout.pdf booklet.pdf")]
struct Cli {
    /// Input PDF file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input and output PDF files, when not given with -i/-o
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Pad documents shorter than this with blank pages
    #[arg(long, default_value_t = MINIMUM_BOOKLET_PAGES)]
    min_pages: usize,

    /// Print the sheet layout instead of writing the output
    #[arg(long)]
    dry_run: bool,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,

    /// Log progress details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some((input, output)) = resolve_paths(&cli) else {
        eprintln!("{}", USAGE);
        process::exit(1);
    };

    let options = ImposeOptions {
        input_path: input,
        output_path: output,
        minimum_pages: cli.min_pages,
    };

    let result = if cli.dry_run {
        cmd_plan(&options)
    } else {
        cmd_impose(&options, cli.open)
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber; RUST_LOG wins unless --verbose is set
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pdf_booklet=debug,impose=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accept either both flags or exactly two positional paths
fn resolve_paths(cli: &Cli) -> Option<(PathBuf, PathBuf)> {
    match (&cli.input, &cli.output, cli.paths.as_slice()) {
        (Some(input), Some(output), []) => Some((input.clone(), output.clone())),
        (None, None, [input, output]) => Some((input.clone(), output.clone())),
        _ => None,
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Impose the input and write the booklet
fn cmd_impose(options: &ImposeOptions, open: bool) -> Result<()> {
    let report = impose_pdf(options)
        .with_context(|| format!("imposing {}", options.input_path.display()))?;

    if report.blank_pages_added > 0 {
        eprintln!("Added {} blank pages", report.blank_pages_added);
    }

    println!("Successfully created imposed PDF: {}", options.output_path.display());
    println!("Happy printing!");

    if open {
        open_file(&options.output_path)
            .with_context(|| format!("opening {}", options.output_path.display()))?;
    }

    Ok(())
}

/// Show the booklet layout without writing anything
fn cmd_plan(options: &ImposeOptions) -> Result<()> {
    let report = plan_imposition(&LopdfService, options)
        .with_context(|| format!("planning {}", options.input_path.display()))?;

    println!("File: {}", options.input_path.display());
    print_report(&report)
}

fn print_report(report: &ImposeReport) -> Result<()> {
    println!(
        "Pages: {} ({} blank added)",
        report.source_pages, report.blank_pages_added
    );
    println!("Sheets: {}", report.sheets);

    let label = |index: usize| {
        if index < report.source_pages {
            (index + 1).to_string()
        } else {
            "blank".to_string()
        }
    };

    for sheet in sheets(report.effective_pages)? {
        println!(
            "  Sheet {}: front [{}, {}]  back [{}, {}]",
            sheet.number,
            label(sheet.front[0]),
            label(sheet.front[1]),
            label(sheet.back[0]),
            label(sheet.back[1]),
        );
    }

    let order: Vec<String> = report.selectors.iter().map(u32::to_string).collect();
    println!("Order: {}", order.join(","));

    Ok(())
}
