//! Booklet imposition pipeline
//!
//! Reads the page count of the input, pads short documents with blank pages,
//! computes the booklet order and writes the reordered document. All
//! intermediate files live in a per-run [`StagingArea`] next to the output,
//! which is removed however the run ends. The output path is only touched
//! once the imposed document is complete.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use crate::error::{Error, Result, Stage};
use crate::order::{booklet_selectors, compute_page_order, sheet_count};
use crate::pdf::{DocumentService, LopdfService};

/// Documents shorter than this are padded with blank pages before imposition
pub const MINIMUM_BOOKLET_PAGES: usize = 8;

/// Options for imposing a PDF
#[derive(Debug, Clone)]
pub struct ImposeOptions {
    /// Input PDF file path
    pub input_path: PathBuf,
    /// Output PDF file path
    pub output_path: PathBuf,
    /// Page count below which blank pages are appended
    pub minimum_pages: usize,
}

impl ImposeOptions {
    /// Options with the default minimum booklet size
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            minimum_pages: MINIMUM_BOOKLET_PAGES,
        }
    }
}

/// Summary of an imposition run (or of a planned one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImposeReport {
    /// Pages in the input document
    pub source_pages: usize,
    /// Pages after padding to the minimum booklet size
    pub effective_pages: usize,
    /// Blank pages appended by padding
    pub blank_pages_added: usize,
    /// Physical sheets in the booklet
    pub sheets: usize,
    /// 1-based page selectors in imposed order
    pub selectors: Vec<u32>,
}

/// Scratch directory holding one run's intermediate documents
///
/// The directory is uniquely named and deleted when dropped.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging directory beside `output` so the final move is a rename
    pub fn next_to(output: &Path) -> Result<Self> {
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        if !parent.is_dir() {
            return Err(Error::FileNotFound(parent.to_path_buf()));
        }

        let dir = tempfile::Builder::new()
            .prefix(".impose-")
            .tempdir_in(parent)?;
        debug!(path = %dir.path().display(), "created staging area");

        Ok(Self { dir })
    }

    /// Root of the staging directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a staged file
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Move a finished staged file over its destination
///
/// Staging sits in the destination's directory, so this is a single rename and
/// the destination is either replaced whole or left untouched.
pub fn persist_staged(staged: &Path, destination: &Path) -> Result<()> {
    fs::rename(staged, destination)?;
    Ok(())
}

/// Pad the input with blank pages up to `minimum_pages`
///
/// Returns the path to impose from: the input itself when it is already long
/// enough, otherwise a padded copy inside the staging area.
pub fn pad_to_minimum<S: DocumentService>(
    service: &S,
    staging: &StagingArea,
    input: &Path,
    page_count: usize,
    minimum_pages: usize,
) -> Result<PathBuf> {
    if page_count >= minimum_pages {
        debug!(page_count, minimum_pages, "no padding needed");
        return Ok(input.to_path_buf());
    }

    let blanks = minimum_pages - page_count;
    let padded = staging.file("padded.pdf");
    service
        .append_blank_pages(input, &padded, blanks)
        .map_err(|e| Error::in_stage(Stage::Padding, e))?;
    info!(blanks, minimum_pages, "padded document with blank pages");

    Ok(padded)
}

/// Work out the imposition for a document without writing anything
pub fn plan_imposition<S: DocumentService>(
    service: &S,
    options: &ImposeOptions,
) -> Result<ImposeReport> {
    let input = &options.input_path;
    if !input.exists() {
        return Err(Error::FileNotFound(input.clone()));
    }

    let source_pages = service
        .page_count(input)
        .map_err(|e| Error::in_stage(Stage::ReadPageCount, e))?;
    if source_pages == 0 {
        return Err(Error::in_stage(Stage::ReadPageCount, Error::EmptyPdf(input.clone())));
    }

    let effective_pages = source_pages.max(options.minimum_pages);
    let order = compute_page_order(effective_pages)?;
    let selectors = booklet_selectors(&order, effective_pages);
    debug!(?selectors, "computed booklet order");

    Ok(ImposeReport {
        source_pages,
        effective_pages,
        blank_pages_added: effective_pages - source_pages,
        sheets: sheet_count(effective_pages),
        selectors,
    })
}

/// Impose a PDF for booklet printing using the given document service
pub fn impose_with<S: DocumentService>(
    service: &S,
    options: &ImposeOptions,
) -> Result<ImposeReport> {
    let report = plan_imposition(service, options)?;
    info!(
        input = %options.input_path.display(),
        pages = report.source_pages,
        sheets = report.sheets,
        "imposing booklet"
    );

    let staging = StagingArea::next_to(&options.output_path)?;
    let source = pad_to_minimum(
        service,
        &staging,
        &options.input_path,
        report.source_pages,
        options.minimum_pages,
    )?;

    let staged_output = staging.file("imposed.pdf");
    service
        .collect_pages(&source, &staged_output, &report.selectors)
        .map_err(|e| Error::in_stage(Stage::Collecting, e))?;

    persist_staged(&staged_output, &options.output_path)
        .map_err(|e| Error::in_stage(Stage::Writing, e))?;
    info!(output = %options.output_path.display(), "wrote imposed booklet");

    Ok(report)
}

/// Impose a PDF for booklet printing
///
/// # Example
///
/// ```no_run
/// use pdf_booklet::impose::{impose_pdf, ImposeOptions};
///
/// let options = ImposeOptions::new("handout.pdf", "handout-booklet.pdf");
/// let report = impose_pdf(&options).expect("Failed to impose");
/// println!("{} sheets", report.sheets);
/// ```
pub fn impose_pdf(options: &ImposeOptions) -> Result<ImposeReport> {
    impose_with(&LopdfService, options)
}
