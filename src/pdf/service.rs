//! File-level document operations used by the imposition pipeline

use std::path::Path;
use lopdf::Document;
use tracing::debug;
use crate::error::Result;
use crate::pdf::{metadata, pages};

/// Operations the imposition pipeline needs from a PDF backend
///
/// Every operation that produces a document reads `input` and writes a new
/// file at `output`; the input file is never modified.
pub trait DocumentService {
    /// Number of pages in the document
    fn page_count(&self, document: &Path) -> Result<usize>;

    /// Copy `input` to `output` with one blank page after 1-based `after_page`
    fn insert_blank_page(&self, input: &Path, output: &Path, after_page: u32) -> Result<()>;

    /// Copy `input` to `output` with `count` blank pages appended
    fn append_blank_pages(&self, input: &Path, output: &Path, count: usize) -> Result<()>;

    /// Write the pages named by 1-based `selectors` to `output`, in order
    fn collect_pages(&self, input: &Path, output: &Path, selectors: &[u32]) -> Result<()>;
}

/// [`DocumentService`] backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfService;

impl LopdfService {
    fn save(mut doc: Document, output: &Path) -> Result<()> {
        doc.compress();
        doc.save(output)?;
        debug!(path = %output.display(), "saved document");
        Ok(())
    }
}

impl DocumentService for LopdfService {
    fn page_count(&self, document: &Path) -> Result<usize> {
        metadata::count_pages(document)
    }

    fn insert_blank_page(&self, input: &Path, output: &Path, after_page: u32) -> Result<()> {
        let mut doc = Document::load(input)?;
        pages::insert_blank_page(&mut doc, after_page)?;
        Self::save(doc, output)
    }

    fn append_blank_pages(&self, input: &Path, output: &Path, count: usize) -> Result<()> {
        let mut doc = Document::load(input)?;
        pages::append_blank_pages(&mut doc, count)?;
        Self::save(doc, output)
    }

    fn collect_pages(&self, input: &Path, output: &Path, selectors: &[u32]) -> Result<()> {
        let doc = Document::load(input)?;
        let collected = pages::collect_pages(&doc, selectors)?;
        Self::save(collected, output)
    }
}
