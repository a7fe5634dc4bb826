//! PDF page counting

use std::path::Path;
use lopdf::{Document, Object};
use tracing::warn;
use crate::error::{Error, Result};
use crate::pdf::pages::page_tree_root;

/// Read the Count field from the root Pages dictionary
///
/// Some producers write a Count that doesn't match the actual tree, so this is
/// only used to flag suspicious documents.
fn declared_page_count(doc: &Document) -> Result<usize> {
    let pages_id = page_tree_root(doc)?;
    let pages_dict = doc.get_dictionary(pages_id)?;

    let count = pages_dict.get(b"Count")
        .map_err(|_| Error::MalformedPageTree("No Count in Pages".to_string()))?;

    match count {
        Object::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(Error::MalformedPageTree("Count is not a non-negative integer".to_string())),
    }
}

/// Count the pages of a loaded document by walking its page tree
pub fn count_document_pages(doc: &Document) -> usize {
    let walked = doc.get_pages().len();

    match declared_page_count(doc) {
        Ok(declared) if declared != walked => {
            warn!(declared, walked, "page tree Count disagrees with its leaves; using leaves");
        }
        Err(e) => warn!("could not read page tree Count: {}", e),
        _ => {}
    }

    walked
}

/// Count the number of pages in a PDF file
///
/// Fails when the file is missing, cannot be parsed, or has no pages.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_document_pages(&doc);

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}
