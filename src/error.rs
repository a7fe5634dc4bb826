//! Error types for the booklet imposition library

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline phase an imposition failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the page count of the input document
    ReadPageCount,
    /// Appending blank pages up to the minimum booklet size
    Padding,
    /// Extracting and reordering pages into the imposed document
    Collecting,
    /// Moving the finished document to the output path
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Stage::ReadPageCount => "reading page count",
            Stage::Padding => "adding blank pages",
            Stage::Collecting => "reordering pages",
            Stage::Writing => "writing output",
        };
        f.write_str(phase)
    }
}

/// Main error type for the booklet library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Page count that cannot be laid out
    #[error("Invalid page count: {0}")]
    InvalidPageCount(usize),

    /// Page selector outside the document
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: usize },

    /// Empty page selection
    #[error("No pages selected")]
    NoPagesSelected,

    /// Catalog or page tree is missing a required entry
    #[error("Malformed page tree: {0}")]
    MalformedPageTree(String),

    /// Failure inside one phase of the imposition pipeline
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the pipeline phase that produced it
    pub fn in_stage(stage: Stage, source: Error) -> Self {
        Error::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// The pipeline phase this error was raised in, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
