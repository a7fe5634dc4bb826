//! PDF Booklet Library
//!
//! Reorders the pages of a PDF so that, printed double-sided, folded and
//! stacked, the sheets form a saddle-stitched booklet that reads in order.
//! This library provides functionality to:
//! - Compute the booklet page order for any page count
//! - Pad short documents with blank pages
//! - Collect pages of a PDF into a new document in a given order
//!
//! # Example
//!
//! ```no_run
//! use pdf_booklet::impose::{impose_pdf, ImposeOptions};
//!
//! let options = ImposeOptions::new("handout.pdf", "booklet.pdf");
//! impose_pdf(&options).expect("Failed to impose PDF");
//! ```

pub mod error;
pub mod impose;
pub mod order;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result, Stage};
pub use impose::{impose_pdf, impose_with, ImposeOptions, ImposeReport, MINIMUM_BOOKLET_PAGES};
pub use order::compute_page_order;
