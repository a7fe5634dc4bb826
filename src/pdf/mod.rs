//! PDF manipulation module

pub mod metadata;
pub mod pages;
pub mod service;

// Re-export commonly used items
pub use metadata::{count_document_pages, count_pages};
pub use pages::{append_blank_pages, collect_pages, insert_blank_page};
pub use service::{DocumentService, LopdfService};
