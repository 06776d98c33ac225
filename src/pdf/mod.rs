//! PDF manipulation module

pub mod metadata;
pub mod reorder;

// Re-export commonly used items
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
pub use reorder::{reorder_document, reorder_pdf, ReorderOptions, ReorderReport};
