//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Locate the root of the page tree through the trailer's catalog
pub(crate) fn page_tree_root(doc: &Document) -> Result<ObjectId> {
    let catalog_ref = doc.trailer.get(b"Root")
        .map_err(|_| Error::MalformedDocument("No Root in trailer".to_string()))?;

    let catalog_id = match catalog_ref {
        Object::Reference(id) => *id,
        _ => return Err(Error::MalformedDocument("Root is not a reference".to_string())),
    };

    let catalog_dict = doc.get_dictionary(catalog_id)
        .map_err(|_| Error::MalformedDocument("Catalog is not a dictionary".to_string()))?;

    match catalog_dict.get(b"Pages") {
        Ok(Object::Reference(id)) => Ok(*id),
        Ok(_) => Err(Error::MalformedDocument("Pages is not a reference".to_string())),
        Err(_) => Err(Error::MalformedDocument("No Pages in catalog".to_string())),
    }
}

/// Count the leaves of the page tree
///
/// Walking the tree rather than trusting the root's Count entry keeps the
/// number in step with the pages that actually get reordered.
fn count_leaf_pages(doc: &Document) -> Result<usize> {
    page_tree_root(doc)?;
    Ok(doc.get_pages().len())
}

/// Read an Info dictionary string entry, if present and valid UTF-8
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info_dict = doc.get_dictionary(info_id).ok()?;
    let bytes = info_dict.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_leaf_pages(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(PdfMetadata {
        page_count,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    extract_metadata(path).map(|metadata| metadata.page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_empty_page_tree_rejected_by_both() {
        use lopdf::Dictionary;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![])),
            ("Count", Object::Integer(0)),
        ]));
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("empty.pdf");
        doc.save(&path).expect("Failed to write test PDF");

        assert!(matches!(count_pages(&path), Err(Error::EmptyPdf(_))));
        assert!(matches!(extract_metadata(&path), Err(Error::EmptyPdf(_))));
    }

    #[test]
    fn test_page_tree_root_missing_catalog() {
        let doc = Document::with_version("1.5");
        let result = page_tree_root(&doc);
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
    }
}
