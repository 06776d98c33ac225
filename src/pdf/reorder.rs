//! Booklet page reordering using lopdf

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use lopdf::{Document, Object, ObjectId};
use crate::booklet::ordered_sequence;
use crate::error::{Error, Result};
use super::metadata::page_tree_root;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic Parent chains in broken files
const MAX_TREE_DEPTH: usize = 64;

/// Options for reordering one booklet scan
#[derive(Debug, Clone)]
pub struct ReorderOptions {
    /// Scanned booklet PDF
    pub input_path: PathBuf,
    /// Where the reordered PDF is written
    pub output_path: PathBuf,
}

/// What a successful reorder did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderReport {
    /// Number of pages in the document
    pub page_count: usize,
    /// 0-based scan positions in the order they were written
    pub sequence: Vec<usize>,
}

/// Reorder a scanned booklet PDF into reading order
///
/// The output is written to a temporary file next to `output_path` and
/// renamed into place, so a failure never leaves a partial output behind.
/// The input file is not modified.
///
/// # Example
///
/// ```no_run
/// use scan_sorter::pdf::{reorder_pdf, ReorderOptions};
/// use std::path::PathBuf;
///
/// let options = ReorderOptions {
///     input_path: PathBuf::from("scan.pdf"),
///     output_path: PathBuf::from("sorted/scan.pdf"),
/// };
///
/// let report = reorder_pdf(&options).expect("Failed to reorder");
/// println!("{} pages", report.page_count);
/// ```
pub fn reorder_pdf(options: &ReorderOptions) -> Result<ReorderReport> {
    if !options.input_path.exists() {
        return Err(Error::FileNotFound(options.input_path.clone()));
    }

    let mut doc = Document::load(&options.input_path)?;

    if doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf(options.input_path.clone()));
    }

    let report = reorder_document(&mut doc)?;
    save_atomically(&mut doc, &options.output_path)?;

    Ok(report)
}

/// Reorder the pages of a loaded document in place
///
/// The page tree is flattened into its root node with the leaves in reading
/// order. Page objects themselves (content streams, resources, annotations)
/// are reused untouched; only attributes inherited from intermediate tree
/// nodes are copied onto the pages so they survive the flattening.
pub fn reorder_document(doc: &mut Document) -> Result<ReorderReport> {
    let pages_id = page_tree_root(doc)?;
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let sequence = ordered_sequence(page_ids.len())?;

    for &page_id in &page_ids {
        materialize_inherited_attributes(doc, page_id)?;
    }

    let kids: Vec<Object> = sequence
        .iter()
        .map(|&position| Object::Reference(page_ids[position]))
        .collect();

    let pages_dict = doc.get_dictionary_mut(pages_id)
        .map_err(|_| Error::MalformedDocument("Pages is not a dictionary".to_string()))?;
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));

    for &page_id in &page_ids {
        if let Ok(page_dict) = doc.get_dictionary_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    // Intermediate page tree nodes are unreachable now
    doc.prune_objects();

    Ok(ReorderReport {
        page_count: page_ids.len(),
        sequence,
    })
}

/// Copy inheritable attributes from ancestor nodes onto the page itself
fn materialize_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;

        while let Some(node_id) = parent {
            if missing.is_empty() || depth >= MAX_TREE_DEPTH {
                break;
            }
            let node = doc.get_dictionary(node_id)?;
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key, value);
    }

    Ok(())
}

/// Save through a temporary file in the destination directory, then rename
fn save_atomically(doc: &mut Document, output_path: &Path) -> Result<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".scan-sorter-")
        .suffix(".pdf.part")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        doc.save_to(&mut writer)?;
        writer.flush()?;
    }

    temp.persist(output_path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}
