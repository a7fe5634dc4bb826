//! Page tree rewriting using lopdf
//!
//! Every operation here rebuilds the page tree as a single flat `Kids` array
//! under the existing root Pages node. Attributes a page inherits from its
//! ancestors are copied onto the page first, so flattening never changes how
//! a page renders.

use std::collections::HashSet;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::{Error, Result};

/// Page attributes that may be inherited from ancestor Pages nodes
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against Parent cycles in broken files
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when there is no page to copy a size from
fn letter_media_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

/// Find the root Pages node through the trailer and catalog
pub fn page_tree_root(doc: &Document) -> Result<ObjectId> {
    let catalog_ref = doc.trailer.get(b"Root")
        .map_err(|_| Error::MalformedPageTree("No Root in trailer".to_string()))?;

    let catalog_id = match catalog_ref {
        Object::Reference(id) => *id,
        _ => return Err(Error::MalformedPageTree("Root is not a reference".to_string())),
    };

    let catalog_dict = match doc.get_object(catalog_id)? {
        Object::Dictionary(dict) => dict,
        _ => return Err(Error::MalformedPageTree("Catalog is not a dictionary".to_string())),
    };

    let pages_ref = catalog_dict.get(b"Pages")
        .map_err(|_| Error::MalformedPageTree("No Pages in catalog".to_string()))?;

    match pages_ref {
        Object::Reference(id) => Ok(*id),
        _ => Err(Error::MalformedPageTree("Pages is not a reference".to_string())),
    }
}

/// Clone a page dictionary with inherited attributes made explicit
fn materialize_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth == MAX_TREE_DEPTH {
            return Err(Error::MalformedPageTree(format!(
                "Parent chain of page {:?} is deeper than {}",
                page_id, MAX_TREE_DEPTH
            )));
        }
        depth += 1;

        let node = doc.get_dictionary(node_id)?;
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}

/// Replace the page tree with a flat list of the given pages, in order
///
/// A page id that appears more than once is cloned into a fresh object for
/// each repeat, since one page object can only have one Parent.
fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let root_id = page_tree_root(doc)?;
    let mut seen = HashSet::new();
    let mut kids = Vec::with_capacity(page_ids.len());

    // Materialize everything before any page is re-parented
    let pages = page_ids
        .iter()
        .map(|&id| materialize_page(doc, id).map(|page| (id, page)))
        .collect::<Result<Vec<_>>>()?;

    for (page_id, mut page) in pages {
        page.set("Parent", Object::Reference(root_id));

        let id = if seen.insert(page_id) {
            doc.objects.insert(page_id, Object::Dictionary(page));
            page_id
        } else {
            doc.add_object(page)
        };
        kids.push(Object::Reference(id));
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Pages".to_vec()));
    root.set("Count", Object::Integer(kids.len() as i64));
    root.set("Kids", Object::Array(kids));
    doc.objects.insert(root_id, Object::Dictionary(root));

    Ok(())
}

/// Media box of an existing page, inheritance included
fn media_box_of(doc: &Document, page_id: ObjectId) -> Result<Object> {
    let page = materialize_page(doc, page_id)?;
    Ok(page.get(b"MediaBox").cloned().unwrap_or_else(|_| letter_media_box()))
}

/// Add an empty page object (no content, no resources) to the document
fn create_blank_page(doc: &mut Document, media_box: Object, parent_id: ObjectId) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set("MediaBox", media_box);
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));

    doc.add_object(page_dict)
}

/// Insert one blank page immediately after the 1-based page `after_page`
///
/// `after_page == 0` inserts before the first page. The blank page takes the
/// media box of the page it follows (or precedes, when inserted first).
pub fn insert_blank_page(doc: &mut Document, after_page: u32) -> Result<ObjectId> {
    let mut page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let position = after_page as usize;

    if position > page_ids.len() {
        return Err(Error::PageOutOfRange {
            page: after_page,
            page_count: page_ids.len(),
        });
    }

    let media_box = match page_ids.get(position.saturating_sub(1)) {
        Some(&neighbour) => media_box_of(doc, neighbour)?,
        None => letter_media_box(),
    };

    let root_id = page_tree_root(doc)?;
    let blank_id = create_blank_page(doc, media_box, root_id);
    page_ids.insert(position, blank_id);
    rebuild_page_tree(doc, &page_ids)?;

    Ok(blank_id)
}

/// Append `count` blank pages at the end of the document in one pass
///
/// Blank pages are sized like the current last page.
pub fn append_blank_pages(doc: &mut Document, count: usize) -> Result<Vec<ObjectId>> {
    let mut page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if count == 0 {
        return Ok(Vec::new());
    }

    let media_box = match page_ids.last() {
        Some(&last) => media_box_of(doc, last)?,
        None => letter_media_box(),
    };

    let root_id = page_tree_root(doc)?;
    let blank_ids: Vec<ObjectId> = (0..count)
        .map(|_| create_blank_page(doc, media_box.clone(), root_id))
        .collect();

    page_ids.extend_from_slice(&blank_ids);
    rebuild_page_tree(doc, &page_ids)?;

    Ok(blank_ids)
}

/// Build a new document holding exactly the selected pages, in selector order
///
/// Selectors are 1-based. A page selected twice appears twice. Objects no
/// longer reachable from the trailer are pruned from the result.
pub fn collect_pages(doc: &Document, selectors: &[u32]) -> Result<Document> {
    if selectors.is_empty() {
        return Err(Error::NoPagesSelected);
    }

    let pages = doc.get_pages();
    let page_ids = selectors
        .iter()
        .map(|page| {
            pages.get(page).copied().ok_or(Error::PageOutOfRange {
                page: *page,
                page_count: pages.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut collected = doc.clone();
    rebuild_page_tree(&mut collected, &page_ids)?;
    collected.prune_objects();

    Ok(collected)
}
