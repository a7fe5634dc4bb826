//! Integration tests for the booklet imposition library

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_booklet::impose::{impose_pdf, ImposeOptions};
use pdf_booklet::pdf::count_pages;
use pdf_booklet::{Error, Stage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

fn add_page(doc: &mut Document, parent: ObjectId, number: usize) -> ObjectId {
    let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", number);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        ("Contents", Object::Reference(content_id)),
        ("PageNumber", Object::Integer(number as i64)),
    ]))
}

fn finish(doc: &mut Document, pages_id: ObjectId) {
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
}

/// Write a flat PDF with `num_pages` numbered pages
fn write_test_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| Object::Reference(add_page(&mut doc, pages_id, n)))
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(num_pages as i64)),
            ("MediaBox", media_box(612, 792)),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ])),
    );
    finish(&mut doc, pages_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to save test PDF");
    path
}

/// Write a PDF whose pages sit two levels deep and inherit their MediaBox
fn write_nested_pdf(dir: &Path, name: &str) -> PathBuf {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let mut branches = Vec::new();
    let mut number = 1;

    for (width, height) in [(420, 595), (595, 842)] {
        let branch_id = doc.new_object_id();
        let kids: Vec<Object> = (0..3)
            .map(|_| {
                let page = add_page(&mut doc, branch_id, number);
                number += 1;
                Object::Reference(page)
            })
            .collect();

        doc.objects.insert(
            branch_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Parent", Object::Reference(root_id)),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(3)),
                ("MediaBox", media_box(width, height)),
            ])),
        );
        branches.push(Object::Reference(branch_id));
    }

    doc.objects.insert(
        root_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(branches)),
            ("Count", Object::Integer(6)),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ])),
    );
    finish(&mut doc, root_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to save nested PDF");
    path
}

/// Original page numbers of the output pages; inserted blanks read as None
fn page_numbers(path: &Path) -> Vec<Option<i64>> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"PageNumber").ok())
                .and_then(|n| n.as_i64().ok())
        })
        .collect()
}

#[test]
fn test_six_pages_become_two_sheet_booklet() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_test_pdf(temp_dir.path(), "six.pdf", 6);
    let output = temp_dir.path().join("booklet.pdf");

    let report = impose_pdf(&ImposeOptions::new(&input, &output)).expect("Failed to impose");

    assert_eq!(report.sheets, 2);
    assert_eq!(report.blank_pages_added, 2);
    assert_eq!(report.selectors, vec![8, 1, 2, 7, 6, 3, 4, 5]);
    assert_eq!(count_pages(&output).unwrap(), 8);
    assert_eq!(
        page_numbers(&output),
        vec![None, Some(1), Some(2), None, Some(6), Some(3), Some(4), Some(5)]
    );
}

#[test]
fn test_twelve_pages_keep_input_intact() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_test_pdf(temp_dir.path(), "twelve.pdf", 12);
    let original = std::fs::read(&input).unwrap();
    let output = temp_dir.path().join("booklet.pdf");

    let report = impose_pdf(&ImposeOptions::new(&input, &output)).expect("Failed to impose");

    assert_eq!(report.blank_pages_added, 0);
    assert_eq!(
        page_numbers(&output),
        [12, 1, 2, 11, 10, 3, 4, 9, 8, 5, 6, 7].map(Some).to_vec()
    );
    assert_eq!(std::fs::read(&input).unwrap(), original, "input must not change");
}

#[test]
fn test_single_page_padded_to_minimum() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_test_pdf(temp_dir.path(), "one.pdf", 1);
    let output = temp_dir.path().join("booklet.pdf");

    impose_pdf(&ImposeOptions::new(&input, &output)).expect("Failed to impose");

    let numbers = page_numbers(&output);
    assert_eq!(numbers.len(), 8);
    assert_eq!(numbers[1], Some(1));
    assert_eq!(numbers.iter().filter(|n| n.is_none()).count(), 7);
}

#[test]
fn test_custom_minimum_drops_blank_positions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_test_pdf(temp_dir.path(), "six.pdf", 6);
    let output = temp_dir.path().join("booklet.pdf");

    let mut options = ImposeOptions::new(&input, &output);
    options.minimum_pages = 4;
    impose_pdf(&options).expect("Failed to impose");

    assert_eq!(page_numbers(&output), [1, 2, 6, 3, 4, 5].map(Some).to_vec());
}

#[test]
fn test_nine_pages_imposed_without_padding() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_test_pdf(temp_dir.path(), "nine.pdf", 9);
    let output = temp_dir.path().join("booklet.pdf");

    let report = impose_pdf(&ImposeOptions::new(&input, &output)).expect("Failed to impose");

    assert_eq!(report.blank_pages_added, 0);
    assert_eq!(report.sheets, 3);
    assert_eq!(report.selectors, vec![1, 2, 3, 4, 9, 8, 5, 6, 7]);
    assert_eq!(count_pages(&output).unwrap(), 9);
    assert_eq!(
        page_numbers(&output),
        [1, 2, 3, 4, 9, 8, 5, 6, 7].map(Some).to_vec()
    );
}

#[test]
fn test_nested_page_tree_keeps_page_sizes() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_nested_pdf(temp_dir.path(), "nested.pdf");
    let output = temp_dir.path().join("booklet.pdf");

    impose_pdf(&ImposeOptions::new(&input, &output)).expect("Failed to impose");

    let doc = Document::load(&output).unwrap();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).unwrap();
        let width = page.get(b"MediaBox").unwrap().as_array().unwrap()[2].as_i64().unwrap();
        let expected = match page.get(b"PageNumber").and_then(|n| n.as_i64()) {
            Ok(n) if n <= 3 => 420,
            // Pages 4-6 and the blanks appended after page 6
            _ => 595,
        };
        assert_eq!(width, expected);
    }
}

#[test]
fn test_corrupt_input_fails_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("corrupt.pdf");
    std::fs::write(&input, b"%PDF-1.7\nthis is not really a pdf").unwrap();
    let output = temp_dir.path().join("booklet.pdf");
    std::fs::write(&output, b"previous booklet").unwrap();

    let result = impose_pdf(&ImposeOptions::new(&input, &output));

    let err = result.expect_err("Should fail on corrupt input");
    assert_eq!(err.stage(), Some(Stage::ReadPageCount));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous booklet");

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".impose-"))
        .collect();
    assert!(leftovers.is_empty(), "staging directories left behind");
}

#[test]
fn test_nonexistent_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = temp_dir.path().join("booklet.pdf");

    let result = impose_pdf(&ImposeOptions::new("nonexistent.pdf", &output));

    assert!(matches!(result, Err(Error::FileNotFound(_))));
    assert!(!output.exists());
}
