/*!
 * Tests for file and directory utility functionality
 */

use transdoc::document::DocumentKind;
use transdoc::file_utils::FileManager;

use crate::common::create_temp_dir;

/// Test file existence checking
#[test]
fn test_fileExists_withFileAndDirectory_shouldOnlyMatchFiles() {
    let temp_dir = create_temp_dir().unwrap();
    let file_path = temp_dir.path().join("deck.pptx");
    std::fs::write(&file_path, b"bytes").unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.pptx")));
}

/// Test nested directory creation
#[test]
fn test_ensureDir_withNestedPath_shouldCreateAllLevels() {
    let temp_dir = create_temp_dir().unwrap();
    let nested = temp_dir.path().join("out").join("translated");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());

    // Idempotent on an existing directory.
    FileManager::ensure_dir(&nested).unwrap();
}

/// Test document kind detection from extensions
#[test]
fn test_detectDocumentKind_withSupportedExtensions_shouldMapToKinds() {
    assert_eq!(
        FileManager::detect_document_kind("deck.pptx").unwrap(),
        DocumentKind::Presentation
    );
    assert_eq!(
        FileManager::detect_document_kind("report.docx").unwrap(),
        DocumentKind::FlowDocument
    );
    assert_eq!(
        FileManager::detect_document_kind("data.XLSX").unwrap(),
        DocumentKind::Spreadsheet
    );
    assert!(FileManager::detect_document_kind("notes.txt").is_err());
}

/// Test output path derivation from input name and target language
#[test]
fn test_generateOutputPath_withInputAndLanguage_shouldPrefixFileName() {
    let path =
        FileManager::generate_output_path("/data/in/deck.pptx", "/data/out", "Japanese");
    assert_eq!(
        path,
        std::path::PathBuf::from("/data/out/Japanese_translated_deck.pptx")
    );
}

/// Test byte-level read and write round trip
#[test]
fn test_readWriteBytes_withBinaryContent_shouldRoundTrip() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("blob.bin");
    let bytes = vec![0u8, 1, 2, 250, 255];

    FileManager::write_bytes(&path, &bytes).unwrap();
    assert_eq!(FileManager::read_bytes(&path).unwrap(), bytes);
}
