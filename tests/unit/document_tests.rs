/*!
 * Tests for the document backends (pptx, docx, xlsx)
 */

use transdoc::address::AddressMap;
use transdoc::document::{DocxDocument, PptxDocument, TranslatableDocument, XlsxDocument};
use transdoc::ooxml::Package;

use crate::common::{
    build_blank_shape_pptx, build_grouped_pptx, build_test_docx, build_test_pptx, build_test_xlsx,
};

fn map_of(entries: &[(&str, &[&str])]) -> AddressMap {
    entries
        .iter()
        .map(|(address, unit)| {
            (
                address.to_string(),
                unit.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}

/// Test that slides extract as separate units with slide-rooted addresses
#[test]
fn test_pptxExtract_withTwoSlides_shouldAddressShapesPerSlide() {
    let document = PptxDocument::open(&build_test_pptx()).unwrap();
    assert_eq!(document.unit_count(), 2);

    let first = document.extract_unit(0).unwrap();
    assert_eq!(first.units, map_of(&[("0,0", &["Hello"])]));
    assert_eq!(first.context, "Hello");

    let second = document.extract_unit(1).unwrap();
    assert_eq!(second.units, map_of(&[("1,0", &["World", "!"])]));
}

/// Test that group shapes recurse and textless shapes still consume an index
#[test]
fn test_pptxExtract_withNestedGroup_shouldIndexTextlessShapes() {
    let document = PptxDocument::open(&build_grouped_pptx()).unwrap();

    let extraction = document.extract_unit(0).unwrap();
    // Picture at index 0 contributes no entry but shifts the group to 1
    // and the trailing shape to 2.
    assert_eq!(
        extraction.units,
        map_of(&[("0,1,0", &["Inner"]), ("0,2", &["Outer"])])
    );
}

/// Test that blank paragraphs are recorded and survive writeback
#[test]
fn test_pptxExtract_withBlankParagraphs_shouldRecordEmptyStrings() {
    let document = PptxDocument::open(&build_blank_shape_pptx()).unwrap();

    let extraction = document.extract_unit(0).unwrap();
    assert_eq!(extraction.units, map_of(&[("0,0", &["", ""])]));

    // Applying the blank unit back is a no-op for the extracted view.
    let mut document = document;
    document.apply_unit(0, &extraction.units).unwrap();
    let reopened = PptxDocument::open(&document.save().unwrap()).unwrap();
    assert_eq!(
        reopened.extract_unit(0).unwrap().units,
        map_of(&[("0,0", &["", ""])])
    );
}

/// Test the whole-document extraction helper used for context building
#[test]
fn test_pptxExtractDocument_withTwoSlides_shouldMergeAllUnits() {
    let document = PptxDocument::open(&build_test_pptx()).unwrap();

    let extraction = document.extract_document().unwrap();
    assert_eq!(
        extraction.units,
        map_of(&[("0,0", &["Hello"]), ("1,0", &["World", "!"])])
    );
    assert_eq!(extraction.context, "Hello\n\nWorld\n\n!");
}

/// Test that writeback lands translated text back at its source address
#[test]
fn test_pptxApply_withTranslatedMap_shouldReplaceParagraphText() {
    let mut document = PptxDocument::open(&build_test_pptx()).unwrap();
    document
        .apply_unit(0, &map_of(&[("0,0", &["Bonjour"])]))
        .unwrap();

    let saved = document.save().unwrap();
    let reopened = PptxDocument::open(&saved).unwrap();
    let extraction = reopened.extract_unit(0).unwrap();
    assert_eq!(extraction.units, map_of(&[("0,0", &["Bonjour"])]));
}

/// Test that the replacement run carries the original run's formatting
#[test]
fn test_pptxApply_withFormattedRun_shouldPreserveSizeAndColor() {
    let mut document = PptxDocument::open(&build_test_pptx()).unwrap();
    document
        .apply_unit(0, &map_of(&[("0,0", &["Bonjour"])]))
        .unwrap();

    let saved = document.save().unwrap();
    let slide = Package::open(&saved)
        .unwrap()
        .part_text("ppt/slides/slide1.xml")
        .unwrap()
        .to_string();
    assert!(slide.contains(r#"sz="1800""#));
    assert!(slide.contains(r#"val="FF0000""#));
    assert!(slide.contains("Bonjour"));
    assert!(!slide.contains("Hello"));
}

/// Test that a short translated unit leaves trailing paragraphs untouched
#[test]
fn test_pptxApply_withShorterUnit_shouldKeepTrailingParagraphs() {
    let mut document = PptxDocument::open(&build_test_pptx()).unwrap();
    document
        .apply_unit(1, &map_of(&[("1,0", &["Seul"])]))
        .unwrap();

    let reopened = PptxDocument::open(&document.save().unwrap()).unwrap();
    let extraction = reopened.extract_unit(1).unwrap();
    assert_eq!(extraction.units, map_of(&[("1,0", &["Seul", "!"])]));
}

/// Test that extra strings in a translated unit are dropped
#[test]
fn test_pptxApply_withLongerUnit_shouldIgnoreExtraStrings() {
    let mut document = PptxDocument::open(&build_test_pptx()).unwrap();
    document
        .apply_unit(1, &map_of(&[("1,0", &["Monde", "?", "extra"])]))
        .unwrap();

    let reopened = PptxDocument::open(&document.save().unwrap()).unwrap();
    let extraction = reopened.extract_unit(1).unwrap();
    assert_eq!(extraction.units, map_of(&[("1,0", &["Monde", "?"])]));
}

/// Test that a mutated slide leaves sibling slide parts byte-identical
#[test]
fn test_pptxSave_withOneSlideTouched_shouldKeepOtherPartsIdentical() {
    let original = build_test_pptx();
    let before = Package::open(&original)
        .unwrap()
        .part("ppt/slides/slide2.xml")
        .unwrap()
        .to_vec();

    let mut document = PptxDocument::open(&original).unwrap();
    document
        .apply_unit(0, &map_of(&[("0,0", &["Bonjour"])]))
        .unwrap();
    let saved = document.save().unwrap();

    // Slide 2 went through parse + reserialize but was never mutated.
    // Content types never get parsed at all.
    let reopened = Package::open(&saved).unwrap();
    assert_eq!(reopened.part("ppt/slides/slide2.xml").unwrap(), &before[..]);
}

/// Test docx extraction: runs keyed by paragraph, cells by table position
#[test]
fn test_docxExtract_withRunsAndTable_shouldUseNamedSegments() {
    let document = DocxDocument::open(&build_test_docx()).unwrap();
    assert_eq!(document.unit_count(), 1);

    let extraction = document.extract_unit(0).unwrap();
    assert_eq!(
        extraction.units,
        map_of(&[
            ("paragraph_0,run_0", &["Hello "]),
            ("paragraph_0,run_1", &["world"]),
            // Empty runs are recorded; empty table cells are not.
            ("paragraph_1,run_0", &[""]),
            ("table_0,row_0,cell_0", &["Name"]),
        ])
    );
}

/// Test docx writeback for both runs and table cells
#[test]
fn test_docxApply_withPartialMap_shouldUpdateOnlyAddressedText() {
    let mut document = DocxDocument::open(&build_test_docx()).unwrap();
    document
        .apply_unit(
            0,
            &map_of(&[
                ("paragraph_0,run_0", &["Bonjour "]),
                ("table_0,row_0,cell_0", &["Nom"]),
            ]),
        )
        .unwrap();

    let reopened = DocxDocument::open(&document.save().unwrap()).unwrap();
    let extraction = reopened.extract_unit(0).unwrap();
    assert_eq!(extraction.units["paragraph_0,run_0"], vec!["Bonjour "]);
    assert_eq!(extraction.units["paragraph_0,run_1"], vec!["world"]);
    assert_eq!(extraction.units["table_0,row_0,cell_0"], vec!["Nom"]);
}

/// Test that direct run formatting survives docx writeback
#[test]
fn test_docxApply_withBoldRun_shouldKeepRunProperties() {
    let mut document = DocxDocument::open(&build_test_docx()).unwrap();
    document
        .apply_unit(0, &map_of(&[("paragraph_0,run_0", &["Bonjour "])]))
        .unwrap();

    let body = Package::open(&document.save().unwrap())
        .unwrap()
        .part_text("word/document.xml")
        .unwrap()
        .to_string();
    assert!(body.contains("<w:b/>"));
    assert!(body.contains("Bonjour "));
}

/// Test xlsx extraction: only string cells, 1-based row/col addresses
#[test]
fn test_xlsxExtract_withSparseSheet_shouldAddressStringCellsOnly() {
    let document = XlsxDocument::open(&build_test_xlsx()).unwrap();
    assert_eq!(document.unit_count(), 2);
    assert_eq!(
        document.sheet_names().collect::<Vec<_>>(),
        vec!["Data", "Empty"]
    );

    let extraction = document.extract_unit(0).unwrap();
    assert_eq!(
        extraction.units,
        map_of(&[("row_1,col_1", &["Hello"]), ("row_3,col_2", &["World"])])
    );

    let empty = document.extract_unit(1).unwrap();
    assert!(empty.units.is_empty());
}

/// Test xlsx writeback: translated cells become inline strings and the
/// shared-string table is left alone
#[test]
fn test_xlsxApply_withSharedStringCell_shouldConvertToInlineString() {
    let mut document = XlsxDocument::open(&build_test_xlsx()).unwrap();
    document
        .apply_unit(0, &map_of(&[("row_1,col_1", &["Bonjour"])]))
        .unwrap();

    let saved = document.save().unwrap();
    let reopened = XlsxDocument::open(&saved).unwrap();
    let extraction = reopened.extract_unit(0).unwrap();
    assert_eq!(extraction.units["row_1,col_1"], vec!["Bonjour"]);
    assert_eq!(extraction.units["row_3,col_2"], vec!["World"]);

    let package = Package::open(&saved).unwrap();
    assert!(
        package
            .part_text("xl/sharedStrings.xml")
            .unwrap()
            .contains("<t>Hello</t>")
    );
    let sheet = package.part_text("xl/worksheets/sheet1.xml").unwrap();
    assert!(sheet.contains(r#"t="inlineStr""#));
}
