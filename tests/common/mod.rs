/*!
 * Common test utilities for the transdoc test suite.
 *
 * Office document fixtures are built in memory: each builder assembles a
 * small but structurally real ZIP package from literal part XML, so the
 * backends exercise the same parsing paths they run on real files.
 */

use std::io::{Cursor, Write};
use std::sync::Once;

use anyhow::Result;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use transdoc::app_config::TranslationConfig;

static LOG_INIT: Once = Once::new();

/// Route log output through env_logger once per test run, so retry and
/// fallback warnings are visible under `RUST_LOG=debug`.
pub fn init_test_logging() {
    LOG_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Translation config for tests: library defaults, but no retry pause.
pub fn test_translation_config() -> TranslationConfig {
    TranslationConfig {
        retry_delay_secs: 0,
        ..TranslationConfig::default()
    }
}

/// Assemble a ZIP package from (part name, XML) pairs.
pub fn zip_package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const CONTENT_TYPES: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WORDPROCESSING_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

fn presentation_xml(slide_count: usize) -> String {
    let sld_ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 1))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:a="{DRAWING_NS}" xmlns:r="{RELATIONSHIPS_NS}" xmlns:p="{PRESENTATION_NS}"><p:sldIdLst>{sld_ids}</p:sldIdLst></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let rels: String = (0..slide_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="{RELATIONSHIPS_NS}/slide" Target="slides/slide{}.xml"/>"#,
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_RELS_NS}">{rels}</Relationships>"#
    )
}

fn slide_xml(sp_tree_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="{DRAWING_NS}" xmlns:r="{RELATIONSHIPS_NS}" xmlns:p="{PRESENTATION_NS}"><p:cSld><p:spTree>{sp_tree_body}</p:spTree></p:cSld></p:sld>"#
    )
}

/// A two-slide deck.
///
/// - Slide 1: one shape, one paragraph "Hello" with explicit formatting
///   (18pt, red) on its run, plus an `endParaRPr`.
/// - Slide 2: one shape with two paragraphs, "World" and "!".
pub fn build_test_pptx() -> Vec<u8> {
    let slide1 = slide_xml(
        r#"<p:sp><p:nvSpPr/><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" sz="1800"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr><a:t>Hello</a:t></a:r><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    );
    let slide2 = slide_xml(
        r#"<p:sp><p:nvSpPr/><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>World</a:t></a:r></a:p><a:p><a:r><a:t>!</a:t></a:r></a:p></p:txBody></p:sp>"#,
    );
    zip_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", &presentation_xml(2)),
        ("ppt/_rels/presentation.xml.rels", &presentation_rels(2)),
        ("ppt/slides/slide1.xml", &slide1),
        ("ppt/slides/slide2.xml", &slide2),
    ])
}

/// A one-slide deck with a mixed shape tree: a picture (no text), a group
/// nesting one text shape "Inner", and a trailing text shape "Outer".
pub fn build_grouped_pptx() -> Vec<u8> {
    let slide1 = slide_xml(
        r#"<p:pic><p:nvPicPr/><p:blipFill/></p:pic><p:grpSp><p:nvGrpSpPr/><p:grpSpPr/><p:sp><p:nvSpPr/><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Inner</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp><p:sp><p:nvSpPr/><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Outer</a:t></a:r></a:p></p:txBody></p:sp>"#,
    );
    zip_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", &presentation_xml(1)),
        ("ppt/_rels/presentation.xml.rels", &presentation_rels(1)),
        ("ppt/slides/slide1.xml", &slide1),
    ])
}

/// A one-slide deck with a shape whose two paragraphs hold no runs with
/// text: one empty run, one no run at all.
pub fn build_blank_shape_pptx() -> Vec<u8> {
    let slide1 = slide_xml(
        r#"<p:sp><p:nvSpPr/><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t></a:t></a:r></a:p><a:p><a:pPr/></a:p></p:txBody></p:sp>"#,
    );
    zip_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", &presentation_xml(1)),
        ("ppt/_rels/presentation.xml.rels", &presentation_rels(1)),
        ("ppt/slides/slide1.xml", &slide1),
    ])
}

/// A flow document with two body paragraphs and a one-row table.
///
/// Paragraph 0 holds two runs ("Hello " bold, "world"), paragraph 1 one run
/// with no text, the table one filled cell ("Name") and one empty cell.
pub fn build_test_docx() -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORDPROCESSING_NS}"><w:body><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p><w:p><w:pPr/><w:r><w:rPr/></w:r></w:p><w:tbl><w:tblPr/><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:tcPr/><w:p/></w:tc></w:tr></w:tbl><w:sectPr/></w:body></w:document>"#
    );
    zip_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", &document),
    ])
}

/// A workbook with a sparse sheet "Data" and an empty sheet "Empty".
///
/// Data holds a shared string in A1 ("Hello"), a number in C1 (never
/// extracted) and an inline string in B3 ("World").
pub fn build_test_xlsx() -> Vec<u8> {
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{RELATIONSHIPS_NS}"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/><sheet name="Empty" sheetId="2" r:id="rId2"/></sheets></workbook>"#
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PACKAGE_RELS_NS}"><Relationship Id="rId1" Type="{RELATIONSHIPS_NS}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{RELATIONSHIPS_NS}/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="{RELATIONSHIPS_NS}/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#
    );
    let shared_strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{SPREADSHEET_NS}" count="1" uniqueCount="1"><si><t>Hello</t></si></sst>"#
    );
    let sheet1 = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{SPREADSHEET_NS}"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1"><v>42</v></c></row><row r="3"><c r="B3" t="inlineStr"><is><t>World</t></is></c></row></sheetData></worksheet>"#
    );
    let sheet2 = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{SPREADSHEET_NS}"><sheetData/></worksheet>"#
    );
    zip_package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", &workbook_rels),
        ("xl/sharedStrings.xml", &shared_strings),
        ("xl/worksheets/sheet1.xml", &sheet1),
        ("xl/worksheets/sheet2.xml", &sheet2),
    ])
}
