/*!
 * Spreadsheet (.xlsx) backend.
 *
 * Each sheet is a logical unit with a flat `row_{r},col_{c}` address space
 * (1-based, from the cell reference). Only cells with string content are
 * extracted; numeric and empty cells never enter the map. Writeback converts
 * a translated cell to an inline string so other cells sharing the same
 * shared-string index keep their original text.
 */

use crate::address::AddressMap;
use crate::document::{Extraction, TranslatableDocument};
use crate::errors::DocumentError;
use crate::ooxml::{self, Package, XmlDocument, XmlElement, XmlNode};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// One worksheet: display name, package part name, parsed XML tree.
struct Sheet {
    name: String,
    part_name: String,
    doc: XmlDocument,
}

/// An open spreadsheet, sheets in workbook order.
pub struct XlsxDocument {
    package: Package,
    sheets: Vec<Sheet>,
    shared_strings: Vec<String>,
}

impl XlsxDocument {
    /// Open a spreadsheet from raw bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = Package::open(bytes)?;
        let workbook = ooxml::parse_part(&package, WORKBOOK_PART)?;
        let relationships = ooxml::parse_relationships(&package, WORKBOOK_RELS)?;

        let mut sheets = Vec::new();
        if let Some(sheet_list) = workbook.root.child("sheets") {
            for sheet in sheet_list.children_named("sheet") {
                let name = sheet.attr("name").unwrap_or_default().to_string();
                let rel_id = sheet
                    .attributes
                    .iter()
                    .find(|(key, _)| key == "r:id" || key.ends_with(":id"))
                    .map(|(_, value)| value.as_str())
                    .ok_or_else(|| DocumentError::Open(format!("sheet {name} without r:id")))?;
                let target = relationships
                    .iter()
                    .find(|(id, _)| id == rel_id)
                    .map(|(_, target)| target.as_str())
                    .ok_or_else(|| {
                        DocumentError::Open(format!("unresolved sheet relationship {rel_id}"))
                    })?;
                let part_name = ooxml::resolve_target("xl", target);
                let doc = ooxml::parse_part(&package, &part_name)?;
                sheets.push(Sheet {
                    name,
                    part_name,
                    doc,
                });
            }
        }

        let shared_strings = if package.has_part(SHARED_STRINGS_PART) {
            let sst = ooxml::parse_part(&package, SHARED_STRINGS_PART)?;
            sst.root.children_named("si").map(item_text).collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            package,
            sheets,
            shared_strings,
        })
    }

    /// Sheet display names, in workbook order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str())
    }

    fn cell_value(&self, cell: &XmlElement) -> Option<String> {
        match cell.attr("t") {
            Some("s") => {
                let index: usize = cell.child("v")?.text_content().trim().parse().ok()?;
                self.shared_strings.get(index).cloned()
            }
            Some("inlineStr") => cell.child("is").map(item_text),
            // Cached string result of a formula - a plain string under a
            // values-only reading of the workbook.
            Some("str") => cell.child("v").map(|v| v.text_content()),
            _ => None,
        }
    }
}

impl TranslatableDocument for XlsxDocument {
    fn unit_count(&self) -> usize {
        self.sheets.len()
    }

    fn extract_unit(&self, index: usize) -> Result<Extraction, DocumentError> {
        let sheet = self
            .sheets
            .get(index)
            .ok_or_else(|| DocumentError::Open(format!("sheet index {index} out of range")))?;
        let mut map = AddressMap::new();
        if let Some(sheet_data) = sheet.doc.root.child("sheetData") {
            for row in sheet_data.children_named("row") {
                for cell in row.children_named("c") {
                    let Some(reference) = cell.attr("r") else {
                        continue;
                    };
                    let Some((row_number, column_number)) = parse_cell_reference(reference)
                    else {
                        continue;
                    };
                    if let Some(value) = self.cell_value(cell)
                        && !value.is_empty()
                    {
                        map.insert(format!("row_{row_number},col_{column_number}"), vec![value]);
                    }
                }
            }
        }
        Ok(Extraction::from_map(map))
    }

    fn apply_unit(&mut self, index: usize, translated: &AddressMap) -> Result<(), DocumentError> {
        let sheet = self
            .sheets
            .get_mut(index)
            .ok_or_else(|| DocumentError::Open(format!("sheet index {index} out of range")))?;
        let Some(sheet_data) = sheet.doc.root.child_mut("sheetData") else {
            return Ok(());
        };
        for row_node in sheet_data.children.iter_mut() {
            let XmlNode::Element(row) = row_node else {
                continue;
            };
            if row.local_name() != "row" {
                continue;
            }
            for cell_node in row.children.iter_mut() {
                let XmlNode::Element(cell) = cell_node else {
                    continue;
                };
                if cell.local_name() != "c" {
                    continue;
                }
                let Some(reference) = cell.attr("r") else {
                    continue;
                };
                let Some((row_number, column_number)) = parse_cell_reference(reference) else {
                    continue;
                };
                let address = format!("row_{row_number},col_{column_number}");
                if let Some(unit) = translated.get(&address)
                    && let Some(text) = unit.first()
                {
                    set_cell_inline_text(cell, text);
                }
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<Vec<u8>, DocumentError> {
        let mut package = self.package.clone();
        for sheet in &self.sheets {
            package.replace_part(&sheet.part_name, sheet.doc.to_bytes()?)?;
        }
        package.save()
    }
}

/// Text of a shared-string item or inline-string body: all `t` descendants
/// concatenated (plain and rich-text items alike).
fn item_text(item: &XmlElement) -> String {
    let mut out = String::new();
    collect_t_text(item, &mut out);
    out
}

fn collect_t_text(element: &XmlElement, out: &mut String) {
    for child in element.child_elements() {
        if child.local_name() == "t" {
            out.push_str(&child.text_content());
        } else {
            collect_t_text(child, out);
        }
    }
}

/// Parse an A1-style cell reference into 1-based (row, column).
fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut column = 0u32;
    for c in letters.chars() {
        let value = (c.to_ascii_uppercase() as u32).checked_sub('A' as u32)?;
        if value >= 26 {
            return None;
        }
        column = column * 26 + value + 1;
    }
    let row: u32 = digits.parse().ok()?;
    Some((row, column))
}

/// Rewrite a cell as an inline string holding `text`.
///
/// The style attribute stays; value, formula and any previous inline content
/// are dropped. Leaving the shared-string table untouched means cells that
/// referenced the same entry elsewhere keep their original text.
fn set_cell_inline_text(cell: &mut XmlElement, text: &str) {
    let ns = cell
        .name
        .rsplit_once(':')
        .map(|(prefix, _)| prefix.to_string());
    let qualified = |local: &str| match &ns {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    };
    cell.set_attr("t", "inlineStr");
    cell.children.retain(|node| {
        !matches!(node, XmlNode::Element(e) if matches!(e.local_name(), "v" | "f" | "is"))
    });
    let mut t = XmlElement::new(qualified("t"));
    t.set_attr("xml:space", "preserve");
    t.set_text(text);
    let mut is = XmlElement::new(qualified("is"));
    is.children.push(XmlNode::Element(t));
    cell.children.push(XmlNode::Element(is));
}
