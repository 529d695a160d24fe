/*!
 * Flow document (.docx) backend.
 *
 * The whole document is a single logical unit with two disjoint address
 * namespaces: `paragraph_{i},run_{j}` for body-level runs and
 * `table_{t},row_{r},cell_{c}` for table cells. Runs are recorded even when
 * empty; cells only when they hold text.
 */

use crate::address::AddressMap;
use crate::document::{Extraction, TranslatableDocument};
use crate::errors::DocumentError;
use crate::ooxml::{self, Package, XmlDocument, XmlElement, XmlNode};

const DOCUMENT_PART: &str = "word/document.xml";

/// An open flow document.
pub struct DocxDocument {
    package: Package,
    doc: XmlDocument,
}

impl DocxDocument {
    /// Open a flow document from raw bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = Package::open(bytes)?;
        let doc = ooxml::parse_part(&package, DOCUMENT_PART)?;
        Ok(Self { package, doc })
    }

    fn body(&self) -> Result<&XmlElement, DocumentError> {
        self.doc
            .root
            .child("body")
            .ok_or_else(|| DocumentError::MissingPart(format!("{DOCUMENT_PART}#body")))
    }

    fn body_mut(&mut self) -> Result<&mut XmlElement, DocumentError> {
        self.doc
            .root
            .child_mut("body")
            .ok_or(DocumentError::MissingPart(format!("{DOCUMENT_PART}#body")))
    }
}

impl TranslatableDocument for DocxDocument {
    // Flow documents translate as one unit.
    fn unit_count(&self) -> usize {
        1
    }

    fn extract_unit(&self, _index: usize) -> Result<Extraction, DocumentError> {
        let body = self.body()?;
        let mut map = AddressMap::new();

        // Body-level paragraphs first, every run recorded (empty ones too:
        // omitting them would misalign the two sides' key sets).
        for (paragraph_index, paragraph) in body.children_named("p").enumerate() {
            for (run_index, run) in paragraph.children_named("r").enumerate() {
                let address = format!("paragraph_{paragraph_index},run_{run_index}");
                map.insert(address, vec![run_text(run)]);
            }
        }

        // Then tables, cell by cell, non-empty text only.
        for (table_index, table) in body.children_named("tbl").enumerate() {
            for (row_index, row) in table.children_named("tr").enumerate() {
                for (cell_index, cell) in row.children_named("tc").enumerate() {
                    let text = cell_text(cell);
                    if !text.is_empty() {
                        let address =
                            format!("table_{table_index},row_{row_index},cell_{cell_index}");
                        map.insert(address, vec![text]);
                    }
                }
            }
        }
        Ok(Extraction::from_map(map))
    }

    fn apply_unit(&mut self, _index: usize, translated: &AddressMap) -> Result<(), DocumentError> {
        let body = self.body_mut()?;

        let mut paragraph_index = 0;
        let mut table_index = 0;
        for node in body.children.iter_mut() {
            let XmlNode::Element(element) = node else {
                continue;
            };
            match element.local_name() {
                "p" => {
                    apply_paragraph(element, paragraph_index, translated);
                    paragraph_index += 1;
                }
                "tbl" => {
                    apply_table(element, table_index, translated);
                    table_index += 1;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<Vec<u8>, DocumentError> {
        let mut package = self.package.clone();
        package.replace_part(DOCUMENT_PART, self.doc.to_bytes()?)?;
        package.save()
    }
}

/// Run text: concatenated `w:t` contents.
fn run_text(run: &XmlElement) -> String {
    run.children_named("t").map(|t| t.text_content()).collect()
}

/// Paragraph text: run texts concatenated in order.
fn paragraph_text(paragraph: &XmlElement) -> String {
    paragraph.children_named("r").map(run_text).collect()
}

/// Cell text: the cell's direct paragraphs joined with newlines.
fn cell_text(cell: &XmlElement) -> String {
    cell.children_named("p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply_paragraph(paragraph: &mut XmlElement, paragraph_index: usize, translated: &AddressMap) {
    let mut run_index = 0;
    for node in paragraph.children.iter_mut() {
        let XmlNode::Element(run) = node else {
            continue;
        };
        if run.local_name() != "r" {
            continue;
        }
        let address = format!("paragraph_{paragraph_index},run_{run_index}");
        run_index += 1;
        if let Some(unit) = translated.get(&address)
            && let Some(text) = unit.first()
        {
            set_run_text(run, text);
        }
    }
}

fn apply_table(table: &mut XmlElement, table_index: usize, translated: &AddressMap) {
    let mut row_index = 0;
    for row_node in table.children.iter_mut() {
        let XmlNode::Element(row) = row_node else {
            continue;
        };
        if row.local_name() != "tr" {
            continue;
        }
        let mut cell_index = 0;
        for cell_node in row.children.iter_mut() {
            let XmlNode::Element(cell) = cell_node else {
                continue;
            };
            if cell.local_name() != "tc" {
                continue;
            }
            let address = format!("table_{table_index},row_{row_index},cell_{cell_index}");
            cell_index += 1;
            if let Some(unit) = translated.get(&address)
                && let Some(text) = unit.first()
            {
                set_cell_text(cell, text);
            }
        }
        row_index += 1;
    }
}

/// Replace a run's text, keeping its `w:rPr` so direct formatting survives.
fn set_run_text(run: &mut XmlElement, text: &str) {
    let ns = namespace_of(&run.name);
    run.children.retain(
        |node| matches!(node, XmlNode::Element(e) if e.local_name() == "rPr"),
    );
    let mut t = XmlElement::new(qualified(ns, "t"));
    t.set_attr("xml:space", "preserve");
    t.set_text(text);
    run.children.push(XmlNode::Element(t));
}

/// Replace a cell's content with a single paragraph holding `text`,
/// keeping the cell properties (`w:tcPr`).
fn set_cell_text(cell: &mut XmlElement, text: &str) {
    let ns = namespace_of(&cell.name);
    cell.children.retain(
        |node| matches!(node, XmlNode::Element(e) if e.local_name() == "tcPr"),
    );
    let mut t = XmlElement::new(qualified(ns, "t"));
    t.set_attr("xml:space", "preserve");
    t.set_text(text);
    let mut run = XmlElement::new(qualified(ns, "r"));
    run.children.push(XmlNode::Element(t));
    let mut paragraph = XmlElement::new(qualified(ns, "p"));
    paragraph.children.push(XmlNode::Element(run));
    cell.children.push(XmlNode::Element(paragraph));
}

fn namespace_of(name: &str) -> Option<&str> {
    name.rsplit_once(':').map(|(prefix, _)| prefix)
}

fn qualified(ns: Option<&str>, local: &str) -> String {
    match ns {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}
