/*!
 * Presentation (.pptx) backend.
 *
 * A slide's shape tree is heterogeneous: plain shapes carrying a text body,
 * group shapes nesting further shapes, and opaque shapes (pictures, graphic
 * frames, connectors) with neither. The walk models each child as a tagged
 * [`Container`] variant and addresses it by its index path, counting every
 * shape-like child - including the textless ones - so extraction and
 * writeback derive identical addresses.
 */

use crate::address::{self, AddressMap, TextUnit};
use crate::document::{Extraction, TranslatableDocument};
use crate::errors::DocumentError;
use crate::ooxml::{self, Package, XmlDocument, XmlElement, XmlNode};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

// Shape-like children of p:spTree / p:grpSp, by local name. Indices count
// all of them, matching the order a shape-tree iterator exposes.
const SHAPE_ELEMENTS: [&str; 6] = ["sp", "grpSp", "graphicFrame", "cxnSp", "pic", "contentPart"];

/// A slide's shape tree seen through the extractor's eyes.
enum Container<'a> {
    /// Shape owning a text body (one or more paragraphs)
    TextLeaf(&'a XmlElement),
    /// Group shape nesting further shapes
    Group(&'a XmlElement),
    /// Shape with neither text nor children - skipped, but still indexed
    Opaque,
}

fn classify(shape: &XmlElement) -> Container<'_> {
    if shape.local_name() == "grpSp" {
        Container::Group(shape)
    } else if let Some(tx_body) = shape.child("txBody") {
        Container::TextLeaf(tx_body)
    } else {
        Container::Opaque
    }
}

fn is_shape_element(element: &XmlElement) -> bool {
    SHAPE_ELEMENTS.contains(&element.local_name())
}

/// Run-level formatting captured from a paragraph's first run before its
/// text is cleared, reapplied to the single replacement run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatSnapshot {
    /// Font size in hundredths of a point (`sz` attribute)
    pub size: Option<String>,
    /// Bold flag (`b` attribute)
    pub bold: Option<String>,
    /// Italic flag (`i` attribute)
    pub italic: Option<String>,
    /// Underline style (`u` attribute)
    pub underline: Option<String>,
    /// Explicit RGB color (`a:solidFill/a:srgbClr@val`); inherited or
    /// theme colors are not captured
    pub color: Option<String>,
}

impl FormatSnapshot {
    /// Capture formatting from a run's `rPr` element, if it has one.
    fn capture(run: &XmlElement) -> Self {
        let Some(rpr) = run.child("rPr") else {
            return Self::default();
        };
        let color = rpr
            .child("solidFill")
            .and_then(|fill| fill.child("srgbClr"))
            .and_then(|clr| clr.attr("val"))
            .map(str::to_string);
        Self {
            size: rpr.attr("sz").map(str::to_string),
            bold: rpr.attr("b").map(str::to_string),
            italic: rpr.attr("i").map(str::to_string),
            underline: rpr.attr("u").map(str::to_string),
            color,
        }
    }

    /// Build the `rPr` element for the replacement run.
    ///
    /// An empty `rPr` is still emitted when nothing was captured, mirroring
    /// how setting run font properties materializes the element.
    fn to_rpr(&self, ns: Option<&str>) -> XmlElement {
        let mut rpr = XmlElement::new(qualified(ns, "rPr"));
        if let Some(size) = &self.size {
            rpr.set_attr("sz", size.clone());
        }
        if let Some(bold) = &self.bold {
            rpr.set_attr("b", bold.clone());
        }
        if let Some(italic) = &self.italic {
            rpr.set_attr("i", italic.clone());
        }
        if let Some(underline) = &self.underline {
            rpr.set_attr("u", underline.clone());
        }
        if let Some(color) = &self.color {
            let mut clr = XmlElement::new(qualified(ns, "srgbClr"));
            clr.set_attr("val", color.clone());
            let mut fill = XmlElement::new(qualified(ns, "solidFill"));
            fill.children.push(XmlNode::Element(clr));
            rpr.children.push(XmlNode::Element(fill));
        }
        rpr
    }
}

fn qualified(ns: Option<&str>, local: &str) -> String {
    match ns {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn namespace_prefix(name: &str) -> Option<&str> {
    name.rsplit_once(':').map(|(prefix, _)| prefix)
}

/// One slide: its package part name and parsed XML tree.
struct Slide {
    part_name: String,
    doc: XmlDocument,
}

/// An open presentation, slides in `sldIdLst` order.
pub struct PptxDocument {
    package: Package,
    slides: Vec<Slide>,
}

impl PptxDocument {
    /// Open a presentation from raw bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = Package::open(bytes)?;
        let presentation = ooxml::parse_part(&package, PRESENTATION_PART)?;
        let relationships = ooxml::parse_relationships(&package, PRESENTATION_RELS)?;

        // Slide order comes from p:sldIdLst, not from archive entry order.
        let mut slides = Vec::new();
        if let Some(sld_id_lst) = presentation.root.child("sldIdLst") {
            for sld_id in sld_id_lst.children_named("sldId") {
                let rel_id = sld_id
                    .attributes
                    .iter()
                    .find(|(key, _)| key == "r:id" || key.ends_with(":id"))
                    .map(|(_, value)| value.as_str())
                    .ok_or_else(|| DocumentError::Open("slide without r:id".to_string()))?;
                let target = relationships
                    .iter()
                    .find(|(id, _)| id == rel_id)
                    .map(|(_, target)| target.as_str())
                    .ok_or_else(|| {
                        DocumentError::Open(format!("unresolved slide relationship {rel_id}"))
                    })?;
                let part_name = ooxml::resolve_target("ppt", target);
                let doc = ooxml::parse_part(&package, &part_name)?;
                slides.push(Slide { part_name, doc });
            }
        }
        Ok(Self { package, slides })
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Extract every slide at once, addresses rooted at the slide index.
    ///
    /// Used to build a document-level context string; the per-unit
    /// [`extract_unit`](TranslatableDocument::extract_unit) walk is what the
    /// translation round trip runs on.
    pub fn extract_document(&self) -> Result<Extraction, DocumentError> {
        let mut map = AddressMap::new();
        for (index, slide) in self.slides.iter().enumerate() {
            let sp_tree = sp_tree(&slide.doc, &slide.part_name)?;
            extract_shapes(sp_tree, &index.to_string(), &mut map);
        }
        Ok(Extraction::from_map(map))
    }

    fn slide(&self, index: usize) -> Result<&Slide, DocumentError> {
        self.slides
            .get(index)
            .ok_or_else(|| DocumentError::Open(format!("slide index {index} out of range")))
    }
}

impl TranslatableDocument for PptxDocument {
    fn unit_count(&self) -> usize {
        self.slides.len()
    }

    fn extract_unit(&self, index: usize) -> Result<Extraction, DocumentError> {
        let slide = self.slide(index)?;
        let sp_tree = sp_tree(&slide.doc, &slide.part_name)?;
        let mut map = AddressMap::new();
        extract_shapes(sp_tree, &index.to_string(), &mut map);
        Ok(Extraction::from_map(map))
    }

    // Collapses each translated paragraph to a single run carrying the first
    // run's formatting. Text held only in runs past the first is replaced
    // along with everything else in the paragraph.
    fn apply_unit(&mut self, index: usize, translated: &AddressMap) -> Result<(), DocumentError> {
        let prefix = index.to_string();
        let slide = self
            .slides
            .get_mut(index)
            .ok_or_else(|| DocumentError::Open(format!("slide index {index} out of range")))?;
        let sp_tree = sp_tree_mut(&mut slide.doc, &slide.part_name)?;
        apply_shapes(sp_tree, &prefix, translated);
        Ok(())
    }

    fn save(&self) -> Result<Vec<u8>, DocumentError> {
        let mut package = self.package.clone();
        for slide in &self.slides {
            package.replace_part(&slide.part_name, slide.doc.to_bytes()?)?;
        }
        package.save()
    }
}

fn sp_tree<'a>(doc: &'a XmlDocument, part_name: &str) -> Result<&'a XmlElement, DocumentError> {
    doc.root
        .child("cSld")
        .and_then(|c_sld| c_sld.child("spTree"))
        .ok_or_else(|| DocumentError::MissingPart(format!("{part_name}#spTree")))
}

fn sp_tree_mut<'a>(
    doc: &'a mut XmlDocument,
    part_name: &str,
) -> Result<&'a mut XmlElement, DocumentError> {
    let part_name = part_name.to_string();
    doc.root
        .child_mut("cSld")
        .and_then(|c_sld| c_sld.child_mut("spTree"))
        .ok_or(DocumentError::MissingPart(format!("{part_name}#spTree")))
}

/// Depth-first extraction walk over one shape container.
///
/// A shape is recorded whenever it has at least one paragraph, even if every
/// paragraph is blank - dropping blank entries would desynchronize the key
/// sets between extraction and writeback.
fn extract_shapes(parent: &XmlElement, prefix: &str, map: &mut AddressMap) {
    let shapes = parent.child_elements().filter(|e| is_shape_element(e));
    for (index, shape) in shapes.enumerate() {
        let current = address::child(prefix, index);
        match classify(shape) {
            Container::TextLeaf(tx_body) => {
                let paragraphs: TextUnit =
                    tx_body.children_named("p").map(paragraph_text).collect();
                if !paragraphs.is_empty() {
                    map.insert(current, paragraphs);
                }
            }
            Container::Group(group) => extract_shapes(group, &current, map),
            Container::Opaque => {}
        }
    }
}

/// Paragraph text: the run texts concatenated in order, no separator.
fn paragraph_text(paragraph: &XmlElement) -> String {
    paragraph.children_named("r").map(run_text).collect()
}

fn run_text(run: &XmlElement) -> String {
    run.children_named("t")
        .map(|t| t.text_content())
        .collect()
}

/// Writeback walk mirroring [`extract_shapes`] exactly: same child filter,
/// same enumeration, same address derivation.
fn apply_shapes(parent: &mut XmlElement, prefix: &str, translated: &AddressMap) {
    let mut shape_index = 0;
    for node in parent.children.iter_mut() {
        let XmlNode::Element(shape) = node else {
            continue;
        };
        if !is_shape_element(shape) {
            continue;
        }
        let current = address::child(prefix, shape_index);
        shape_index += 1;
        if let Some(unit) = translated.get(&current) {
            set_shape_text(shape, unit);
        } else if shape.local_name() == "grpSp" {
            apply_shapes(shape, &current, translated);
        }
    }
}

fn set_shape_text(shape: &mut XmlElement, unit: &TextUnit) {
    let Some(tx_body) = shape.child_mut("txBody") else {
        return;
    };
    let mut paragraph_index = 0;
    for node in tx_body.children.iter_mut() {
        let XmlNode::Element(paragraph) = node else {
            continue;
        };
        if paragraph.local_name() != "p" {
            continue;
        }
        if paragraph_index < unit.len() {
            rewrite_paragraph(paragraph, &unit[paragraph_index]);
        }
        paragraph_index += 1;
    }
}

/// Replace a paragraph's runs with a single run holding `text`, carrying
/// forward the first run's formatting snapshot. Zero-run paragraphs are left
/// untouched.
fn rewrite_paragraph(paragraph: &mut XmlElement, text: &str) {
    let Some(first_run) = paragraph.child("r") else {
        return;
    };
    let snapshot = FormatSnapshot::capture(first_run);
    let ns = namespace_prefix(&paragraph.name).map(str::to_string);
    let ns = ns.as_deref();

    // Clear run-level content, keeping pPr and endParaRPr.
    paragraph.children.retain(|node| match node {
        XmlNode::Element(element) => !matches!(element.local_name(), "r" | "br" | "fld"),
        _ => false,
    });

    let mut run = XmlElement::new(qualified(ns, "r"));
    run.children.push(XmlNode::Element(snapshot.to_rpr(ns)));
    let mut t = XmlElement::new(qualified(ns, "t"));
    t.set_text(text);
    run.children.push(XmlNode::Element(t));

    // The run goes before endParaRPr when present, otherwise at the end.
    let insert_at = paragraph
        .children
        .iter()
        .position(|node| matches!(node, XmlNode::Element(e) if e.local_name() == "endParaRPr"))
        .unwrap_or(paragraph.children.len());
    paragraph.children.insert(insert_at, XmlNode::Element(run));
}
