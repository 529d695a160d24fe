/*!
 * Document backends for the supported OOXML formats.
 *
 * Each backend owns the open package for one conversion, knows how to walk
 * its structural tree into an [`AddressMap`](crate::address::AddressMap) and
 * how to mirror that walk when writing translated text back:
 *
 * - `pptx`: slide decks - recursive shape tree, one logical unit per slide
 * - `docx`: flow documents - paragraphs/runs and tables, one unit total
 * - `xlsx`: spreadsheets - sparse cell grid, one logical unit per sheet
 */

use crate::address::AddressMap;
use crate::errors::DocumentError;

pub mod docx;
pub mod pptx;
pub mod xlsx;

pub use docx::DocxDocument;
pub use pptx::PptxDocument;
pub use xlsx::XlsxDocument;

/// Supported document formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PowerPoint presentation (`.pptx`)
    Presentation,
    /// Word flow document (`.docx`)
    FlowDocument,
    /// Excel spreadsheet (`.xlsx`)
    Spreadsheet,
}

impl DocumentKind {
    /// Map a file extension to a document kind.
    pub fn from_extension(extension: &str) -> Result<Self, DocumentError> {
        match extension.to_ascii_lowercase().as_str() {
            "pptx" => Ok(Self::Presentation),
            "docx" => Ok(Self::FlowDocument),
            "xlsx" => Ok(Self::Spreadsheet),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Human-readable unit name for progress messages.
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Presentation => "slide",
            Self::FlowDocument => "document",
            Self::Spreadsheet => "sheet",
        }
    }
}

/// Result of extracting one logical unit.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Address -> text unit mapping, in traversal order
    pub units: AddressMap,
    /// All extracted strings joined with blank lines, auxiliary context only
    pub context: String,
}

impl Extraction {
    /// Build the context string from the map's strings in traversal order.
    pub fn from_map(units: AddressMap) -> Self {
        let context = units
            .values()
            .flat_map(|unit| unit.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self { units, context }
    }
}

/// A document open for one extract-translate-apply conversion.
///
/// The pipeline drives this trait strictly unit by unit; addresses produced
/// by `extract_unit` are only valid until the document is mutated by
/// something other than `apply_unit`.
pub trait TranslatableDocument {
    /// Number of logical units (slides, sheets, or 1 for flow documents).
    fn unit_count(&self) -> usize;

    /// Extract the address map and context string for one unit.
    fn extract_unit(&self, index: usize) -> Result<Extraction, DocumentError>;

    /// Write translated text back into one unit.
    ///
    /// Addresses absent from `translated` leave their containers untouched;
    /// shorter text units leave trailing paragraphs unmodified and longer
    /// ones are truncated.
    fn apply_unit(&mut self, index: usize, translated: &AddressMap) -> Result<(), DocumentError>;

    /// Serialize the (possibly mutated) document to bytes.
    fn save(&self) -> Result<Vec<u8>, DocumentError>;
}
