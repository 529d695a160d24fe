/*!
 * Document conversion pipeline.
 *
 * Drives one document through Extract -> Translate -> Apply per logical
 * unit, strictly sequentially and in traversal order, then serializes the
 * mutated document. Translation failures were already absorbed by the
 * client; the only fatal errors here are open/serialize failures.
 */

use log::{debug, info};

use crate::document::{
    DocumentKind, DocxDocument, PptxDocument, TranslatableDocument, XlsxDocument,
};
use crate::errors::DocumentError;
use crate::translation_client::TranslationClient;

/// Advisory progress reporting boundary.
///
/// Called once per logical unit after its writeback completes. Display
/// state only - not part of the conversion contract.
pub trait ProgressObserver: Send + Sync {
    /// `completed` units out of `total` are done.
    fn unit_completed(&self, completed: usize, total: usize);
}

/// Observer that ignores all progress.
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn unit_completed(&self, _completed: usize, _total: usize) {}
}

/// Per-document conversion orchestrator.
pub struct DocumentPipeline {
    client: TranslationClient,
}

impl DocumentPipeline {
    /// Create a pipeline around a translation client.
    pub fn new(client: TranslationClient) -> Self {
        Self { client }
    }

    /// Open `bytes` as `kind` and convert it.
    pub async fn convert_bytes(
        &self,
        kind: DocumentKind,
        bytes: &[u8],
        target_language: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<u8>, DocumentError> {
        match kind {
            DocumentKind::Presentation => {
                self.convert(PptxDocument::open(bytes)?, target_language, progress)
                    .await
            }
            DocumentKind::FlowDocument => {
                self.convert(DocxDocument::open(bytes)?, target_language, progress)
                    .await
            }
            DocumentKind::Spreadsheet => {
                self.convert(XlsxDocument::open(bytes)?, target_language, progress)
                    .await
            }
        }
    }

    /// Convert an open document, unit by unit, and serialize the result.
    pub async fn convert<D: TranslatableDocument>(
        &self,
        mut document: D,
        target_language: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<u8>, DocumentError> {
        let total = document.unit_count();
        info!("Translating {} unit(s) to {}", total, target_language);
        for index in 0..total {
            let extraction = document.extract_unit(index)?;
            if extraction.units.is_empty() {
                // Nothing to translate; the unit still counts for progress.
                debug!("Unit {} holds no translatable text, skipping", index);
            } else {
                debug!(
                    "Unit {}: translating {} container(s)",
                    index,
                    extraction.units.len()
                );
                let translated = self
                    .client
                    .translate_unit(&extraction.units, target_language)
                    .await;
                document.apply_unit(index, &translated)?;
            }
            progress.unit_completed(index + 1, total);
        }
        document.save()
    }
}
